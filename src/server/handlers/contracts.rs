//! Handlers for `/contracts`

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use super::HostState;
use crate::core::error::{EntityError, FleetError, FleetResult, ValidationError};
use crate::core::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::entities::{ContractStatus, LeaseContract, NewLeaseContract, OriginCityTotal};

use super::trucks::KeywordQuery;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct AmountQuery {
    pub amount: f64,
}

fn not_found(id: Uuid) -> FleetError {
    EntityError::not_found::<LeaseContract>(id).into()
}

/// POST /contracts
pub async fn create_contract(
    State(host): State<HostState>,
    ApiJson(payload): ApiJson<NewLeaseContract>,
) -> FleetResult<(StatusCode, Json<LeaseContract>)> {
    let contract = host.contracts.create(payload).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

/// GET /contracts
pub async fn list_contracts(
    State(host): State<HostState>,
) -> FleetResult<Json<Vec<LeaseContract>>> {
    Ok(Json(host.contracts.list().await?))
}

/// GET /contracts/{id}
pub async fn get_contract(
    State(host): State<HostState>,
    ApiPath(id): ApiPath<Uuid>,
) -> FleetResult<Json<LeaseContract>> {
    host.contracts
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PUT /contracts/{id}
pub async fn update_contract(
    State(host): State<HostState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<NewLeaseContract>,
) -> FleetResult<Json<LeaseContract>> {
    host.contracts
        .update(&id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// DELETE /contracts/{id}
pub async fn delete_contract(
    State(host): State<HostState>,
    ApiPath(id): ApiPath<Uuid>,
) -> FleetResult<StatusCode> {
    host.contracts.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /contracts/status?status=
pub async fn contracts_by_status(
    State(host): State<HostState>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> FleetResult<Json<Vec<LeaseContract>>> {
    Ok(Json(host.contracts.find_by_status(&query.status).await?))
}

/// GET /contracts/search?keyword=
pub async fn search_contracts(
    State(host): State<HostState>,
    ApiQuery(query): ApiQuery<KeywordQuery>,
) -> FleetResult<Json<Vec<LeaseContract>>> {
    Ok(Json(host.contracts.search(&query.keyword).await?))
}

/// PATCH /contracts/{id}/status?status=
///
/// Any string is stored; values outside [`ContractStatus::ALL`] are only
/// logged.
pub async fn update_contract_status(
    State(host): State<HostState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> FleetResult<StatusCode> {
    if !ContractStatus::is_known(&query.status) {
        tracing::warn!(%id, status = %query.status, "storing unrecognised contract status");
    }

    if host.contracts.update_status(&id, &query.status).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// PATCH /contracts/{id}/amount?amount=
///
/// Negative amounts are stored; `NaN` and infinities are rejected.
pub async fn update_contract_amount(
    State(host): State<HostState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<AmountQuery>,
) -> FleetResult<StatusCode> {
    if !query.amount.is_finite() {
        return Err(ValidationError::FieldError {
            field: "amount".to_string(),
            message: format!("amount must be a finite number (got {})", query.amount),
        }
        .into());
    }

    if host.contracts.update_amount(&id, query.amount).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /contracts/totalLeaseByOriginCity
pub async fn total_lease_by_origin_city(
    State(host): State<HostState>,
) -> FleetResult<Json<Vec<OriginCityTotal>>> {
    Ok(Json(host.contracts.total_lease_by_origin_city().await?))
}

/// POST /contracts/{id}/activate
pub async fn activate_contract(
    State(host): State<HostState>,
    ApiPath(id): ApiPath<Uuid>,
) -> FleetResult<StatusCode> {
    if host.contracts.activate(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
