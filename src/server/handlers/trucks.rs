//! Handlers for `/trucks`

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use super::HostState;
use crate::core::error::{EntityError, FleetResult};
use crate::core::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::core::query::{PageQuery, SortDirection, SortQuery};
use crate::entities::{CityGroup, NewTruck, Truck, TruckSummary};

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct KeywordQuery {
    pub keyword: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinTonsQuery {
    pub min_tons: f64,
}

#[derive(Debug, Deserialize)]
pub struct AvailableQuery {
    pub available: bool,
}

/// POST /trucks
pub async fn create_truck(
    State(host): State<HostState>,
    ApiJson(payload): ApiJson<NewTruck>,
) -> FleetResult<(StatusCode, Json<Truck>)> {
    let truck = host.trucks.create(payload).await?;
    Ok((StatusCode::CREATED, Json(truck)))
}

/// GET /trucks
pub async fn list_trucks(State(host): State<HostState>) -> FleetResult<Json<Vec<Truck>>> {
    Ok(Json(host.trucks.list().await?))
}

/// GET /trucks/{id}
pub async fn get_truck(
    State(host): State<HostState>,
    ApiPath(id): ApiPath<Uuid>,
) -> FleetResult<Json<Truck>> {
    host.trucks
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| EntityError::not_found::<Truck>(id).into())
}

/// DELETE /trucks/{id}
pub async fn delete_truck(
    State(host): State<HostState>,
    ApiPath(id): ApiPath<Uuid>,
) -> FleetResult<StatusCode> {
    host.trucks.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /trucks/available?city=
pub async fn available_trucks(
    State(host): State<HostState>,
    ApiQuery(query): ApiQuery<CityQuery>,
) -> FleetResult<Json<Vec<Truck>>> {
    Ok(Json(host.trucks.find_available(&query.city).await?))
}

/// GET /trucks/search?keyword=
pub async fn search_trucks(
    State(host): State<HostState>,
    ApiQuery(query): ApiQuery<KeywordQuery>,
) -> FleetResult<Json<Vec<Truck>>> {
    Ok(Json(host.trucks.search(&query.keyword).await?))
}

/// GET /trucks/sort?desc=
pub async fn sort_trucks(
    State(host): State<HostState>,
    ApiQuery(query): ApiQuery<SortQuery>,
) -> FleetResult<Json<Vec<Truck>>> {
    let direction = SortDirection::from_desc(query.desc);
    Ok(Json(host.trucks.sort_by_capacity(direction).await?))
}

/// GET /trucks/page?page=&size=
pub async fn page_trucks(
    State(host): State<HostState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> FleetResult<Json<Vec<Truck>>> {
    let page = query.into_request()?;
    Ok(Json(host.trucks.paginate(page).await?))
}

/// GET /trucks/projected
pub async fn projected_trucks(
    State(host): State<HostState>,
) -> FleetResult<Json<Vec<TruckSummary>>> {
    Ok(Json(host.trucks.projected().await?))
}

/// GET /trucks/capacity?minTons=
pub async fn trucks_above_capacity(
    State(host): State<HostState>,
    ApiQuery(query): ApiQuery<MinTonsQuery>,
) -> FleetResult<Json<Vec<Truck>>> {
    Ok(Json(host.trucks.above_capacity(query.min_tons).await?))
}

/// PATCH /trucks/{truckNumber}/city?city=
pub async fn update_truck_city(
    State(host): State<HostState>,
    ApiPath(truck_number): ApiPath<String>,
    ApiQuery(query): ApiQuery<CityQuery>,
) -> FleetResult<StatusCode> {
    if host.trucks.update_city(&truck_number, &query.city).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(EntityError::not_found::<Truck>(truck_number).into())
    }
}

/// PATCH /trucks/{truckNumber}/availability?available=
pub async fn update_truck_availability(
    State(host): State<HostState>,
    ApiPath(truck_number): ApiPath<String>,
    ApiQuery(query): ApiQuery<AvailableQuery>,
) -> FleetResult<StatusCode> {
    if host
        .trucks
        .update_availability(&truck_number, query.available)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(EntityError::not_found::<Truck>(truck_number).into())
    }
}

/// GET /trucks/groupByCity
pub async fn group_trucks_by_city(
    State(host): State<HostState>,
) -> FleetResult<Json<Vec<CityGroup>>> {
    Ok(Json(host.trucks.group_by_city().await?))
}
