//! Route tables for the resource groups
//!
//! Static segments (`/available`, `/search`, ...) take priority over the
//! `{id}` capture. Truck partial updates reuse the same capture position for
//! the truck number, so it is named `{id}` there too.

use axum::Router;
use axum::routing::{get, patch, post};

use super::handlers::{HostState, contracts, trucks};

/// Build truck routes
///
/// - POST/GET /trucks
/// - GET/DELETE /trucks/{id}
/// - GET /trucks/available?city=
/// - GET /trucks/search?keyword=
/// - GET /trucks/sort?desc=
/// - GET /trucks/page?page=&size=
/// - GET /trucks/projected
/// - GET /trucks/capacity?minTons=
/// - GET /trucks/groupByCity
/// - PATCH /trucks/{truckNumber}/city?city=
/// - PATCH /trucks/{truckNumber}/availability?available=
pub fn build_truck_routes() -> Router<HostState> {
    Router::new()
        .route("/", post(trucks::create_truck).get(trucks::list_trucks))
        .route("/available", get(trucks::available_trucks))
        .route("/search", get(trucks::search_trucks))
        .route("/sort", get(trucks::sort_trucks))
        .route("/page", get(trucks::page_trucks))
        .route("/projected", get(trucks::projected_trucks))
        .route("/capacity", get(trucks::trucks_above_capacity))
        .route("/groupByCity", get(trucks::group_trucks_by_city))
        .route(
            "/{id}",
            get(trucks::get_truck).delete(trucks::delete_truck),
        )
        .route("/{id}/city", patch(trucks::update_truck_city))
        .route(
            "/{id}/availability",
            patch(trucks::update_truck_availability),
        )
}

/// Build lease contract routes
///
/// - POST/GET /contracts
/// - GET/PUT/DELETE /contracts/{id}
/// - GET /contracts/status?status=
/// - GET /contracts/search?keyword=
/// - GET /contracts/totalLeaseByOriginCity
/// - PATCH /contracts/{id}/status?status=
/// - PATCH /contracts/{id}/amount?amount=
/// - POST /contracts/{id}/activate
pub fn build_contract_routes() -> Router<HostState> {
    Router::new()
        .route(
            "/",
            post(contracts::create_contract).get(contracts::list_contracts),
        )
        .route("/status", get(contracts::contracts_by_status))
        .route("/search", get(contracts::search_contracts))
        .route(
            "/totalLeaseByOriginCity",
            get(contracts::total_lease_by_origin_city),
        )
        .route(
            "/{id}",
            get(contracts::get_contract)
                .put(contracts::update_contract)
                .delete(contracts::delete_contract),
        )
        .route("/{id}/status", patch(contracts::update_contract_status))
        .route("/{id}/amount", patch(contracts::update_contract_amount))
        .route("/{id}/activate", post(contracts::activate_contract))
}
