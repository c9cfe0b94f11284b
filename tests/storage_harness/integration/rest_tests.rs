//! REST integration test macro for storage backends.
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that run a
//! pair of services through full REST round-trips:
//! JSON → HTTP request → handler → service → HTTP response → JSON.

/// Generate a REST integration test suite for a storage backend.
///
/// `$trucks` must produce an `impl TruckService + 'static` and `$contracts`
/// an `impl LeaseContractService + 'static`, both fresh and empty.
///
/// # Generated Tests
///
/// ## Trucks
/// - `test_rest_truck_create_and_get` — POST 201, GET 200
/// - `test_rest_truck_list_and_delete` — DELETE 204 then GET 404, delete is idempotent
/// - `test_rest_truck_queries` — available, search, sort, capacity, projected
/// - `test_rest_truck_page` — page=2&size=3, invalid page → 400
/// - `test_rest_truck_partial_updates` — PATCH city/availability, unknown number → 404
/// - `test_rest_truck_group_by_city`
///
/// ## Contracts
/// - `test_rest_contract_lifecycle` — create, PUT, status filter, activate
/// - `test_rest_contract_partial_updates` — PATCH status/amount
/// - `test_rest_contract_amount_must_be_finite` — NaN/inf → 400, record untouched
/// - `test_rest_contract_totals`
/// - `test_rest_contract_search`
///
/// ## Error handling
/// - `test_rest_error_not_found` — unknown ids → 404 `ENTITY_NOT_FOUND`
/// - `test_rest_error_invalid_input` — bad uuid, bool, number, JSON → 400
/// - `test_rest_health`
#[macro_export]
macro_rules! rest_integration_tests {
    ($trucks:expr, $contracts:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use fleet::core::service::{LeaseContractService, TruckService};
            use serde_json::{Value, json};
            use std::sync::Arc;

            async fn make_server() -> TestServer {
                let trucks: Arc<dyn TruckService> = Arc::new($trucks);
                let contracts: Arc<dyn LeaseContractService> = Arc::new($contracts);
                let router = storage_harness::integration::build_test_router(trucks, contracts);
                TestServer::new(router)
            }

            async fn post_truck(
                server: &TestServer,
                number: &str,
                capacity: f64,
                city: &str,
                available: bool,
            ) -> Value {
                let response = server
                    .post("/api/trucks")
                    .json(&truck_json(number, capacity, city, available))
                    .await;
                response.assert_status(StatusCode::CREATED);
                response.json()
            }

            async fn post_contract(
                server: &TestServer,
                lessee: &str,
                origin: &str,
                amount: f64,
                status: &str,
            ) -> Value {
                let response = server
                    .post("/api/contracts")
                    .json(&contract_json(lessee, origin, amount, status))
                    .await;
                response.assert_status(StatusCode::CREATED);
                response.json()
            }

            fn numbers(body: &Value) -> Vec<String> {
                body.as_array()
                    .unwrap()
                    .iter()
                    .map(|t| t["truckNumber"].as_str().unwrap().to_string())
                    .collect()
            }

            // ==============================================================
            // Trucks
            // ==============================================================

            #[tokio::test]
            async fn test_rest_truck_create_and_get() {
                let server = make_server().await;

                let created = post_truck(&server, "TRK-1", 18.5, "Leeds", true).await;
                assert_eq!(created["truckNumber"], "TRK-1");
                assert_eq!(created["type"], "Flatbed");
                assert_eq!(created["capacityTons"], 18.5);
                assert_eq!(created["currentCity"], "Leeds");
                assert_eq!(created["available"], true);
                let id = created["id"].as_str().unwrap();
                uuid::Uuid::parse_str(id).unwrap();

                let response = server.get(&format!("/api/trucks/{}", id)).await;
                response.assert_status(StatusCode::OK);
                assert_eq!(response.json::<Value>(), created);
            }

            #[tokio::test]
            async fn test_rest_truck_create_ignores_body_id() {
                let server = make_server().await;
                let fixed = uuid::Uuid::new_v4().to_string();

                let mut body = truck_json("TRK-1", 1.0, "Leeds", true);
                body["id"] = json!(fixed);
                let response = server.post("/api/trucks").json(&body).await;
                response.assert_status(StatusCode::CREATED);

                let created: Value = response.json();
                assert_ne!(created["id"], json!(fixed));
            }

            #[tokio::test]
            async fn test_rest_truck_list_and_delete() {
                let server = make_server().await;
                let a = post_truck(&server, "A", 1.0, "Leeds", true).await;
                post_truck(&server, "B", 2.0, "York", true).await;

                let list = server.get("/api/trucks").await;
                list.assert_status(StatusCode::OK);
                assert_eq!(numbers(&list.json()), vec!["A", "B"]);

                let id = a["id"].as_str().unwrap();
                server
                    .delete(&format!("/api/trucks/{}", id))
                    .await
                    .assert_status(StatusCode::NO_CONTENT);
                server
                    .get(&format!("/api/trucks/{}", id))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
                server
                    .delete(&format!("/api/trucks/{}", id))
                    .await
                    .assert_status(StatusCode::NO_CONTENT);

                assert_eq!(numbers(&server.get("/api/trucks").await.json()), vec!["B"]);
            }

            #[tokio::test]
            async fn test_rest_truck_queries() {
                let server = make_server().await;
                post_truck(&server, "T1", 5.0, "Leeds", true).await;
                post_truck(&server, "T2", 12.0, "Leeds", false).await;
                post_truck(&server, "X3", 30.0, "York", true).await;

                let available = server
                    .get("/api/trucks/available")
                    .add_query_param("city", "Leeds")
                    .await;
                available.assert_status(StatusCode::OK);
                assert_eq!(numbers(&available.json()), vec!["T1"]);

                let search = server
                    .get("/api/trucks/search")
                    .add_query_param("keyword", "x")
                    .await;
                assert_eq!(numbers(&search.json()), vec!["X3"]);

                let ascending = server.get("/api/trucks/sort").await;
                assert_eq!(numbers(&ascending.json()), vec!["T1", "T2", "X3"]);

                let descending = server
                    .get("/api/trucks/sort")
                    .add_query_param("desc", "true")
                    .await;
                assert_eq!(numbers(&descending.json()), vec!["X3", "T2", "T1"]);

                let heavy = server
                    .get("/api/trucks/capacity")
                    .add_query_param("minTons", "12")
                    .await;
                assert_eq!(numbers(&heavy.json()), vec!["X3"]);

                let projected: Value = server.get("/api/trucks/projected").await.json();
                let first = projected[0].as_object().unwrap();
                assert_eq!(first.len(), 3);
                assert_eq!(projected[0]["truckNumber"], "T1");
                assert_eq!(projected[0]["type"], "Flatbed");
                assert_eq!(projected[0]["available"], true);
            }

            #[tokio::test]
            async fn test_rest_truck_page() {
                let server = make_server().await;
                for i in 0..10 {
                    post_truck(&server, &format!("P{}", i), i as f64, "Leeds", true).await;
                }

                let page = server
                    .get("/api/trucks/page")
                    .add_query_param("page", "2")
                    .add_query_param("size", "3")
                    .await;
                page.assert_status(StatusCode::OK);
                assert_eq!(numbers(&page.json()), vec!["P3", "P4", "P5"]);

                let invalid = server
                    .get("/api/trucks/page")
                    .add_query_param("page", "0")
                    .add_query_param("size", "3")
                    .await;
                invalid.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(invalid.json::<Value>()["code"], "VALIDATION_ERROR");
            }

            #[tokio::test]
            async fn test_rest_truck_partial_updates() {
                let server = make_server().await;
                let created = post_truck(&server, "T1", 5.0, "X", false).await;
                let id = created["id"].as_str().unwrap();

                server
                    .patch("/api/trucks/T1/availability")
                    .add_query_param("available", "true")
                    .await
                    .assert_status(StatusCode::NO_CONTENT);
                let available = server
                    .get("/api/trucks/available")
                    .add_query_param("city", "X")
                    .await;
                assert_eq!(numbers(&available.json()), vec!["T1"]);

                server
                    .patch("/api/trucks/T1/city")
                    .add_query_param("city", "Paris")
                    .await
                    .assert_status(StatusCode::NO_CONTENT);
                let fetched: Value = server.get(&format!("/api/trucks/{}", id)).await.json();
                assert_eq!(fetched["currentCity"], "Paris");
                assert_eq!(fetched["available"], true);

                let missing = server
                    .patch("/api/trucks/NOPE/city")
                    .add_query_param("city", "Paris")
                    .await;
                missing.assert_status(StatusCode::NOT_FOUND);
                assert_eq!(missing.json::<Value>()["code"], "ENTITY_NOT_FOUND");
            }

            #[tokio::test]
            async fn test_rest_truck_group_by_city() {
                let server = make_server().await;
                post_truck(&server, "T1", 5.0, "York", true).await;
                post_truck(&server, "T2", 10.0, "Leeds", true).await;
                post_truck(&server, "T3", 2.5, "Leeds", false).await;

                let response = server.get("/api/trucks/groupByCity").await;
                response.assert_status(StatusCode::OK);
                assert_eq!(
                    response.json::<Value>(),
                    json!([
                        {"city": "Leeds", "truckCount": 2, "totalCapacity": 12.5},
                        {"city": "York", "truckCount": 1, "totalCapacity": 5.0}
                    ])
                );
            }

            // ==============================================================
            // Contracts
            // ==============================================================

            #[tokio::test]
            async fn test_rest_contract_lifecycle() {
                let server = make_server().await;
                let created = post_contract(&server, "Acme", "Lyon", 100.0, "CANCELLED").await;
                assert_eq!(created["startDate"], "2025-03-01");
                assert_eq!(created["status"], "CANCELLED");
                let id = created["id"].as_str().unwrap();

                // full replace, body id ignored
                let mut replacement = contract_json("Acme Two", "Oslo", 250.0, "COMPLETED");
                replacement["id"] = json!(uuid::Uuid::new_v4().to_string());
                let updated = server
                    .put(&format!("/api/contracts/{}", id))
                    .json(&replacement)
                    .await;
                updated.assert_status(StatusCode::OK);
                let updated: Value = updated.json();
                assert_eq!(updated["id"], id);
                assert_eq!(updated["lesseeName"], "Acme Two");
                assert_eq!(updated["leaseAmount"], 250.0);

                let completed: Value = server
                    .get("/api/contracts/status")
                    .add_query_param("status", "COMPLETED")
                    .await
                    .json();
                assert_eq!(completed.as_array().unwrap().len(), 1);

                server
                    .post(&format!("/api/contracts/{}/activate", id))
                    .await
                    .assert_status(StatusCode::NO_CONTENT);
                let fetched: Value = server.get(&format!("/api/contracts/{}", id)).await.json();
                assert_eq!(fetched["status"], "ACTIVE");

                server
                    .delete(&format!("/api/contracts/{}", id))
                    .await
                    .assert_status(StatusCode::NO_CONTENT);
                let all: Value = server.get("/api/contracts").await.json();
                assert!(all.as_array().unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_rest_contract_partial_updates() {
                let server = make_server().await;
                let created = post_contract(&server, "Acme", "Lyon", 100.0, "ACTIVE").await;
                let id = created["id"].as_str().unwrap();

                server
                    .patch(&format!("/api/contracts/{}/status", id))
                    .add_query_param("status", "PAUSED")
                    .await
                    .assert_status(StatusCode::NO_CONTENT);
                server
                    .patch(&format!("/api/contracts/{}/amount", id))
                    .add_query_param("amount", "-12.5")
                    .await
                    .assert_status(StatusCode::NO_CONTENT);

                let fetched: Value = server.get(&format!("/api/contracts/{}", id)).await.json();
                assert_eq!(fetched["status"], "PAUSED");
                assert_eq!(fetched["leaseAmount"], -12.5);
            }

            #[tokio::test]
            async fn test_rest_contract_amount_must_be_finite() {
                let server = make_server().await;
                let created = post_contract(&server, "Acme", "A", 100.0, "ACTIVE").await;
                let id = created["id"].as_str().unwrap();

                for amount in ["NaN", "inf", "-inf"] {
                    let response = server
                        .patch(&format!("/api/contracts/{}/amount", id))
                        .add_query_param("amount", amount)
                        .await;
                    response.assert_status(StatusCode::BAD_REQUEST);
                    let body: Value = response.json();
                    assert_eq!(body["code"], "VALIDATION_ERROR", "amount {}", amount);
                    assert_eq!(body["details"]["fields"][0]["field"], "amount");
                }

                let fetched: Value = server.get(&format!("/api/contracts/{}", id)).await.json();
                assert_eq!(fetched["leaseAmount"], 100.0);

                let totals: Value = server
                    .get("/api/contracts/totalLeaseByOriginCity")
                    .await
                    .json();
                assert_eq!(
                    totals,
                    json!([{"originCity": "A", "totalLease": 100.0, "contractsCount": 1}])
                );
            }

            #[tokio::test]
            async fn test_rest_contract_totals() {
                let server = make_server().await;
                post_contract(&server, "a", "A", 100.0, "ACTIVE").await;
                post_contract(&server, "b", "B", 10.0, "ACTIVE").await;
                post_contract(&server, "c", "A", 50.0, "ACTIVE").await;

                let response = server.get("/api/contracts/totalLeaseByOriginCity").await;
                response.assert_status(StatusCode::OK);
                assert_eq!(
                    response.json::<Value>(),
                    json!([
                        {"originCity": "A", "totalLease": 150.0, "contractsCount": 2},
                        {"originCity": "B", "totalLease": 10.0, "contractsCount": 1}
                    ])
                );
            }

            #[tokio::test]
            async fn test_rest_contract_search() {
                let server = make_server().await;
                post_contract(&server, "Nordic Haulers", "Oslo", 1.0, "ACTIVE").await;
                post_contract(&server, "Alpine Cargo", "Oslo", 1.0, "ACTIVE").await;

                let found: Value = server
                    .get("/api/contracts/search")
                    .add_query_param("keyword", "vienna")
                    .await
                    .json();
                // every harness contract goes to Vienna
                assert_eq!(found.as_array().unwrap().len(), 2);

                let found: Value = server
                    .get("/api/contracts/search")
                    .add_query_param("keyword", "ALPINE")
                    .await
                    .json();
                assert_eq!(found.as_array().unwrap().len(), 1);
                assert_eq!(found[0]["lesseeName"], "Alpine Cargo");
            }

            // ==============================================================
            // Error handling
            // ==============================================================

            #[tokio::test]
            async fn test_rest_error_not_found() {
                let server = make_server().await;
                let id = uuid::Uuid::new_v4();

                let response = server.get(&format!("/api/trucks/{}", id)).await;
                response.assert_status(StatusCode::NOT_FOUND);
                let body: Value = response.json();
                assert_eq!(body["code"], "ENTITY_NOT_FOUND");
                assert!(body["message"].as_str().unwrap().contains(&id.to_string()));

                server
                    .get(&format!("/api/contracts/{}", id))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
                server
                    .put(&format!("/api/contracts/{}", id))
                    .json(&contract_json("x", "Lyon", 1.0, "ACTIVE"))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
                server
                    .post(&format!("/api/contracts/{}/activate", id))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
                server
                    .patch(&format!("/api/contracts/{}/amount", id))
                    .add_query_param("amount", "1")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_error_invalid_input() {
                let server = make_server().await;

                let bad_id = server.get("/api/trucks/not-a-uuid").await;
                bad_id.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(bad_id.json::<Value>()["code"], "INVALID_REQUEST");

                server
                    .patch("/api/trucks/T1/availability")
                    .add_query_param("available", "maybe")
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);

                server
                    .get("/api/trucks/capacity")
                    .add_query_param("minTons", "heavy")
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);

                server
                    .get("/api/trucks/available")
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);

                let mut bad_date = contract_json("x", "Lyon", 1.0, "ACTIVE");
                bad_date["startDate"] = json!("01/03/2025");
                let response = server.post("/api/contracts").json(&bad_date).await;
                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["code"], "INVALID_REQUEST");

                server
                    .post("/api/trucks")
                    .json(&json!({"truckNumber": "T1"}))
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
            }

            #[tokio::test]
            async fn test_rest_health() {
                let server = make_server().await;
                let response = server.get("/health").await;
                response.assert_status(StatusCode::OK);
                assert_eq!(
                    response.json::<Value>(),
                    json!({"status": "ok", "service": "fleet-lease"})
                );
            }
        }
    };
}
