//! Shared test harness for storage backend testing
//!
//! Provides payload builders for trucks and lease contracts, assertion
//! helpers, and the contract-suite macros every backend runs:
//!
//! - `truck_service_tests!` — `TruckService` behaviour
//! - `lease_contract_service_tests!` — `LeaseContractService` behaviour
//! - `rest_integration_tests!` — full HTTP round-trips over both services
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod integration;

use chrono::NaiveDate;
use fleet::entities::{NewLeaseContract, NewTruck};
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Helper functions — Truck payloads
// ---------------------------------------------------------------------------

/// Build a `NewTruck` owned by a fixed company.
pub fn new_truck(
    truck_number: &str,
    truck_type: &str,
    capacity_tons: f64,
    current_city: &str,
    available: bool,
) -> NewTruck {
    NewTruck {
        truck_number: truck_number.to_string(),
        truck_type: truck_type.to_string(),
        capacity_tons,
        owner_company: "Harness Logistics".to_string(),
        current_city: current_city.to_string(),
        available,
    }
}

/// Ten trucks `T0`..`T9` with distinct capacities, spread over three cities.
///
/// Capacities are `(i * 7) % 10 + 1`, so no two trucks tie.
pub fn sample_trucks() -> Vec<NewTruck> {
    let cities = ["Berlin", "Hamburg", "Munich"];
    let types = ["Flatbed", "Refrigerated", "Container"];
    (0..10)
        .map(|i| {
            new_truck(
                &format!("T{}", i),
                types[i % types.len()],
                ((i * 7) % 10 + 1) as f64,
                cities[i % cities.len()],
                i % 2 == 0,
            )
        })
        .collect()
}

/// JSON body for `POST /trucks`.
pub fn truck_json(truck_number: &str, capacity_tons: f64, city: &str, available: bool) -> Value {
    json!({
        "truckNumber": truck_number,
        "type": "Flatbed",
        "capacityTons": capacity_tons,
        "ownerCompany": "Harness Logistics",
        "currentCity": city,
        "available": available
    })
}

// ---------------------------------------------------------------------------
// Helper functions — LeaseContract payloads
// ---------------------------------------------------------------------------

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Build a `NewLeaseContract` running through March 2025.
pub fn new_contract(
    lessee_name: &str,
    origin_city: &str,
    destination_city: &str,
    lease_amount: f64,
    status: &str,
) -> NewLeaseContract {
    NewLeaseContract {
        truck_number: "T1".to_string(),
        lessee_name: lessee_name.to_string(),
        origin_city: origin_city.to_string(),
        destination_city: destination_city.to_string(),
        lease_amount,
        start_date: date(2025, 3, 1),
        end_date: date(2025, 3, 31),
        status: status.to_string(),
    }
}

/// JSON body for `POST /contracts` and `PUT /contracts/{id}`.
pub fn contract_json(lessee_name: &str, origin_city: &str, lease_amount: f64, status: &str) -> Value {
    json!({
        "truckNumber": "T1",
        "lesseeName": lessee_name,
        "originCity": origin_city,
        "destinationCity": "Vienna",
        "leaseAmount": lease_amount,
        "startDate": "2025-03-01",
        "endDate": "2025-03-31",
        "status": status
    })
}

// ---------------------------------------------------------------------------
// Assertions helpers
// ---------------------------------------------------------------------------

/// Assert that a list contains exactly `n` items.
pub fn assert_count<T>(list: &[T], expected: usize) {
    assert_eq!(
        list.len(),
        expected,
        "Expected {} items, got {}",
        expected,
        list.len()
    );
}

/// Assert two floats are equal up to rounding noise.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "Expected {}, got {}",
        expected,
        actual
    );
}
