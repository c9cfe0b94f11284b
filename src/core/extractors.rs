//! Axum extractors whose rejections are rendered as [`FleetError`]s
//!
//! The stock `Path`, `Query` and `Json` extractors answer malformed input with
//! plain-text bodies. These wrappers delegate to them and convert the
//! rejection so every 400 carries the same JSON error shape as the rest of the
//! API.

use axum::extract::{FromRequest, FromRequestParts};

use crate::core::error::FleetError;

/// Path parameters, e.g. a contract id that must parse as a UUID
#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(FleetError))]
pub struct ApiPath<T>(pub T);

/// Query string parameters, e.g. `?available=true` or `?amount=12.5`
#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(FleetError))]
pub struct ApiQuery<T>(pub T);

/// JSON request body
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(FleetError))]
pub struct ApiJson<T>(pub T);
