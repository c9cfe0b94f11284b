//! REST API exposure
//!
//! Consumes a `ServerHost` and produces an Axum `Router`: health routes at
//! the root, resource routes under the API prefix, and the HTTP middleware
//! stack around all of it.

use super::super::host::ServerHost;
use crate::server::router::{build_contract_routes, build_truck_routes};
use anyhow::{Result, bail};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Default prefix for the resource routes
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Knobs for the REST router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestOptions {
    /// Prefix for `/trucks` and `/contracts`; empty or `/` mounts them at the root
    pub api_prefix: String,

    /// Requests running longer get a 408
    pub request_timeout: Duration,
}

impl Default for RestOptions {
    fn default() -> Self {
        Self {
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Returns a fully configured Axum router with:
    /// - Health check routes (`/health`, `/healthz`)
    /// - `{prefix}/trucks/...` and `{prefix}/contracts/...`
    /// - Trace, timeout and CORS layers
    pub fn build_router(host: Arc<ServerHost>, options: &RestOptions) -> Result<Router> {
        let resources = Router::new()
            .nest("/trucks", build_truck_routes())
            .nest("/contracts", build_contract_routes());

        let prefix = options.api_prefix.trim_end_matches('/');
        let app = if prefix.is_empty() {
            resources
        } else if !prefix.starts_with('/') {
            bail!("API prefix must start with '/': {:?}", options.api_prefix);
        } else {
            Router::new().nest(prefix, resources)
        };

        let app = Self::health_routes()
            .merge(app)
            .with_state(host)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                options.request_timeout,
            ))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(CorsLayer::permissive());

        Ok(app)
    }

    /// Build health check routes
    fn health_routes() -> Router<Arc<ServerHost>> {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "fleet-lease"
        }))
    }
}
