//! Server module for building the HTTP API
//!
//! - `handlers`: one function per route
//! - `router`: route tables for `/trucks` and `/contracts`
//! - `host`: the injected services, independent of HTTP
//! - `exposure`: health routes, prefix nesting and middleware
//! - `builder`: fluent entry point tying the above together

pub mod builder;
pub mod exposure;
pub mod handlers;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use exposure::{RestExposure, RestOptions};
pub use host::ServerHost;
