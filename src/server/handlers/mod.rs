//! HTTP handlers for the `/trucks` and `/contracts` resource groups
//!
//! Each handler parses its path, query and body parameters, calls exactly one
//! service operation and serializes the result. Store errors convert into
//! [`FleetError`](crate::core::FleetError) through `?`.

pub mod contracts;
pub mod trucks;

use crate::server::host::ServerHost;
use std::sync::Arc;

/// Router state shared by every handler
pub type HostState = Arc<ServerHost>;
