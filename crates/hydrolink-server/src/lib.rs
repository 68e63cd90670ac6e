//! HTTP surface for the Hydrolink reconciliation service.
//!
//! One mutating endpoint (`POST /resource/{resource_id}/services`) drives the
//! reconciler; everything else is health and observability plumbing.

pub mod handlers;
pub mod locks;
pub mod middleware;
pub mod observability;
pub mod server;

pub use server::{AppState, HydrolinkServer, ServerBuilder, build_app};
