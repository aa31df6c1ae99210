//! HTTP API for the dashboard.
//!
//! Every route is nested under `/api/` and served from the shared
//! `CoreState`. Handlers call the synchronous engine directly; the work
//! per request is small and bounded.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ApiSession};
pub use types::ApiContext;
