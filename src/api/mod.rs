//! HTTP surface for ebook generation.
//!
//! Exposes the pipeline as JSON endpoints nested under `/api/`, with
//! bearer-token access control on the generation routes. The router is
//! composable and can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer};
pub use types::ApiContext;
