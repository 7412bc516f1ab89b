//! labelscan HTTP gateway
//!
//! Serves the extraction endpoint and a health probe behind a CORS
//! allow-list and an upload size limit.

pub mod cors;
pub mod extract_api;
pub mod health_api;
pub mod server;

pub use server::{GatewayState, build_router, start_server};
