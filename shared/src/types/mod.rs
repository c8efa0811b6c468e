//! Type definitions shared between the API layer and its clients
//!
//! - `response` - The response envelope and health check payload

pub mod response;

pub use response::{ApiResponse, HealthResponse};
