//! API response types and wrappers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard API response envelope
///
/// Every endpoint answers with `{ "status": bool, "message": string, "data": ... }`.
/// Failures carry `status = false` and an empty object as `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub status: bool,

    /// Outcome message (`SUCCESS` on success)
    pub message: String,

    /// Response payload
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            status: true,
            message: String::from("SUCCESS"),
            data,
        }
    }

    /// Check if the response is successful
    pub fn is_success(&self) -> bool {
        self.status
    }
}

impl ApiResponse<serde_json::Value> {
    /// Create a failed response with an empty payload
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
            data: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Health check payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: String::from("healthy"),
            service: service.into(),
            version: version.into(),
            timestamp: Utc::now(),
        }
    }
}
