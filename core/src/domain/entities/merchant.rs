//! Merchant (tenant) entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A merchant registered with the platform
///
/// Only merchants with `is_active` set may obtain or use tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    pub code: String,
    pub company_name: String,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub is_active: bool,
    pub date_joined: Option<DateTime<Utc>>,
}

impl Merchant {
    pub fn new(code: impl Into<String>, company_name: impl Into<String>, is_active: bool) -> Self {
        Self {
            code: code.into(),
            company_name: company_name.into(),
            address: None,
            email: None,
            phone: None,
            website: None,
            is_active,
            date_joined: Some(Utc::now()),
        }
    }
}
