use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MerchantCodeRequest {
    #[validate(length(min = 1, max = 64))]
    pub merchant_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncMerchantResponse {
    pub synced: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveMerchantsResponse {
    pub merchant_codes: Vec<String>,
}
