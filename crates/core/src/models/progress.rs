//! Progress, claim, and pass-purchase payloads for the battle-pass endpoints

use serde::{Deserialize, Serialize};

/// Envelope returned by the progress endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressPayload {
    #[serde(default)]
    pub data: Option<ProgressData>,
}

/// The progress fields proper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressData {
    #[serde(default = "default_current_day")]
    pub current_day: u32,
    #[serde(default)]
    pub claimed_days: Vec<u32>,
}

fn default_current_day() -> u32 {
    1
}

/// Response from the claim endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Full claimed-day set after the claim, server-authoritative
    #[serde(default)]
    pub claimed_days: Vec<u32>,
    /// Day the server considers current after the claim
    #[serde(default)]
    pub day: Option<u32>,
    #[serde(default)]
    pub item_name: Option<String>,
    /// Some server builds send the icon as `image`
    #[serde(default, alias = "image")]
    pub icon: Option<String>,
    #[serde(default)]
    pub amount: Option<u32>,
}

impl ClaimResponse {
    /// Message to surface, with the fallback used for silent servers
    pub fn display_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "Unknown response".to_string())
    }
}

/// Response from the pass purchase endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassPurchaseResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
}

impl PassPurchaseResponse {
    pub fn display_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "Unknown response".to_string())
    }
}
