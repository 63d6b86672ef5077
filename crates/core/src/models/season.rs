//! Season catalog payloads for the battle-pass endpoint

use crate::types::RewardKind;
use serde::{Deserialize, Serialize};

/// Season document returned by the battle-pass catalog endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonPayload {
    #[serde(default)]
    pub name: Option<String>,
    /// Season end, as the server formats it
    #[serde(default)]
    pub end_date: Option<String>,
    /// Absent when the server answers with something other than a season
    #[serde(default)]
    pub rewards: Option<Vec<RewardPayload>>,
}

/// One reward row as the server sends it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardPayload {
    pub day: u32,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub item_type: Option<String>,
    /// Older season documents call this `amount`
    #[serde(default, alias = "amount")]
    pub reward_value: Option<u32>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A reward day as held by the client
#[derive(Debug, Clone, PartialEq)]
pub struct RewardEntry {
    /// Season day this reward belongs to (1-based)
    pub day: u32,
    pub name: String,
    pub kind: RewardKind,
    pub value: u32,
    pub icon: Option<String>,
    pub description: String,
}

impl From<RewardPayload> for RewardEntry {
    fn from(p: RewardPayload) -> Self {
        RewardEntry {
            day: p.day,
            name: p.item_name.unwrap_or_else(|| "Unknown Item".to_string()),
            kind: p
                .item_type
                .as_deref()
                .map(RewardKind::from_server)
                .unwrap_or(RewardKind::Item),
            value: p.reward_value.unwrap_or(1),
            icon: p.icon,
            description: p.description.unwrap_or_default(),
        }
    }
}
