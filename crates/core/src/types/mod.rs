//! Shared type definitions

use serde::{Deserialize, Serialize};

/// Number of days in a battle-pass season
pub const SEASON_DAYS: u32 = 30;

/// Days shown per battle-pass week page
pub const DAYS_PER_WEEK: u32 = 7;

/// Number of week pages in a season
pub const SEASON_WEEKS: u32 = 5;

/// The two independent shop currencies.
///
/// Each currency has its own catalog, its own balance endpoint, and its
/// own purchase endpoint; nothing is shared between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Points,
    Cash,
}

impl Currency {
    /// Lowercase label used in log lines and status messages
    pub fn label(&self) -> &'static str {
        match self {
            Currency::Points => "points",
            Currency::Cash => "cash",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What a battle-pass day rewards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Points,
    Cash,
    Item,
}

impl RewardKind {
    /// Map the server's free-form `item_type` string; anything that is
    /// not a currency grant counts as an item
    pub fn from_server(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "points" => RewardKind::Points,
            "cash" => RewardKind::Cash,
            _ => RewardKind::Item,
        }
    }
}
