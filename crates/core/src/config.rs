//! Client configuration supplied by the embedding application

use crate::types::Currency;
use std::time::Duration;

/// Where the remote API lives.
///
/// The server exposes the two shops and the battle pass as separate
/// endpoint folders under a single base URL.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `http://127.0.0.1`
    pub base_url: String,
    /// Folder serving the points shop endpoints
    pub points_folder: String,
    /// Folder serving the cash shop endpoints
    pub cash_folder: String,
    /// Folder serving the battle-pass endpoints
    pub pass_folder: String,
}

impl ApiConfig {
    /// Shop folder for the given currency
    pub fn shop_folder(&self, currency: Currency) -> &str {
        match currency {
            Currency::Points => &self.points_folder,
            Currency::Cash => &self.cash_folder,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1".to_string(),
            points_folder: "testapi".to_string(),
            cash_folder: "testApi1".to_string(),
            pass_folder: "testapiBP".to_string(),
        }
    }
}

/// Refresh cadence and presentation tunables.
///
/// All values are externally supplied; nothing in the engine hardcodes
/// them at call sites.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    pub api: ApiConfig,
    /// Battle-pass progress poll interval
    pub progress_refresh: Duration,
    /// Shop catalog + balance poll interval, per currency
    pub shop_refresh: Duration,
    /// Items shown per catalog page
    pub page_size: usize,
    /// How long a surfaced status message stays visible before it
    /// auto-dismisses
    pub status_ttl: Duration,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            progress_refresh: Duration::from_secs(30),
            shop_refresh: Duration::from_secs(10),
            page_size: 6,
            status_ttl: Duration::from_secs(5),
        }
    }
}
