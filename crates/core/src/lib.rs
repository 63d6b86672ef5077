//! Webshop Core - Shared data models, types, errors, and configuration

pub mod config;
pub mod errors;
pub mod models;
pub mod types;

pub use config::{ApiConfig, ShopConfig};
pub use errors::{Error, Result};
pub use models::*;
pub use types::*;
