//! Locally-held projections of server state
//!
//! Each projection exclusively owns its slice of the domain; coordinators
//! and refresh loops mutate it only through the apply/merge methods here.

mod balance;
mod catalog;
mod progress;

pub use balance::BalanceProjection;
pub use catalog::{CatalogProjection, PageView};
pub use progress::{ProgressProjection, ProgressStats, RewardButton, RewardView, WeekView};
