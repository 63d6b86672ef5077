//! Webshop Engine - client-side reconciliation of server state
//!
//! Projections own locally-held copies of the authoritative server state,
//! the scheduler polls them fresh on fixed cadences, and coordinators push
//! user-triggered mutations through. Merges are written so a stale read
//! arriving late can never undo newer state.

pub mod coordinators;
pub mod projections;
pub mod scheduler;
pub mod state;
pub mod status;

#[cfg(test)]
pub(crate) mod testutil;

pub use coordinators::{ClaimCoordinator, OpOutcome, PassCoordinator, PurchaseCoordinator};
pub use projections::{
    BalanceProjection, CatalogProjection, PageView, ProgressProjection, ProgressStats,
    RewardButton, RewardView, WeekView,
};
pub use scheduler::{spawn_scheduler, SchedulerHandle};
pub use state::ShopState;
pub use status::{StatusEntry, StatusLine, StatusTone};
