//! Shared per-session state wiring

use crate::projections::{BalanceProjection, CatalogProjection, ProgressProjection};
use crate::status::StatusLine;
use std::sync::Arc;
use tokio::sync::Mutex;
use webshop_core::{Currency, SessionContext, ShopConfig};

/// Everything one session shares between the scheduler and the
/// coordinators.
///
/// Each projection sits behind its own lock: a scheduled refresh and a
/// user-triggered operation on the same projection serialize there, while
/// work on different projections proceeds in parallel.
#[derive(Clone)]
pub struct ShopState {
    pub session: Arc<SessionContext>,
    pub progress: Arc<Mutex<ProgressProjection>>,
    pub points_catalog: Arc<Mutex<CatalogProjection>>,
    pub cash_catalog: Arc<Mutex<CatalogProjection>>,
    pub balances: Arc<Mutex<BalanceProjection>>,
    pub status: Arc<StatusLine>,
}

impl ShopState {
    pub fn new(session: Arc<SessionContext>, config: &ShopConfig) -> Self {
        Self {
            session,
            progress: Arc::new(Mutex::new(ProgressProjection::new())),
            points_catalog: Arc::new(Mutex::new(CatalogProjection::new(
                Currency::Points,
                config.page_size,
            ))),
            cash_catalog: Arc::new(Mutex::new(CatalogProjection::new(
                Currency::Cash,
                config.page_size,
            ))),
            balances: Arc::new(Mutex::new(BalanceProjection::new())),
            status: Arc::new(StatusLine::new(config.status_ttl)),
        }
    }

    /// Catalog handle for one currency's shop
    pub fn catalog(&self, currency: Currency) -> &Arc<Mutex<CatalogProjection>> {
        match currency {
            Currency::Points => &self.points_catalog,
            Currency::Cash => &self.cash_catalog,
        }
    }
}
