//! Reconciliation scheduler
//!
//! Drives the three periodic refresh cycles (battle-pass progress, points
//! shop, cash shop) and exposes the single-shot refresh functions the
//! coordinators reuse after a purchase. Each fetch-then-replace refresh
//! captures the owning projection's version before the network call and
//! discards its result if the projection moved while the request was in
//! flight; progress merges are monotonic and need no guard.

use crate::state::ShopState;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use webshop_core::{CatalogItem, Currency, Error, Result, ShopConfig};
use webshop_networking::RemoteGateway;

/// Handle to stop the refresh loops on session teardown
#[derive(Clone)]
pub struct SchedulerHandle {
    cancel: CancellationToken,
}

impl SchedulerHandle {
    /// Stop all refresh loops; no further ticks fire after this
    pub fn stop(&self) {
        self.cancel.cancel();
        info!("Reconciliation scheduler stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Spawn the periodic refresh loops for one session.
///
/// The loops are independent tasks: a slow or failed request in one
/// cycle delays nothing else. Every loop ticks once immediately, which
/// doubles as the initial load.
pub fn spawn_scheduler(
    gateway: Arc<dyn RemoteGateway>,
    state: ShopState,
    config: &ShopConfig,
) -> SchedulerHandle {
    let cancel = CancellationToken::new();
    let handle = SchedulerHandle {
        cancel: cancel.clone(),
    };

    tokio::spawn(progress_loop(
        gateway.clone(),
        state.clone(),
        config.progress_refresh,
        cancel.clone(),
    ));
    tokio::spawn(shop_loop(
        gateway.clone(),
        state.clone(),
        Currency::Points,
        config.shop_refresh,
        cancel.clone(),
    ));
    tokio::spawn(shop_loop(
        gateway,
        state,
        Currency::Cash,
        config.shop_refresh,
        cancel,
    ));

    handle
}

async fn progress_loop(
    gateway: Arc<dyn RemoteGateway>,
    state: ShopState,
    every: Duration,
    cancel: CancellationToken,
) {
    info!("Progress refresh loop started ({:?} cadence)", every);
    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Progress refresh loop cancelled");
                break;
            }
            _ = interval.tick() => {
                // The season catalog has no cycle of its own: a missing
                // or failed load is retried on the next progress tick
                let missing_catalog = !state.progress.lock().await.has_catalog();
                if missing_catalog {
                    if let Err(e) = refresh_season(gateway.as_ref(), &state).await {
                        state
                            .status
                            .post_error(format!("Unable to load battle pass data: {}", e));
                        warn!("Season refresh failed: {}", e);
                    }
                }

                if let Err(e) = refresh_progress(gateway.as_ref(), &state).await {
                    state
                        .status
                        .post_error(format!("Error loading progress: {}", e));
                    warn!("Progress refresh failed: {}", e);
                }
            }
        }
    }
}

async fn shop_loop(
    gateway: Arc<dyn RemoteGateway>,
    state: ShopState,
    currency: Currency,
    every: Duration,
    cancel: CancellationToken,
) {
    info!("{} shop refresh loop started ({:?} cadence)", currency, every);
    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("{} shop refresh loop cancelled", currency);
                break;
            }
            _ = interval.tick() => {
                // Catalog and balance are independently fallible; one
                // failing never masks the other
                if let Err(e) = refresh_catalog(gateway.as_ref(), &state, currency).await {
                    state
                        .status
                        .post_error(format!("Error fetching {} items: {}", currency, e));
                    warn!("{} catalog refresh failed: {}", currency, e);
                }
                if let Err(e) = refresh_balance(gateway.as_ref(), &state, currency).await {
                    state
                        .status
                        .post_error(format!("Error refreshing {}: {}", currency, e));
                    warn!("{} balance refresh failed: {}", currency, e);
                }
            }
        }
    }
}

/// Fetch the season catalog and replace the local reward list
pub async fn refresh_season(gateway: &dyn RemoteGateway, state: &ShopState) -> Result<()> {
    let marker = state.progress.lock().await.version();
    let season = gateway.fetch_season().await?;

    let mut progress = state.progress.lock().await;
    if progress.version() != marker {
        debug!("Discarding season fetch that went stale in flight");
        return Ok(());
    }
    progress.load_catalog(season)
}

/// Fetch progress for the selected character and merge it in. Quietly
/// does nothing when no character is selected.
pub async fn refresh_progress(gateway: &dyn RemoteGateway, state: &ShopState) -> Result<()> {
    let Some(char_cid) = state.session.selected_character() else {
        debug!("Progress refresh skipped: no character selected");
        return Ok(());
    };

    let payload = gateway
        .fetch_progress(state.session.uid(), &char_cid)
        .await?;

    // Monotonic merge; a read that went stale in flight cannot regress
    // a newer claim
    state.progress.lock().await.load_progress(payload)
}

/// Fetch one currency's item list and replace the catalog
pub async fn refresh_catalog(
    gateway: &dyn RemoteGateway,
    state: &ShopState,
    currency: Currency,
) -> Result<()> {
    let marker = state.catalog(currency).lock().await.version();
    let response = gateway.fetch_items(currency).await?;

    if !response.success {
        return Err(Error::ServerRejected(format!(
            "Failed to load {} items.",
            currency
        )));
    }

    let items: Vec<CatalogItem> = response.items.into_iter().map(CatalogItem::from).collect();

    let mut catalog = state.catalog(currency).lock().await;
    if catalog.version() != marker {
        debug!("Discarding {} catalog fetch that went stale in flight", currency);
        return Ok(());
    }
    catalog.replace_all(items);
    Ok(())
}

/// Fetch one currency's balance and merge it in
pub async fn refresh_balance(
    gateway: &dyn RemoteGateway,
    state: &ShopState,
    currency: Currency,
) -> Result<()> {
    let marker = state.balances.lock().await.version(currency);
    let payload = gateway.fetch_balance(currency, state.session.uid()).await?;

    let mut balances = state.balances.lock().await;
    if balances.version(currency) != marker {
        debug!("Discarding {} balance fetch that went stale in flight", currency);
        return Ok(());
    }
    balances.apply(currency, &payload)?;
    Ok(())
}
