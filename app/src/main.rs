//! Webshop session binary
//!
//! Logs in, spawns the reconciliation scheduler, and logs a derived
//! snapshot until interrupted. Rendering is a different program's job;
//! this binary does the session wiring and teardown.

use anyhow::{bail, Context};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webshop_core::{Currency, SessionContext, ShopConfig, SEASON_DAYS};
use webshop_engine::{spawn_scheduler, ShopState};
use webshop_networking::{HttpGateway, RemoteGateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "webshop_app=info,webshop_engine=debug,webshop_networking=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting webshop client");

    let mut config = ShopConfig::default();
    if let Ok(base) = std::env::var("WEBSHOP_API_BASE") {
        config.api.base_url = base;
    }

    let account = std::env::var("WEBSHOP_ACCOUNT").context("WEBSHOP_ACCOUNT is not set")?;
    let password = std::env::var("WEBSHOP_PASSWORD").context("WEBSHOP_PASSWORD is not set")?;

    let gateway: Arc<dyn RemoteGateway> = Arc::new(HttpGateway::new(config.api.clone()));

    let login = gateway.login(&account, &password).await?;
    if !login.success {
        bail!(
            "Login failed: {}",
            login.message.as_deref().unwrap_or("unknown reason")
        );
    }
    tracing::info!(
        "Logged in as UID {} with {} characters",
        login.uid,
        login.chars.len()
    );

    let session = Arc::new(SessionContext::from_login(&login));
    let state = ShopState::new(session, &config);
    let scheduler = spawn_scheduler(gateway, state.clone(), &config);

    let mut snapshot = tokio::time::interval(Duration::from_secs(10));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = snapshot.tick() => log_snapshot(&state).await,
        }
    }

    // Teardown: stop every timer before the projections go away
    scheduler.stop();
    tracing::info!("Session torn down");
    Ok(())
}

async fn log_snapshot(state: &ShopState) {
    let stats = state.progress.lock().await.stats();
    let (points, cash) = {
        let balances = state.balances.lock().await;
        (
            balances.get(Currency::Points),
            balances.get(Currency::Cash),
        )
    };

    tracing::info!(
        "Day {} of {} | {} claimed | streak {} | {} points, {} cash",
        stats.current_day,
        SEASON_DAYS,
        stats.claimed_count,
        stats.streak,
        points,
        cash
    );

    if let Some(status) = state.status.current() {
        tracing::info!("Status: {}", status.message);
    }
}
