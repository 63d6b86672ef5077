//! In-memory gateway fake shared by the engine tests

use crate::state::ShopState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use webshop_core::{
    BalancePayload, BuyRequest, BuyResponse, Character, ClaimResponse, Currency, ItemPayload,
    ItemsResponse, LoginResponse, PassPurchaseResponse, ProgressData, ProgressPayload, Result,
    SeasonPayload, SessionContext, ShopConfig,
};
use webshop_networking::RemoteGateway;

/// Scripted gateway: tests stage each endpoint's next answer and the
/// fake counts how often each endpoint was hit. Optional gates park a
/// call until the test releases it.
#[derive(Default)]
pub(crate) struct MockGateway {
    pub season: Mutex<Option<Result<SeasonPayload>>>,
    pub progress: Mutex<Option<Result<ProgressPayload>>>,
    pub claim: Mutex<Option<Result<ClaimResponse>>>,
    pub pass: Mutex<Option<Result<PassPurchaseResponse>>>,
    pub items: Mutex<HashMap<Currency, Result<ItemsResponse>>>,
    pub balances: Mutex<HashMap<Currency, Result<BalancePayload>>>,
    pub buy: Mutex<Option<Result<BuyResponse>>>,

    pub buy_gate: Mutex<Option<Arc<Notify>>>,
    pub balance_gate: Mutex<Option<Arc<Notify>>>,

    pub progress_calls: AtomicUsize,
    pub claim_calls: AtomicUsize,
    pub pass_calls: AtomicUsize,
    pub items_calls: AtomicUsize,
    pub balance_calls: AtomicUsize,
    pub buy_calls: AtomicUsize,
}

impl MockGateway {
    /// Park the next `buy_item` call until the returned gate is notified
    pub fn gate_buys(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.buy_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Park the next `fetch_balance` call until the returned gate is
    /// notified
    pub fn gate_balances(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.balance_gate.lock().unwrap() = Some(gate.clone());
        gate
    }
}

async fn pass_gate(slot: &Mutex<Option<Arc<Notify>>>) {
    let gate = slot.lock().unwrap().clone();
    if let Some(gate) = gate {
        gate.notified().await;
    }
}

#[async_trait]
impl RemoteGateway for MockGateway {
    async fn login(&self, _account: &str, _password: &str) -> Result<LoginResponse> {
        Ok(LoginResponse {
            success: true,
            uid: 7,
            ..Default::default()
        })
    }

    async fn fetch_season(&self) -> Result<SeasonPayload> {
        self.season.lock().unwrap().clone().unwrap_or_else(|| {
            Ok(SeasonPayload {
                rewards: Some(Vec::new()),
                ..Default::default()
            })
        })
    }

    async fn fetch_progress(&self, _uid: i64, _char_cid: &str) -> Result<ProgressPayload> {
        self.progress_calls.fetch_add(1, Ordering::SeqCst);
        self.progress.lock().unwrap().clone().unwrap_or_else(|| {
            Ok(ProgressPayload {
                data: Some(ProgressData {
                    current_day: 1,
                    claimed_days: Vec::new(),
                }),
            })
        })
    }

    async fn claim_reward(&self, _uid: i64, _char_cid: &str) -> Result<ClaimResponse> {
        self.claim_calls.fetch_add(1, Ordering::SeqCst);
        self.claim
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(ClaimResponse::default()))
    }

    async fn buy_pass(&self, _uid: i64, _char_cid: &str) -> Result<PassPurchaseResponse> {
        self.pass_calls.fetch_add(1, Ordering::SeqCst);
        self.pass
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(PassPurchaseResponse::default()))
    }

    async fn fetch_items(&self, currency: Currency) -> Result<ItemsResponse> {
        self.items_calls.fetch_add(1, Ordering::SeqCst);
        self.items
            .lock()
            .unwrap()
            .get(&currency)
            .cloned()
            .unwrap_or_else(|| {
                Ok(ItemsResponse {
                    success: true,
                    items: Vec::new(),
                })
            })
    }

    async fn fetch_balance(&self, currency: Currency, _uid: i64) -> Result<BalancePayload> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        pass_gate(&self.balance_gate).await;
        self.balances
            .lock()
            .unwrap()
            .get(&currency)
            .cloned()
            .unwrap_or_else(|| Ok(balance_payload(currency, 0)))
    }

    async fn buy_item(&self, _currency: Currency, _request: &BuyRequest) -> Result<BuyResponse> {
        self.buy_calls.fetch_add(1, Ordering::SeqCst);
        pass_gate(&self.buy_gate).await;
        self.buy.lock().unwrap().clone().unwrap_or_else(|| {
            Ok(BuyResponse {
                success: true,
                ..Default::default()
            })
        })
    }
}

/// Balance payload the way the server usually spells it
pub(crate) fn balance_payload(currency: Currency, value: u64) -> BalancePayload {
    match currency {
        Currency::Points => BalancePayload {
            success: true,
            point_titlecase: Some(value),
            ..Default::default()
        },
        Currency::Cash => BalancePayload {
            success: true,
            cash_titlecase: Some(value),
            ..Default::default()
        },
    }
}

pub(crate) fn item_payload(id: i64, name: &str, point: u64, cash: u64) -> ItemPayload {
    ItemPayload {
        id,
        name: name.to_string(),
        point_price: point,
        cash_price: cash,
        icon: None,
    }
}

/// Session state with one selected character and default config
pub(crate) fn test_state() -> ShopState {
    let session = Arc::new(SessionContext::new(7));
    session.set_characters(vec![Character {
        name: "Kael".to_string(),
        cid: "char-1".to_string(),
    }]);
    ShopState::new(session, &ShopConfig::default())
}

pub(crate) fn test_state_without_character() -> ShopState {
    ShopState::new(Arc::new(SessionContext::new(7)), &ShopConfig::default())
}
