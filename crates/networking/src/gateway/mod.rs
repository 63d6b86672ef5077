//! Remote gateway contract consumed by the reconciliation engine

use async_trait::async_trait;
use webshop_core::{
    BalancePayload, BuyRequest, BuyResponse, ClaimResponse, Currency, ItemsResponse,
    LoginResponse, PassPurchaseResponse, ProgressPayload, Result, SeasonPayload,
};

/// Request/response surface of the remote shop server.
///
/// One method per endpoint; implementations return typed payloads or a
/// typed [`webshop_core::Error`]. The engine only ever talks to the server
/// through this trait, so coordinators and refresh loops can be exercised
/// against an in-memory fake.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Authenticate and fetch the account UID, points, and character roster
    async fn login(&self, account: &str, password: &str) -> Result<LoginResponse>;

    /// Fetch the season catalog (reward list and season metadata)
    async fn fetch_season(&self) -> Result<SeasonPayload>;

    /// Fetch battle-pass progress for one character
    async fn fetch_progress(&self, uid: i64, char_cid: &str) -> Result<ProgressPayload>;

    /// Claim the reward the server considers claimable today
    async fn claim_reward(&self, uid: i64, char_cid: &str) -> Result<ClaimResponse>;

    /// Purchase the battle pass for one character
    async fn buy_pass(&self, uid: i64, char_cid: &str) -> Result<PassPurchaseResponse>;

    /// Fetch one currency's full item catalog
    async fn fetch_items(&self, currency: Currency) -> Result<ItemsResponse>;

    /// Fetch one currency's balance
    async fn fetch_balance(&self, currency: Currency, uid: i64) -> Result<BalancePayload>;

    /// Purchase an item from one currency's shop
    async fn buy_item(&self, currency: Currency, request: &BuyRequest) -> Result<BuyResponse>;
}
