//! Webshop HTTP gateway
//!
//! Speaks the server's actual wire conventions: per-currency endpoint
//! folders, form-encoded login and purchase bodies, JSON claim and pass
//! bodies. Everything returns the typed payloads from `webshop-core`.

use crate::gateway::RemoteGateway;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument};
use webshop_core::{
    ApiConfig, BalancePayload, BuyRequest, BuyResponse, ClaimResponse, Currency, Error,
    ItemsResponse, LoginResponse, PassPurchaseResponse, ProgressPayload, Result, SeasonPayload,
};

/// Request timeout; the server is slow but never this slow
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP implementation of [`RemoteGateway`]
pub struct HttpGateway {
    http: Client,
    api: ApiConfig,
}

impl HttpGateway {
    pub fn new(api: ApiConfig) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { http, api }
    }

    fn url(&self, folder: &str, endpoint: &str) -> String {
        format!("{}/{}/{}", self.api.base_url, folder, endpoint)
    }

    /// Check HTTP status, then parse the body into the expected shape
    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = response.error_for_status().map_err(|e| {
            error!("Request failed: {}", e);
            Error::Transport(e.to_string())
        })?;

        response.json::<T>().await.map_err(|e| {
            error!("Failed to parse response: {}", e);
            Error::MalformedPayload(e.to_string())
        })
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    #[instrument(skip(self, password))]
    async fn login(&self, account: &str, password: &str) -> Result<LoginResponse> {
        let url = self.url(&self.api.points_folder, "login.php");
        debug!("Logging in via: {}", url);

        let response = self
            .http
            .post(&url)
            .form(&[("account", account), ("password", password)])
            .send()
            .await?;

        let login: LoginResponse = Self::parse(response).await?;
        debug!(
            "Login response: success={}, {} characters",
            login.success,
            login.chars.len()
        );
        Ok(login)
    }

    #[instrument(skip(self))]
    async fn fetch_season(&self) -> Result<SeasonPayload> {
        // The season document is served by the file named after the folder
        let url = format!(
            "{}/{}/{}.php",
            self.api.base_url, self.api.pass_folder, self.api.pass_folder
        );
        debug!("Fetching season from: {}", url);

        let response = self.http.get(&url).send().await?;
        let season: SeasonPayload = Self::parse(response).await?;
        debug!(
            "Season fetched: {} rewards",
            season.rewards.as_ref().map(Vec::len).unwrap_or(0)
        );
        Ok(season)
    }

    #[instrument(skip(self))]
    async fn fetch_progress(&self, uid: i64, char_cid: &str) -> Result<ProgressPayload> {
        let url = self.url(&self.api.pass_folder, "get_progress.php");

        let response = self
            .http
            .get(&url)
            .query(&[("UID", uid.to_string().as_str()), ("CharCID", char_cid)])
            .send()
            .await?;

        Self::parse(response).await
    }

    #[instrument(skip(self))]
    async fn claim_reward(&self, uid: i64, char_cid: &str) -> Result<ClaimResponse> {
        let url = self.url(&self.api.pass_folder, "claim_reward.php");
        debug!("Claiming reward via: {}", url);

        let body = serde_json::json!({ "UID": uid, "CharCID": char_cid });
        let response = self.http.post(&url).json(&body).send().await?;

        let claim: ClaimResponse = Self::parse(response).await?;
        debug!("Claim response: success={}, day={:?}", claim.success, claim.day);
        Ok(claim)
    }

    #[instrument(skip(self))]
    async fn buy_pass(&self, uid: i64, char_cid: &str) -> Result<PassPurchaseResponse> {
        let url = self.url(&self.api.pass_folder, "buy_battlepass.php");
        debug!("Buying pass via: {}", url);

        let body = serde_json::json!({ "UID": uid, "CharCID": char_cid });
        let response = self.http.post(&url).json(&body).send().await?;

        Self::parse(response).await
    }

    #[instrument(skip(self))]
    async fn fetch_items(&self, currency: Currency) -> Result<ItemsResponse> {
        let url = self.url(self.api.shop_folder(currency), "get_items.php");

        let response = self.http.get(&url).send().await?;
        let items: ItemsResponse = Self::parse(response).await?;
        debug!("Fetched {} {} items", items.items.len(), currency);
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn fetch_balance(&self, currency: Currency, uid: i64) -> Result<BalancePayload> {
        let url = self.url(self.api.shop_folder(currency), "get_points.php");

        let response = self
            .http
            .get(&url)
            .query(&[("uid", uid)])
            .send()
            .await?;

        Self::parse(response).await
    }

    #[instrument(skip(self, request))]
    async fn buy_item(&self, currency: Currency, request: &BuyRequest) -> Result<BuyResponse> {
        let url = self.url(self.api.shop_folder(currency), "buy_item_ajax.php");
        debug!(
            "Buying item {} x{} from the {} shop",
            request.item_id, request.amount, currency
        );

        let response = self.http.post(&url).form(request).send().await?;

        let buy: BuyResponse = Self::parse(response).await?;
        debug!("Buy response: success={}", buy.success);
        Ok(buy)
    }
}
