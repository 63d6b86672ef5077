//! Purchase an item from one currency's shop

use crate::coordinators::{FlightGuard, OpOutcome};
use crate::scheduler::{refresh_balance, refresh_catalog};
use crate::state::ShopState;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};
use webshop_core::{BuyRequest, Currency};
use webshop_networking::RemoteGateway;

/// Buys items from one shop, one purchase at a time.
///
/// Each currency gets its own coordinator instance, matching the two
/// independent shops.
pub struct PurchaseCoordinator {
    gateway: Arc<dyn RemoteGateway>,
    state: ShopState,
    currency: Currency,
    in_flight: AtomicBool,
}

impl PurchaseCoordinator {
    pub fn new(gateway: Arc<dyn RemoteGateway>, state: ShopState, currency: Currency) -> Self {
        Self {
            gateway,
            state,
            currency,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Buy `amount` of catalog item `item_id`.
    ///
    /// Preconditions are checked against local projections before any
    /// network call: a character is selected, the item exists, the amount
    /// is positive, and `price * amount` fits the balance. The server's
    /// answer remains authoritative; on success its new balance is merged
    /// and the shop is re-fetched right away rather than waiting for the
    /// next scheduled cycle.
    pub async fn buy(&self, item_id: i64, amount: u32) -> OpOutcome {
        let Some(_guard) = FlightGuard::acquire(&self.in_flight) else {
            return OpOutcome::Ignored;
        };

        let Some(char_cid) = self.state.session.selected_character() else {
            return self.reject("Select a character first");
        };

        if amount == 0 {
            return self.reject("Invalid amount.");
        }

        let price = {
            let catalog = self.state.catalog(self.currency).lock().await;
            match catalog.find(item_id) {
                Some(item) => item.price_in(self.currency),
                None => return self.reject("Select an item first"),
            }
        };

        let Some(total) = price.checked_mul(amount as u64) else {
            return self.reject("Invalid amount.");
        };
        let available = self.state.balances.lock().await.get(self.currency);
        if total > available {
            return self.reject(format!(
                "Not enough {}. Need {}, you have {}.",
                self.currency, total, available
            ));
        }

        let request = BuyRequest {
            uid: self.state.session.uid(),
            char_cid,
            item_id,
            amount,
            price,
        };

        match self.gateway.buy_item(self.currency, &request).await {
            Ok(resp) if resp.success => {
                let message = resp.display_message();
                if let Some(balance) = resp.new_balance(self.currency) {
                    self.state
                        .balances
                        .lock()
                        .await
                        .set_authoritative(self.currency, balance);
                }
                info!(
                    "Bought item {} x{} from the {} shop",
                    item_id, amount, self.currency
                );

                if let Err(e) = refresh_catalog(self.gateway.as_ref(), &self.state, self.currency).await {
                    warn!("Post-purchase {} catalog refresh failed: {}", self.currency, e);
                }
                if let Err(e) = refresh_balance(self.gateway.as_ref(), &self.state, self.currency).await {
                    warn!("Post-purchase {} balance refresh failed: {}", self.currency, e);
                }

                self.state.status.post_success(message.clone());
                OpOutcome::Applied { message }
            }
            Ok(resp) => {
                let message = resp.display_message();
                warn!("{} purchase rejected: {}", self.currency, message);
                self.state.status.post_error(message.clone());
                OpOutcome::Rejected { message }
            }
            Err(e) => {
                let message = format!("Error buying item: {}", e);
                warn!("{}", message);
                self.state.status.post_error(message.clone());
                OpOutcome::Failed { message }
            }
        }
    }

    fn reject(&self, message: impl Into<String>) -> OpOutcome {
        let message = message.into();
        self.state.status.post_error(message.clone());
        OpOutcome::Rejected { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{balance_payload, item_payload, test_state, MockGateway};
    use std::sync::atomic::Ordering;
    use webshop_core::{BuyResponse, CatalogItem, ItemsResponse};

    /// State with one 50-point item in the points catalog and the given
    /// points balance
    async fn shop_state(balance: u64) -> ShopState {
        let state = test_state();
        state
            .points_catalog
            .lock()
            .await
            .replace_all(vec![CatalogItem {
                id: 11,
                name: "Phoenix Feather".to_string(),
                point_price: 50,
                cash_price: 0,
                icon: None,
            }]);
        state
            .balances
            .lock()
            .await
            .set_authoritative(Currency::Points, balance);
        state
    }

    fn coordinator(mock: &Arc<MockGateway>, state: &ShopState) -> Arc<PurchaseCoordinator> {
        Arc::new(PurchaseCoordinator::new(
            mock.clone(),
            state.clone(),
            Currency::Points,
        ))
    }

    #[tokio::test]
    async fn test_insufficient_balance_rejected_without_network() {
        let mock = Arc::new(MockGateway::default());
        let state = shop_state(40).await;
        let coordinator = coordinator(&mock, &state);

        let outcome = coordinator.buy(11, 1).await;
        assert_eq!(
            outcome,
            OpOutcome::Rejected {
                message: "Not enough points. Need 50, you have 40.".to_string()
            }
        );
        assert_eq!(mock.buy_calls.load(Ordering::SeqCst), 0);
        assert_eq!(state.balances.lock().await.get(Currency::Points), 40);
    }

    #[tokio::test]
    async fn test_amount_is_multiplied_into_the_check() {
        let mock = Arc::new(MockGateway::default());
        let state = shop_state(120).await;
        let coordinator = coordinator(&mock, &state);

        // 3 * 50 = 150 > 120
        assert!(matches!(
            coordinator.buy(11, 3).await,
            OpOutcome::Rejected { .. }
        ));
        assert_eq!(mock.buy_calls.load(Ordering::SeqCst), 0);

        // 2 * 50 = 100 fits
        assert!(matches!(
            coordinator.buy(11, 2).await,
            OpOutcome::Applied { .. }
        ));
        assert_eq!(mock.buy_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() {
        let mock = Arc::new(MockGateway::default());
        let state = shop_state(500).await;
        let coordinator = coordinator(&mock, &state);

        assert!(matches!(
            coordinator.buy(11, 0).await,
            OpOutcome::Rejected { .. }
        ));
        assert_eq!(mock.buy_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_item_rejected() {
        let mock = Arc::new(MockGateway::default());
        let state = shop_state(500).await;
        let coordinator = coordinator(&mock, &state);

        assert!(matches!(
            coordinator.buy(999, 1).await,
            OpOutcome::Rejected { .. }
        ));
        assert_eq!(mock.buy_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_purchase_applies_authoritative_balance() {
        let mock = Arc::new(MockGateway::default());
        *mock.buy.lock().unwrap() = Some(Ok(BuyResponse {
            success: true,
            message: Some("Purchase complete".to_string()),
            new_points: Some(150),
            ..Default::default()
        }));
        // The post-purchase poll agrees with the buy response
        mock.balances.lock().unwrap().insert(
            Currency::Points,
            Ok(balance_payload(Currency::Points, 150)),
        );
        mock.items.lock().unwrap().insert(
            Currency::Points,
            Ok(ItemsResponse {
                success: true,
                items: vec![item_payload(11, "Phoenix Feather", 50, 0)],
            }),
        );

        let state = shop_state(200).await;
        let coordinator = coordinator(&mock, &state);

        let outcome = coordinator.buy(11, 1).await;
        assert_eq!(
            outcome,
            OpOutcome::Applied {
                message: "Purchase complete".to_string()
            }
        );
        assert_eq!(state.balances.lock().await.get(Currency::Points), 150);
        // The shop was re-fetched right away
        assert_eq!(mock.items_calls.load(Ordering::SeqCst), 1);
        assert_eq!(mock.balance_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_purchase_is_ignored() {
        let mock = Arc::new(MockGateway::default());
        *mock.buy.lock().unwrap() = Some(Ok(BuyResponse {
            success: true,
            new_points: Some(150),
            ..Default::default()
        }));
        // The post-purchase poll agrees with the buy response
        mock.balances.lock().unwrap().insert(
            Currency::Points,
            Ok(balance_payload(Currency::Points, 150)),
        );
        let gate = mock.gate_buys();

        let state = shop_state(200).await;
        let coordinator = coordinator(&mock, &state);

        let first = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.buy(11, 1).await }
        });

        // Wait until the first purchase is parked inside the gateway call
        while mock.buy_calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        // Second invocation while the first is in flight: ignored, no
        // network call, balance untouched
        assert_eq!(coordinator.buy(11, 1).await, OpOutcome::Ignored);
        assert_eq!(mock.buy_calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.balances.lock().await.get(Currency::Points), 200);

        gate.notify_one();
        assert!(matches!(first.await.unwrap(), OpOutcome::Applied { .. }));
        assert_eq!(state.balances.lock().await.get(Currency::Points), 150);
    }

    #[tokio::test]
    async fn test_server_rejection_keeps_balance() {
        let mock = Arc::new(MockGateway::default());
        *mock.buy.lock().unwrap() = Some(Ok(BuyResponse {
            success: false,
            message: Some("Item out of stock".to_string()),
            ..Default::default()
        }));

        let state = shop_state(200).await;
        let coordinator = coordinator(&mock, &state);

        let outcome = coordinator.buy(11, 1).await;
        assert_eq!(
            outcome,
            OpOutcome::Rejected {
                message: "Item out of stock".to_string()
            }
        );
        assert_eq!(state.balances.lock().await.get(Currency::Points), 200);
    }

    #[tokio::test]
    async fn test_requires_character() {
        let mock = Arc::new(MockGateway::default());
        let state = crate::testutil::test_state_without_character();
        let coordinator = coordinator(&mock, &state);

        assert!(matches!(
            coordinator.buy(11, 1).await,
            OpOutcome::Rejected { .. }
        ));
        assert_eq!(mock.buy_calls.load(Ordering::SeqCst), 0);
    }
}
