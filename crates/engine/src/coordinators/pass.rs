//! Purchase the battle pass

use crate::coordinators::{FlightGuard, OpOutcome};
use crate::state::ShopState;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};
use webshop_networking::RemoteGateway;

/// Buys the battle pass for the session character
pub struct PassCoordinator {
    gateway: Arc<dyn RemoteGateway>,
    state: ShopState,
    in_flight: AtomicBool,
}

impl PassCoordinator {
    pub fn new(gateway: Arc<dyn RemoteGateway>, state: ShopState) -> Self {
        Self {
            gateway,
            state,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Buy the pass. Whether the account already owns one is the
    /// server's call; it answers with success = false and a message.
    pub async fn buy_pass(&self) -> OpOutcome {
        let Some(_guard) = FlightGuard::acquire(&self.in_flight) else {
            return OpOutcome::Ignored;
        };

        let Some(char_cid) = self.state.session.selected_character() else {
            let message = "Character not selected!".to_string();
            self.state.status.post_error(message.clone());
            return OpOutcome::Rejected { message };
        };

        match self
            .gateway
            .buy_pass(self.state.session.uid(), &char_cid)
            .await
        {
            Ok(resp) if resp.success => {
                let message = resp.display_message();
                self.state.progress.lock().await.apply_pass_purchase(&resp);
                info!("Battle pass purchased");
                self.state.status.post_success(message.clone());
                OpOutcome::Applied { message }
            }
            Ok(resp) => {
                let message = resp.display_message();
                warn!("Pass purchase rejected: {}", message);
                self.state.status.post_error(message.clone());
                OpOutcome::Rejected { message }
            }
            Err(e) => {
                let message = format!("Error buying Battlepass: {}", e);
                warn!("{}", message);
                self.state.status.post_error(message.clone());
                OpOutcome::Failed { message }
            }
        }
    }
}
