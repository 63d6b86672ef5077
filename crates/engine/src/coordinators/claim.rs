//! Claim one battle-pass reward

use crate::coordinators::{FlightGuard, OpOutcome};
use crate::state::ShopState;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};
use webshop_core::SEASON_DAYS;
use webshop_networking::RemoteGateway;

/// Claims rewards for the session character, one claim at a time
pub struct ClaimCoordinator {
    gateway: Arc<dyn RemoteGateway>,
    state: ShopState,
    in_flight: AtomicBool,
}

impl ClaimCoordinator {
    pub fn new(gateway: Arc<dyn RemoteGateway>, state: ShopState) -> Self {
        Self {
            gateway,
            state,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Claim the reward for `day`.
    ///
    /// Local validation mirrors what the reward tiles allow: a character
    /// must be selected and the day must be reached and still unclaimed.
    /// None of these rejections touch the network.
    pub async fn claim(&self, day: u32) -> OpOutcome {
        let Some(_guard) = FlightGuard::acquire(&self.in_flight) else {
            return OpOutcome::Ignored;
        };

        let Some(char_cid) = self.state.session.selected_character() else {
            return self.reject("Please select a character before claiming reward");
        };

        {
            let progress = self.state.progress.lock().await;
            if day < 1 || day > SEASON_DAYS {
                return self.reject(format!("Day {} is not part of this season", day));
            }
            if progress.claimed_days().contains(&day) {
                return self.reject(format!("Day {} is already claimed", day));
            }
            if day > progress.current_day() {
                return self.reject(format!("Day {} is still locked", day));
            }
        }

        match self
            .gateway
            .claim_reward(self.state.session.uid(), &char_cid)
            .await
        {
            Ok(resp) if resp.success => {
                let message = resp.display_message();
                self.state.progress.lock().await.apply_claim(day, &resp);
                info!("Reward for day {} claimed", day);
                self.state.status.post_success(message.clone());
                OpOutcome::Applied { message }
            }
            Ok(resp) => {
                let message = resp.display_message();
                warn!("Claim for day {} rejected: {}", day, message);
                self.state.status.post_error(message.clone());
                OpOutcome::Rejected { message }
            }
            Err(e) => {
                let message = format!("Error claiming reward: {}", e);
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
