//! Currency balance projection

use tracing::debug;
use webshop_core::{BalancePayload, Currency, Error, Result};

/// One currency's balance with its own staleness counter
#[derive(Debug, Default, Clone, Copy)]
struct BalanceSlot {
    value: u64,
    version: u64,
}

/// The two shop balances.
///
/// The currencies are fully independent: separate endpoints, separate
/// failure handling, separate version counters. A failed refresh of one
/// never blocks the other.
#[derive(Debug, Default)]
pub struct BalanceProjection {
    points: BalanceSlot,
    cash: BalanceSlot,
}

impl BalanceProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one currency's refresh payload. Unsuccessful payloads and
    /// payloads carrying none of the accepted field spellings are
    /// rejected and the previous value stays.
    pub fn apply(&mut self, currency: Currency, payload: &BalancePayload) -> Result<u64> {
        if !payload.success {
            return Err(Error::ServerRejected(format!(
                "{} balance refresh rejected",
                currency
            )));
        }

        let value = payload.value_for(currency).ok_or_else(|| {
            Error::MalformedPayload(format!(
                "{} balance response has no recognizable value field",
                currency
            ))
        })?;

        let slot = self.slot_mut(currency);
        slot.value = value;
        slot.version += 1;
        Ok(value)
    }

    /// Authoritative post-purchase balance from a buy response. Bumps the
    /// version so an overlapping poll started before the purchase gets
    /// discarded on arrival.
    pub fn set_authoritative(&mut self, currency: Currency, value: u64) {
        let slot = self.slot_mut(currency);
        slot.value = value;
        slot.version += 1;
        debug!("{} balance set to {} by purchase", currency, value);
    }

    pub fn get(&self, currency: Currency) -> u64 {
        self.slot(currency).value
    }

    pub fn version(&self, currency: Currency) -> u64 {
        self.slot(currency).version
    }

    fn slot(&self, currency: Currency) -> &BalanceSlot {
        match currency {
            Currency::Points => &self.points,
            Currency::Cash => &self.cash,
        }
    }

    fn slot_mut(&mut self, currency: Currency) -> &mut BalanceSlot {
        match currency {
            Currency::Points => &mut self.points,
            Currency::Cash => &mut self.cash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> BalancePayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_apply_updates_one_currency_only() {
        let mut b = BalanceProjection::new();
        b.apply(Currency::Points, &payload(r#"{"success": true, "Point": 300}"#))
            .unwrap();
        assert_eq!(b.get(Currency::Points), 300);
        assert_eq!(b.get(Currency::Cash), 0);
        assert_eq!(b.version(Currency::Cash), 0);
    }

    #[test]
    fn test_one_failure_does_not_block_the_other() {
        let mut b = BalanceProjection::new();
        b.apply(Currency::Points, &payload(r#"{"success": true, "Point": 300}"#))
            .unwrap();

        let err = b.apply(Currency::Cash, &payload(r#"{"success": false}"#));
        assert!(matches!(err, Err(Error::ServerRejected(_))));

        // Points kept its refresh, cash kept its previous value
        assert_eq!(b.get(Currency::Points), 300);
        assert_eq!(b.get(Currency::Cash), 0);
    }

    #[test]
    fn test_unrecognizable_payload_keeps_previous_value() {
        let mut b = BalanceProjection::new();
        b.set_authoritative(Currency::Cash, 70);

        let err = b.apply(Currency::Cash, &payload(r#"{"success": true, "Gems": 9}"#));
        assert!(matches!(err, Err(Error::MalformedPayload(_))));
        assert_eq!(b.get(Currency::Cash), 70);
    }

    #[test]
    fn test_set_authoritative_bumps_version() {
        let mut b = BalanceProjection::new();
        let before = b.version(Currency::Points);
        b.set_authoritative(Currency::Points, 45);
        assert_eq!(b.get(Currency::Points), 45);
        assert_eq!(b.version(Currency::Points), before + 1);
    }
}
