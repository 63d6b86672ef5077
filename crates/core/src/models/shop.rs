//! Shop item, balance, and purchase payloads

use crate::types::Currency;
use serde::{Deserialize, Serialize};

/// Response from the per-currency item list endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub items: Vec<ItemPayload>,
}

/// One catalog row as the server sends it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPayload {
    #[serde(rename = "ItemPrototypeID")]
    pub id: i64,
    #[serde(rename = "ItemName")]
    pub name: String,
    #[serde(rename = "Point", default, deserialize_with = "deserialize_u64_lenient")]
    pub point_price: u64,
    #[serde(rename = "Cash", default, deserialize_with = "deserialize_u64_lenient")]
    pub cash_price: u64,
    #[serde(rename = "Icon", default)]
    pub icon: Option<String>,
}

/// A catalog item as held by the client.
///
/// Item ids are unique within one currency's catalog only; the same id in
/// the other catalog is a different item. An item usually carries a
/// nonzero price in just one currency, but nothing enforces that.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    pub point_price: u64,
    pub cash_price: u64,
    pub icon: Option<String>,
}

impl CatalogItem {
    /// Unit price in the given currency
    pub fn price_in(&self, currency: Currency) -> u64 {
        match currency {
            Currency::Points => self.point_price,
            Currency::Cash => self.cash_price,
        }
    }
}

impl From<ItemPayload> for CatalogItem {
    fn from(p: ItemPayload) -> Self {
        CatalogItem {
            id: p.id,
            name: p.name,
            point_price: p.point_price,
            cash_price: p.cash_price,
            icon: p.icon,
        }
    }
}

/// Balance answer from the per-currency balance endpoint.
///
/// The value field spelling varies between server builds, so every
/// spelling that has been seen in the wild is captured separately and
/// resolved in priority order by [`BalancePayload::value_for`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalancePayload {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "Point", default, deserialize_with = "deserialize_opt_u64_lenient")]
    pub point_titlecase: Option<u64>,
    #[serde(rename = "point", default, deserialize_with = "deserialize_opt_u64_lenient")]
    pub point_lowercase: Option<u64>,
    #[serde(rename = "Cash", default, deserialize_with = "deserialize_opt_u64_lenient")]
    pub cash_titlecase: Option<u64>,
    #[serde(rename = "cash", default, deserialize_with = "deserialize_opt_u64_lenient")]
    pub cash_lowercase: Option<u64>,
}

impl BalancePayload {
    /// Resolve the balance for `currency`, first successful spelling wins.
    ///
    /// Points: `Point`, then `point`. Cash: `Cash`, then `cash`, then
    /// `point` (one server build reports cash under that name).
    pub fn value_for(&self, currency: Currency) -> Option<u64> {
        match currency {
            Currency::Points => self.point_titlecase.or(self.point_lowercase),
            Currency::Cash => self
                .cash_titlecase
                .or(self.cash_lowercase)
                .or(self.point_lowercase),
        }
    }
}

/// Request body for a purchase
#[derive(Debug, Clone, Serialize)]
pub struct BuyRequest {
    #[serde(rename = "UID")]
    pub uid: i64,
    #[serde(rename = "CharCID")]
    pub char_cid: String,
    #[serde(rename = "ItemID")]
    pub item_id: i64,
    #[serde(rename = "Amount")]
    pub amount: u32,
    /// Unit price the client saw at validation time
    #[serde(rename = "Price")]
    pub price: u64,
}

/// Response from the purchase endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "newPoints", default, deserialize_with = "deserialize_opt_u64_lenient")]
    pub new_points: Option<u64>,
    #[serde(rename = "newCash", default, deserialize_with = "deserialize_opt_u64_lenient")]
    pub new_cash: Option<u64>,
}

impl BuyResponse {
    /// Authoritative post-purchase balance for the shop that was bought in
    pub fn new_balance(&self, currency: Currency) -> Option<u64> {
        match currency {
            Currency::Points => self.new_points,
            Currency::Cash => self.new_cash,
        }
    }

    pub fn display_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "No response".to_string())
    }
}

/// Deserialize a u64 that may arrive as a number, string, or null
fn deserialize_u64_lenient<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct U64Lenient;

    impl<'de> de::Visitor<'de> for U64Lenient {
        type Value = u64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a non-negative number, string, or null")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<u64, E> {
            u64::try_from(v).map_err(de::Error::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<u64, E> {
            v.trim().parse::<u64>().map_err(de::Error::custom)
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<u64, E> {
            Ok(0)
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<u64, E> {
            Ok(0)
        }
    }

    deserializer.deserialize_any(U64Lenient)
}

/// Deserialize an optional u64 that may arrive as a number or string
fn deserialize_opt_u64_lenient<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct OptU64Lenient;

    impl<'de> de::Visitor<'de> for OptU64Lenient {
        type Value = Option<u64>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a non-negative number, string, or null")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
            u64::try_from(v).map(Some).map_err(de::Error::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
            // Unparsable strings resolve to "no value" so another spelling
            // can still win
            Ok(v.trim().parse::<u64>().ok())
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(OptU64Lenient)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_prices_default_to_zero() {
        let p: ItemPayload = serde_json::from_str(
            r#"{"ItemPrototypeID": 77, "ItemName": "Blade", "Point": 120}"#,
        )
        .unwrap();
        assert_eq!(p.point_price, 120);
        assert_eq!(p.cash_price, 0);
    }

    #[test]
    fn test_item_price_as_string() {
        let p: ItemPayload = serde_json::from_str(
            r#"{"ItemPrototypeID": 8, "ItemName": "Orb", "Cash": "45"}"#,
        )
        .unwrap();
        assert_eq!(p.cash_price, 45);
    }

    #[test]
    fn test_balance_spelling_priority() {
        let b: BalancePayload =
            serde_json::from_str(r#"{"success": true, "Point": 900, "point": 10}"#).unwrap();
        assert_eq!(b.value_for(Currency::Points), Some(900));

        let b: BalancePayload =
            serde_json::from_str(r#"{"success": true, "point": 250}"#).unwrap();
        assert_eq!(b.value_for(Currency::Points), Some(250));
        // The cash endpoint of one server build answers under `point`
        assert_eq!(b.value_for(Currency::Cash), Some(250));
    }

    #[test]
    fn test_balance_value_as_string() {
        let b: BalancePayload =
            serde_json::from_str(r#"{"success": true, "Cash": "1337"}"#).unwrap();
        assert_eq!(b.value_for(Currency::Cash), Some(1337));
    }

    #[test]
    fn test_buy_response_balance_per_currency() {
        let r: BuyResponse = serde_json::from_str(
            r#"{"success": true, "message": "ok", "newPoints": "80"}"#,
        )
        .unwrap();
        assert_eq!(r.new_balance(Currency::Points), Some(80));
        assert_eq!(r.new_balance(Currency::Cash), None);
    }
}
