//! Wordgate entity kinds
//!
//! Products and membership tiers share the generic reconcile flow; these
//! impls supply the per-kind key, comparison and request body.

use crate::schema::{MembershipPrice, MembershipTier, Product};
use reconcile::Entity;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

/// Deserialize `null` as the type's default
///
/// Backends encode empty slices and unset strings as `null`; `#[serde(default)]`
/// alone only covers missing fields.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A product as stored by the backend
///
/// Fields the backend adds (ids, timestamps) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RemoteProduct {
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: i64,
}

/// A membership tier as stored by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RemoteTier {
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub level: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub is_default: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub prices: Vec<MembershipPrice>,
}

impl Entity for Product {
    const KIND: &'static str = "product";
    type Remote = RemoteProduct;

    fn key(&self) -> &str {
        &self.code
    }

    fn remote_key(remote: &RemoteProduct) -> &str {
        &remote.code
    }

    fn matches(&self, remote: &RemoteProduct) -> bool {
        self.name == remote.name && u64::try_from(remote.price).ok() == Some(self.price)
    }

    fn to_body(&self) -> Value {
        json!({
            "code": self.code,
            "name": self.name,
            "price": self.price,
        })
    }

    fn describe(&self) -> String {
        format!("{} ({}, {})", self.code, self.name, self.price)
    }
}

impl Entity for MembershipTier {
    const KIND: &'static str = "membership tier";
    type Remote = RemoteTier;

    fn key(&self) -> &str {
        &self.code
    }

    fn remote_key(remote: &RemoteTier) -> &str {
        &remote.code
    }

    /// Prices compare as an ordered list
    fn matches(&self, remote: &RemoteTier) -> bool {
        self.name == remote.name
            && self.level == remote.level
            && self.is_default == remote.is_default
            && self.prices == remote.prices
    }

    fn to_body(&self) -> Value {
        let prices: Vec<Value> = self
            .prices
            .iter()
            .map(|p| {
                json!({
                    "period_type": p.period_type,
                    "price": p.price,
                    "original_price": p.original_price,
                })
            })
            .collect();

        json!({
            "code": self.code,
            "name": self.name,
            "level": self.level,
            "is_default": self.is_default,
            "prices": prices,
        })
    }

    fn describe(&self) -> String {
        let default = if self.is_default { ", default" } else { "" };
        format!("{} ({}, level {}{default})", self.code, self.name, self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(period: &str, price: i64) -> MembershipPrice {
        MembershipPrice {
            period_type: period.into(),
            price,
            original_price: price,
        }
    }

    fn pro_tier() -> MembershipTier {
        MembershipTier {
            code: "PRO".into(),
            name: "Pro".into(),
            level: 1,
            is_default: false,
            prices: vec![price("month", 990), price("year", 9900)],
        }
    }

    fn remote_of(tier: &MembershipTier) -> RemoteTier {
        RemoteTier {
            code: tier.code.clone(),
            name: tier.name.clone(),
            level: tier.level,
            is_default: tier.is_default,
            prices: tier.prices.clone(),
        }
    }

    #[test]
    fn test_product_matches() {
        let product = Product::new("A", "Alpha", 100);
        let remote = RemoteProduct {
            code: "A".into(),
            name: "Alpha".into(),
            price: 100,
        };
        assert!(product.matches(&remote));
        assert!(!product.matches(&RemoteProduct { price: 200, ..remote.clone() }));
        assert!(!product.matches(&RemoteProduct { name: "Other".into(), ..remote.clone() }));
        assert!(!product.matches(&RemoteProduct { price: -100, ..remote }));
    }

    #[test]
    fn test_remote_only_fields_ignored() {
        let remote: RemoteProduct = serde_json::from_value(json!({
            "id": 17,
            "code": "A",
            "name": "Alpha",
            "price": 100,
            "created_at": "2024-06-01T00:00:00Z"
        }))
        .unwrap();
        assert!(Product::new("A", "Alpha", 100).matches(&remote));
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let remote: RemoteTier = serde_json::from_value(json!({
            "code": "FREE",
            "name": null,
            "level": 0,
            "is_default": true,
            "prices": null
        }))
        .unwrap();
        assert_eq!(remote.name, "");
        assert!(remote.prices.is_empty());

        let free = MembershipTier {
            code: "FREE".into(),
            name: String::new(),
            level: 0,
            is_default: true,
            prices: Vec::new(),
        };
        assert!(free.matches(&remote));

        let product: RemoteProduct =
            serde_json::from_value(json!({ "code": "A", "name": null, "price": null })).unwrap();
        assert_eq!(product.price, 0);
    }

    #[test]
    fn test_tier_prices_compare_in_order() {
        let tier = pro_tier();
        assert!(tier.matches(&remote_of(&tier)));

        let mut reordered = remote_of(&tier);
        reordered.prices.reverse();
        assert!(!tier.matches(&reordered));

        let mut missing = remote_of(&tier);
        missing.prices.pop();
        assert!(!tier.matches(&missing));

        let mut flipped = remote_of(&tier);
        flipped.is_default = true;
        assert!(!tier.matches(&flipped));
    }

    #[test]
    fn test_bodies_carry_full_record() {
        assert_eq!(
            Product::new("A", "Alpha", 100).to_body(),
            json!({ "code": "A", "name": "Alpha", "price": 100 })
        );

        let body = pro_tier().to_body();
        assert_eq!(body["level"], 1);
        assert_eq!(body["is_default"], false);
        assert_eq!(body["prices"][1], json!({ "period_type": "year", "price": 9900, "original_price": 9900 }));
    }

    #[test]
    fn test_describe() {
        assert_eq!(Product::new("A", "Alpha", 100).describe(), "A (Alpha, 100)");
        assert_eq!(pro_tier().describe(), "PRO (Pro, level 1)");
    }
}
