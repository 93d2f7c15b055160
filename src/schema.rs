use anyhow::{Context, Result, bail};
use gatekit::ClientConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

// ============================================================================
// Main Config Schema
// ============================================================================

/// The `wordgate:` section of a configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordgateConfig {
    /// API base URL
    pub base_url: String,

    /// Application code used to authenticate requests
    #[serde(alias = "appCode")]
    pub app_code: String,

    /// Application secret used to sign requests
    pub app_secret: String,

    /// Whether payments are enabled for this app
    pub enable_payment: bool,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Basic application info
    pub app: AppInfo,

    /// Product sources
    pub products: ProductConfig,

    /// Membership system
    pub membership: MembershipConfig,

    /// Application settings pushed to `/app/config`
    pub config: AppSettings,
}

impl Default for WordgateConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            app_code: String::new(),
            app_secret: String::new(),
            enable_payment: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            app: AppInfo::default(),
            products: ProductConfig::default(),
            membership: MembershipConfig::default(),
            config: AppSettings::default(),
        }
    }
}

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl WordgateConfig {
    /// A section with none of the connection fields set is treated as missing
    pub fn is_empty(&self) -> bool {
        self.base_url.is_empty() && self.app_code.is_empty() && self.app_secret.is_empty()
    }

    /// Validate the configuration
    ///
    /// Runs before any network activity; every error here is fatal.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("Missing required setting: base_url");
        }
        if self.app_code.trim().is_empty() {
            bail!("Missing required setting: app_code");
        }
        if self.app_secret.is_empty() {
            bail!("Missing required setting: app_secret");
        }

        self.client_config()
            .validate()
            .context("Invalid connection settings")?;

        for (i, product) in self.products.items.iter().enumerate() {
            product
                .validate()
                .with_context(|| format!("Invalid product #{}", i + 1))?;
        }

        for (i, tier) in self.membership.tiers.iter().enumerate() {
            tier.validate()
                .with_context(|| format!("Invalid membership tier #{}", i + 1))?;
        }

        Ok(())
    }

    /// Authoring conventions that are reported but never enforced
    pub fn lints(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let tiers = &self.membership.tiers;

        if !tiers.is_empty() {
            let defaults: Vec<&str> = tiers
                .iter()
                .filter(|t| t.is_default)
                .map(|t| t.code.as_str())
                .collect();
            match defaults.len() {
                0 => warnings.push("No membership tier is marked is_default".to_string()),
                1 => {}
                _ => warnings.push(format!(
                    "More than one default membership tier: {}",
                    defaults.join(", ")
                )),
            }
        }

        let mut levels: HashMap<i64, Vec<&str>> = HashMap::new();
        for tier in tiers {
            levels.entry(tier.level).or_default().push(&tier.code);
        }
        let mut shared: Vec<_> = levels.into_iter().filter(|(_, c)| c.len() > 1).collect();
        shared.sort_by_key(|(level, _)| *level);
        for (level, codes) in shared {
            warnings.push(format!(
                "Membership tiers share level {level}: {}",
                codes.join(", ")
            ));
        }

        for tier in tiers {
            if tier.prices.iter().any(|p| p.price < 0 || p.original_price < 0) {
                warnings.push(format!("Membership tier '{}' has a negative price", tier.code));
            }
        }

        for code in reconcile::duplicate_codes(tiers) {
            warnings.push(format!("Membership tier '{code}' is declared more than once; the last one wins"));
        }
        for code in reconcile::duplicate_codes(&self.products.items) {
            warnings.push(format!("Product '{code}' is declared more than once; the last one wins"));
        }

        if self.enable_payment
            && !self.config.payment.antom.enabled
            && !self.config.payment.gateway_mode.enabled
        {
            warnings.push("enable_payment is set but no payment provider is enabled".to_string());
        }

        warnings
    }

    /// Connection settings for the API client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url, &self.app_code, &self.app_secret)
            .timeout(Duration::from_secs(self.timeout_secs))
    }
}

// ============================================================================
// App Info
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppInfo {
    pub name: String,
    pub description: String,
    /// Settlement currency code (CNY, USD, ...)
    pub currency: String,
}

// ============================================================================
// Products
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    /// Glob patterns, relative to the config file, of content files
    /// whose front matter declares a product
    pub files: Vec<String>,

    /// Products declared inline
    pub items: Vec<Product>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product code
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub name: String,

    /// Price in minor currency units
    #[serde(default)]
    pub price: u64,
}

impl Product {
    pub fn new(code: impl Into<String>, name: impl Into<String>, price: u64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            price,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            bail!("Product code cannot be empty (name: '{}')", self.name);
        }
        Ok(())
    }
}

// ============================================================================
// Membership
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembershipConfig {
    pub tiers: Vec<MembershipTier>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembershipTier {
    pub code: String,
    pub name: String,
    /// Sort order
    pub level: i64,
    pub is_default: bool,
    pub prices: Vec<MembershipPrice>,
}

impl MembershipTier {
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            bail!("Membership tier code cannot be empty (name: '{}')", self.name);
        }
        for price in &self.prices {
            if price.period_type.trim().is_empty() {
                bail!("Membership tier '{}' has a price without period_type", self.code);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembershipPrice {
    /// Billing period (month, year, ...)
    pub period_type: String,
    /// Price in minor currency units
    pub price: i64,
    /// Undiscounted price, for display
    pub original_price: i64,
}

// ============================================================================
// App Settings
// ============================================================================

/// Settings forwarded verbatim to the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub smtp: SmtpConfig,
    pub sms: SmsConfig,
    pub security: SecurityConfig,
    pub payment: PaymentConfig,
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    pub reply_to_email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsConfig {
    pub provider: String,
    pub api_key: String,
    pub api_secret: String,
    pub sign_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Session lifetime in seconds
    pub session_expire: u64,
    /// Verification code lifetime in seconds
    pub code_expire: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub gateway_mode: GatewayModeConfig,
    pub antom: AntomConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayModeConfig {
    pub enabled: bool,
    pub notify_url: String,
    pub redirect_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntomConfig {
    pub enabled: bool,
    pub client_id: String,
    pub antom_public_key: String,
    pub your_public_key: String,
    pub your_private_key: String,
    pub is_sandbox: bool,
    pub domain: String,
}

/// Public site locations used to build payment redirect URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub pay_page_path: String,
    pub pay_result_page_path: String,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> WordgateConfig {
        WordgateConfig {
            base_url: "https://api.example.com".into(),
            app_code: "app".into(),
            app_secret: "secret".into(),
            ..Default::default()
        }
    }

    fn tier(code: &str, level: i64, is_default: bool) -> MembershipTier {
        MembershipTier {
            code: code.into(),
            name: code.into(),
            level,
            is_default,
            prices: vec![],
        }
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(WordgateConfig::default().timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(WordgateConfig::default().is_empty());
    }

    #[test]
    fn test_validate_required_fields() {
        assert!(valid_config().validate().is_ok());

        let mut config = valid_config();
        config.app_secret.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("app_secret"));

        let mut config = valid_config();
        config.base_url = "api.example.com".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_product_code() {
        let mut config = valid_config();
        config.products.items.push(Product::new("", "Nameless", 100));
        let err = config.validate().unwrap_err();
        assert!(format!("{err:#}").contains("Product code cannot be empty"));
    }

    #[test]
    fn test_validate_tier_price_period() {
        let mut config = valid_config();
        let mut pro = tier("PRO", 1, false);
        pro.prices.push(MembershipPrice {
            period_type: String::new(),
            price: 100,
            original_price: 100,
        });
        config.membership.tiers.push(pro);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_lints_default_tier_count() {
        let mut config = valid_config();
        config.membership.tiers = vec![tier("FREE", 0, false), tier("PRO", 1, false)];
        assert!(config.lints().iter().any(|w| w.contains("No membership tier")));

        config.membership.tiers = vec![tier("FREE", 0, true), tier("PRO", 1, true)];
        assert!(config.lints().iter().any(|w| w.contains("FREE, PRO")));

        config.membership.tiers = vec![tier("FREE", 0, true), tier("PRO", 1, false)];
        assert!(config.lints().is_empty());
    }

    #[test]
    fn test_lints_shared_level_and_duplicates() {
        let mut config = valid_config();
        config.membership.tiers = vec![
            tier("FREE", 0, true),
            tier("PRO", 1, false),
            tier("VIP", 1, false),
        ];
        config.products.items = vec![Product::new("A", "a", 1), Product::new("A", "b", 2)];

        let lints = config.lints();
        assert!(lints.iter().any(|w| w.contains("share level 1: PRO, VIP")));
        assert!(lints.iter().any(|w| w.contains("Product 'A'")));
    }

    #[test]
    fn test_lints_payment_without_provider() {
        let mut config = valid_config();
        config.enable_payment = true;
        assert!(config.lints().iter().any(|w| w.contains("payment provider")));

        config.config.payment.antom.enabled = true;
        assert!(config.lints().is_empty());
    }

    #[test]
    fn test_client_config() {
        let mut config = valid_config();
        config.timeout_secs = 5;
        let client = config.client_config();
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.app_code, "app");
    }

    #[test]
    fn test_product_price_rejects_negative() {
        let result: Result<Product, _> =
            serde_json::from_str(r#"{"code":"A","name":"a","price":-1}"#);
        assert!(result.is_err());
    }
}
