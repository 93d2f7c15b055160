//! `wordgate demo` - print a starting configuration

use anyhow::Result;

/// Sample configuration, suitable for `wordgate demo > wordgate.yaml`
pub const DEMO_CONFIG: &str = r#"# Wordgate configuration
wordgate:
  base_url: "https://api.wordgate.example.com" # API endpoint
  appCode: "my-app-code"                       # Application code
  app_secret: "my-app-secret"                  # Application secret
  enable_payment: true                         # Enable payments

  # Basic application info
  app:
    name: "My App"
    description: "What my app is about"
    currency: "CNY"                    # Settlement currency (CNY, USD, ...)

  # Products
  products:
    # Content files with a `product` table in their front matter,
    # relative to this file's directory
    files:
      - "content/courses/*.md"

    # Products declared inline (these win over content files)
    items:
      - code: "COURSE001"
        name: "Sample Course 1"
        price: 9900                    # Minor units (cents)
      - code: "COURSE002"
        name: "Sample Course 2"
        price: 19900

  # Membership system
  membership:
    tiers:
      - code: "FREE"
        name: "Free"
        level: 0                       # Sort order
        is_default: true
      - code: "PRO"
        name: "Pro"
        level: 1
        is_default: false
        prices:
          - period_type: "month"
            price: 9900
            original_price: 12900
          - period_type: "year"
            price: 99900
            original_price: 129900

  # Application settings
  config:
    site:
      base_url: "https://example.com"
      pay_page_path: "/pay"
      pay_result_page_path: "/pay-result"
    smtp:
      host: "smtp.example.com"
      port: 587
      username: "noreply@example.com"
      password: "smtp-password"
      from_email: "noreply@example.com"
      from_name: "My App"
      reply_to_email: "support@example.com"
    sms:
      provider: "aliyun"
      api_key: "sms-api-key"
      api_secret: "sms-api-secret"
      sign_name: "My App"
    security:
      session_expire: 86400            # Seconds
      code_expire: 300                 # Seconds
    payment:
      antom:
        enabled: true
        client_id: "antom-client-id"
        antom_public_key: "antom-public-key"
        your_public_key: "your-public-key"
        your_private_key: "your-private-key"
        is_sandbox: true
        domain: "example.com"
"#;

/// Sample content file declaring a product in its front matter
pub const DEMO_CONTENT: &str = r#"---
title: "Sample Course"
date: 2024-01-01
description: "A course declared from its own page"
product:
  code: "COURSE003"
  name: "Course from Markdown"
  price: 29900
---

# Sample Course

Course content goes here.
"#;

pub fn run() -> Result<()> {
    println!("{DEMO_CONFIG}");
    println!("# content/courses/sample.md");
    println!("{DEMO_CONTENT}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFormat, parse};
    use crate::content::parse_product;

    #[test]
    fn test_demo_config_is_valid() {
        let config = parse(DEMO_CONFIG, ConfigFormat::Yaml).unwrap();
        config.validate().unwrap();
        assert!(config.lints().is_empty());
        assert_eq!(config.app_code, "my-app-code");
        assert_eq!(config.membership.tiers.len(), 2);
        assert_eq!(config.config.smtp.port, 587);
    }

    #[test]
    fn test_demo_content_declares_product() {
        let product = parse_product(DEMO_CONTENT).unwrap().unwrap();
        assert_eq!(product.code, "COURSE003");
        assert_eq!(product.price, 29900);
    }
}
