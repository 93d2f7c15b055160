//! Payment redirect URLs built from the site settings

use crate::schema::SiteConfig;
use std::collections::BTreeMap;
use url::form_urlencoded;

pub const DEFAULT_PAY_PATH: &str = "/pay";
pub const DEFAULT_PAY_RESULT_PATH: &str = "/pay-result";

impl SiteConfig {
    /// URL of the payment page for an order
    pub fn payment_url(&self, order_no: &str) -> String {
        let page = self.page_url(&self.pay_page_path, DEFAULT_PAY_PATH);
        format!("{page}?{}", query(order_no, &BTreeMap::new()))
    }

    /// URL of the payment result page for an order
    ///
    /// All query keys, `order_no` included, are sorted. A `order_no` entry in
    /// `params` replaces the order number.
    pub fn pay_result_url(&self, order_no: &str, params: &BTreeMap<String, String>) -> String {
        let page = self.page_url(&self.pay_result_page_path, DEFAULT_PAY_RESULT_PATH);
        format!("{page}?{}", query(order_no, params))
    }

    fn page_url(&self, path: &str, default: &str) -> String {
        let path = if path.trim().is_empty() { default } else { path };
        if is_absolute(path) {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

fn query(order_no: &str, params: &BTreeMap<String, String>) -> String {
    let mut pairs = BTreeMap::from([("order_no", order_no)]);
    pairs.extend(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(base: &str, pay: &str, result: &str) -> SiteConfig {
        SiteConfig {
            base_url: base.into(),
            pay_page_path: pay.into(),
            pay_result_page_path: result.into(),
        }
    }

    #[test]
    fn test_payment_url_defaults() {
        let site = site("https://shop.example.com/", "", "");
        assert_eq!(
            site.payment_url("ORD-1"),
            "https://shop.example.com/pay?order_no=ORD-1"
        );
        assert_eq!(
            site.pay_result_url("ORD-1", &BTreeMap::new()),
            "https://shop.example.com/pay-result?order_no=ORD-1"
        );
    }

    #[test]
    fn test_payment_url_joins_single_slash() {
        let site = site("https://shop.example.com", "checkout/pay", "");
        assert_eq!(
            site.payment_url("42"),
            "https://shop.example.com/checkout/pay?order_no=42"
        );
    }

    #[test]
    fn test_absolute_path_used_verbatim() {
        let site = site("https://shop.example.com", "https://pay.example.net/p", "");
        assert_eq!(site.payment_url("42"), "https://pay.example.net/p?order_no=42");
    }

    #[test]
    fn test_pay_result_params_sorted_and_encoded() {
        let site = site("https://shop.example.com", "", "/done");
        let mut params = BTreeMap::new();
        params.insert("status".to_string(), "paid".to_string());
        params.insert("next".to_string(), "/account?tab=orders".to_string());

        assert_eq!(
            site.pay_result_url("A 1", &params),
            "https://shop.example.com/done?next=%2Faccount%3Ftab%3Dorders&order_no=A+1&status=paid"
        );
    }

    #[test]
    fn test_order_no_param_overrides() {
        let site = site("https://shop.example.com", "", "");
        let mut params = BTreeMap::new();
        params.insert("order_no".to_string(), "other".to_string());
        params.insert("amount".to_string(), "990".to_string());
        assert_eq!(
            site.pay_result_url("1", &params),
            "https://shop.example.com/pay-result?amount=990&order_no=other"
        );
    }
}
