//! `wordgate urls` - print the payment page URLs for an order

use anyhow::{Result, bail};
use std::collections::BTreeMap;

use crate::Context;
use crate::cli::UrlsArgs;
use crate::config;
use crate::ui;

pub fn run(ctx: &Context, args: UrlsArgs) -> Result<()> {
    let document = config::load_document(&args.config.config)?;
    let site = &document.config.site;

    if site.base_url.is_empty() {
        let absolute = |p: &str| p.starts_with("http://") || p.starts_with("https://");
        if !(absolute(&site.pay_page_path) && absolute(&site.pay_result_page_path)) {
            bail!("config.site.base_url is not set in {}", args.config.config.display());
        }
    }

    let params: BTreeMap<String, String> = args.params.into_iter().collect();
    let payment = site.payment_url(&args.order_no);
    let result = site.pay_result_url(&args.order_no, &params);

    if ctx.quiet {
        println!("{payment}");
        println!("{result}");
    } else {
        ui::kv("Payment", &payment);
        ui::kv("Result", &result);
    }
    Ok(())
}
