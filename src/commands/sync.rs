//! `wordgate sync` - push declared state, or preview it with `--dry-run`

use anyhow::{Context as AnyhowContext, Result, bail};
use colored::Colorize;

use crate::Context;
use crate::cli::SyncArgs;
use crate::config::Project;
use crate::engine::preview::PlanPreview;
use crate::engine::{DryRunOptions, OverallResult, PreviewResult, Syncer};
use crate::progress::BarProgress;
use crate::ui;
use reconcile::SyncOutcome;

pub fn run(ctx: &Context, args: SyncArgs) -> Result<()> {
    let project = Project::load(&args.config.config, &args.credentials.overrides())?;

    if !args.json && !ctx.quiet {
        ui::kv("Config", &project.path.display().to_string());
        ui::kv("Backend", &project.config.base_url);
        for warning in project.lints() {
            ui::warn(&warning);
        }
    }

    let mut syncer = Syncer::connect(&project)?;

    if args.dry_run {
        let preview = syncer.dry_run(DryRunOptions {
            compare_remote: args.compare,
        });
        if args.json {
            print_json(&preview)?;
        } else {
            render_preview(&preview, &project.config.app.currency);
        }
        return Ok(());
    }

    let mut progress = BarProgress::new(!ctx.quiet && !args.json);
    let result = syncer.sync_all_with(&mut progress);
    log::debug!("Sync finished in phase '{}'", syncer.phase());

    if args.json {
        print_json(&result)?;
    } else {
        render_result(&result);
    }

    check_result(&result)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Could not serialize result")?;
    println!("{json}");
    Ok(())
}

/// Map an overall result to the command's exit status
pub fn check_result(result: &OverallResult) -> Result<()> {
    if !result.success {
        bail!("Sync failed: {}", result.error_message);
    }
    if result.is_degraded() {
        let failed: usize = result.outcomes().map(|o| o.failed).sum();
        ui::warn(&format!(
            "{failed} item(s) failed; fix them and run sync again"
        ));
    }
    Ok(())
}

// ============================================================================
// Rendering
// ============================================================================

/// One-line counter summary for a phase
pub fn summary_line(outcome: &SyncOutcome) -> String {
    if let Some(error) = &outcome.fatal_error {
        return format!("aborted: {error}");
    }
    format!(
        "{} total: {} created, {} updated, {} unchanged, {} failed",
        outcome.total, outcome.created, outcome.updated, outcome.unchanged, outcome.failed
    )
}

fn render_outcome(title: &str, outcome: Option<&SyncOutcome>) {
    ui::section(title);
    let Some(outcome) = outcome else {
        ui::dim("skipped");
        return;
    };

    let line = summary_line(outcome);
    if outcome.is_aborted() {
        println!("  {} {}", "✗".red(), line);
    } else if outcome.failed > 0 {
        println!("  {} {}", "⚠".yellow(), line);
    } else {
        println!("  {} {}", "✓".green(), line);
    }

    for error in &outcome.errors {
        println!("    {} {}: {}", "-".dimmed(), error.code.bold(), error.message);
    }
}

fn render_result(result: &OverallResult) {
    ui::header("Sync result");

    ui::section("App config");
    if result.app_config.success {
        println!("  {} {}", "✓".green(), result.app_config.name);
        if !result.app_config.message.is_empty() {
            ui::dim(&result.app_config.message);
        }
    } else {
        println!("  {} {}", "✗".red(), result.app_config.message);
    }

    render_outcome("Membership tiers", result.memberships.as_ref());
    render_outcome("Products", result.products.as_ref());

    println!();
    if result.success && !result.is_degraded() {
        ui::success("Sync complete");
    }
}

fn render_plan(preview: &PlanPreview) {
    if let Some(error) = &preview.error {
        ui::warn(&format!("Could not compare with remote: {error}"));
        return;
    }
    let Some(summary) = preview.summary else {
        return;
    };
    ui::dim(&format!(
        "{} to create, {} to update, {} unchanged",
        summary.create, summary.update, summary.unchanged
    ));
    for planned in preview.actions.iter().filter(|a| a.action.is_write()) {
        println!("    {} {}", planned.action.symbol().cyan(), planned.code);
    }
}

fn render_preview(preview: &PreviewResult, currency: &str) {
    ui::header("Dry run: nothing will be written");

    ui::section("App config");
    ui::kv("Name", &preview.app.name);
    ui::kv("Description", &preview.app.description);
    ui::kv("Currency", &preview.app.currency);

    ui::section(&format!("Membership tiers ({})", preview.memberships.len()));
    if preview.memberships.is_empty() {
        ui::warn("No membership tiers declared");
    }
    for (i, tier) in preview.memberships.iter().enumerate() {
        let default = if tier.is_default { " [default]".green().to_string() } else { String::new() };
        println!(
            "  {}. {} ({}) level {}{default}, {} price(s)",
            i + 1,
            tier.name,
            tier.code.bold(),
            tier.level,
            tier.prices.len()
        );
    }
    render_plan(&preview.membership_plan);

    ui::section(&format!("Products ({})", preview.products.len()));
    if preview.products.is_empty() {
        ui::dim("No products declared");
    }
    for (i, product) in preview.products.iter().enumerate() {
        println!(
            "  {}. {} ({}) {}",
            i + 1,
            product.name,
            product.code.bold(),
            ui::format_price(i64::try_from(product.price).unwrap_or(i64::MAX), currency)
        );
    }
    render_plan(&preview.product_plan);

    if let Some(writes) = preview.pending_writes() {
        println!();
        ui::info(&format!("A sync would issue {writes} write(s)"));
    }
}
