//! `wordgate validate` - load a configuration and report problems

use anyhow::Result;

use crate::Context;
use crate::cli::ValidateArgs;
use crate::config::Project;
use crate::ui;

pub fn run(ctx: &Context, args: ValidateArgs) -> Result<()> {
    let project = Project::load(&args.config.config, &args.credentials.overrides())?;
    let warnings = project.lints();

    if !ctx.quiet {
        ui::header("Configuration");
        ui::kv("File", &project.path.display().to_string());
        ui::kv("Backend", &project.config.base_url);
        ui::kv("App code", &project.config.app_code);
        ui::kv("App secret", &ui::mask_secret(&project.config.app_secret));
        ui::kv("App", &project.config.app.name);
        ui::kv("Currency", &project.config.app.currency);
        ui::kv("Membership tiers", &project.tiers.len().to_string());
        ui::kv("Products", &project.products.len().to_string());
        if !project.config.products.files.is_empty() {
            ui::kv("Content patterns", &project.config.products.files.join(", "));
        }
        if ctx.verbose > 0 {
            ui::section("Membership tiers");
            for tier in &project.tiers {
                ui::dim(&reconcile::Entity::describe(tier));
            }
            ui::section("Products");
            for product in &project.products {
                ui::dim(&reconcile::Entity::describe(product));
            }
        }
        println!();
    }

    for warning in &warnings {
        ui::warn(warning);
    }

    if warnings.is_empty() {
        ui::success("Configuration is valid");
    } else {
        ui::success(&format!(
            "Configuration is valid ({} warning(s))",
            warnings.len()
        ));
    }
    Ok(())
}
