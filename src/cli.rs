use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::Overrides;

#[derive(Parser)]
#[command(name = "wordgate")]
#[command(version)]
#[command(about = "Push products, membership tiers and app settings to Wordgate", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sync app config, membership tiers and products to the backend
    Sync(SyncArgs),

    /// Load and validate a configuration without contacting the backend
    Validate(ValidateArgs),

    /// Print a sample configuration and content file
    Demo,

    /// Print payment page URLs for an order
    Urls(UrlsArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Shared
// ============================================================================

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Configuration file (.yaml, .yml or .json)
    #[arg(short, long, default_value = "wordgate.yaml", env = "WORDGATE_CONFIG")]
    pub config: PathBuf,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// API base URL, overriding the config file
    #[arg(long, env = "WORDGATE_BASE_URL")]
    pub base_url: Option<String>,

    /// Application code, overriding the config file
    #[arg(long, env = "WORDGATE_APP_CODE")]
    pub app_code: Option<String>,

    /// Application secret, overriding the config file
    #[arg(long, env = "WORDGATE_APP_SECRET", hide_env_values = true)]
    pub app_secret: Option<String>,
}

impl CredentialArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            app_code: self.app_code.clone(),
            app_secret: self.app_secret.clone(),
        }
    }
}

// ============================================================================
// Sync
// ============================================================================

#[derive(Parser, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Show what would be synced without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// With --dry-run, read remote state to classify each item
    #[arg(long, requires = "dry_run")]
    pub compare: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// Validate
// ============================================================================

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub credentials: CredentialArgs,
}

// ============================================================================
// Urls
// ============================================================================

#[derive(Parser, Debug)]
pub struct UrlsArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Order number
    #[arg(long)]
    pub order_no: String,

    /// Extra query parameter for the result page (key=value, repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' in '{s}'"))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
