use crate::content;
use crate::schema::{MembershipTier, Product, WordgateConfig};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Document Loading
// ============================================================================

/// Supported configuration document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "" => bail!("Config file {} has no extension (expected .yaml, .yml or .json)", path.display()),
            other => bail!("Unsupported config format '.{other}' (expected .yaml, .yml or .json)"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    wordgate: Option<WordgateConfig>,
}

/// Parse a configuration document
pub fn parse(text: &str, format: ConfigFormat) -> Result<WordgateConfig> {
    let document: Document = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(text).context("Invalid YAML configuration")?,
        ConfigFormat::Json => serde_json::from_str(text).context("Invalid JSON configuration")?,
    };

    document
        .wordgate
        .context("Configuration has no 'wordgate' section")
}

/// Read and parse a configuration file without validating it
pub fn load_document(path: &Path) -> Result<WordgateConfig> {
    let format = ConfigFormat::from_path(path)?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    parse(&text, format).with_context(|| format!("Failed to load {}", path.display()))
}

// ============================================================================
// Credential Overrides
// ============================================================================

/// Connection settings that replace file values when set
///
/// Populated from CLI flags, which fall back to `WORDGATE_*` environment
/// variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub app_code: Option<String>,
    pub app_secret: Option<String>,
}

impl Overrides {
    /// Apply every set, non-empty override
    pub fn apply(&self, config: &mut WordgateConfig) {
        let pairs = [
            (&self.base_url, &mut config.base_url, "base_url"),
            (&self.app_code, &mut config.app_code, "app_code"),
            (&self.app_secret, &mut config.app_secret, "app_secret"),
        ];

        for (value, target, name) in pairs {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                log::debug!("Overriding {name} from command line or environment");
                *target = value.to_string();
            }
        }
    }
}

// ============================================================================
// Declared State
// ============================================================================

/// A loaded configuration and the entity lists it declares
#[derive(Debug, Clone)]
pub struct Project {
    /// Path of the configuration file
    pub path: PathBuf,

    /// Parsed `wordgate` section with overrides applied
    pub config: WordgateConfig,

    /// Products from content files, then inline items, de-duplicated
    pub products: Vec<Product>,

    /// Membership tiers, de-duplicated
    pub tiers: Vec<MembershipTier>,

    /// Content-file product codes replaced by inline items
    pub shadowed: Vec<String>,
}

impl Project {
    /// Load, override, validate and expand a configuration file
    ///
    /// Every error here happens before any network activity.
    pub fn load(path: &Path, overrides: &Overrides) -> Result<Self> {
        let mut config = load_document(path)?;
        overrides.apply(&mut config);

        if config.is_empty() {
            bail!(
                "{}: 'wordgate' section has no base_url, app_code or app_secret",
                path.display()
            );
        }
        config.validate()?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let file_products = content::discover_products(base_dir, &config.products.files)?;
        for (i, product) in file_products.iter().enumerate() {
            product
                .validate()
                .with_context(|| format!("Invalid product from content file #{}", i + 1))?;
        }

        log::info!(
            "Loaded {}: {} product(s) from files, {} inline, {} tier(s)",
            path.display(),
            file_products.len(),
            config.products.items.len(),
            config.membership.tiers.len()
        );

        let shadowed: Vec<String> = file_products
            .iter()
            .filter(|p| config.products.items.iter().any(|i| i.code == p.code))
            .map(|p| p.code.clone())
            .collect();
        let products = merge_products(file_products, &config.products.items);
        let tiers = reconcile::dedupe_last_wins(config.membership.tiers.clone());

        Ok(Self {
            path: path.to_path_buf(),
            config,
            products,
            tiers,
            shadowed,
        })
    }

    /// Authoring warnings for the loaded configuration
    pub fn lints(&self) -> Vec<String> {
        let mut warnings = self.config.lints();
        for code in &self.shadowed {
            warnings.push(format!(
                "Product '{code}' from a content file is overridden by an inline item"
            ));
        }
        warnings
    }
}

/// Merge file-matched and inline products, last declaration wins
pub fn merge_products(from_files: Vec<Product>, inline: &[Product]) -> Vec<Product> {
    let mut all = from_files;
    all.extend(inline.iter().cloned());
    reconcile::dedupe_last_wins(all)
}
