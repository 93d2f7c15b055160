//! Content-file discovery and front-matter product extraction
//!
//! A content file declares a product in its front matter:
//!
//! ```text
//! ---
//! title: Rust Course
//! product:
//!   code: COURSE001
//!   name: Rust Course
//!   price: 9900
//! ---
//! ```
//!
//! `+++` delimiters switch the front matter to TOML.

use crate::schema::Product;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Front matter syntax, chosen by the opening delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterFormat {
    Yaml,
    Toml,
}

impl FrontMatterFormat {
    fn delimiter(self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    product: Option<Product>,
}

/// Split a document into its front matter block and format
///
/// Returns `None` when the document does not open with a delimiter line.
/// An opening delimiter without a closing one is an error.
pub fn split_front_matter(text: &str) -> Result<Option<(FrontMatterFormat, &str)>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let first_line = text.lines().next().unwrap_or_default().trim_end();

    let format = match first_line {
        "---" => FrontMatterFormat::Yaml,
        "+++" => FrontMatterFormat::Toml,
        _ => return Ok(None),
    };

    let delimiter = format.delimiter();
    let body_start = text.find('\n').map_or(text.len(), |i| i + 1);
    let rest = &text[body_start..];

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            return Ok(Some((format, &rest[..offset])));
        }
        offset += line.len();
    }

    bail!("Front matter opened with '{delimiter}' is never closed")
}

/// Parse the product declared in a document's front matter, if any
pub fn parse_product(text: &str) -> Result<Option<Product>> {
    let Some((format, block)) = split_front_matter(text)? else {
        return Ok(None);
    };

    if block.trim().is_empty() {
        return Ok(None);
    }

    let front: FrontMatter = match format {
        FrontMatterFormat::Yaml => {
            serde_yaml::from_str(block).context("Invalid YAML front matter")?
        }
        FrontMatterFormat::Toml => toml::from_str(block).context("Invalid TOML front matter")?,
    };

    Ok(front.product)
}

/// Read the product declared by one content file
pub fn read_product(path: &Path) -> Result<Option<Product>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    parse_product(&text).with_context(|| format!("Invalid front matter in {}", path.display()))
}

/// Expand glob patterns relative to `base_dir`
///
/// Paths are returned in pattern order, sorted within each pattern.
/// A path matched by several patterns is kept at its first match.
pub fn expand_patterns(base_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let full = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            base_dir.join(pattern).to_string_lossy().into_owned()
        };

        let mut matched: Vec<PathBuf> = glob::glob(&full)
            .with_context(|| format!("Invalid file pattern '{pattern}'"))?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("Skipping unreadable path: {e}");
                    None
                }
            })
            .filter(|p| p.is_file())
            .collect();
        matched.sort();

        if matched.is_empty() {
            log::debug!("Pattern '{pattern}' matched no files");
        }

        for path in matched {
            if !files.contains(&path) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

/// Collect products declared by every file matched by `patterns`
pub fn discover_products(base_dir: &Path, patterns: &[String]) -> Result<Vec<Product>> {
    let mut products = Vec::new();

    for path in expand_patterns(base_dir, patterns)? {
        match read_product(&path)? {
            Some(product) => {
                log::debug!("{}: product '{}'", path.display(), product.code);
                products.push(product);
            }
            None => log::debug!("{}: no product front matter, skipping", path.display()),
        }
    }

    Ok(products)
}
