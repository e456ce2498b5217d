//! Engine configuration
//!
//! Holds the tunable constants of the projection engine and the category
//! bindings used by the advice rules.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for an explicit path, then for an override in the data dir
//!    (~/.local/share/runway/config/runway.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::ItemType;
use crate::projection::DEFAULT_DAMPENING_EXPONENT;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/runway.toml");

/// Bindings and thresholds for the advice rules
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceConfig {
    /// Category whose frequent purchase suggests a cheaper substitute
    pub premium_item_type: ItemType,
    /// Category whose share of the allowance is watched
    pub indulgence_item_type: ItemType,
    pub premium_min_purchases: usize,
    pub substitution_saving_ratio: f64,
    pub indulgence_share: f64,
    /// Absolute balance under which a danger rating becomes critical
    pub critical_balance_floor: f64,
    pub max_items: usize,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            premium_item_type: ItemType::Coffee,
            indulgence_item_type: ItemType::Dessert,
            premium_min_purchases: 5,
            substitution_saving_ratio: 0.3,
            indulgence_share: 0.1,
            critical_balance_floor: 500.0,
            max_items: 5,
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Exponent for the safe-limit overshoot correction
    pub dampening_exponent: f64,
    pub advice: AdviceConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dampening_exponent: DEFAULT_DAMPENING_EXPONENT,
            advice: AdviceConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load config, preferring `override_path`, then the data-dir override,
    /// then the embedded defaults. A missing `override_path` falls through
    /// to the next source.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        Self::load_from(override_path, default_config_path().as_deref())
    }

    fn load_from(override_path: Option<&Path>, data_dir_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = override_path {
            if path.exists() {
                return Self::from_file(path);
            }
            tracing::debug!(path = %path.display(), "Config override not found");
        }
        if let Some(path) = data_dir_path {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        parse_config(DEFAULT_CONFIG)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "Loaded engine config");
        parse_config(&content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("runway").join("config").join("runway.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    projection: Option<RawProjection>,
    advice: Option<RawAdvice>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProjection {
    dampening_exponent: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAdvice {
    premium_item_type: Option<String>,
    indulgence_item_type: Option<String>,
    premium_min_purchases: Option<usize>,
    substitution_saving_ratio: Option<f64>,
    indulgence_share: Option<f64>,
    critical_balance_floor: Option<f64>,
    max_items: Option<usize>,
}

/// Parse config from TOML content
pub fn parse_config(content: &str) -> Result<EngineConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = EngineConfig::default();

    if let Some(projection) = raw.projection {
        if let Some(exponent) = projection.dampening_exponent {
            if !(exponent.is_finite() && exponent >= 0.0) {
                return Err(Error::Config(format!(
                    "dampening_exponent must be a non-negative number, got {}",
                    exponent
                )));
            }
            config.dampening_exponent = exponent;
        }
    }

    if let Some(advice) = raw.advice {
        let target = &mut config.advice;
        if let Some(item) = advice.premium_item_type {
            target.premium_item_type = ItemType::from_raw(&item);
        }
        if let Some(item) = advice.indulgence_item_type {
            target.indulgence_item_type = ItemType::from_raw(&item);
        }
        if let Some(count) = advice.premium_min_purchases {
            target.premium_min_purchases = count;
        }
        if let Some(ratio) = advice.substitution_saving_ratio {
            target.substitution_saving_ratio = ratio;
        }
        if let Some(share) = advice.indulgence_share {
            target.indulgence_share = share;
        }
        if let Some(floor) = advice.critical_balance_floor {
            target.critical_balance_floor = floor;
        }
        if let Some(max) = advice.max_items {
            target.max_items = max;
        }
    }

    Ok(config)
}
