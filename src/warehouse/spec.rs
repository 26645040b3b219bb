//! Build specification data structures.
//!
//! Defines the JSON schema for a warehouse rebuild: where the staging
//! files live, where artifacts land, which columns feed the calendar
//! dimension and which fact bindings are required.

use super::fact::JoinPolicy;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current build spec version
pub const SPEC_VERSION: &str = "0.1";

/// Root build specification structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSpec {
    /// Specification version for future migrations
    pub version: String,

    /// Human-readable build name
    pub name: String,

    /// Staging input configuration
    #[serde(default)]
    pub staging: StagingConfig,

    /// Warehouse output configuration
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    /// Datasets and columns feeding the calendar dimension
    #[serde(default = "default_date_sources")]
    pub date_sources: Vec<DateSourceConfig>,

    /// Which fact-table dimension bindings are required
    #[serde(default)]
    pub policy: JoinPolicy,
}

impl BuildSpec {
    /// Create a build spec with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: SPEC_VERSION.to_owned(),
            name: name.into(),
            staging: StagingConfig::default(),
            warehouse: WarehouseConfig::default(),
            date_sources: default_date_sources(),
            policy: JoinPolicy::default(),
        }
    }

    /// Load a build spec from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read build spec file")?;
        Self::from_json(&content)
    }

    /// Parse a build spec from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse build spec JSON")
    }

    /// Save the build spec to a JSON file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json).context("Failed to write build spec file")
    }

    /// Serialize the build spec to a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize build spec")
    }

    /// Check the spec for problems before running a build.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.version != SPEC_VERSION {
            problems.push(format!(
                "Unsupported spec version '{}', expected '{SPEC_VERSION}'",
                self.version
            ));
        }

        if self.date_sources.is_empty() {
            problems.push("At least one date source is required".to_owned());
        }
        for source in &self.date_sources {
            if !DATASET_NAMES.contains(&source.dataset.as_str()) {
                problems.push(format!(
                    "Unknown dataset '{}' in date_sources (expected one of {DATASET_NAMES:?})",
                    source.dataset
                ));
            }
            if source.columns.is_empty() {
                problems.push(format!(
                    "Date source '{}' declares no columns",
                    source.dataset
                ));
            }
        }

        problems
    }
}

/// Staging dataset names addressable from a spec
pub const DATASET_NAMES: [&str; 8] = [
    "orders",
    "order_items",
    "products",
    "categories",
    "brands",
    "customers",
    "stores",
    "staff",
];

/// Staging input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Directory holding the staging files
    #[serde(default = "default_staging_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_orders_file")]
    pub orders: String,

    #[serde(default = "default_order_items_file")]
    pub order_items: String,

    #[serde(default = "default_products_file")]
    pub products: String,

    #[serde(default = "default_categories_file")]
    pub categories: String,

    #[serde(default = "default_brands_file")]
    pub brands: String,

    #[serde(default = "default_customers_file")]
    pub customers: String,

    #[serde(default = "default_stores_file")]
    pub stores: String,

    #[serde(default = "default_staff_file")]
    pub staff: String,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            dir: default_staging_dir(),
            orders: default_orders_file(),
            order_items: default_order_items_file(),
            products: default_products_file(),
            categories: default_categories_file(),
            brands: default_brands_file(),
            customers: default_customers_file(),
            stores: default_stores_file(),
            staff: default_staff_file(),
        }
    }
}

/// Warehouse output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// Directory the CSV artifacts are written to
    #[serde(default = "default_warehouse_dir")]
    pub dir: PathBuf,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            dir: default_warehouse_dir(),
        }
    }
}

/// One dataset contributing date columns to the calendar dimension
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateSourceConfig {
    pub dataset: String,
    pub columns: Vec<String>,
}

// Default value functions
fn default_staging_dir() -> PathBuf {
    PathBuf::from("staging")
}

fn default_warehouse_dir() -> PathBuf {
    PathBuf::from("data_warehouse")
}

fn default_orders_file() -> String {
    "transformed_orders.csv".to_owned()
}

fn default_order_items_file() -> String {
    "transformed_order_items.csv".to_owned()
}

fn default_products_file() -> String {
    "cleaned_products.csv".to_owned()
}

fn default_categories_file() -> String {
    "cleaned_categories.csv".to_owned()
}

fn default_brands_file() -> String {
    "cleaned_brands.csv".to_owned()
}

fn default_customers_file() -> String {
    "transformed_customers.csv".to_owned()
}

fn default_stores_file() -> String {
    "cleaned_stores.csv".to_owned()
}

fn default_staff_file() -> String {
    "cleaned_staffs.csv".to_owned()
}

fn default_date_sources() -> Vec<DateSourceConfig> {
    vec![DateSourceConfig {
        dataset: "orders".to_owned(),
        columns: vec![
            "order_date".to_owned(),
            "required_date".to_owned(),
            "shipped_date".to_owned(),
        ],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::fact::FactDimension;

    #[test]
    fn spec_round_trips_through_json() {
        let spec = BuildSpec::new("nightly_rebuild");
        let json = spec.to_json().expect("Failed to serialize");
        assert!(json.contains("\"version\": \"0.1\""));
        assert!(json.contains("transformed_orders.csv"));

        let parsed = BuildSpec::from_json(&json).expect("Failed to parse");
        assert_eq!(parsed.name, "nightly_rebuild");
        assert_eq!(parsed.date_sources.len(), 1);
        assert!(parsed.policy.is_required(FactDimension::Product));
        assert!(!parsed.policy.is_required(FactDimension::ShippedDate));
    }

    #[test]
    fn minimal_json_gets_defaults() {
        let spec = BuildSpec::from_json(r#"{"version": "0.1", "name": "minimal"}"#).unwrap();
        assert_eq!(spec.staging.orders, "transformed_orders.csv");
        assert_eq!(spec.warehouse.dir, PathBuf::from("data_warehouse"));
        assert!(spec.validate().is_empty());
    }

    #[test]
    fn validate_flags_unknown_dataset_and_bad_version() {
        let mut spec = BuildSpec::new("bad");
        spec.version = "9.9".to_owned();
        spec.date_sources = vec![DateSourceConfig {
            dataset: "shipments".to_owned(),
            columns: Vec::new(),
        }];

        let problems = spec.validate();
        assert_eq!(problems.len(), 3);
        assert!(problems.iter().any(|p| p.contains("version")));
        assert!(problems.iter().any(|p| p.contains("shipments")));
    }
}
