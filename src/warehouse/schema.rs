//! Input column contracts.
//!
//! Every staging dataset must expose a fixed set of columns before a build
//! can proceed. Violations are collected across all datasets and reported
//! together, so a single failed run surfaces every missing column instead
//! of one at a time.

use super::StagingInputs;
use anyhow::Result;
use polars::prelude::*;

pub const ORDERS: &[&str] = &[
    "order_id",
    "customer_id",
    "store_id",
    "staff_id",
    "order_date",
    "required_date",
    "shipped_date",
    "order_status",
    "delivery_time_days",
    "late_delivery_days",
    "late_flag",
    "status_priority",
];

pub const ORDER_ITEMS: &[&str] = &[
    "order_id",
    "product_id",
    "quantity",
    "discount",
    "list_price_local",
];

pub const PRODUCTS: &[&str] = &[
    "product_id",
    "product_name",
    "category_id",
    "brand_id",
    "model_year",
    "list_price",
];

pub const CATEGORIES: &[&str] = &["category_id", "category_name"];

pub const BRANDS: &[&str] = &["brand_id", "brand_name"];

pub const CUSTOMERS: &[&str] = &[
    "customer_id",
    "city",
    "state",
    "zip_code",
    "first_name",
    "last_name",
    "phone",
    "email",
    "local_flag",
];

pub const STORES: &[&str] = &[
    "store_id",
    "city",
    "state",
    "zip_code",
    "store_name",
    "phone",
    "email",
];

pub const STAFF: &[&str] = &["staff_id", "first_name", "last_name", "email", "phone", "active"];

/// The composite business key shared by region, customer and store.
pub const LOCATION: &[&str] = &["city", "state", "zip_code"];

pub const DIM_REGION: &[&str] = &["region_id", "city", "state", "zip_code"];

/// A required column absent from an input dataset.
#[derive(Debug, Clone)]
pub struct ContractError {
    pub dataset: String,
    pub column: String,
}

impl std::fmt::Display for ContractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Dataset '{}' is missing required column '{}'",
            self.dataset, self.column
        )
    }
}

/// Record a [`ContractError`] for every required column the frame lacks.
pub fn require_columns(
    dataset: &str,
    df: &DataFrame,
    required: &[&str],
    errors: &mut Vec<ContractError>,
) {
    let names = df.get_column_names();
    for column in required {
        if !names.iter().any(|name| name.as_str() == *column) {
            errors.push(ContractError {
                dataset: dataset.to_owned(),
                column: (*column).to_owned(),
            });
        }
    }
}

/// Fail loudly with every collected violation, or pass.
pub fn check(errors: Vec<ContractError>) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    anyhow::bail!(
        "Input contract violated:\n{}",
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    )
}

/// Check every staging dataset against its column contract.
pub fn validate_staging(inputs: &StagingInputs) -> Result<()> {
    let mut errors = Vec::new();
    require_columns("orders", &inputs.orders, ORDERS, &mut errors);
    require_columns("order_items", &inputs.order_items, ORDER_ITEMS, &mut errors);
    require_columns("products", &inputs.products, PRODUCTS, &mut errors);
    require_columns("categories", &inputs.categories, CATEGORIES, &mut errors);
    require_columns("brands", &inputs.brands, BRANDS, &mut errors);
    require_columns("customers", &inputs.customers, CUSTOMERS, &mut errors);
    require_columns("stores", &inputs.stores, STORES, &mut errors);
    require_columns("staff", &inputs.staff, STAFF, &mut errors);
    check(errors)
}
