//! Fact table assembler.
//!
//! The fact grain is one row per order line item. Assembly is a strict
//! join sequence: headers to items first (setting the grain), then every
//! dimension in turn, replacing descriptive attributes with surrogate
//! foreign keys. Required dimensions bind with inner joins, so a row
//! lacking a resolvable binding drops out of the fact table by
//! construction; optional dimensions bind with left joins and keep the row
//! with a null key.

use super::{keys, schema};
use anyhow::{Context as _, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

const DATE_COLUMNS: [&str; 3] = ["order_date", "required_date", "shipped_date"];

/// A dimension binding of the fact table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactDimension {
    OrderDate,
    RequiredDate,
    ShippedDate,
    Product,
    Customer,
    Store,
    Staff,
}

/// Which dimension bindings must resolve for a fact row to exist.
///
/// A required binding uses an inner join: a row with no match is excluded
/// from the fact table. An optional binding uses a left join: no match
/// yields a null foreign key instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinPolicy {
    required: Vec<FactDimension>,
}

impl JoinPolicy {
    /// Product, customer, store, staff and the order date are required;
    /// required/shipped dates may legitimately be unset for undelivered
    /// orders and stay optional.
    pub fn standard() -> Self {
        Self {
            required: vec![
                FactDimension::OrderDate,
                FactDimension::Product,
                FactDimension::Customer,
                FactDimension::Store,
                FactDimension::Staff,
            ],
        }
    }

    pub fn new(required: impl Into<Vec<FactDimension>>) -> Self {
        Self {
            required: required.into(),
        }
    }

    pub fn is_required(&self, dimension: FactDimension) -> bool {
        self.required.contains(&dimension)
    }

    fn join_type(&self, dimension: FactDimension) -> JoinType {
        if self.is_required(dimension) {
            JoinType::Inner
        } else {
            JoinType::Left
        }
    }
}

impl Default for JoinPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// The order datasets plus every dimension the fact table binds to.
pub struct FactInputs<'a> {
    pub orders: &'a DataFrame,
    pub order_items: &'a DataFrame,
    pub dim_date: &'a DataFrame,
    pub dim_product: &'a DataFrame,
    pub dim_customer: &'a DataFrame,
    pub dim_store: &'a DataFrame,
    pub dim_staff: &'a DataFrame,
}

/// Assemble `fact_sales`.
///
/// An empty result at any step produces an empty fact table rather than an
/// error; the row loss is logged as a data-quality signal.
pub fn build_fact_sales(inputs: &FactInputs<'_>, policy: &JoinPolicy) -> Result<DataFrame> {
    validate_inputs(inputs)?;

    let grain_rows = inputs.order_items.height();

    // Grain: one row per order item, carrying the parent header
    let mut lf = inputs.orders.clone().lazy().join(
        inputs.order_items.clone().lazy(),
        [col("order_id")],
        [col("order_id")],
        JoinArgs::new(JoinType::Inner),
    );

    // Normalize the three header dates; parse failures become null and are
    // handled by the date joins below
    let mut date_exprs = Vec::new();
    for name in DATE_COLUMNS {
        let dtype = inputs.orders.column(name)?.dtype().clone();
        date_exprs.push(keys::coerce_to_date(name, &dtype).alias(name));
    }
    lf = lf.with_columns(date_exprs);

    let date_lookup = |alias: &str| {
        inputs
            .dim_date
            .clone()
            .lazy()
            .select([col("date_id").alias(alias), col("date")])
    };

    lf = lf.join(
        date_lookup("order_date_id"),
        [col("order_date")],
        [col("date")],
        JoinArgs::new(policy.join_type(FactDimension::OrderDate)),
    );
    lf = lf.join(
        date_lookup("required_date_id"),
        [col("required_date")],
        [col("date")],
        JoinArgs::new(policy.join_type(FactDimension::RequiredDate)),
    );
    lf = lf.join(
        date_lookup("shipped_date_id"),
        [col("shipped_date")],
        [col("date")],
        JoinArgs::new(policy.join_type(FactDimension::ShippedDate)),
    );

    lf = lf.join(
        inputs.dim_product.clone().lazy().select([col("product_id")]),
        [col("product_id")],
        [col("product_id")],
        JoinArgs::new(policy.join_type(FactDimension::Product)),
    );
    lf = lf.join(
        inputs
            .dim_customer
            .clone()
            .lazy()
            .select([col("customer_id"), col("region_id").alias("customer_region_id")]),
        [col("customer_id")],
        [col("customer_id")],
        JoinArgs::new(policy.join_type(FactDimension::Customer)),
    );
    lf = lf.join(
        inputs
            .dim_store
            .clone()
            .lazy()
            .select([col("store_id"), col("region_id").alias("store_region_id")]),
        [col("store_id")],
        [col("store_id")],
        JoinArgs::new(policy.join_type(FactDimension::Store)),
    );
    lf = lf.join(
        inputs.dim_staff.clone().lazy().select([col("staff_id")]),
        [col("staff_id")],
        [col("staff_id")],
        JoinArgs::new(policy.join_type(FactDimension::Staff)),
    );

    let lf = lf.select([
        col("order_id"),
        col("product_id"),
        col("customer_id"),
        col("store_id"),
        col("customer_region_id"),
        col("store_region_id"),
        col("staff_id"),
        col("order_date_id"),
        col("required_date_id"),
        col("shipped_date_id"),
        col("discount"),
        col("delivery_time_days"),
        col("late_delivery_days"),
        col("late_flag"),
        col("status_priority"),
        col("quantity"),
        col("list_price_local"),
    ]);

    let fact = keys::assign_surrogate_key(lf, "sales_key")
        .with_columns([(col("quantity") * col("list_price_local")
            * (lit(1.0) - col("discount")))
        .alias("total_sales")])
        .collect()
        .context("Failed to build fact_sales")?;

    if fact.height() < grain_rows {
        tracing::warn!(
            dropped = grain_rows - fact.height(),
            "fact rows excluded by required dimension joins"
        );
    }
    if fact.is_empty() {
        tracing::warn!("fact_sales is empty; check upstream row counts");
    }

    Ok(fact)
}

fn validate_inputs(inputs: &FactInputs<'_>) -> Result<()> {
    let mut errors = Vec::new();
    schema::require_columns("orders", inputs.orders, schema::ORDERS, &mut errors);
    schema::require_columns("order_items", inputs.order_items, schema::ORDER_ITEMS, &mut errors);
    schema::require_columns("dim_date", inputs.dim_date, &["date_id", "date"], &mut errors);
    schema::require_columns("dim_product", inputs.dim_product, &["product_id"], &mut errors);
    schema::require_columns(
        "dim_customer",
        inputs.dim_customer,
        &["customer_id", "region_id"],
        &mut errors,
    );
    schema::require_columns(
        "dim_store",
        inputs.dim_store,
        &["store_id", "region_id"],
        &mut errors,
    );
    schema::require_columns("dim_staff", inputs.dim_staff, &["staff_id"], &mut errors);
    schema::check(errors)
}
