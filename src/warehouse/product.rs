//! Product dimension builder.

use super::schema;
use anyhow::{Context as _, Result};
use polars::prelude::*;

/// Denormalize products against the category and brand reference tables.
/// The natural product identifier is carried through as the key; a product
/// whose category or brand is unknown keeps the row with a null name.
pub fn build_dim_product(
    products: &DataFrame,
    categories: &DataFrame,
    brands: &DataFrame,
) -> Result<DataFrame> {
    let mut errors = Vec::new();
    schema::require_columns("products", products, schema::PRODUCTS, &mut errors);
    schema::require_columns("categories", categories, schema::CATEGORIES, &mut errors);
    schema::require_columns("brands", brands, schema::BRANDS, &mut errors);
    schema::check(errors)?;

    products
        .clone()
        .lazy()
        .join(
            categories
                .clone()
                .lazy()
                .select([col("category_id"), col("category_name")]),
            [col("category_id")],
            [col("category_id")],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            brands
                .clone()
                .lazy()
                .select([col("brand_id"), col("brand_name")]),
            [col("brand_id")],
            [col("brand_id")],
            JoinArgs::new(JoinType::Left),
        )
        .select([
            col("product_id"),
            col("product_name"),
            col("category_name"),
            col("brand_name"),
            col("model_year"),
            col("list_price"),
        ])
        .unique_stable(Some(vec!["product_id".into()]), UniqueKeepStrategy::First)
        .collect()
        .context("Failed to build dim_product")
}
