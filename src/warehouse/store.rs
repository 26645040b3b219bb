//! Store dimension builder.

use super::schema;
use anyhow::{Context as _, Result};
use polars::prelude::*;

/// Attach the region surrogate key to each store via the composite
/// (city, state, zip_code) business key.
pub fn build_dim_store(stores: &DataFrame, dim_region: &DataFrame) -> Result<DataFrame> {
    let mut errors = Vec::new();
    schema::require_columns("stores", stores, schema::STORES, &mut errors);
    schema::require_columns("dim_region", dim_region, schema::DIM_REGION, &mut errors);
    schema::check(errors)?;

    let dim = stores
        .clone()
        .lazy()
        .join(
            dim_region.clone().lazy(),
            [col("city"), col("state"), col("zip_code")],
            [col("city"), col("state"), col("zip_code")],
            JoinArgs::new(JoinType::Left),
        )
        .select([
            col("store_id"),
            col("region_id"),
            col("store_name"),
            col("phone"),
            col("email"),
        ])
        .unique_stable(Some(vec!["store_id".into()]), UniqueKeepStrategy::First)
        .collect()
        .context("Failed to build dim_store")?;

    let unmatched = dim.column("region_id")?.as_materialized_series().null_count();
    if unmatched > 0 {
        tracing::warn!(rows = unmatched, "stores with no matching region triple");
    }

    Ok(dim)
}
