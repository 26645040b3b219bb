//! Staff dimension builder.

use super::schema;
use anyhow::{Context as _, Result};
use polars::prelude::*;

/// Project staff to the final attribute set, deduplicated by the natural
/// staff identifier. No lookups are needed.
pub fn build_dim_staff(staff: &DataFrame) -> Result<DataFrame> {
    let mut errors = Vec::new();
    schema::require_columns("staff", staff, schema::STAFF, &mut errors);
    schema::check(errors)?;

    staff
        .clone()
        .lazy()
        .select([
            col("staff_id"),
            col("first_name"),
            col("last_name"),
            col("email"),
            col("phone"),
            col("active"),
        ])
        .unique_stable(Some(vec!["staff_id".into()]), UniqueKeepStrategy::First)
        .collect()
        .context("Failed to build dim_staff")
}
