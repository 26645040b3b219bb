//! Customer dimension builder.

use super::schema;
use anyhow::{Context as _, Result};
use polars::prelude::*;

/// Attach the region surrogate key to each customer via the composite
/// (city, state, zip_code) business key, then project to the final
/// attribute set keyed by the natural customer identifier.
pub fn build_dim_customer(customers: &DataFrame, dim_region: &DataFrame) -> Result<DataFrame> {
    let mut errors = Vec::new();
    schema::require_columns("customers", customers, schema::CUSTOMERS, &mut errors);
    schema::require_columns("dim_region", dim_region, schema::DIM_REGION, &mut errors);
    schema::check(errors)?;

    let dim = customers
        .clone()
        .lazy()
        .join(
            dim_region.clone().lazy(),
            [col("city"), col("state"), col("zip_code")],
            [col("city"), col("state"), col("zip_code")],
            JoinArgs::new(JoinType::Left),
        )
        .select([
            col("customer_id"),
            col("region_id"),
            col("first_name"),
            col("last_name"),
            col("phone"),
            col("email"),
            col("local_flag"),
        ])
        .unique_stable(Some(vec!["customer_id".into()]), UniqueKeepStrategy::First)
        .collect()
        .context("Failed to build dim_customer")?;

    let unmatched = dim.column("region_id")?.as_materialized_series().null_count();
    if unmatched > 0 {
        tracing::warn!(rows = unmatched, "customers with no matching region triple");
    }

    Ok(dim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::region::build_dim_region;

    fn customers() -> DataFrame {
        df!(
            "customer_id" => [1i64, 2],
            "city" => ["Austin", "Dallas"],
            "state" => ["TX", "TX"],
            "zip_code" => ["73301", "75001"],
            "first_name" => ["Ada", "Ben"],
            "last_name" => ["Young", "Ortiz"],
            "phone" => [Some("(512) 555-0101"), None],
            "email" => ["ada@example.com", "ben@example.com"],
            "local_flag" => [true, false],
        )
        .unwrap()
    }

    fn stores() -> DataFrame {
        df!(
            "city" => ["Austin"],
            "state" => ["TX"],
            "zip_code" => ["73301"],
        )
        .unwrap()
    }

    #[test]
    fn customers_resolve_to_region_keys() {
        let dim_region = build_dim_region(&customers(), &stores()).unwrap();
        let dim = build_dim_customer(&customers(), &dim_region)
            .unwrap()
            .sort(["customer_id"], Default::default())
            .unwrap();

        let regions: Vec<Option<i64>> = dim
            .column("region_id")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(regions, vec![Some(1), Some(2)]);
    }

    #[test]
    fn unmatched_triple_keeps_row_with_null_region() {
        // A region dimension built from other rows entirely
        let dim_region = df!(
            "region_id" => [1i64],
            "city" => ["Houston"],
            "state" => ["TX"],
            "zip_code" => ["77001"],
        )
        .unwrap();

        let dim = build_dim_customer(&customers(), &dim_region).unwrap();
        assert_eq!(dim.height(), 2);
        assert_eq!(
            dim.column("region_id")
                .unwrap()
                .as_materialized_series()
                .null_count(),
            2
        );
    }
}
