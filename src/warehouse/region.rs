//! Region dimension builder.
//!
//! Region is conformed across customers and stores. No natural region key
//! exists upstream, so the (city, state, zip_code) triple is the business
//! key; the surrogate key follows first-seen order, customers before
//! stores, and carries no semantic meaning.

use super::{keys, schema};
use anyhow::{Context as _, Result};
use polars::prelude::*;

/// Union the location triples of both datasets into one deduplicated
/// dimension with a dense surrogate key.
pub fn build_dim_region(customers: &DataFrame, stores: &DataFrame) -> Result<DataFrame> {
    let mut errors = Vec::new();
    schema::require_columns("customers", customers, schema::LOCATION, &mut errors);
    schema::require_columns("stores", stores, schema::LOCATION, &mut errors);
    schema::check(errors)?;

    let project =
        |df: &DataFrame| df.clone().lazy().select([col("city"), col("state"), col("zip_code")]);

    let triples = concat([project(customers), project(stores)], UnionArgs::default())
        .context("Failed to union customer and store locations")?
        .unique_stable(None, UniqueKeepStrategy::First);

    keys::assign_surrogate_key(triples, "region_id")
        .collect()
        .context("Failed to build dim_region")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customers() -> DataFrame {
        df!(
            "city" => ["Austin", "Austin", "Dallas"],
            "state" => ["TX", "TX", "TX"],
            "zip_code" => ["73301", "73301", "75001"],
        )
        .unwrap()
    }

    fn stores() -> DataFrame {
        df!(
            "city" => ["Austin", "Houston"],
            "state" => ["TX", "TX"],
            "zip_code" => ["73301", "77001"],
        )
        .unwrap()
    }

    #[test]
    fn shared_triples_collapse_to_one_row() {
        let dim = build_dim_region(&customers(), &stores()).unwrap();

        // Two customers and one store share Austin/TX/73301
        assert_eq!(dim.height(), 3);

        let keys: Vec<Option<i64>> = dim
            .column("region_id")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(keys, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn customers_are_keyed_before_stores() {
        let dim = build_dim_region(&customers(), &stores()).unwrap();

        let cities: Vec<Option<&str>> = dim
            .column("city")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        // First-seen order: Austin and Dallas from customers, then Houston
        assert_eq!(
            cities,
            vec![Some("Austin"), Some("Dallas"), Some("Houston")]
        );
    }

    #[test]
    fn missing_location_column_fails() {
        let bad = df!("city" => ["Austin"], "state" => ["TX"]).unwrap();
        assert!(build_dim_region(&bad, &stores()).is_err());
    }
}
