//! Date dimension builder.
//!
//! Scans every declared date column across the source datasets, pools the
//! values that parse, and derives one calendar row per distinct date. The
//! calendar is sparse: only dates that actually appear are emitted, with
//! no gap filling between them.

use super::keys;
use anyhow::{Context as _, Result};
use polars::prelude::*;

/// One staging dataset contributing date values to the calendar.
pub struct DateSource<'a> {
    /// Dataset name, used in error messages
    pub name: &'a str,

    /// The dataset itself
    pub frame: &'a DataFrame,

    /// Columns known to hold date values
    pub columns: Vec<String>,
}

/// Build `dim_date` from every declared date column.
///
/// Unparsable values are treated as absent, not as errors. A declared
/// column missing from its dataset is a contract violation and fails the
/// build.
pub fn build_dim_date(sources: &[DateSource<'_>]) -> Result<DataFrame> {
    let mut pools = Vec::new();
    for source in sources {
        for column in &source.columns {
            let dtype = source
                .frame
                .column(column)
                .with_context(|| {
                    format!(
                        "Dataset '{}' is missing declared date column '{column}'",
                        source.name
                    )
                })?
                .dtype()
                .clone();

            let expr = keys::coerce_to_date(column, &dtype).alias("date");
            pools.push(source.frame.clone().lazy().select([expr]));
        }
    }

    if pools.is_empty() {
        anyhow::bail!("No date sources declared; dim_date cannot be built");
    }

    let pool = concat(pools, UnionArgs::default()).context("Failed to pool date columns")?;

    pool.drop_nulls(None)
        .unique_stable(None, UniqueKeepStrategy::First)
        .sort(["date"], Default::default())
        .select([
            keys::date_id_expr("date").alias("date_id"),
            col("date"),
            col("date").dt().to_string("%A").alias("day_name"),
            col("date").dt().to_string("%B").alias("month"),
            col("date").dt().year().alias("year"),
            col("date").dt().quarter().cast(DataType::Int32).alias("quarter"),
        ])
        .collect()
        .context("Failed to build dim_date")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date_ids(dim: &DataFrame) -> Vec<Option<i32>> {
        dim.column("date_id")
            .unwrap()
            .as_materialized_series()
            .i32()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn pools_all_declared_columns_sorted_and_deduplicated() {
        let orders = df!(
            "order_date" => ["2016-01-03", "2016-01-01", "2016-01-03"],
            "shipped_date" => [Some("2016-01-05"), None, Some("2016-01-01")],
        )
        .unwrap();

        let dim = build_dim_date(&[DateSource {
            name: "orders",
            frame: &orders,
            columns: vec!["order_date".to_owned(), "shipped_date".to_owned()],
        }])
        .unwrap();

        assert_eq!(
            date_ids(&dim),
            vec![Some(20160101), Some(20160103), Some(20160105)]
        );
    }

    #[test]
    fn derives_calendar_attributes() {
        // 2016-01-01 was a Friday
        let orders = df!("order_date" => ["2016-01-01"]).unwrap();
        let dim = build_dim_date(&[DateSource {
            name: "orders",
            frame: &orders,
            columns: vec!["order_date".to_owned()],
        }])
        .unwrap();

        let series = |name: &str| dim.column(name).unwrap().as_materialized_series().clone();
        assert_eq!(series("day_name").str().unwrap().get(0), Some("Friday"));
        assert_eq!(series("month").str().unwrap().get(0), Some("January"));
        assert_eq!(series("year").i32().unwrap().get(0), Some(2016));
        assert_eq!(series("quarter").i32().unwrap().get(0), Some(1));
    }

    #[test]
    fn unparsable_values_are_dropped_not_fatal() {
        let orders = df!(
            "order_date" => [Some("2016-06-30"), Some("????"), None],
        )
        .unwrap();

        let dim = build_dim_date(&[DateSource {
            name: "orders",
            frame: &orders,
            columns: vec!["order_date".to_owned()],
        }])
        .unwrap();

        assert_eq!(dim.height(), 1);
        assert_eq!(date_ids(&dim), vec![Some(20160630)]);
    }

    #[test]
    fn no_gap_synthesis_between_sparse_dates() {
        let orders = df!("order_date" => ["2016-01-01", "2016-03-01"]).unwrap();
        let dim = build_dim_date(&[DateSource {
            name: "orders",
            frame: &orders,
            columns: vec!["order_date".to_owned()],
        }])
        .unwrap();

        assert_eq!(dim.height(), 2);
    }

    #[test]
    fn missing_declared_column_fails_loudly() {
        let orders = df!("order_date" => ["2016-01-01"]).unwrap();
        let result = build_dim_date(&[DateSource {
            name: "orders",
            frame: &orders,
            columns: vec!["shipped_date".to_owned()],
        }]);

        assert!(result.is_err());
    }
}
