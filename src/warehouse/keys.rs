use polars::prelude::*;

/// Prepend a dense, 1-based surrogate key following the frame's current
/// row order. Values are arbitrary identifiers, not sorted by any
/// attribute, and are only stable within a single rebuild.
pub fn assign_surrogate_key(lf: LazyFrame, name: &str) -> LazyFrame {
    lf.with_row_index(name, Some(1))
        .with_columns([col(name).cast(DataType::Int64)])
}

/// `YYYYMMDD` integer derived from a calendar-date column. The date is its
/// own key, so equal dates always produce equal identifiers across runs.
pub fn date_id_expr(name: &str) -> Expr {
    col(name).dt().to_string("%Y%m%d").cast(DataType::Int32)
}

/// Coerce a column to `Date`. Values that fail to parse become null
/// instead of aborting the build.
pub fn coerce_to_date(name: &str, dtype: &DataType) -> Expr {
    let expr = col(name);
    match dtype {
        DataType::Date => expr,
        DataType::Datetime(_, _) => expr.cast(DataType::Date),
        DataType::String => expr.str().to_date(StrptimeOptions {
            strict: false,
            ..Default::default()
        }),
        _ => expr.cast(DataType::Date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrogate_keys_are_dense_and_one_based() {
        let df = df!("city" => ["Austin", "Dallas", "Houston"]).unwrap();
        let keyed = assign_surrogate_key(df.lazy(), "region_id")
            .collect()
            .unwrap();

        let keys: Vec<Option<i64>> = keyed
            .column("region_id")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(keys, vec![Some(1), Some(2), Some(3)]);

        // Key column leads the frame
        assert_eq!(keyed.get_column_names()[0].as_str(), "region_id");
    }

    #[test]
    fn unparsable_dates_become_null() {
        let df = df!("d" => [Some("2016-01-01"), Some("not a date"), None]).unwrap();
        let dtype = df.column("d").unwrap().dtype().clone();
        let out = df
            .lazy()
            .select([coerce_to_date("d", &dtype).alias("d")])
            .collect()
            .unwrap();

        assert_eq!(out.column("d").unwrap().dtype(), &DataType::Date);
        assert_eq!(out.column("d").unwrap().as_materialized_series().null_count(), 2);
    }

    #[test]
    fn date_identity_key_is_yyyymmdd() {
        let df = df!("d" => ["2016-01-05"]).unwrap();
        let dtype = df.column("d").unwrap().dtype().clone();
        let out = df
            .lazy()
            .select([coerce_to_date("d", &dtype).alias("d")])
            .select([date_id_expr("d").alias("date_id")])
            .collect()
            .unwrap();

        let id = out
            .column("date_id")
            .unwrap()
            .as_materialized_series()
            .i32()
            .unwrap()
            .get(0);
        assert_eq!(id, Some(20160105));
    }
}
