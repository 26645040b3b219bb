use anyhow::{Context as _, Result};
use polars::prelude::*;
use std::path::Path;

/// Load a staging dataset. CSV is the common case; parquet is accepted for
/// upstream stages that already materialize columnar files. Date columns
/// are left as-is; coercion is the modeling engine's job.
pub fn load_df(path: &Path) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_has_header(true)
            .finish()?
            .collect()
            .context("Failed to read CSV"),
        "parquet" => ParquetReader::new(std::fs::File::open(path)?)
            .finish()
            .context("Failed to read Parquet"),
        _ => Err(anyhow::anyhow!("Unsupported file extension: {ext}")),
    }
}

/// Write a frame as a CSV file with a header row, replacing any previous
/// file at the path.
pub fn save_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let file = std::fs::File::create(path).context("Failed to create CSV file")?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(df)
        .context("Failed to write CSV file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn csv_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("orders.csv");

        let mut df = df!(
            "order_id" => [1i64, 2],
            "order_status" => ["shipped", "pending"],
        )
        .unwrap();
        save_csv(&mut df, &path).unwrap();

        let loaded = load_df(&path).unwrap();
        assert_eq!(loaded.height(), 2);
        assert_eq!(loaded.get_column_names().len(), 2);
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let result = load_df(Path::new("staging/orders.xlsx"));
        assert!(result.is_err());
    }
}
