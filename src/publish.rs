//! Warehouse publishing.
//!
//! Each table is written twice: a CSV artifact under the warehouse
//! directory and a PostgreSQL table of the same name, both fully replacing
//! any prior version. The pair is not atomic: a crash between the two
//! writes leaves them inconsistent until the next rebuild. Either write
//! failing aborts the run rather than leaving a half-updated warehouse
//! silently.

use crate::io::save_csv;
use anyhow::{Context as _, Result};
use polars::prelude::*;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::path::{Path, PathBuf};

/// Queryable-store connection, acquired once per run and shared by every
/// table replacement.
pub struct DbClient {
    pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(10))
            .connect(url)
            .await
            .context("Failed to connect to PostgreSQL (timeout after 10s)")?;
        Ok(Self { pool })
    }

    /// Drop and recreate the table, then stream the frame into it with
    /// COPY in chunks to avoid building one giant buffer.
    pub async fn replace_table(&self, table: &str, df: &DataFrame) -> Result<()> {
        let identifier = quote_identifier(table);

        sqlx::query(&format!("DROP TABLE IF EXISTS {identifier}"))
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to drop table '{table}'"))?;

        let schema = df.schema();
        let mut column_definitions = Vec::new();
        for (name, dtype) in schema.iter() {
            column_definitions.push(format!("{} {}", quote_identifier(name), sql_type(dtype)));
        }
        let create = format!(
            "CREATE TABLE {identifier} ({})",
            column_definitions.join(", ")
        );

        sqlx::query(&create)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to create table '{table}'"))?;

        let mut conn = self.pool.acquire().await?;
        let mut writer = conn
            .copy_in_raw(&format!(
                "COPY {identifier} FROM STDIN WITH (FORMAT csv, NULL '')"
            ))
            .await
            .context("Failed to initiate COPY command")?;

        let chunk_size = 10_000;
        let height = df.height();

        for offset in (0..height).step_by(chunk_size) {
            let len = std::cmp::min(chunk_size, height - offset);
            let mut chunk = df.slice(offset as i64, len);

            let mut buf = Vec::new();
            CsvWriter::new(&mut buf)
                .include_header(false)
                .with_separator(b',')
                .with_null_value(String::new())
                .finish(&mut chunk)
                .context("Failed to serialize chunk to CSV")?;

            writer
                .send(buf)
                .await
                .context("Failed to send data chunk via COPY")?;
        }

        writer.finish().await.context("Failed to finish COPY command")?;

        Ok(())
    }
}

/// Path of a table's CSV artifact under the warehouse directory.
pub fn csv_artifact_path(warehouse_dir: &Path, table: &str) -> PathBuf {
    warehouse_dir.join(format!("{table}.csv"))
}

/// Replace the table's CSV artifact in full.
pub fn write_csv_artifact(df: &DataFrame, warehouse_dir: &Path, table: &str) -> Result<PathBuf> {
    let path = csv_artifact_path(warehouse_dir, table);
    // DataFrame clones are cheap (shared column buffers)
    let mut df = df.clone();
    save_csv(&mut df, &path)
        .with_context(|| format!("Failed to write artifact for '{table}'"))?;
    Ok(path)
}

/// Publish one table to both targets. The file artifact is always written;
/// the queryable store is skipped when no client is supplied.
pub async fn publish_table(
    table: &str,
    df: &DataFrame,
    warehouse_dir: &Path,
    db: Option<&DbClient>,
) -> Result<()> {
    let path = write_csv_artifact(df, warehouse_dir, table)?;
    tracing::info!(table, rows = df.height(), path = %path.display(), "wrote CSV artifact");

    if let Some(client) = db {
        client.replace_table(table, df).await?;
        tracing::info!(table, rows = df.height(), "replaced database table");
    }

    Ok(())
}

fn quote_identifier(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn sql_type(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => "BIGINT",
        DataType::Float32 | DataType::Float64 => "DOUBLE PRECISION",
        DataType::Boolean => "BOOLEAN",
        DataType::Date => "DATE",
        DataType::Datetime(_, _) => "TIMESTAMPTZ",
        _ => "TEXT",
    }
}
