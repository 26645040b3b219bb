//! Per-table build reports.
//!
//! Inner joins drop rows silently, so every build accounts for its input
//! and output row counts. The reports make that loss observable to the
//! calling context.

use std::time::Duration;

/// Row-count accounting for one built table.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Output table name (e.g. `dim_region`, `fact_sales`)
    pub table: String,

    /// Rows in the table's primary input
    pub rows_in: usize,

    /// Rows in the built table
    pub rows_out: usize,

    /// Time taken to build
    pub duration: Duration,
}

impl BuildReport {
    pub fn new(
        table: impl Into<String>,
        rows_in: usize,
        rows_out: usize,
        duration: Duration,
    ) -> Self {
        Self {
            table: table.into(),
            rows_in,
            rows_out,
            duration,
        }
    }

    /// Rows lost between input and output. Dimension builders lose rows to
    /// deduplication; the fact builder loses them to required joins.
    pub fn rows_dropped(&self) -> usize {
        self.rows_in.saturating_sub(self.rows_out)
    }

    /// Create a summary message
    pub fn summary(&self) -> String {
        format!(
            "{}: {} rows in, {} rows out ({} dropped), {:.2}s",
            self.table,
            self.rows_in,
            self.rows_out,
            self.rows_dropped(),
            self.duration.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_row_loss() {
        let report = BuildReport::new("fact_sales", 10, 7, Duration::from_millis(1500));
        assert_eq!(report.rows_dropped(), 3);
        assert_eq!(
            report.summary(),
            "fact_sales: 10 rows in, 7 rows out (3 dropped), 1.50s"
        );
    }

    #[test]
    fn growth_reports_zero_dropped() {
        let report = BuildReport::new("dim_date", 4, 9, Duration::from_secs(0));
        assert_eq!(report.rows_dropped(), 0);
    }
}
