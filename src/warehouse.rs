//! The dimensional modeling engine.
//!
//! Builds a star schema from cleaned staging datasets in dependency order:
//! the date and region dimensions first (they depend on nothing else),
//! then the entity dimensions (customer and store bind to region), and
//! the fact table last, with every dimension passed to it explicitly.
//! Builders are pure functions over the inputs they are handed; nothing
//! reads ambient state, and every run is a full truncate-and-reload.

pub mod customer;
pub mod dates;
pub mod fact;
pub mod keys;
pub mod product;
pub mod region;
pub mod report;
pub mod schema;
pub mod spec;
pub mod staff;
pub mod store;

use anyhow::Result;
use polars::prelude::DataFrame;
use std::time::Instant;

pub use fact::{FactDimension, FactInputs, JoinPolicy};
pub use report::BuildReport;
pub use spec::BuildSpec;

/// The eight staging datasets a rebuild consumes.
pub struct StagingInputs {
    pub orders: DataFrame,
    pub order_items: DataFrame,
    pub products: DataFrame,
    pub categories: DataFrame,
    pub brands: DataFrame,
    pub customers: DataFrame,
    pub stores: DataFrame,
    pub staff: DataFrame,
}

impl StagingInputs {
    /// Look up a dataset by its spec name.
    pub fn dataset(&self, name: &str) -> Option<&DataFrame> {
        match name {
            "orders" => Some(&self.orders),
            "order_items" => Some(&self.order_items),
            "products" => Some(&self.products),
            "categories" => Some(&self.categories),
            "brands" => Some(&self.brands),
            "customers" => Some(&self.customers),
            "stores" => Some(&self.stores),
            "staff" => Some(&self.staff),
            _ => None,
        }
    }
}

/// A fully rebuilt star schema.
#[derive(Debug)]
pub struct Warehouse {
    pub dim_date: DataFrame,
    pub dim_region: DataFrame,
    pub dim_product: DataFrame,
    pub dim_customer: DataFrame,
    pub dim_store: DataFrame,
    pub dim_staff: DataFrame,
    pub fact_sales: DataFrame,

    /// Row-count accounting per table, in build order
    pub reports: Vec<BuildReport>,
}

impl Warehouse {
    /// Tables in publish order, dimensions before the fact table.
    pub fn tables(&self) -> impl Iterator<Item = (&'static str, &DataFrame)> {
        [
            ("dim_date", &self.dim_date),
            ("dim_region", &self.dim_region),
            ("dim_product", &self.dim_product),
            ("dim_customer", &self.dim_customer),
            ("dim_store", &self.dim_store),
            ("dim_staff", &self.dim_staff),
            ("fact_sales", &self.fact_sales),
        ]
        .into_iter()
    }
}

/// Rebuild the whole star schema.
///
/// Dependency order is fixed: dim_date and dim_region build first, the
/// entity dimensions next, fact_sales last. Every input contract is
/// checked up front so one failed run reports every missing column.
pub fn build_warehouse(inputs: &StagingInputs, build_spec: &BuildSpec) -> Result<Warehouse> {
    schema::validate_staging(inputs)?;

    let mut sources = Vec::new();
    for source in &build_spec.date_sources {
        let frame = inputs.dataset(&source.dataset).ok_or_else(|| {
            anyhow::anyhow!("Unknown dataset '{}' in date_sources", source.dataset)
        })?;
        sources.push(dates::DateSource {
            name: &source.dataset,
            frame,
            columns: source.columns.clone(),
        });
    }
    let date_rows: usize = sources.iter().map(|s| s.frame.height()).sum();

    let mut reports = Vec::new();
    let mut record = |table: &str, rows_in: usize, frame: &DataFrame, started: Instant| {
        let report = BuildReport::new(table, rows_in, frame.height(), started.elapsed());
        tracing::info!(
            table = %report.table,
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            "built table"
        );
        reports.push(report);
    };

    let started = Instant::now();
    let dim_date = dates::build_dim_date(&sources)?;
    record("dim_date", date_rows, &dim_date, started);

    let started = Instant::now();
    let dim_region = region::build_dim_region(&inputs.customers, &inputs.stores)?;
    record(
        "dim_region",
        inputs.customers.height() + inputs.stores.height(),
        &dim_region,
        started,
    );

    let started = Instant::now();
    let dim_product =
        product::build_dim_product(&inputs.products, &inputs.categories, &inputs.brands)?;
    record("dim_product", inputs.products.height(), &dim_product, started);

    let started = Instant::now();
    let dim_customer = customer::build_dim_customer(&inputs.customers, &dim_region)?;
    record("dim_customer", inputs.customers.height(), &dim_customer, started);

    let started = Instant::now();
    let dim_store = store::build_dim_store(&inputs.stores, &dim_region)?;
    record("dim_store", inputs.stores.height(), &dim_store, started);

    let started = Instant::now();
    let dim_staff = staff::build_dim_staff(&inputs.staff)?;
    record("dim_staff", inputs.staff.height(), &dim_staff, started);

    let started = Instant::now();
    let fact_sales = fact::build_fact_sales(
        &FactInputs {
            orders: &inputs.orders,
            order_items: &inputs.order_items,
            dim_date: &dim_date,
            dim_product: &dim_product,
            dim_customer: &dim_customer,
            dim_store: &dim_store,
            dim_staff: &dim_staff,
        },
        &build_spec.policy,
    )?;
    record("fact_sales", inputs.order_items.height(), &fact_sales, started);

    Ok(Warehouse {
        dim_date,
        dim_region,
        dim_product,
        dim_customer,
        dim_store,
        dim_staff,
        fact_sales,
        reports,
    })
}
