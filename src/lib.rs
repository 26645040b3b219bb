//! # starmart - Star-Schema Warehouse Builder
//!
//! starmart rebuilds a dimensional model from cleaned, staging-level
//! retail datasets: six conformed dimension tables (date, region,
//! product, customer, store, staff) and one fact table at order-item
//! grain, each published as a CSV artifact and a PostgreSQL table.
//!
//! ## Quick Start
//!
//! ```no_run
//! use starmart::warehouse::{self, BuildSpec, StagingInputs};
//!
//! # fn example(inputs: StagingInputs) -> anyhow::Result<()> {
//! let spec = BuildSpec::new("nightly_rebuild");
//! let built = warehouse::build_warehouse(&inputs, &spec)?;
//!
//! for report in &built.reports {
//!     println!("{}", report.summary());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`warehouse`]: the modeling engine: dimension builders, the fact
//!   assembler and the rebuild orchestrator
//! - [`publish`]: CSV artifact and PostgreSQL table replacement
//! - [`io`]: staging dataset loading
//! - [`logging`]: console and rolling-file log setup
//!
//! ## Key Concepts
//!
//! Every run is a full truncate-and-reload: dimensions are rebuilt from
//! scratch, surrogate keys are reassigned, and published tables are fully
//! replaced. Builders are pure functions from their inputs to a frame;
//! nothing reads state it wasn't explicitly given, which keeps the
//! dependency order (date and region first, entity dimensions next, fact
//! last) visible in one place.
//!
//! Lazy evaluation does the heavy lifting: each builder assembles a
//! Polars query plan and collects it once, so joins and projections are
//! optimized together.

pub mod io;
pub mod logging;
pub mod publish;
pub mod warehouse;
