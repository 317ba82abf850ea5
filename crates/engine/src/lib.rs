//! `regsheet-engine` — Worksheet synthesis engine.
//!
//! Pure engine crate: resolves a worksheet's query from its template,
//! aggregates materialized rows into summary tables, and lays the blocks
//! out into column ranges. No CLI or IO dependencies; query execution
//! enters through the [`materialize::QueryExecutor`] trait.

pub mod error;
pub mod layout;
pub mod materialize;
pub mod model;
pub mod query;
pub mod report;
pub mod summary;
pub mod template;

pub use error::EngineError;
pub use materialize::QueryExecutor;
pub use model::{RowSet, RunContext, SummaryTable, WorksheetSpec};
pub use report::{synthesize, synthesize_all, WorksheetOutcome, WorksheetReport};
