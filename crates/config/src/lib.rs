//! `regsheet-config` — YAML report configuration.
//!
//! Loads the connection context, the ordered worksheet list, and the
//! optional cover-sheet section. Connection credentials can be overridden
//! by `REGSHEET_*` environment variables (preferred over config values).

pub mod error;
pub mod period;
pub mod report;

pub use error::ConfigError;
pub use period::ReportingPeriod;
pub use report::{
    Authenticator, ConnectionConfig, FormattingConfig, ReportConfig, SummarySheetConfig,
    WorksheetEntry,
};
