// Report IO - query executors and the XLSX sink

pub mod sqlite;
pub mod xlsx;

pub use sqlite::SqliteExecutor;
pub use xlsx::{write_workbook, CoverRow, CoverSheet, RenderSheet, SheetFormatting};
