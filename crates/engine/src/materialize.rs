//! Row materializer: runs a resolved query through the executor
//! collaborator and validates the shape of what comes back.

use crate::error::EngineError;
use crate::model::RowSet;
use crate::query;

/// Query execution collaborator. Implementations own connection state;
/// the engine only ever sees column names and row tuples. Returned column
/// names are authoritative — downstream matching keys off them, never off
/// the labels the caller requested.
pub trait QueryExecutor {
    fn execute(&mut self, query: &str) -> Result<RowSet, String>;
}

/// Execute `query_text` and check row alignment. A worksheet must never
/// look complete while carrying rows of the wrong width.
pub fn materialize(
    executor: &mut dyn QueryExecutor,
    query_text: &str,
    worksheet: &str,
) -> Result<RowSet, EngineError> {
    let rows = executor
        .execute(query_text)
        .map_err(|message| EngineError::Execution {
            worksheet: worksheet.to_string(),
            message,
            query_preview: query::preview(query_text),
        })?;

    let width = rows.columns.len();
    for (i, row) in rows.rows.iter().enumerate() {
        if row.len() != width {
            return Err(EngineError::Execution {
                worksheet: worksheet.to_string(),
                message: format!(
                    "row {} has {} values, expected {} (misaligned result set)",
                    i + 1,
                    row.len(),
                    width
                ),
                query_preview: query::preview(query_text),
            });
        }
    }

    Ok(rows)
}
