// SQLite-backed query executor, used for local warehouse extracts and tests.
// The engine only ever sees the QueryExecutor trait.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::Connection;

use regsheet_core::Value;
use regsheet_engine::{QueryExecutor, RowSet};

pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    pub fn open(path: &Path) -> Result<Self, String> {
        let conn = Connection::open(path)
            .map_err(|e| format!("cannot open database {}: {e}", path.display()))?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, String> {
        let conn = Connection::open_in_memory().map_err(|e| e.to_string())?;
        Ok(Self { conn })
    }

    /// Direct access for test fixtures and setup scripts.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl QueryExecutor for SqliteExecutor {
    fn execute(&mut self, query: &str) -> Result<RowSet, String> {
        let mut stmt = self
            .conn
            .prepare(query)
            .map_err(|e| format!("prepare failed: {e}"))?;

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = columns.len();

        let mut out = Vec::new();
        let mut rows = stmt.query([]).map_err(|e| format!("query failed: {e}"))?;
        while let Some(row) = rows.next().map_err(|e| format!("fetch failed: {e}"))? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                let v = row
                    .get_ref(i)
                    .map_err(|e| format!("column {i} read failed: {e}"))?;
                values.push(match v {
                    ValueRef::Null => Value::Null,
                    ValueRef::Integer(n) => Value::Number(n as f64),
                    ValueRef::Real(f) => Value::Number(f),
                    ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
                    // Blobs have no place in a report; treat as null.
                    ValueRef::Blob(_) => Value::Null,
                });
            }
            out.push(values);
        }

        Ok(RowSet::new(columns, out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SqliteExecutor {
        let ex = SqliteExecutor::open_in_memory().unwrap();
        ex.connection()
            .execute_batch(
                "CREATE TABLE claims (
                    Policy_Num TEXT, Issue_State TEXT, Resident_State TEXT,
                    TAT_in_Days, Schedule_ID TEXT
                 );
                 INSERT INTO claims VALUES
                    ('P1', 'TX', 'TX', 12,    '2-003'),
                    ('P2', 'CA', 'TX', '45',  '2-003'),
                    ('P3', NULL, 'CA', NULL,  '2-003'),
                    ('P4', 'NY', 'NY', 91.5,  '9-999');",
            )
            .unwrap();
        ex
    }

    #[test]
    fn columns_come_from_the_statement() {
        let mut ex = seeded();
        let rows = ex
            .execute("SELECT Policy_Num AS policy, Issue_State FROM claims WHERE Schedule_ID = '2-003'")
            .unwrap();
        assert_eq!(rows.columns, vec!["policy", "Issue_State"]);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn value_types_map_across() {
        let mut ex = seeded();
        let rows = ex
            .execute("SELECT TAT_in_Days FROM claims ORDER BY Policy_Num")
            .unwrap();
        assert_eq!(rows.rows[0][0], Value::Number(12.0));
        assert_eq!(rows.rows[1][0], Value::Text("45".into()));
        assert_eq!(rows.rows[2][0], Value::Null);
        assert_eq!(rows.rows[3][0], Value::Number(91.5));
    }

    #[test]
    fn bad_sql_is_an_error_string() {
        let mut ex = seeded();
        let err = ex.execute("SELECT nope FROM missing").unwrap_err();
        assert!(err.contains("prepare failed"));
    }
}
