//! SQLite data source: reads one table into a keyed snapshot

use crate::config::TableSpec;
use crate::error::{Result, RowdiffError};
use crate::row::Row;
use crate::snapshot::Snapshot;
use crate::sql;
use crate::value::Value;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Read-only handle on one database file
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self { conn })
    }

    /// All column names of a table, in schema order
    fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(&sql::table_info(table))?;
        let mut rows = stmt.query([])?;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            names.push(row.get::<_, String>(1)?);
        }
        if names.is_empty() {
            return Err(RowdiffError::TableNotFound {
                name: table.to_string(),
            });
        }
        Ok(names)
    }

    /// Names of all user tables in the database
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(sql::LIST_TABLES)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// The compared columns for a projection: everything except the ident
    /// (or foreign key) and the excluded set, in schema order.
    pub fn projected_columns(
        &self,
        spec: &TableSpec,
        exclude: &HashSet<String>,
    ) -> Result<Vec<String>> {
        let all = self.table_columns(spec.table())?;
        let dropped = match spec {
            TableSpec::Plain { ident_column, .. } => {
                if !all.iter().any(|c| c == ident_column) {
                    return Err(RowdiffError::config(format!(
                        "table '{}' has no ident column '{}'",
                        spec.table(),
                        ident_column
                    )));
                }
                ident_column
            }
            TableSpec::Joined { foreign_key, .. } => {
                if !all.iter().any(|c| c == foreign_key) {
                    return Err(RowdiffError::config(format!(
                        "table '{}' has no foreign-key column '{}'",
                        spec.table(),
                        foreign_key
                    )));
                }
                foreign_key
            }
        };

        let columns: Vec<String> = all
            .into_iter()
            .filter(|c| c != dropped && !exclude.contains(c))
            .collect();
        if columns.is_empty() {
            return Err(RowdiffError::config(format!(
                "no columns left to compare in table '{}' after exclusions",
                spec.table()
            )));
        }
        Ok(columns)
    }

    /// Read one table image, partitioned by the configured logical key.
    ///
    /// Row order follows the statement's natural order, which is stable
    /// for a given file, so repeated runs see identical candidate lists.
    pub fn read_snapshot(&self, spec: &TableSpec, exclude: &HashSet<String>) -> Result<Snapshot> {
        let columns = self.projected_columns(spec, exclude)?;
        let query = sql::select_snapshot(spec, &columns);
        log::debug!("snapshot query: {}", query);

        let shared: Arc<[String]> = columns.clone().into();
        let mut snapshot = Snapshot::new(shared.clone());

        let mut stmt = self.conn.prepare(&query)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let ident = ident_from_sql(row.get_ref(0)?)?;
            let mut values = Vec::with_capacity(columns.len());
            for (i, name) in columns.iter().enumerate() {
                values.push(value_from_sql(row.get_ref(i + 1)?, name)?);
            }
            snapshot.push(Row::with_columns(ident, values, shared.clone()));
        }

        log::debug!(
            "read {} rows in {} key groups from '{}'",
            snapshot.row_count(),
            snapshot.group_count(),
            spec.table()
        );
        Ok(snapshot)
    }
}

/// Convert the leading key column to the ident string
fn ident_from_sql(value: ValueRef<'_>) -> Result<String> {
    match value {
        ValueRef::Integer(i) => Ok(i.to_string()),
        ValueRef::Real(f) => Ok(f.to_string()),
        ValueRef::Text(bytes) => Ok(std::str::from_utf8(bytes)
            .map_err(|e| RowdiffError::data_shape(format!("non-UTF-8 ident: {}", e)))?
            .to_string()),
        ValueRef::Null => Err(RowdiffError::data_shape("NULL in the ident column")),
        ValueRef::Blob(_) => Err(RowdiffError::data_shape("BLOB in the ident column")),
    }
}

/// Map one SQLite storage class onto a Value. Unrecognized kinds are a
/// fatal data-shape error, never silently coerced.
fn value_from_sql(value: ValueRef<'_>, column: &str) -> Result<Value> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(i) => Ok(Value::Integer(i)),
        ValueRef::Real(f) => Ok(Value::Float(f)),
        ValueRef::Text(bytes) => Ok(Value::Text(
            std::str::from_utf8(bytes)
                .map_err(|e| {
                    RowdiffError::data_shape(format!("non-UTF-8 text in column '{}': {}", column, e))
                })?
                .to_string(),
        )),
        ValueRef::Blob(_) => Err(RowdiffError::data_shape(format!(
            "unsupported BLOB value in column '{}'",
            column
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ident_from_sql_kinds() {
        assert_eq!(ident_from_sql(ValueRef::Integer(7)).unwrap(), "7");
        assert_eq!(ident_from_sql(ValueRef::Text(b"S008")).unwrap(), "S008");
        assert!(ident_from_sql(ValueRef::Null).is_err());
    }

    #[test]
    fn test_value_from_sql_kinds() {
        assert_eq!(value_from_sql(ValueRef::Null, "c").unwrap(), Value::Null);
        assert_eq!(
            value_from_sql(ValueRef::Integer(1), "c").unwrap(),
            Value::Integer(1)
        );
        assert_eq!(
            value_from_sql(ValueRef::Real(0.5), "c").unwrap(),
            Value::Float(0.5)
        );
        assert_eq!(
            value_from_sql(ValueRef::Text(b"x"), "c").unwrap(),
            Value::Text("x".into())
        );
        let err = value_from_sql(ValueRef::Blob(&[1, 2]), "payload").unwrap_err();
        assert!(matches!(err, RowdiffError::DataShape { .. }));
    }
}
