//! SQL text construction for snapshot projections

use crate::config::TableSpec;

/// Quote an identifier for SQLite, doubling embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// PRAGMA statement listing a table's columns
pub fn table_info(table: &str) -> String {
    format!("PRAGMA table_info({})", quote_ident(table))
}

/// Statement listing all user tables in a database
pub const LIST_TABLES: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

/// SELECT projecting the ident column first, then the compared columns.
///
/// For a joined spec the ident is pulled from the parent table through the
/// foreign key; the child's own columns keep their order.
pub fn select_snapshot(spec: &TableSpec, columns: &[String]) -> String {
    match spec {
        TableSpec::Plain {
            table,
            ident_column,
        } => {
            let cols: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
            format!(
                "SELECT {}, {} FROM {}",
                quote_ident(ident_column),
                cols.join(", "),
                quote_ident(table)
            )
        }
        TableSpec::Joined {
            table,
            foreign_key,
            parent_table,
            parent_key,
            parent_ident,
        } => {
            let cols: Vec<String> = columns
                .iter()
                .map(|c| format!("c.{}", quote_ident(c)))
                .collect();
            format!(
                "SELECT p.{}, {} FROM {} AS c JOIN {} AS p ON c.{} = p.{}",
                quote_ident(parent_ident),
                cols.join(", "),
                quote_ident(table),
                quote_ident(parent_table),
                quote_ident(foreign_key),
                quote_ident(parent_key)
            )
        }
    }
}
