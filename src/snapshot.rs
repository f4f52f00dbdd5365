//! Table snapshots: rows partitioned by logical key

use crate::row::Row;
use indexmap::IndexMap;
use std::sync::Arc;

/// One table image, grouped by ident.
///
/// Groups preserve insertion order, and rows inside a group preserve read
/// order. That ordering is what makes tie-breaking in the matcher
/// reproducible, so the grouping map must never be an unordered collection.
#[derive(Debug, Clone)]
pub struct Snapshot {
    columns: Arc<[String]>,
    groups: IndexMap<String, Vec<Row>>,
    row_count: usize,
}

impl Snapshot {
    pub fn new(columns: Arc<[String]>) -> Self {
        Self {
            columns,
            groups: IndexMap::new(),
            row_count: 0,
        }
    }

    pub fn from_rows(columns: Arc<[String]>, rows: Vec<Row>) -> Self {
        let mut snapshot = Self::new(columns);
        for row in rows {
            snapshot.push(row);
        }
        snapshot
    }

    pub fn push(&mut self, row: Row) {
        self.groups.entry(row.ident.clone()).or_default().push(row);
        self.row_count += 1;
    }

    /// Candidate rows sharing `ident`, in read order
    pub fn group(&self, ident: &str) -> Option<&[Row]> {
        self.groups.get(ident).map(|rows| rows.as_slice())
    }

    /// All rows, iterated group by group in insertion order
    pub fn iter_rows(&self) -> impl Iterator<Item = &Row> {
        self.groups.values().flatten()
    }

    pub fn iter_groups(&self) -> impl Iterator<Item = (&str, &[Row])> {
        self.groups
            .iter()
            .map(|(ident, rows)| (ident.as_str(), rows.as_slice()))
    }

    pub(crate) fn groups(&self) -> &IndexMap<String, Vec<Row>> {
        &self.groups
    }

    /// Names of the compared (non-key) columns, in projection order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn shared_columns(&self) -> Arc<[String]> {
        self.columns.clone()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}
