//! Rows: ordered value sequences keyed by a logical ident

use crate::value::Value;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Distance reported when two rows have different idents. Larger than any
/// realistic column count, so naive all-pairs loops never match across keys.
pub const IDENT_MISMATCH_DISTANCE: usize = usize::MAX - 1;

/// Distance reported when a strict column differs. Overrides the ordinary
/// count entirely: such rows are not comparable at any threshold.
pub const STRICT_MISMATCH_DISTANCE: usize = usize::MAX;

/// One row of a table snapshot.
///
/// All rows compared against each other come from the same column
/// projection, so their value sequences share length and ordering by
/// construction. Column names are carried only to apply the strict-column
/// policy and are shared across the whole snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub ident: String,
    pub values: Vec<Value>,
    #[serde(skip)]
    pub columns: Option<Arc<[String]>>,
}

impl Row {
    pub fn new(ident: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            ident: ident.into(),
            values,
            columns: None,
        }
    }

    pub fn with_columns(
        ident: impl Into<String>,
        values: Vec<Value>,
        columns: Arc<[String]>,
    ) -> Self {
        Self {
            ident: ident.into(),
            values,
            columns: Some(columns),
        }
    }

    /// Count of differing column positions between two same-keyed rows.
    ///
    /// Returns [`IDENT_MISMATCH_DISTANCE`] when the idents differ and
    /// [`STRICT_MISMATCH_DISTANCE`] as soon as a strict column mismatches.
    pub fn distance(&self, other: &Row, strict_cols: &HashSet<String>) -> usize {
        if self.ident != other.ident {
            return IDENT_MISMATCH_DISTANCE;
        }
        debug_assert_eq!(self.values.len(), other.values.len());

        let mut count = 0;
        for (i, (a, b)) in self.values.iter().zip(&other.values).enumerate() {
            if a != b {
                if self.is_strict_column(i, strict_cols) {
                    return STRICT_MISMATCH_DISTANCE;
                }
                count += 1;
            }
        }
        count
    }

    /// Like [`Row::distance`] but stops counting once the running count
    /// exceeds `max_dist`, returning `max_dist + 1`. Exact for any caller
    /// that only needs to know whether the distance is within `max_dist`.
    pub fn distance_clipped(
        &self,
        other: &Row,
        max_dist: usize,
        strict_cols: &HashSet<String>,
    ) -> usize {
        if self.ident != other.ident {
            return IDENT_MISMATCH_DISTANCE;
        }
        debug_assert_eq!(self.values.len(), other.values.len());

        let clip = max_dist.saturating_add(1);
        let mut count = 0;
        for (i, (a, b)) in self.values.iter().zip(&other.values).enumerate() {
            if a != b {
                if self.is_strict_column(i, strict_cols) {
                    return STRICT_MISMATCH_DISTANCE;
                }
                count += 1;
                if count >= clip {
                    return clip;
                }
            }
        }
        count
    }

    fn is_strict_column(&self, index: usize, strict_cols: &HashSet<String>) -> bool {
        if strict_cols.is_empty() {
            return false;
        }
        match &self.columns {
            Some(cols) => strict_cols.contains(&cols[index]),
            None => false,
        }
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.ident == other.ident && self.values == other.values
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.ident)?;
        for v in &self.values {
            write!(f, ", {}", v)?;
        }
        Ok(())
    }
}
