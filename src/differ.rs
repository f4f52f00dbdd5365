//! Delta generation: pairing two snapshots into inserts, deletes, updates

use crate::config::{AsymmetryPolicy, DiffConfig};
use crate::error::{Result, RowdiffError};
use crate::matcher::{MatchOutcome, Matcher};
use crate::progress::ProgressReporter;
use crate::row::Row;
use crate::snapshot::Snapshot;
use serde::Serialize;
use std::fmt;

/// One reported difference. A delta always carries complete row snapshots,
/// never partial diffs, so rendering can show the full old/new record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Delta {
    /// Row exists in snapshot 2 only
    Insert { row: Row },
    /// Row exists in snapshot 1 only
    Delete { row: Row },
    /// Nearest counterpart differs in at least one column
    Update { old_row: Row, new_row: Row },
}

/// Non-fatal structural warning raised while matching. Diagnostics travel
/// separately from the delta sequence and never interrupt a run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Multiple differing candidates tied at the minimum distance; the
    /// first one encountered was used
    AmbiguousMatch { needle: Row, candidates: Vec<Row> },
    /// Pedantic only: the tied candidates were mutually identical copies
    DuplicateCandidates { needle: Row, count: usize },
    /// Pedantic only: the reverse nearest-neighbor search did not
    /// reproduce the original row
    AsymmetricMatch {
        row: Row,
        nearest: Row,
        reverse: Option<Row>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::AmbiguousMatch { needle, candidates } => {
                write!(
                    f,
                    "ambiguous match: ({}) has {} candidates at equal distance; using the first",
                    needle,
                    candidates.len()
                )
            }
            Diagnostic::DuplicateCandidates { needle, count } => {
                write!(
                    f,
                    "duplicate candidates: ({}) matched {} identical rows",
                    needle, count
                )
            }
            Diagnostic::AsymmetricMatch { row, nearest, reverse } => {
                write!(f, "asymmetric match: ({}) -> ({}) <- ", row, nearest)?;
                match reverse {
                    Some(r) => write!(f, "({})", r),
                    None => write!(f, "nothing"),
                }
            }
        }
    }
}

/// Outcome of one comparison: the delta sequence plus any diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    pub deltas: Vec<Delta>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DiffReport {
    pub fn has_changes(&self) -> bool {
        !self.deltas.is_empty()
    }

    pub fn insert_count(&self) -> usize {
        self.deltas
            .iter()
            .filter(|d| matches!(d, Delta::Insert { .. }))
            .count()
    }

    pub fn delete_count(&self) -> usize {
        self.deltas
            .iter()
            .filter(|d| matches!(d, Delta::Delete { .. }))
            .count()
    }

    pub fn update_count(&self) -> usize {
        self.deltas
            .iter()
            .filter(|d| matches!(d, Delta::Update { .. }))
            .count()
    }
}

/// Pairs every row of snapshot 1 with at most one row of snapshot 2 and
/// emits the resulting delta sequence.
#[derive(Debug)]
pub struct Differ {
    config: DiffConfig,
}

impl Differ {
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    pub fn compare(&self, snap1: &Snapshot, snap2: &Snapshot) -> Result<DiffReport> {
        self.compare_with_progress(snap1, snap2, &mut ProgressReporter::new_minimal())
    }

    /// Compare two snapshots of the same projection.
    ///
    /// Each snapshot-1 row is matched against the *remaining unmatched*
    /// rows of its ident group in snapshot 2, and the matched instance is
    /// consumed immediately. A snapshot-2 row can therefore be paired at
    /// most once and every row lands in exactly one outcome.
    pub fn compare_with_progress(
        &self,
        snap1: &Snapshot,
        snap2: &Snapshot,
        progress: &mut ProgressReporter,
    ) -> Result<DiffReport> {
        let matcher = Matcher::new(&self.config);
        let mut deltas = Vec::new();
        let mut diagnostics = Vec::new();
        let mut unmatched = snap2.groups().clone();

        let mut processed: u64 = 0;
        for r1 in snap1.iter_rows() {
            processed += 1;
            progress.update_rows(processed);

            let empty: &[Row] = &[];
            let group = unmatched
                .get(r1.ident.as_str())
                .map(|rows| rows.as_slice())
                .unwrap_or(empty);

            let (index, nearest) = match matcher.find_nearest_in(r1, group) {
                MatchOutcome::NoMatch => {
                    deltas.push(Delta::Delete { row: r1.clone() });
                    continue;
                }
                MatchOutcome::Unique { index, row } => (index, row.clone()),
                MatchOutcome::Ambiguous {
                    index,
                    row,
                    candidates,
                    identical,
                } => {
                    if !identical {
                        diagnostics.push(Diagnostic::AmbiguousMatch {
                            needle: r1.clone(),
                            candidates: candidates.into_iter().cloned().collect(),
                        });
                    } else if self.config.pedantic {
                        diagnostics.push(Diagnostic::DuplicateCandidates {
                            needle: r1.clone(),
                            count: candidates.len(),
                        });
                    }
                    (index, row.clone())
                }
            };

            if self.config.pedantic {
                self.check_symmetry(&matcher, r1, &nearest, snap1, &mut diagnostics)?;
            }

            // Consume exactly the matched instance
            if let Some(rows) = unmatched.get_mut(r1.ident.as_str()) {
                rows.remove(index);
            }

            if nearest != *r1 {
                deltas.push(Delta::Update {
                    old_row: r1.clone(),
                    new_row: nearest,
                });
            }
        }

        // Everything still unmatched in snapshot 2 is an insertion
        for rows in unmatched.into_values() {
            for row in rows {
                deltas.push(Delta::Insert { row });
            }
        }

        Ok(DiffReport {
            deltas,
            diagnostics,
        })
    }

    /// Reverse nearest-neighbor check: the chosen counterpart, searched
    /// back against the full snapshot 1, should land on the original row.
    /// Failure signals structurally ambiguous data, not a programming
    /// error, and is fatal only under [`AsymmetryPolicy::Fatal`].
    fn check_symmetry(
        &self,
        matcher: &Matcher<'_>,
        r1: &Row,
        nearest: &Row,
        snap1: &Snapshot,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<()> {
        let reverse = matcher.find_nearest(nearest, snap1);
        let reverse_row = reverse.chosen();
        if reverse_row.map_or(true, |r| r != r1) {
            let diag = Diagnostic::AsymmetricMatch {
                row: r1.clone(),
                nearest: nearest.clone(),
                reverse: reverse_row.cloned(),
            };
            if self.config.asymmetry == AsymmetryPolicy::Fatal {
                return Err(RowdiffError::asymmetric(diag.to_string()));
            }
            diagnostics.push(diag);
        }
        Ok(())
    }
}
