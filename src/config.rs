//! Comparison settings and the table-name to key-column registry

use crate::error::{Result, RowdiffError};
use std::collections::HashSet;

/// Default maximum distance for a nearest-neighbor match
pub const DEFAULT_MAX_DIST: usize = 3;

/// What to do when the reverse nearest-neighbor check fails in pedantic mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AsymmetryPolicy {
    /// Report a diagnostic and keep going (the default)
    #[default]
    Warn,
    /// Abort the comparison
    Fatal,
}

/// Immutable settings for one comparison run.
///
/// Built once before any snapshot is read and threaded into the matcher and
/// differ at construction time; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Maximum column distance for two rows to count as the same record
    pub max_dist: usize,
    /// Enable the reverse-match consistency check and duplicate-tie reporting
    pub pedantic: bool,
    /// Columns dropped from the projection before any comparison
    pub exclude_columns: HashSet<String>,
    /// Columns that must match exactly for rows to be comparable at all
    pub strict_columns: HashSet<String>,
    pub asymmetry: AsymmetryPolicy,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_dist: DEFAULT_MAX_DIST,
            pedantic: false,
            exclude_columns: ["id".to_string()].into_iter().collect(),
            strict_columns: HashSet::new(),
            asymmetry: AsymmetryPolicy::Warn,
        }
    }
}

impl DiffConfig {
    /// Reject contradictory settings before anything is read
    pub fn validate(&self) -> Result<()> {
        let mut overlap: Vec<&str> = self
            .strict_columns
            .intersection(&self.exclude_columns)
            .map(|s| s.as_str())
            .collect();
        if !overlap.is_empty() {
            overlap.sort_unstable();
            return Err(RowdiffError::config(format!(
                "columns cannot be both strict and excluded: {}",
                overlap.join(", ")
            )));
        }
        Ok(())
    }
}

/// How one table is projected into a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSpec {
    /// Plain select with the ident column leading the projection
    Plain { table: String, ident_column: String },
    /// Child table without a key column of its own; the ident is pulled
    /// from the parent through a foreign-key join
    Joined {
        table: String,
        foreign_key: String,
        parent_table: String,
        parent_key: String,
        parent_ident: String,
    },
}

/// Key columns for the known PDG tables. The logical key differs by table:
/// most data tables are keyed by pdgid, the particle/item tables by name.
const IDENT_COLUMNS: &[(&str, &str)] = &[
    ("pdgid", "pdgid"),
    ("pdgdata", "pdgid"),
    ("pdgdoc", "pdgid"),
    ("pdgmeasurement", "pdgid"),
    ("pdgparticle", "name"),
    ("pdgitem", "name"),
    ("pdginfo", "name"),
];

impl TableSpec {
    /// Resolve a table name against the registry. An `--ident-col` override
    /// makes tables outside the registry usable; without one, an unknown
    /// table is a fatal configuration error.
    pub fn resolve(table: &str, ident_override: Option<&str>) -> Result<Self> {
        if let Some(ident) = ident_override {
            return Ok(Self::Plain {
                table: table.to_string(),
                ident_column: ident.to_string(),
            });
        }

        // pdgmeasurement_values rows carry no pdgid of their own
        if table == "pdgmeasurement_values" {
            return Ok(Self::Joined {
                table: table.to_string(),
                foreign_key: "pdgmeasurement_id".to_string(),
                parent_table: "pdgmeasurement".to_string(),
                parent_key: "id".to_string(),
                parent_ident: "pdgid".to_string(),
            });
        }

        IDENT_COLUMNS
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, ident)| Self::Plain {
                table: table.to_string(),
                ident_column: ident.to_string(),
            })
            .ok_or_else(|| RowdiffError::UnknownTable {
                name: table.to_string(),
            })
    }

    pub fn table(&self) -> &str {
        match self {
            Self::Plain { table, .. } => table,
            Self::Joined { table, .. } => table,
        }
    }

    /// Human-readable description of where the ident comes from
    pub fn ident_description(&self) -> String {
        match self {
            Self::Plain { ident_column, .. } => ident_column.clone(),
            Self::Joined {
                parent_table,
                parent_ident,
                ..
            } => format!("{} via {}", parent_ident, parent_table),
        }
    }
}
