//! # rowdiff
//!
//! A row-level diff tool for SQLite table snapshots: loads the same table
//! from two database files, pairs rows across the snapshots by logical key
//! with nearest-neighbor matching, and reports inserts, deletes, and
//! updates.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod differ;
pub mod error;
pub mod matcher;
pub mod output;
pub mod progress;
pub mod row;
pub mod snapshot;
pub mod sql;
pub mod value;

pub use config::{AsymmetryPolicy, DiffConfig, TableSpec, DEFAULT_MAX_DIST};
pub use db::Database;
pub use differ::{Delta, DiffReport, Differ, Diagnostic};
pub use error::{Result, RowdiffError};
pub use matcher::{MatchOutcome, Matcher};
pub use row::Row;
pub use snapshot::Snapshot;
pub use value::Value;
