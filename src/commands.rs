//! Command implementations for the rowdiff CLI

use crate::cli::{Commands, OutputFormat};
use crate::config::{AsymmetryPolicy, DiffConfig, TableSpec};
use crate::db::Database;
use crate::differ::Differ;
use crate::error::{Result, RowdiffError};
use crate::matcher;
use crate::output::{JsonFormatter, PrettyPrinter};
use crate::progress::ProgressReporter;
use std::collections::HashSet;
use std::path::Path;

/// Execute a parsed command
pub fn execute_command(command: Commands, color: bool) -> Result<()> {
    match command {
        Commands::Diff {
            db1,
            db2,
            table,
            max_dist,
            pedantic,
            exclude_cols,
            strict_cols,
            ident_col,
            strict_asymmetry,
            format,
            output,
        } => diff_command(
            &db1,
            &db2,
            &table,
            build_config(max_dist, pedantic, exclude_cols, strict_cols, strict_asymmetry)?,
            ident_col.as_deref(),
            &format,
            output.as_deref(),
            color,
        ),
        Commands::Dups {
            db,
            table,
            max_dist,
            exclude_cols,
            ident_col,
        } => dups_command(
            &db,
            &table,
            build_config(max_dist, false, exclude_cols, Vec::new(), false)?,
            ident_col.as_deref(),
            color,
        ),
        Commands::Tables { db } => tables_command(&db, color),
    }
}

/// Assemble and validate the immutable run configuration
fn build_config(
    max_dist: usize,
    pedantic: bool,
    exclude_cols: Vec<String>,
    strict_cols: Vec<String>,
    strict_asymmetry: bool,
) -> Result<DiffConfig> {
    let config = DiffConfig {
        max_dist,
        // Fatal asymmetry is meaningless without the reverse check
        pedantic: pedantic || strict_asymmetry,
        exclude_columns: exclude_cols.into_iter().collect(),
        strict_columns: strict_cols.into_iter().collect(),
        asymmetry: if strict_asymmetry {
            AsymmetryPolicy::Fatal
        } else {
            AsymmetryPolicy::Warn
        },
    };
    config.validate()?;
    Ok(config)
}

fn resolve_table(
    table: &str,
    ident_col: Option<&str>,
    exclude: &HashSet<String>,
) -> Result<TableSpec> {
    let spec = TableSpec::resolve(table, ident_col)?;
    if let TableSpec::Plain { ident_column, .. } = &spec {
        if exclude.contains(ident_column) {
            return Err(RowdiffError::config(format!(
                "ident column '{}' cannot be excluded",
                ident_column
            )));
        }
    }
    Ok(spec)
}

#[allow(clippy::too_many_arguments)]
fn diff_command(
    db1: &Path,
    db2: &Path,
    table: &str,
    config: DiffConfig,
    ident_col: Option<&str>,
    format: &str,
    output: Option<&Path>,
    color: bool,
) -> Result<()> {
    let format = OutputFormat::parse(format).map_err(RowdiffError::config)?;
    let spec = resolve_table(table, ident_col, &config.exclude_columns)?;

    let db1 = Database::open(db1)?;
    let db2 = Database::open(db2)?;
    let snap1 = db1.read_snapshot(&spec, &config.exclude_columns)?;
    let snap2 = db2.read_snapshot(&spec, &config.exclude_columns)?;

    // Both sides must project the identical column list before the core runs
    if snap1.columns() != snap2.columns() {
        return Err(RowdiffError::schema_mismatch(format!(
            "table '{}' projects [{}] in the first database but [{}] in the second",
            table,
            snap1.columns().join(", "),
            snap2.columns().join(", ")
        )));
    }

    let differ = Differ::new(config);
    let mut progress = ProgressReporter::new_for_compare(snap1.row_count() as u64);
    let report = differ.compare_with_progress(&snap1, &snap2, &mut progress)?;
    progress.finish_rows("matched");

    for diagnostic in &report.diagnostics {
        log::warn!("{}", diagnostic);
    }

    match (format, output) {
        (_, Some(path)) => {
            let json = JsonFormatter::format_report(table, snap1.columns(), &report)?;
            std::fs::write(path, json)?;
            println!("💾 Report written to: {}", path.display());
        }
        (OutputFormat::Json, None) => {
            println!(
                "{}",
                JsonFormatter::format_report(table, snap1.columns(), &report)?
            );
        }
        (OutputFormat::Pretty, None) => {
            PrettyPrinter::new(color).print_report(&report, snap1.columns());
        }
    }

    Ok(())
}

fn dups_command(
    db: &Path,
    table: &str,
    config: DiffConfig,
    ident_col: Option<&str>,
    color: bool,
) -> Result<()> {
    let spec = resolve_table(table, ident_col, &config.exclude_columns)?;
    let db = Database::open(db)?;
    let snapshot = db.read_snapshot(&spec, &config.exclude_columns)?;
    let pairs = matcher::find_duplicates(&snapshot, &config);
    PrettyPrinter::new(color).print_duplicates(&pairs, table);
    Ok(())
}

fn tables_command(db: &Path, color: bool) -> Result<()> {
    let db = Database::open(db)?;
    let tables: Vec<(String, Option<String>)> = db
        .table_names()?
        .into_iter()
        .map(|name| {
            let ident = TableSpec::resolve(&name, None)
                .ok()
                .map(|spec| spec.ident_description());
            (name, ident)
        })
        .collect();
    if tables.is_empty() {
        println!("No tables found.");
        return Ok(());
    }
    PrettyPrinter::new(color).print_table_list(&tables);
    Ok(())
}
