//! Output formatting utilities

use crate::differ::{Delta, DiffReport};
use crate::error::Result;
use crate::matcher::DuplicatePair;
use crate::row::Row;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Pretty printer for rowdiff output
pub struct PrettyPrinter {
    color: bool,
}

impl PrettyPrinter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Print a full diff report: deltas first, then a summary line
    pub fn print_report(&self, report: &DiffReport, columns: &[String]) {
        if report.deltas.is_empty() {
            println!("✅ No differences");
            return;
        }

        println!("🔍 Columns: ident, {}", columns.join(", "));
        println!();
        for delta in &report.deltas {
            match delta {
                Delta::Insert { row } => {
                    println!("{}", self.paint(GREEN, &format!("+ {}", format_row(row))));
                }
                Delta::Delete { row } => {
                    println!("{}", self.paint(RED, &format!("- {}", format_row(row))));
                }
                Delta::Update { old_row, new_row } => {
                    let (old_line, new_line) = self.format_update(old_row, new_row);
                    println!("~ {}", old_line);
                    println!("~ {}", new_line);
                }
            }
            println!();
        }

        println!(
            "📊 {} inserts, {} deletes, {} updates",
            report.insert_count(),
            report.delete_count(),
            report.update_count()
        );
        if !report.diagnostics.is_empty() {
            println!("⚠️  {} diagnostics (see warnings above)", report.diagnostics.len());
        }
    }

    /// Align an old/new pair column by column, highlighting exactly the
    /// positions that differ
    fn format_update(&self, old_row: &Row, new_row: &Row) -> (String, String) {
        let mut old_cells = vec![format!("{:?}", old_row.ident)];
        let mut new_cells = vec![format!("{:?}", new_row.ident)];
        let mut changed = vec![false];
        for (a, b) in old_row.values.iter().zip(&new_row.values) {
            old_cells.push(a.to_string());
            new_cells.push(b.to_string());
            changed.push(a != b);
        }

        let widths: Vec<usize> = old_cells
            .iter()
            .zip(&new_cells)
            .map(|(a, b)| a.chars().count().max(b.chars().count()))
            .collect();

        let render = |cells: &[String]| {
            let mut parts = Vec::with_capacity(cells.len());
            for (i, cell) in cells.iter().enumerate() {
                let padded = format!("{:<width$}", cell, width = widths[i]);
                if changed[i] {
                    parts.push(self.paint(BOLD, &padded));
                } else {
                    parts.push(padded);
                }
            }
            parts.join(" | ")
        };

        (render(&old_cells), render(&new_cells))
    }

    /// Print the result of a duplicate scan
    pub fn print_duplicates(&self, pairs: &[DuplicatePair], table: &str) {
        if pairs.is_empty() {
            println!("✅ No near-duplicate rows in '{}'", table);
            return;
        }
        for pair in pairs {
            println!("{}", format_row(&pair.first));
            println!("{}", format_row(&pair.second));
            println!("  (distance {})", pair.distance);
            println!();
        }
        println!("📊 {} near-duplicate pairs in '{}'", pairs.len(), table);
    }

    /// Print the table list with configured key columns
    pub fn print_table_list(&self, tables: &[(String, Option<String>)]) {
        for (i, (name, ident)) in tables.iter().enumerate() {
            let prefix = if i == tables.len() - 1 { "└─" } else { "├─" };
            match ident {
                Some(desc) => println!("{} {} (key: {})", prefix, name, desc),
                None => println!("{} {} (no key mapping)", prefix, name),
            }
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }
}

fn format_row(row: &Row) -> String {
    row.to_string()
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format a diff report with its surrounding context as JSON
    pub fn format_report(table: &str, columns: &[String], report: &DiffReport) -> Result<String> {
        let json = serde_json::json!({
            "table": table,
            "columns": columns,
            "summary": {
                "inserts": report.insert_count(),
                "deletes": report.delete_count(),
                "updates": report.update_count(),
                "diagnostics": report.diagnostics.len(),
            },
            "deltas": report.deltas,
            "diagnostics": report.diagnostics,
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }
}
