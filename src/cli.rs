//! Command-line interface for rowdiff

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rowdiff")]
#[command(about = "Row-level diff tool for SQLite table snapshots")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable ANSI colors in output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Log level for this invocation. Must be decided before the logger is
    /// built: env_logger keeps its own filter from construction time, so
    /// raising `log::set_max_level` afterwards has no effect on it.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare the same table across two database files
    Diff {
        /// First (old) database file
        db1: PathBuf,

        /// Second (new) database file
        db2: PathBuf,

        /// Table to compare
        table: String,

        /// Maximum column distance for two rows to count as the same record
        #[arg(long, default_value_t = crate::config::DEFAULT_MAX_DIST)]
        max_dist: usize,

        /// Check reverse-match consistency and report duplicate ties
        #[arg(long)]
        pedantic: bool,

        /// Columns to exclude from the comparison
        #[arg(long, value_delimiter = ',', default_value = "id")]
        exclude_cols: Vec<String>,

        /// Columns that must match exactly for rows to be comparable
        #[arg(long, value_delimiter = ',')]
        strict_cols: Vec<String>,

        /// Key column override for tables outside the built-in registry
        #[arg(long)]
        ident_col: Option<String>,

        /// Treat an asymmetric match as a fatal error (implies --pedantic)
        #[arg(long)]
        strict_asymmetry: bool,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,

        /// Write the JSON report to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Find near-duplicate rows within one database table
    Dups {
        /// Database file
        db: PathBuf,

        /// Table to examine
        table: String,

        /// Maximum column distance for two rows to count as duplicates
        #[arg(long, default_value_t = crate::config::DEFAULT_MAX_DIST)]
        max_dist: usize,

        /// Columns to exclude from the comparison
        #[arg(long, value_delimiter = ',', default_value = "id")]
        exclude_cols: Vec<String>,

        /// Key column override for tables outside the built-in registry
        #[arg(long)]
        ident_col: Option<String>,
    },

    /// List tables in a database with their configured key columns
    Tables {
        /// Database file
        db: PathBuf,
    },
}

/// Parse output format string
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert!(matches!(OutputFormat::parse("pretty"), Ok(OutputFormat::Pretty)));
        assert!(matches!(OutputFormat::parse("JSON"), Ok(OutputFormat::Json)));
        assert!(OutputFormat::parse("yaml").is_err());
    }

    #[test]
    fn test_diff_args_parse() {
        let cli = Cli::try_parse_from([
            "rowdiff",
            "diff",
            "old.sqlite",
            "new.sqlite",
            "pdgdata",
            "--max-dist",
            "2",
            "--exclude-cols",
            "id,sort_order",
            "--pedantic",
        ])
        .unwrap();
        match cli.command {
            Commands::Diff {
                table,
                max_dist,
                exclude_cols,
                pedantic,
                ..
            } => {
                assert_eq!(table, "pdgdata");
                assert_eq!(max_dist, 2);
                assert_eq!(exclude_cols, vec!["id", "sort_order"]);
                assert!(pedantic);
            }
            _ => panic!("expected diff command"),
        }
    }

    #[test]
    fn test_verbose_raises_log_level() {
        let quiet = Cli::try_parse_from(["rowdiff", "tables", "db.sqlite"]).unwrap();
        assert_eq!(quiet.log_level(), log::LevelFilter::Info);

        let verbose =
            Cli::try_parse_from(["rowdiff", "--verbose", "tables", "db.sqlite"]).unwrap();
        assert_eq!(verbose.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_exclude_cols_default() {
        let cli = Cli::try_parse_from(["rowdiff", "dups", "db.sqlite", "pdgdata"]).unwrap();
        match cli.command {
            Commands::Dups { exclude_cols, max_dist, .. } => {
                assert_eq!(exclude_cols, vec!["id"]);
                assert_eq!(max_dist, crate::config::DEFAULT_MAX_DIST);
            }
            _ => panic!("expected dups command"),
        }
    }
}
