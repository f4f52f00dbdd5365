//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter for a comparison run
#[derive(Debug)]
pub struct ProgressReporter {
    rows_pb: Option<ProgressBar>,
    total_rows: u64,
    show_progress: bool,
}

impl ProgressReporter {
    /// Create progress reporter for a compare over `total_rows` rows
    pub fn new_for_compare(total_rows: u64) -> Self {
        Self {
            rows_pb: None,
            total_rows,
            show_progress: true,
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            rows_pb: None,
            total_rows: 0,
            show_progress: false,
        }
    }

    /// Lazily create the rows progress bar when needed
    fn ensure_rows_pb(&mut self) {
        if self.show_progress && self.rows_pb.is_none() {
            self.rows_pb = Some(create_progress_bar(self.total_rows, "Matching rows"));
        }
    }

    /// Update row progress
    pub fn update_rows(&mut self, processed: u64) {
        self.ensure_rows_pb();
        if let Some(pb) = &self.rows_pb {
            pb.set_position(processed);
        }
    }

    /// Finish row processing
    pub fn finish_rows(&mut self, message: &str) {
        if let Some(pb) = self.rows_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        // Ensure the bar is cleaned up silently
        if let Some(pb) = self.rows_pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// Create a progress bar with known total
fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} ({per_sec}) {eta} {msg}")
            .expect("Invalid progress template")
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}
