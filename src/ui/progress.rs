//! Progress indicators for archive writing
//!
//! Uses `linya` for allocation-free progress bars drawn to stderr

use linya::{Bar, Progress};

/// Progress bar over the files written into one archive
pub struct ArchiveProgress {
  progress: Progress,
  // linya cannot draw a zero-length bar
  bar: Option<Bar>,
}

impl ArchiveProgress {
  /// Create a new progress bar for `total` archive entries
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = (total > 0).then(|| progress.bar(total, label.into()));
    Self { progress, bar }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    if let Some(bar) = &self.bar {
      self.progress.inc_and_draw(bar, 1);
    }
  }
}
