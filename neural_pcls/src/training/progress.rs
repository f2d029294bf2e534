//! Per-batch progress bars.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over `len` batches, hidden when `enabled` is false.
pub fn batch_progress(len: usize, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>4}/{len:4} ({eta})")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_when_disabled() {
        let bar = batch_progress(10, false);
        assert!(bar.is_hidden());
        bar.inc(1);
        bar.finish_and_clear();
    }
}
