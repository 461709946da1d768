use indicatif::{ProgressBar, ProgressStyle};

/// Returns a progress bar with `prefix` for `total` steps.
pub fn bar(prefix: String, total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_prefix(prefix);
    pb.set_style(
        ProgressStyle::with_template("{prefix}... {msg}\n[{wide_bar:.cyan/blue}] {pos}/{len}")
            .expect("incorrect progress bar format string")
            .progress_chars("#>-"),
    );
    pb
}
