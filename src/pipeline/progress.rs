// file: src/pipeline/progress.rs
// description: progress bars for the rewrite pass
// reference: uses indicatif for progress bars and a running replacement count

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::cell::Cell;

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    replacements: Cell<usize>,
}

impl ProgressTracker {
    pub fn with_color(total_lines: usize, colored: bool) -> Self {
        let multi_progress = MultiProgress::new();

        let main_bar = create_progress_bar(&multi_progress, total_lines as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self::from_bars(main_bar, detail_bar)
    }

    /// A tracker that counts but never draws.
    pub fn hidden(total_lines: usize) -> Self {
        let main_bar = ProgressBar::with_draw_target(
            Some(total_lines as u64),
            ProgressDrawTarget::hidden(),
        );
        let detail_bar = ProgressBar::hidden();
        Self::from_bars(main_bar, detail_bar)
    }

    fn from_bars(main_bar: ProgressBar, detail_bar: ProgressBar) -> Self {
        Self {
            main_bar,
            detail_bar,
            replacements: Cell::new(0),
        }
    }

    pub fn inc_line(&self, replacements: usize) {
        self.main_bar.inc(1);

        if replacements > 0 {
            self.replacements.set(self.replacements.get() + replacements);
            self.update_detail_bar();
        }
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Rewrite complete");
        self.detail_bar.finish_and_clear();
    }

    fn update_detail_bar(&self) {
        self.detail_bar
            .set_message(format!("URL replacements: {}", self.replacements.get()));
    }
}
impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    if colored {
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines {msg}",
                )
                .expect("Failed to create progress bar template")
                .progress_chars("█▓▒░"),
        );
    } else {
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} lines {msg}")
                .expect("Failed to create progress bar template")
                .progress_chars("=>-"),
        );
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .expect("Failed to create detail bar template");
    bar.set_style(style);
    bar
}
