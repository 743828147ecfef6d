use indicatif::{ProgressBar, ProgressStyle};
use panorama_core::pipeline::{ProgressReporter, ReductionState, StitchStage};

/// Drives a single terminal progress bar from stitching callbacks.
pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new(1);
        let style = ProgressStyle::default_bar()
            .template("{msg:32} [{bar:40}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }

    pub fn done(&self) {
        self.bar.finish_with_message("Done");
    }
}

impl Default for BarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: StitchStage, total_items: Option<usize>) {
        self.bar.set_length(total_items.unwrap_or(1) as u64);
        self.bar.set_position(0);
        self.bar.set_message(stage.to_string());
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        if let Some(len) = self.bar.length() {
            self.bar.set_position(len);
        }
    }

    fn state_changed(&self, state: &ReductionState) {
        match state {
            ReductionState::Reducing(_) => self.bar.set_message(state.to_string()),
            ReductionState::Success => self.bar.set_message("Stitched"),
            ReductionState::Failed { .. } => self.bar.abandon_with_message("Failed"),
        }
    }
}
