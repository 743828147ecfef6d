use crate::frame::ColorFrame;

/// Stitching stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StitchStage {
    Loading,
    Validating,
    Stitching,
    Writing,
}

impl std::fmt::Display for StitchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading images"),
            Self::Validating => write!(f, "Validating inputs"),
            Self::Stitching => write!(f, "Stitching"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Lifecycle of one reduction run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReductionState {
    /// About to stitch; `n` images remain in the working sequence.
    Reducing(usize),
    Success,
    Failed { reason: String, remaining: usize },
}

impl std::fmt::Display for ReductionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reducing(n) => write!(f, "Reducing ({n} images remaining)"),
            Self::Success => write!(f, "Success"),
            Self::Failed { reason, remaining } => {
                write!(f, "Failed with {remaining} images remaining: {reason}")
            }
        }
    }
}

/// What one pairwise stitch found.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PairReport {
    pub query_keypoints: usize,
    pub train_keypoints: usize,
    pub matches: usize,
    pub inliers: usize,
    pub feather_width: f32,
}

/// One completed reduction step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    /// 1-based ordinal of the stitch.
    pub step: usize,
    /// Working sequence length before this step.
    pub remaining: usize,
    pub query_width: usize,
    pub train_width: usize,
    /// `(height, width)` of the cropped composite.
    pub composite_size: (usize, usize),
    pub pair: PairReport,
}

/// Output of a pairwise stitch.
#[derive(Clone, Debug)]
pub struct PairwiseStitch {
    pub composite: ColorFrame,
    /// Match visualization, when enabled.
    pub diagnostic: Option<ColorFrame>,
    pub report: PairReport,
}

/// Final output of a reduction run.
#[derive(Clone, Debug)]
pub struct Panorama {
    pub image: ColorFrame,
    /// Match visualization of the last stitched pair, when enabled.
    pub diagnostic: Option<ColorFrame>,
    /// One entry per stitch, in execution order.
    pub steps: Vec<StepReport>,
}

/// Thread-safe progress reporting for stitching runs.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of work items in
    /// this stage, if known.
    fn begin_stage(&self, _stage: StitchStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}

    /// The reduction moved to a new state.
    fn state_changed(&self, _state: &ReductionState) {}
}

/// No-op progress reporter, used when `stitch_panorama` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
