pub mod config;
mod pairwise;
mod reduction;
mod types;
mod validate;

pub use pairwise::stitch_pair;
pub use reduction::{estimate_peak_canvas_bytes, stitch_panorama, stitch_panorama_reported};
pub use types::{
    PairReport, PairwiseStitch, Panorama, ProgressReporter, ReductionState, StepReport,
    StitchStage,
};
pub use validate::validate_inputs;
