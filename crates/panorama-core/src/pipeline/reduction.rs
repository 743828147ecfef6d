use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{PanoramaError, Result};
use crate::frame::ColorFrame;

use super::config::{ReductionOrder, StitchConfig};
use super::pairwise::stitch_pair;
use super::types::{
    NoOpReporter, Panorama, PairwiseStitch, ProgressReporter, ReductionState, StepReport,
    StitchStage,
};
use super::validate::check_sample_range;

/// f32 planes held per canvas pixel during a blend: three color channels plus
/// the two seam masks.
const CANVAS_PLANES: usize = 5;

/// Fold an ordered image sequence into one panorama.
pub fn stitch_panorama(images: Vec<ColorFrame>, config: &StitchConfig) -> Result<Panorama> {
    stitch_panorama_reported(images, config, Arc::new(NoOpReporter))
}

/// Fold an ordered image sequence into one panorama, reporting every state
/// transition and completed step to `reporter`.
///
/// Fewer than two images fail with `InsufficientImages`, and samples outside
/// [0, 1] with `InvalidImage`, before any work or state transition. A failing
/// stitch aborts the run with `StitchStepFailed`.
pub fn stitch_panorama_reported(
    images: Vec<ColorFrame>,
    config: &StitchConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<Panorama> {
    let count = images.len();
    if count < 2 {
        return Err(PanoramaError::InsufficientImages { count });
    }
    config.validate()?;
    check_sample_range(&images)?;

    info!(images = count, order = %config.order, "Starting panorama reduction");
    reporter.begin_stage(StitchStage::Stitching, Some(count - 1));
    let result = match config.order {
        ReductionOrder::Sequential => reduce_sequential(images, config, reporter.as_ref()),
        ReductionOrder::BalancedTree => reduce_balanced(images, config, reporter.as_ref()),
    };
    reporter.finish_stage();

    match &result {
        Ok(pano) => {
            reporter.state_changed(&ReductionState::Success);
            info!(
                width = pano.image.width(),
                height = pano.image.height(),
                steps = pano.steps.len(),
                "Panorama complete"
            );
        }
        Err(e) => {
            let remaining = match e {
                PanoramaError::StitchStepFailed { remaining, .. } => *remaining,
                _ => count,
            };
            reporter.state_changed(&ReductionState::Failed {
                reason: e.root_cause().to_string(),
                remaining,
            });
            warn!(error = %e, "Panorama reduction failed");
        }
    }
    result
}

/// Repeatedly stitch the last two images (query = second-to-last, train =
/// last) and put the composite in the second-to-last slot.
fn reduce_sequential(
    mut sequence: Vec<ColorFrame>,
    config: &StitchConfig,
    reporter: &dyn ProgressReporter,
) -> Result<Panorama> {
    let intermediate = StitchConfig {
        render_diagnostics: false,
        ..config.clone()
    };

    let mut len = sequence.len();
    let mut steps = Vec::with_capacity(len - 1);
    let mut diagnostic = None;

    while len > 1 {
        let step = steps.len() + 1;
        reporter.state_changed(&ReductionState::Reducing(len));
        info!(step, remaining = len, "Stitching pair");

        let last_step = len == 2;
        let step_config = if last_step { config } else { &intermediate };
        let (query, train) = (&sequence[len - 2], &sequence[len - 1]);
        let (query_width, train_width) = (query.width(), train.width());

        let stitched = stitch_pair(query, train, step_config).map_err(|e| {
            PanoramaError::StitchStepFailed {
                step,
                remaining: len,
                source: Box::new(e),
            }
        })?;

        steps.push(step_report(step, len, query_width, train_width, &stitched));
        sequence[len - 2] = if last_step {
            diagnostic = stitched.diagnostic;
            stitched.composite
        } else {
            stitched.composite.sanitized()
        };
        len -= 1;
        sequence.truncate(len);
        reporter.advance(steps.len());
    }

    let image = sequence.pop().ok_or(PanoramaError::InsufficientImages { count: 0 })?;
    Ok(Panorama {
        image,
        diagnostic,
        steps,
    })
}

/// Stitch adjacent pairs of each round in parallel until one image remains.
/// An odd image at the end of a round is carried into the next unchanged.
fn reduce_balanced(
    mut sequence: Vec<ColorFrame>,
    config: &StitchConfig,
    reporter: &dyn ProgressReporter,
) -> Result<Panorama> {
    let intermediate = StitchConfig {
        render_diagnostics: false,
        ..config.clone()
    };

    let mut steps: Vec<StepReport> = Vec::with_capacity(sequence.len() - 1);
    let mut diagnostic = None;

    while sequence.len() > 1 {
        let len = sequence.len();
        reporter.state_changed(&ReductionState::Reducing(len));
        info!(remaining = len, pairs = len / 2, "Stitching round");

        let last_round = len == 2;
        let round_config = if last_round { config } else { &intermediate };

        let results: Vec<Result<PairwiseStitch>> = sequence
            .par_chunks_exact(2)
            .map(|pair| stitch_pair(&pair[0], &pair[1], round_config))
            .collect();

        let first_step = steps.len() + 1;
        let mut next = Vec::with_capacity(len.div_ceil(2));
        for (i, result) in results.into_iter().enumerate() {
            let step = first_step + i;
            let stitched = result.map_err(|e| PanoramaError::StitchStepFailed {
                step,
                remaining: len,
                source: Box::new(e),
            })?;
            let (query_width, train_width) = (sequence[2 * i].width(), sequence[2 * i + 1].width());
            steps.push(step_report(step, len, query_width, train_width, &stitched));
            if last_round {
                diagnostic = stitched.diagnostic;
                next.push(stitched.composite);
            } else {
                next.push(stitched.composite.sanitized());
            }
            reporter.advance(steps.len());
        }
        if len % 2 == 1 {
            if let Some(carried) = sequence.pop() {
                next.push(carried);
            }
        }
        sequence = next;
    }

    let image = sequence.pop().ok_or(PanoramaError::InsufficientImages { count: 0 })?;
    Ok(Panorama {
        image,
        diagnostic,
        steps,
    })
}

fn step_report(
    step: usize,
    remaining: usize,
    query_width: usize,
    train_width: usize,
    stitched: &PairwiseStitch,
) -> StepReport {
    StepReport {
        step,
        remaining,
        query_width,
        train_width,
        composite_size: (stitched.composite.height(), stitched.composite.width()),
        pair: stitched.report.clone(),
    }
}

/// Upper bound on the largest blend canvas of a sequential reduction, in bytes.
///
/// Each composite can be as wide as every image folded into it, so the canvas
/// of the step that consumes image `i` spans the widths of images `i..`.
pub fn estimate_peak_canvas_bytes(images: &[ColorFrame]) -> usize {
    let mut accumulated_width = match images.last() {
        Some(last) => last.width(),
        None => return 0,
    };
    let mut peak = 0usize;
    for query in images.iter().rev().skip(1) {
        let canvas_width = query.width() + accumulated_width;
        let bytes = query.height() * canvas_width * CANVAS_PLANES * std::mem::size_of::<f32>();
        peak = peak.max(bytes);
        accumulated_width = canvas_width;
    }
    peak
}
