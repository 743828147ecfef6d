/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f32 = 1e-10;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Number of channels in a color frame (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Minimum number of matches before a homography is attempted.
/// Four is the smallest set that determines a planar homography exactly.
pub const DEFAULT_MIN_MATCH_COUNT: usize = 4;

/// RANSAC inlier distance bound in pixels.
pub const DEFAULT_REPROJECTION_THRESHOLD: f64 = 4.0;

/// Fraction of the narrower image width used as the seam feather width.
pub const DEFAULT_SMOOTHING_WINDOW_PERCENT: f32 = 0.10;

/// Lower bound on the seam feather width, in pixels.
pub const MIN_FEATHER_WIDTH: f32 = 100.0;

/// Upper bound on the seam feather width, in pixels.
pub const MAX_FEATHER_WIDTH: f32 = 1000.0;

/// Number of best matches drawn in the diagnostic visualization.
pub const MAX_DIAGNOSTIC_MATCHES: usize = 100;

/// Length of a feature descriptor: 4x4 spatial cells with 8 orientation bins each.
pub const DESCRIPTOR_LENGTH: usize = 128;

/// Descriptor components are clipped to this value before renormalization.
pub const DESCRIPTOR_CLIP: f32 = 0.2;

/// Number of bins in the keypoint orientation histogram.
pub const ORIENTATION_BINS: usize = 36;

/// Minimum side length (pixels) accepted by input validation.
pub const DEFAULT_MIN_IMAGE_SIDE: usize = 100;

/// Fixed RANSAC seed so repeated runs produce identical panoramas.
pub const DEFAULT_RANSAC_SEED: u64 = 0x5EED_CAFE;

/// Estimated canvas memory above which callers should expect trouble. Default: 2 GiB.
pub const LARGE_CANVAS_WARNING_BYTES: usize = 2 * 1_073_741_824;

/// Default age after which output artifacts are cleaned up.
pub const DEFAULT_ARTIFACT_MAX_AGE_HOURS: u64 = 24;
