/// Lower zoom bound as a fraction of the cover-fit base scale.
pub const MIN_ZOOM_FACTOR: f64 = 0.4;

/// Upper zoom bound as a multiple of the cover-fit base scale.
pub const MAX_ZOOM_FACTOR: f64 = 3.0;

/// Base scale reported when either dimension is not yet measured.
pub const FALLBACK_BASE_SCALE: f64 = 1.0;

/// Minimum scale reported when either dimension is not yet measured.
/// Never zero, so a clamp against it cannot collapse the transform.
pub const FALLBACK_MIN_SCALE: f64 = 0.1;

/// Maximum scale reported when either dimension is not yet measured.
pub const FALLBACK_MAX_SCALE: f64 = 10.0;

/// Default `k` in the wheel zoom factor `exp(-delta_y * k)`.
/// One 100px wheel notch zooms by roughly 16%.
pub const DEFAULT_WHEEL_SENSITIVITY: f64 = 0.0015;

/// Pinch gestures starting with the two pointers closer than this (px)
/// do not update the scale.
pub const MIN_PINCH_DISTANCE: f64 = 1.0;

/// Size of the default crop rectangle as a fraction of the viewport.
pub const DEFAULT_CROP_FRACTION: f64 = 0.8;

/// Minimum pixel count (w*h) to render export rows with Rayon.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Prefix of the self-describing export string.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Small epsilon for floating-point comparisons.
pub const EPSILON: f64 = 1e-9;
