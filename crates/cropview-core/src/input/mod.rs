pub mod arbiter;
pub mod events;

pub use arbiter::{GestureState, InputArbiter, PanAnchor, PinchAnchor};
pub use events::{Capture, Disposition, InputEvent, Outcome, PointerEvent, PointerId};

/// When a single pointer may pan the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanPolicy {
    pub enabled: bool,
    /// Pan only while the modifier key is held.
    pub requires_modifier: bool,
}

impl Default for PanPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            requires_modifier: false,
        }
    }
}
