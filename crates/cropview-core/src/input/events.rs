use crate::geometry::Point;

/// Identity of an active pointer (mouse, pen or a single touch).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    /// Client coordinates.
    pub position: Point,
}

impl PointerEvent {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self {
            id: PointerId(id),
            position: Point::new(x, y),
        }
    }
}

/// Raw input delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    PointerCancel(PointerEvent),
    /// Pointer left the interactive surface.
    PointerLeave,
    /// `delta_y > 0` scrolls down, which zooms out.
    Wheel { position: Point, delta_y: f64 },
    ModifierDown,
    ModifierUp,
}

/// Whether the crop widget may also see the event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Pan, pinch or wheel consumed it; the crop widget must not react.
    Claimed,
    /// Not a transform gesture; the crop widget gets it unobstructed.
    PassThrough,
}

/// Pointer-capture instruction for the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capture {
    None,
    Acquire(PointerId),
    Release(PointerId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub disposition: Disposition,
    pub capture: Capture,
    /// Suppress the platform's default scroll handling.
    pub prevent_default: bool,
}

impl Outcome {
    pub fn pass() -> Self {
        Self {
            disposition: Disposition::PassThrough,
            capture: Capture::None,
            prevent_default: false,
        }
    }

    pub fn claimed() -> Self {
        Self {
            disposition: Disposition::Claimed,
            capture: Capture::None,
            prevent_default: false,
        }
    }

    pub fn with_capture(mut self, capture: Capture) -> Self {
        self.capture = capture;
        self
    }

    pub fn is_claimed(&self) -> bool {
        self.disposition == Disposition::Claimed
    }
}
