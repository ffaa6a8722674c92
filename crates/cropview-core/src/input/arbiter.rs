use tracing::debug;

use crate::config::ViewerConfig;
use crate::consts::{DEFAULT_WHEEL_SENSITIVITY, MIN_PINCH_DISTANCE};
use crate::geometry::{Point, ViewTransform};
use crate::input::events::{Capture, InputEvent, Outcome, PointerEvent, PointerId};
use crate::input::PanPolicy;
use crate::viewport::ViewTransformStore;

/// Recorded at pan start. Moves are measured from here, not per event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanAnchor {
    pub pointer: PointerId,
    pub start: Point,
    pub start_translate_x: f64,
    pub start_translate_y: f64,
}

/// Recorded when the second pointer lands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchAnchor {
    pub initial_distance: f64,
    pub initial_scale: f64,
    /// Gesture centre in viewport coordinates.
    pub center: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureState {
    Idle,
    Panning(PanAnchor),
    Pinching(PinchAnchor),
    /// A single pointer the crop widget owns.
    CropEditing,
}

/// Decides, per event, whether input pans, zooms, or belongs to the crop
/// widget, and drives the transform store accordingly.
#[derive(Clone, Debug)]
pub struct InputArbiter {
    policy: PanPolicy,
    gestures_enabled: bool,
    disabled: bool,
    wheel_sensitivity: f64,
    /// Viewport top-left in client coordinates.
    origin: Point,
    pointers: Vec<(PointerId, Point)>,
    state: GestureState,
    modifier_held: bool,
}

impl Default for InputArbiter {
    fn default() -> Self {
        Self {
            policy: PanPolicy::default(),
            gestures_enabled: true,
            disabled: false,
            wheel_sensitivity: DEFAULT_WHEEL_SENSITIVITY,
            origin: Point::ORIGIN,
            pointers: Vec::with_capacity(2),
            state: GestureState::Idle,
            modifier_held: false,
        }
    }
}

impl InputArbiter {
    pub fn new(config: &ViewerConfig) -> Self {
        let mut arbiter = Self::default();
        arbiter.configure(config);
        arbiter
    }

    pub fn configure(&mut self, config: &ViewerConfig) {
        self.policy = config.pan_policy();
        self.gestures_enabled = config.transform_enabled;
        self.disabled = config.disabled;
        self.wheel_sensitivity = config.wheel_sensitivity;
        if self.disabled || !self.gestures_enabled {
            self.reset();
        }
    }

    pub fn set_surface_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    pub fn modifier_held(&self) -> bool {
        self.modifier_held
    }

    /// Pan allowed by policy and, if required, the modifier is down.
    pub fn pan_permitted(&self) -> bool {
        self.gestures_enabled
            && self.policy.enabled
            && (!self.policy.requires_modifier || self.modifier_held)
    }

    /// Forget all pointers and gestures.
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.state = GestureState::Idle;
        self.modifier_held = false;
    }

    pub fn handle(&mut self, event: &InputEvent, store: &mut ViewTransformStore) -> Outcome {
        match *event {
            InputEvent::PointerDown(p) => self.pointer_down(p, store),
            InputEvent::PointerMove(p) => self.pointer_move(p, store),
            InputEvent::PointerUp(p) | InputEvent::PointerCancel(p) => self.pointer_up(p, store),
            InputEvent::PointerLeave => self.pointer_leave(),
            InputEvent::Wheel { position, delta_y } => self.wheel(position, delta_y, store),
            InputEvent::ModifierDown => {
                self.modifier_held = true;
                Outcome::pass()
            }
            InputEvent::ModifierUp => self.modifier_up(),
        }
    }

    fn to_viewport(&self, client: Point) -> Point {
        Point::new(client.x - self.origin.x, client.y - self.origin.y)
    }

    fn upsert(&mut self, id: PointerId, position: Point) {
        if let Some(entry) = self.pointers.iter_mut().find(|(pid, _)| *pid == id) {
            entry.1 = position;
        } else {
            self.pointers.push((id, position));
        }
    }

    fn begin_pan(&mut self, id: PointerId, position: Point, store: &ViewTransformStore) {
        let t = store.transform();
        self.state = GestureState::Panning(PanAnchor {
            pointer: id,
            start: position,
            start_translate_x: t.translate_x,
            start_translate_y: t.translate_y,
        });
        debug!(pointer = id.0, "Pan started");
    }

    /// Anchor a pinch on the first two tracked pointers and the live scale.
    fn begin_pinch(&mut self, store: &ViewTransformStore) {
        let a = self.pointers[0].1;
        let b = self.pointers[1].1;
        let anchor = PinchAnchor {
            initial_distance: a.distance(b),
            initial_scale: store.transform().scale,
            center: self.to_viewport(a.midpoint(b)),
        };
        debug!(
            distance = anchor.initial_distance,
            scale = anchor.initial_scale,
            "Pinch started"
        );
        self.state = GestureState::Pinching(anchor);
    }

    fn pointer_down(&mut self, p: PointerEvent, store: &ViewTransformStore) -> Outcome {
        if self.disabled {
            return Outcome::pass();
        }
        self.upsert(p.id, p.position);

        if !self.gestures_enabled {
            self.state = GestureState::CropEditing;
            return Outcome::pass();
        }

        match self.pointers.len() {
            2 => {
                self.begin_pinch(store);
                Outcome::claimed().with_capture(Capture::Acquire(p.id))
            }
            1 => {
                if self.pan_permitted() {
                    self.begin_pan(p.id, p.position, store);
                    Outcome::claimed().with_capture(Capture::Acquire(p.id))
                } else {
                    self.state = GestureState::CropEditing;
                    Outcome::pass()
                }
            }
            _ => match self.state {
                // Extra fingers during a pinch are swallowed.
                GestureState::Pinching(_) => Outcome::claimed(),
                _ => Outcome::pass(),
            },
        }
    }

    fn pointer_move(&mut self, p: PointerEvent, store: &mut ViewTransformStore) -> Outcome {
        if self.disabled {
            return Outcome::pass();
        }
        let tracked = self.pointers.iter().any(|(id, _)| *id == p.id);
        if !tracked {
            return Outcome::pass();
        }
        self.upsert(p.id, p.position);

        match self.state {
            GestureState::Pinching(anchor) if self.pointers.len() == 2 => {
                if anchor.initial_distance < MIN_PINCH_DISTANCE {
                    return Outcome::claimed();
                }
                let distance = self.pointers[0].1.distance(self.pointers[1].1);
                let target = anchor.initial_scale * (distance / anchor.initial_distance);
                // apply_scale works on live state, so express the target
                // relative to the current scale.
                let factor = target / store.transform().scale;
                store.zoom_at(anchor.center, factor);
                Outcome::claimed()
            }
            GestureState::Pinching(_) => Outcome::claimed(),
            GestureState::Panning(anchor) if anchor.pointer == p.id => {
                let dx = p.position.x - anchor.start.x;
                let dy = p.position.y - anchor.start.y;
                store.set_direct(ViewTransform::new(
                    store.transform().scale,
                    anchor.start_translate_x + dx,
                    anchor.start_translate_y + dy,
                ));
                Outcome::claimed()
            }
            GestureState::Panning(_) => Outcome::claimed(),
            GestureState::CropEditing | GestureState::Idle => Outcome::pass(),
        }
    }

    fn pointer_up(&mut self, p: PointerEvent, store: &ViewTransformStore) -> Outcome {
        self.pointers.retain(|(id, _)| *id != p.id);

        match self.state {
            GestureState::Panning(anchor) if anchor.pointer == p.id => {
                self.state = GestureState::Idle;
                debug!(pointer = p.id.0, "Pan ended");
                Outcome::claimed().with_capture(Capture::Release(p.id))
            }
            GestureState::Panning(_) => Outcome::claimed(),
            GestureState::Pinching(_) => {
                match self.pointers.len() {
                    0 | 1 => self.degrade_pinch(store),
                    // A different pair now pinches; measure it afresh
                    2 => self.begin_pinch(store),
                    _ => {}
                }
                Outcome::claimed().with_capture(Capture::Release(p.id))
            }
            GestureState::CropEditing => {
                if self.pointers.is_empty() {
                    self.state = GestureState::Idle;
                }
                Outcome::pass()
            }
            GestureState::Idle => Outcome::pass(),
        }
    }

    /// A pinch lost a pointer: continue as a pan from where the remaining
    /// pointer is now, or go idle.
    fn degrade_pinch(&mut self, store: &ViewTransformStore) {
        match self.pointers.first().copied() {
            Some((id, position)) if self.pan_permitted() => {
                self.begin_pan(id, position, store);
            }
            _ => {
                self.state = GestureState::Idle;
                debug!("Pinch ended");
            }
        }
    }

    fn modifier_up(&mut self) -> Outcome {
        self.modifier_held = false;
        match self.state {
            GestureState::Panning(anchor) if self.policy.requires_modifier => {
                self.state = GestureState::Idle;
                debug!("Modifier released, pan cleared");
                Outcome::pass().with_capture(Capture::Release(anchor.pointer))
            }
            _ => Outcome::pass(),
        }
    }

    fn pointer_leave(&mut self) -> Outcome {
        let release = match self.state {
            GestureState::Panning(anchor) => Capture::Release(anchor.pointer),
            _ => Capture::None,
        };
        self.reset();
        Outcome::pass().with_capture(release)
    }

    fn wheel(&mut self, position: Point, delta_y: f64, store: &mut ViewTransformStore) -> Outcome {
        if self.disabled || !self.gestures_enabled {
            // Scrolling over the surface never scrolls the page
            return Outcome {
                prevent_default: true,
                ..Outcome::pass()
            };
        }
        let factor = (-delta_y * self.wheel_sensitivity).exp();
        store.zoom_at(self.to_viewport(position), factor);
        Outcome {
            prevent_default: true,
            ..Outcome::claimed()
        }
    }
}
