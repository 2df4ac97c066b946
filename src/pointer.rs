//! Pointer handling for the mascot: grab, drag, release, and tap detection.
//!
//! Works on plain [`PointerSample`]s so it can be driven by `PointerEvent`s in
//! the browser and by hand in tests.

use crate::env::{RandomSource, Viewport};
use crate::motion::{MotionController, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    pub fn from_dom(kind: &str) -> Self {
        match kind {
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Mouse,
        }
    }
}

/// Position and identity of one pointer event, in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub pointer_id: i32,
    pub x: f64,
    pub y: f64,
    pub kind: PointerKind,
    /// DOM button index; 0 is the primary button.
    pub button: i16,
}

impl PointerSample {
    pub fn at(pointer_id: i32, x: f64, y: f64) -> Self {
        Self { pointer_id, x, y, kind: PointerKind::Mouse, button: 0 }
    }

    fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// How a completed press is classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    Tap,
    Drag,
}

#[derive(Debug, Default)]
pub struct PointerAdapter {
    active_pointer: Option<i32>,
    drag_offset: Point,
    drag_start: Point,
    last_pointer: Point,
    travelled: f64,
    suppress_click: bool,
}

impl PointerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.active_pointer.is_some()
    }

    pub fn active_pointer(&self) -> Option<i32> {
        self.active_pointer
    }

    /// Where the current press started, if one is in progress.
    pub fn drag_start(&self) -> Option<Point> {
        self.active_pointer.map(|_| self.drag_start)
    }

    /// Returns true when the press was accepted; the caller should then
    /// capture the pointer and prevent the default action.
    pub fn on_pointer_down(&mut self, sample: &PointerSample, ctl: &mut MotionController) -> bool {
        if sample.kind == PointerKind::Mouse && sample.button != 0 {
            return false;
        }
        let pos = ctl.position();
        self.active_pointer = Some(sample.pointer_id);
        self.drag_offset = Point::new(sample.x - pos.x, sample.y - pos.y);
        self.drag_start = sample.point();
        self.last_pointer = sample.point();
        self.travelled = 0.0;
        // a drag whose release never produced a click must not eat this tap
        self.suppress_click = false;
        ctl.begin_drag();
        true
    }

    pub fn on_pointer_move(
        &mut self,
        sample: &PointerSample,
        ctl: &mut MotionController,
        viewport: Viewport,
    ) {
        if self.active_pointer != Some(sample.pointer_id) {
            return;
        }
        let desired = Point::new(sample.x - self.drag_offset.x, sample.y - self.drag_offset.y);
        let smoothing = ctl.config().drag_smoothing;
        ctl.drag_toward(desired, smoothing, viewport);

        let dx = sample.x - self.last_pointer.x;
        if dx.abs() > 2.0 {
            ctl.set_facing(dx >= 0.0);
        }
        self.travelled += self.last_pointer.distance_to(sample.point());
        self.last_pointer = sample.point();
    }

    /// Ends the press. `None` when this pointer was not the one being tracked.
    pub fn on_pointer_up(
        &mut self,
        sample: &PointerSample,
        ctl: &mut MotionController,
        now_ms: f64,
        rng: &mut impl RandomSource,
    ) -> Option<Gesture> {
        if self.active_pointer != Some(sample.pointer_id) {
            return None;
        }
        self.active_pointer = None;
        ctl.end_drag(now_ms, rng);
        let gesture = if self.travelled > ctl.config().drag_threshold {
            Gesture::Drag
        } else {
            Gesture::Tap
        };
        self.suppress_click = gesture == Gesture::Drag;
        Some(gesture)
    }

    /// Called for the DOM `click` that follows a release. Returns whether the
    /// click callback should run.
    pub fn on_click(&mut self) -> bool {
        !std::mem::take(&mut self.suppress_click)
    }
}
