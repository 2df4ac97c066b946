//! Mascot motion: autonomous wandering plus the drag override.
//!
//! The controller owns the sprite position and is stepped once per animation
//! frame. Rendering only ever sees a [`Pose`] snapshot.

use crate::config::BuddyConfig;
use crate::env::{Environment, RandomSource, Viewport};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Where the mascot is in its wander / drag cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionState {
    /// Resting; starts moving once `now - since_ms > wait_ms`.
    Idle { since_ms: f64, wait_ms: f64 },
    Moving { target: Point },
    /// Position is driven by the pointer adapter only.
    Dragging,
}

/// Read-only per-frame view of the sprite for the rendering layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Pose<'a> {
    pub position: Point,
    pub size: f64,
    /// Vertical bobbing offset in px, applied on top of `position.y`.
    pub bob: f64,
    pub tilt_deg: f64,
    pub facing_right: bool,
    pub image: &'a str,
    pub dragging: bool,
}

pub struct MotionController {
    config: BuddyConfig,
    position: Point,
    // Last wander target. Kept after arrival so tilt settles to zero.
    target: Point,
    state: MotionState,
    size: f64,
    facing_right: bool,
    idle_image: usize,
    run_image: usize,
    last_frame_ms: f64,
}

impl MotionController {
    /// Places the sprite near the bottom-left corner. The first idle period
    /// has no wait, so wandering starts on the first frame.
    pub fn new(config: BuddyConfig, size: f64, viewport: Viewport, now_ms: f64) -> Self {
        let start = Point::new(30.0, viewport.height - size - 40.0);
        let mut ctl = Self {
            config,
            position: start,
            target: start,
            state: MotionState::Idle { since_ms: now_ms, wait_ms: 0.0 },
            size,
            facing_right: true,
            idle_image: 0,
            run_image: 0,
            last_frame_ms: now_ms,
        };
        ctl.clamp_into(viewport);
        ctl.target = ctl.position;
        ctl
    }

    pub fn config(&self) -> &BuddyConfig {
        &self.config
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, MotionState::Dragging)
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, MotionState::Moving { .. })
    }

    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    /// Top-left corner limit so the sprite stays fully on screen.
    pub fn max_corner(&self, viewport: Viewport) -> Point {
        Point::new(
            (viewport.width - self.size).max(0.0),
            (viewport.height - self.size).max(0.0),
        )
    }

    pub fn clamp_point(&self, p: Point, viewport: Viewport) -> Point {
        let max = self.max_corner(viewport);
        Point::new(p.x.clamp(0.0, max.x), p.y.clamp(0.0, max.y))
    }

    /// Applies a new sprite size and pulls position (and any in-flight
    /// target) back inside the viewport.
    pub fn set_size(&mut self, size: f64, viewport: Viewport) {
        self.size = size;
        self.clamp_into(viewport);
    }

    fn clamp_into(&mut self, viewport: Viewport) {
        self.position = self.clamp_point(self.position, viewport);
        if let MotionState::Moving { target } = self.state {
            let target = self.clamp_point(target, viewport);
            self.state = MotionState::Moving { target };
            self.target = target;
        }
    }

    /// One animation frame of autonomous motion. No-op while dragging.
    pub fn tick<E: Environment>(&mut self, env: &mut E) {
        let now = env.now_ms();
        self.last_frame_ms = now;
        let viewport = env.viewport();

        if let MotionState::Idle { since_ms, wait_ms } = self.state {
            if now - since_ms > wait_ms {
                self.choose_target(viewport, env);
            }
        }

        if let MotionState::Moving { target } = self.state {
            let step = viewport.larger_dimension() * self.config.speed_factor;
            let dist = self.position.distance_to(target);
            if dist > step {
                self.position.x += (target.x - self.position.x) / dist * step;
                self.position.y += (target.y - self.position.y) / dist * step;
            } else {
                self.position = target;
                self.idle_image = env.pick_index(self.config.idle_images.len());
                self.state = MotionState::Idle {
                    since_ms: now,
                    wait_ms: self.random_wait(env),
                };
            }
        }
    }

    fn choose_target<E: Environment>(&mut self, viewport: Viewport, env: &mut E) {
        let max_x = (viewport.width - self.size - self.config.edge_margin).max(0.0);
        let max_y = (viewport.height - self.size - self.config.edge_margin).max(0.0);
        let target = Point::new(env.next_unit() * max_x, env.next_unit() * max_y);
        self.facing_right = target.x >= self.position.x;
        self.run_image = env.pick_index(self.config.run_images.len());
        self.target = target;
        self.state = MotionState::Moving { target };
    }

    fn random_wait(&self, rng: &mut impl RandomSource) -> f64 {
        let span = (self.config.max_wait_ms - self.config.min_wait_ms).max(0.0);
        self.config.min_wait_ms + rng.next_unit() * span
    }

    /// Pointer grabbed the sprite: autonomous stepping stops immediately.
    pub fn begin_drag(&mut self) {
        self.state = MotionState::Dragging;
    }

    /// Moves toward `desired` (clamped) by `smoothing` of the remaining gap.
    /// Ignored unless a drag is in progress.
    pub fn drag_toward(&mut self, desired: Point, smoothing: f64, viewport: Viewport) {
        if !self.is_dragging() {
            return;
        }
        let desired = self.clamp_point(desired, viewport);
        self.position.x += (desired.x - self.position.x) * smoothing;
        self.position.y += (desired.y - self.position.y) * smoothing;
    }

    pub fn set_facing(&mut self, facing_right: bool) {
        self.facing_right = facing_right;
    }

    /// Pointer released: rest for a fresh wait window, then wander again.
    pub fn end_drag(&mut self, now_ms: f64, rng: &mut impl RandomSource) {
        if self.is_dragging() {
            self.state = MotionState::Idle {
                since_ms: now_ms,
                wait_ms: self.random_wait(rng),
            };
        }
    }

    pub fn pose(&self) -> Pose<'_> {
        let tilt_deg = ((self.target.x - self.position.x) * 0.03).clamp(-10.0, 10.0);
        let bob = (self.last_frame_ms / 500.0).sin() * 3.0;
        let (images, idx) = if self.is_moving() {
            (&self.config.run_images, self.run_image)
        } else {
            (&self.config.idle_images, self.idle_image)
        };
        Pose {
            position: self.position,
            size: self.size,
            bob,
            tilt_deg,
            facing_right: self.facing_right,
            image: images.get(idx).map(String::as_str).unwrap_or(""),
            dragging: self.is_dragging(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Lcg;

    struct TestEnv {
        viewport: Viewport,
        now: f64,
        rng: Lcg,
    }

    impl RandomSource for TestEnv {
        fn next_unit(&mut self) -> f64 {
            self.rng.next_unit()
        }
    }

    impl Environment for TestEnv {
        fn viewport(&self) -> Viewport {
            self.viewport
        }
        fn now_ms(&self) -> f64 {
            self.now
        }
    }

    fn env() -> TestEnv {
        TestEnv { viewport: Viewport::new(1000.0, 800.0), now: 0.0, rng: Lcg::new(42) }
    }

    #[test]
    fn initial_position_is_bottom_left() {
        let ctl = MotionController::new(BuddyConfig::default(), 140.0, Viewport::new(1000.0, 800.0), 0.0);
        assert_eq!(ctl.position(), Point::new(30.0, 800.0 - 140.0 - 40.0));
        assert!(matches!(ctl.state(), MotionState::Idle { .. }));
    }

    #[test]
    fn first_frame_starts_wandering() {
        let mut e = env();
        let mut ctl = MotionController::new(BuddyConfig::default(), 140.0, e.viewport, 0.0);
        e.now = 16.0;
        ctl.tick(&mut e);
        match ctl.state() {
            MotionState::Moving { target } => {
                assert!(target.x >= 0.0 && target.x <= 1000.0 - 140.0 - 6.0);
                assert!(target.y >= 0.0 && target.y <= 800.0 - 140.0 - 6.0);
            }
            other => panic!("expected Moving, got {other:?}"),
        }
    }

    #[test]
    fn arrives_snaps_and_rests_within_wait_window() {
        let mut e = env();
        let mut ctl = MotionController::new(BuddyConfig::default(), 140.0, e.viewport, 0.0);
        e.now = 16.0;
        ctl.tick(&mut e);
        let target = match ctl.state() {
            MotionState::Moving { target } => target,
            other => panic!("expected Moving, got {other:?}"),
        };
        // step is 1000 * 0.002 = 2px per frame; the screen diagonal is well under 2000 frames
        for _ in 0..2000 {
            if !ctl.is_moving() {
                break;
            }
            e.now += 16.0;
            ctl.tick(&mut e);
        }
        assert_eq!(ctl.position(), target);
        match ctl.state() {
            MotionState::Idle { since_ms, wait_ms } => {
                assert_eq!(since_ms, e.now);
                assert!((3000.0..=5000.0).contains(&wait_ms));
            }
            other => panic!("expected Idle, got {other:?}"),
        }
        // still resting one frame later
        let rest = ctl.position();
        e.now += 16.0;
        ctl.tick(&mut e);
        assert_eq!(ctl.position(), rest);
        assert_eq!(ctl.pose().tilt_deg, 0.0);
    }

    #[test]
    fn drag_freezes_autonomous_motion() {
        let mut e = env();
        let mut ctl = MotionController::new(BuddyConfig::default(), 140.0, e.viewport, 0.0);
        e.now = 16.0;
        ctl.tick(&mut e);
        assert!(ctl.is_moving());
        ctl.begin_drag();
        let held = ctl.position();
        for _ in 0..100 {
            e.now += 16.0;
            ctl.tick(&mut e);
            assert_eq!(ctl.position(), held);
        }
    }

    #[test]
    fn drag_toward_is_low_pass_and_clamped() {
        let vp = Viewport::new(1000.0, 800.0);
        let mut ctl = MotionController::new(BuddyConfig::default(), 100.0, vp, 0.0);
        ctl.drag_toward(Point::new(500.0, 500.0), 0.25, vp);
        assert_eq!(ctl.position(), Point::new(30.0, 660.0), "ignored when not dragging");

        ctl.begin_drag();
        ctl.drag_toward(Point::new(430.0, 660.0), 0.25, vp);
        assert_eq!(ctl.position(), Point::new(130.0, 660.0));

        // desired far off-screen is clamped to the max corner before smoothing
        ctl.drag_toward(Point::new(5000.0, 5000.0), 1.0, vp);
        assert_eq!(ctl.position(), Point::new(900.0, 700.0));
    }

    #[test]
    fn end_drag_resets_idle_timer() {
        let mut e = env();
        let mut ctl = MotionController::new(BuddyConfig::default(), 140.0, e.viewport, 0.0);
        ctl.begin_drag();
        ctl.end_drag(10_000.0, &mut e);
        match ctl.state() {
            MotionState::Idle { since_ms, wait_ms } => {
                assert_eq!(since_ms, 10_000.0);
                assert!((3000.0..=5000.0).contains(&wait_ms));
            }
            other => panic!("expected Idle, got {other:?}"),
        }
        // a frame inside the wait window does not move
        e.now = 10_500.0;
        let p = ctl.position();
        ctl.tick(&mut e);
        assert_eq!(ctl.position(), p);
    }

    #[test]
    fn pose_uses_run_image_while_moving() {
        let mut e = env();
        let cfg = BuddyConfig::default();
        let mut ctl = MotionController::new(cfg.clone(), 140.0, e.viewport, 0.0);
        assert!(cfg.idle_images.iter().any(|i| i == ctl.pose().image));
        e.now = 16.0;
        ctl.tick(&mut e);
        assert!(cfg.run_images.iter().any(|i| i == ctl.pose().image));
        let tilt = ctl.pose().tilt_deg;
        assert!((-10.0..=10.0).contains(&tilt));
        assert!(ctl.pose().bob.abs() <= 3.0);
    }
}
