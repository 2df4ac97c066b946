//! Ambient inputs the mascot simulation reads each frame.
//!
//! Everything the state machine would otherwise pull from global browser state
//! (window size, the performance clock, `Math.random`) goes through the
//! [`Environment`] trait so the simulation runs natively under `cargo test`.

/// Inner size of the visible viewport, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Largest of the two dimensions; wander speed scales with it.
    pub fn larger_dimension(&self) -> f64 {
        self.width.max(self.height)
    }
}

/// Source of uniformly distributed numbers in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// Random index into a collection of `len` items (0 when empty).
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let idx = (self.next_unit() * len as f64).floor() as usize;
        idx.min(len - 1)
    }
}

/// Everything the motion controller needs from the host.
pub trait Environment: RandomSource {
    fn viewport(&self) -> Viewport;
    /// Monotonic milliseconds (performance.now() in the browser).
    fn now_ms(&self) -> f64;
}

/// Deterministic generator for tests and for hosts without a crypto RNG.
/// Linear congruential step, same constants as the classic Numerical Recipes LCG.
#[derive(Clone, Debug)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl RandomSource for Lcg {
    fn next_unit(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        // top 53 bits -> [0, 1)
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);
    impl RandomSource for Fixed {
        fn next_unit(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn pick_index_stays_in_range() {
        assert_eq!(Fixed(0.0).pick_index(3), 0);
        assert_eq!(Fixed(0.999_999).pick_index(3), 2);
        // some sources return exactly 1.0
        assert_eq!(Fixed(1.0).pick_index(3), 2);
        assert_eq!(Fixed(0.5).pick_index(0), 0);
    }

    #[test]
    fn lcg_is_unit_interval_and_deterministic() {
        let mut a = Lcg::new(7);
        let mut b = Lcg::new(7);
        for _ in 0..1000 {
            let x = a.next_unit();
            assert!((0.0..1.0).contains(&x));
            assert_eq!(x, b.next_unit());
        }
    }

    #[test]
    fn larger_dimension() {
        assert_eq!(Viewport::new(1280.0, 720.0).larger_dimension(), 1280.0);
        assert_eq!(Viewport::new(390.0, 844.0).larger_dimension(), 844.0);
    }
}
