use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Shared handle to a clock that only moves when told to. Clones observe the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t.clamp(0.0, 1.0)).powi(3)
}

pub fn ease_out_quad(t: f64) -> f64 {
    1.0 - (1.0 - t.clamp(0.0, 1.0)).powi(2)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    OutCubic,
    OutQuad,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::OutCubic => ease_out_cubic(t),
            Self::OutQuad => ease_out_quad(t),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl CameraPose {
    pub fn lerp(self, target: Self, t: f64) -> Self {
        Self {
            pan_x: self.pan_x + (target.pan_x - self.pan_x) * t,
            pan_y: self.pan_y + (target.pan_y - self.pan_y) * t,
            zoom: self.zoom + (target.zoom - self.zoom) * t,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: CameraPose,
    to: CameraPose,
    start_ms: f64,
    duration_ms: f64,
    easing: Easing,
    steps: Option<u32>,
}

impl Tween {
    pub fn new(from: CameraPose, to: CameraPose, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing: Easing::OutCubic,
            steps: None,
        }
    }

    /// Quantizes progress into `steps` equal jumps.
    pub fn stepped(mut self, steps: u32, easing: Easing) -> Self {
        self.steps = Some(steps.max(1));
        self.easing = easing;
        self
    }

    pub fn target(&self) -> CameraPose {
        self.to
    }

    /// Pose at `now_ms` and whether the tween has finished. The finishing frame is
    /// exactly the target.
    pub fn sample(&self, now_ms: f64) -> (CameraPose, bool) {
        let elapsed = (now_ms - self.start_ms).max(0.0);
        if self.duration_ms <= 0.0 {
            return (self.to, true);
        }

        let progress = match self.steps {
            Some(steps) => {
                let interval = (self.duration_ms / f64::from(steps)).floor().max(1.0);
                let step = (elapsed / interval).floor().min(f64::from(steps));
                step / f64::from(steps)
            }
            None => (elapsed / self.duration_ms).min(1.0),
        };

        if progress >= 1.0 {
            (self.to, true)
        } else {
            (self.from.lerp(self.to, self.easing.apply(progress)), false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FROM: CameraPose = CameraPose {
        pan_x: 0.0,
        pan_y: 0.0,
        zoom: 1.0,
    };
    const TO: CameraPose = CameraPose {
        pan_x: 100.0,
        pan_y: -50.0,
        zoom: 2.0,
    };

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
        assert!((ease_out_quad(0.5) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn tween_lands_exactly_on_target() {
        let tween = Tween::new(FROM, TO, 1000.0, 300.0);
        let (mid, done) = tween.sample(1150.0);
        assert!(!done);
        assert!((mid.pan_x - 87.5).abs() < 1e-9);

        let (end, done) = tween.sample(1300.0);
        assert!(done);
        assert_eq!(end, TO);
        assert_eq!(tween.sample(5000.0), (TO, true));
    }

    #[test]
    fn stepped_tween_moves_in_jumps() {
        let tween = Tween::new(FROM, TO, 0.0, 160.0).stepped(8, Easing::OutQuad);
        assert_eq!(tween.sample(5.0), (FROM, false));
        assert_eq!(tween.sample(19.0).0, FROM);

        let (first, _) = tween.sample(20.0);
        let expected = ease_out_quad(1.0 / 8.0);
        assert!((first.zoom - (1.0 + expected)).abs() < 1e-12);
        assert_eq!(tween.sample(160.0), (TO, true));
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        assert_eq!(Tween::new(FROM, TO, 0.0, 0.0).sample(0.0), (TO, true));
    }

    #[test]
    fn manual_clock_handles_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance(16.0);
        assert_eq!(other.now_ms(), 16.0);
    }
}
