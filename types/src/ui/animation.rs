use std::time::{Duration, Instant};

pub(crate) fn normalized_progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }

    let elapsed = elapsed.as_secs_f32();
    let total = duration.as_secs_f32();
    (elapsed / total).clamp(0.0, 1.0)
}

/// A fixed-duration timer anchored at an absolute start instant.
///
/// Progress is a pure function of `now`, so the owner never has to
/// accumulate frame deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectTimer {
    started_at: Instant,
    duration: Duration,
}

impl EffectTimer {
    #[must_use]
    pub fn new(started_at: Instant, duration: Duration) -> Self {
        Self {
            started_at,
            duration,
        }
    }

    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn ends_at(&self) -> Instant {
        self.started_at + self.duration
    }

    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    #[must_use]
    pub fn progress(&self, now: Instant) -> f32 {
        normalized_progress(self.elapsed(now), self.duration)
    }

    #[must_use]
    pub fn is_finished(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.duration
    }
}

/// Quadratic ease-in-out on `[0, 1]`.
#[must_use]
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[must_use]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

#[must_use]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::{EffectTimer, ease_in_out_quad, ease_out_cubic};
    use std::time::{Duration, Instant};

    #[test]
    fn timer_runs_then_completes() {
        let start = Instant::now();
        let timer = EffectTimer::new(start, Duration::from_millis(200));
        assert!(!timer.is_finished(start));
        assert!(timer.progress(start) < 0.1);

        let halfway = start + Duration::from_millis(100);
        assert!(!timer.is_finished(halfway));
        assert!((timer.progress(halfway) - 0.5).abs() < 0.01);

        assert!(timer.is_finished(start + Duration::from_millis(250)));
    }

    #[test]
    fn zero_duration_immediately_completed() {
        let start = Instant::now();
        let timer = EffectTimer::new(start, Duration::ZERO);
        assert!(timer.is_finished(start));
        assert!((timer.progress(start) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn instant_before_start_counts_as_zero() {
        let start = Instant::now() + Duration::from_secs(1);
        let timer = EffectTimer::new(start, Duration::from_millis(100));
        assert_eq!(timer.elapsed(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn ease_in_out_quad_endpoints_and_midpoint() {
        assert!(ease_in_out_quad(0.0).abs() < f32::EPSILON);
        assert!((ease_in_out_quad(1.0) - 1.0).abs() < f32::EPSILON);
        assert!((ease_in_out_quad(0.5) - 0.5).abs() < f32::EPSILON);
        assert!((ease_in_out_quad(0.25) - 0.125).abs() < 1e-6);
        assert!((ease_in_out_quad(0.75) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn ease_out_cubic_is_monotonic() {
        let mut last = 0.0;
        for step in 0..=10 {
            let value = ease_out_cubic(step as f32 / 10.0);
            assert!(value >= last);
            last = value;
        }
    }
}
