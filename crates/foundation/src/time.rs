/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn from_millis(ms: f64) -> Self {
        Self(ms / 1000.0)
    }

    pub fn as_millis(self) -> f64 {
        self.0 * 1000.0
    }

    pub fn add_seconds(self, dt_s: f64) -> Self {
        Self(self.0 + dt_s)
    }
}

/// A span of wall-clock duration, in seconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Duration(pub f64);

impl Duration {
    pub fn from_millis(ms: f64) -> Self {
        Self(ms / 1000.0)
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// Fraction of this duration covered by `elapsed_s`, clamped to `[0, 1]`.
    ///
    /// A zero-length duration is complete immediately.
    pub fn progress(self, elapsed_s: f64) -> f64 {
        if self.0 <= 0.0 {
            return 1.0;
        }
        (elapsed_s / self.0).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Duration, Time};

    #[test]
    fn millis_round_trip() {
        let t = Time::from_millis(1500.0);
        assert_eq!(t, Time(1.5));
        assert_eq!(t.as_millis(), 1500.0);
    }

    #[test]
    fn progress_is_clamped() {
        let d = Duration::from_millis(1000.0);
        assert_eq!(d.progress(-1.0), 0.0);
        assert_eq!(d.progress(0.5), 0.5);
        assert_eq!(d.progress(3.0), 1.0);
        assert_eq!(Duration(0.0).progress(0.0), 1.0);
    }
}
