use foundation::time::Time;

/// Largest step a single frame may advance, in seconds.
///
/// Hosts that stall (background tabs, debugger pauses) would otherwise hand
/// animations one huge delta and skip them straight to the end.
pub const MAX_FRAME_DT_S: f64 = 0.1;

/// Deterministic frame metadata.
///
/// This is the primary timebase for the runtime. It is intentionally small and
/// pure so tests can feed synthetic deltas instead of wall-clock time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time since the previous frame (seconds).
    pub dt_s: f64,
    /// Runtime time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    /// A fixed-timestep frame.
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn first() -> Self {
        Self::new(0, 0.0)
    }

    /// Next frame with the same step.
    pub fn next(self) -> Self {
        self.advance(self.dt_s)
    }

    /// Next frame with an explicit step.
    pub fn advance(self, dt_s: f64) -> Self {
        let dt_s = dt_s.max(0.0);
        Self {
            index: self.index + 1,
            dt_s,
            time: self.time.add_seconds(dt_s),
        }
    }
}

/// Turns host timestamps (e.g. `requestAnimationFrame` milliseconds) into
/// [`Frame`]s with clamped deltas.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    frame: Frame,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_ms: None,
            frame: Frame::first(),
        }
    }

    /// Current frame (the one most recently produced by [`FrameClock::tick`]).
    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn tick(&mut self, now_ms: f64) -> Frame {
        let dt_s = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, MAX_FRAME_DT_S),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        self.frame = self.frame.advance(dt_s);
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::{Frame, FrameClock, MAX_FRAME_DT_S};
    use foundation::time::Time;

    #[test]
    fn frame_time_is_deterministic() {
        let a = Frame::new(10, 1.0 / 60.0);
        let b = Frame::new(10, 1.0 / 60.0);
        assert_eq!(a, b);
        assert_eq!(a.time, Time(10.0 / 60.0));
    }

    #[test]
    fn next_advances_index_and_time() {
        let f0 = Frame::new(0, 0.5);
        let f1 = f0.next();
        assert_eq!(f1.index, 1);
        assert_eq!(f1.time, Time(0.5));
    }

    #[test]
    fn advance_accumulates_variable_steps() {
        let f = Frame::first().advance(0.25).advance(0.5);
        assert_eq!(f.index, 2);
        assert_eq!(f.dt_s, 0.5);
        assert_eq!(f.time, Time(0.75));
    }

    #[test]
    fn clock_first_tick_has_zero_dt() {
        let mut clock = FrameClock::new();
        let f = clock.tick(1_000.0);
        assert_eq!(f.dt_s, 0.0);
        let f = clock.tick(1_016.0);
        assert!((f.dt_s - 0.016).abs() < 1e-12);
    }

    #[test]
    fn clock_clamps_stalls_and_backwards_time() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        assert_eq!(clock.tick(5_000.0).dt_s, MAX_FRAME_DT_S);
        assert_eq!(clock.tick(4_000.0).dt_s, 0.0);
    }
}
