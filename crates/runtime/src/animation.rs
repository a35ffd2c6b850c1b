use foundation::time::Duration;

/// Result of advancing an [`Animation`] by one frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    Running,
    Done,
}

/// A unit of frame-driven work owned by the [`Scheduler`](crate::Scheduler).
///
/// `Ctx` is the mutable state the animation writes to (camera, body
/// transforms, ...). Animations never reschedule themselves; the scheduler
/// calls [`Animation::advance`] once per frame until it reports
/// [`Status::Done`], then calls [`Animation::finish`] exactly once.
pub trait Animation<Ctx> {
    /// Stable label used for ordering and cancel-by-label.
    fn label(&self) -> &'static str;

    /// Completion fraction in `[0, 1]`.
    fn progress(&self) -> f64;

    fn advance(&mut self, dt_s: f64, ctx: &mut Ctx) -> Status;

    /// Called once after `advance` returned [`Status::Done`].
    fn finish(&mut self, _ctx: &mut Ctx) {}

    /// Called instead of `finish` when the animation is cancelled.
    fn cancel(&mut self, _ctx: &mut Ctx) {}
}

/// A cancellable timer. Completes after `duration` of accumulated frame time.
#[derive(Debug, Clone)]
pub struct Delay {
    label: &'static str,
    duration: Duration,
    elapsed_s: f64,
}

impl Delay {
    pub fn new(label: &'static str, duration: Duration) -> Self {
        Self {
            label,
            duration,
            elapsed_s: 0.0,
        }
    }

    pub fn from_millis(label: &'static str, ms: f64) -> Self {
        Self::new(label, Duration::from_millis(ms))
    }
}

impl<Ctx> Animation<Ctx> for Delay {
    fn label(&self) -> &'static str {
        self.label
    }

    fn progress(&self) -> f64 {
        self.duration.progress(self.elapsed_s)
    }

    fn advance(&mut self, dt_s: f64, _ctx: &mut Ctx) -> Status {
        self.elapsed_s += dt_s.max(0.0);
        if self.duration.progress(self.elapsed_s) >= 1.0 {
            Status::Done
        } else {
            Status::Running
        }
    }
}
