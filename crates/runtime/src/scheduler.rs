use tracing::trace;

use crate::animation::{Animation, Status};
use crate::frame::Frame;

/// Handle returned by [`Scheduler::start`]. Unique per scheduler.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

/// An animation that reached [`Status::Done`] during a tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Completed {
    pub id: AnimationId,
    pub label: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub advanced: usize,
    pub completed: Vec<Completed>,
}

impl TickSummary {
    pub fn completed_label(&self, label: &str) -> bool {
        self.completed.iter().any(|c| c.label == label)
    }
}

struct Slot<Ctx> {
    id: AnimationId,
    priority: i32,
    animation: Box<dyn Animation<Ctx>>,
}

/// Central frame scheduler for every active animation.
///
/// Each [`Scheduler::tick`] advances all active animations exactly once, in a
/// deterministic `(priority, label, insertion_order)` order, and retires the
/// ones that finished.
pub struct Scheduler<Ctx> {
    next_order: u64,
    slots: Vec<Slot<Ctx>>,
}

impl<Ctx> Default for Scheduler<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> Scheduler<Ctx> {
    pub fn new() -> Self {
        Self {
            next_order: 0,
            slots: Vec::new(),
        }
    }

    pub fn start(&mut self, animation: Box<dyn Animation<Ctx>>) -> AnimationId {
        self.start_with_priority(0, animation)
    }

    /// Smaller priorities run earlier within a frame.
    pub fn start_with_priority(
        &mut self,
        priority: i32,
        animation: Box<dyn Animation<Ctx>>,
    ) -> AnimationId {
        let id = AnimationId(self.next_order);
        self.next_order = self.next_order.wrapping_add(1);
        trace!(label = animation.label(), ?id, "animation started");
        self.slots.push(Slot {
            id,
            priority,
            animation,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_active(&self, id: AnimationId) -> bool {
        self.slots.iter().any(|s| s.id == id)
    }

    pub fn is_running(&self, label: &str) -> bool {
        self.slots.iter().any(|s| s.animation.label() == label)
    }

    pub fn progress(&self, id: AnimationId) -> Option<f64> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.animation.progress())
    }

    /// Cancels one animation. Returns `true` if it was active.
    pub fn cancel(&mut self, id: AnimationId, ctx: &mut Ctx) -> bool {
        let Some(pos) = self.slots.iter().position(|s| s.id == id) else {
            return false;
        };
        let mut slot = self.slots.remove(pos);
        slot.animation.cancel(ctx);
        trace!(label = slot.animation.label(), ?id, "animation cancelled");
        true
    }

    /// Cancels every animation with `label`. Returns how many were cancelled.
    pub fn cancel_label(&mut self, label: &str, ctx: &mut Ctx) -> usize {
        let (cancelled, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.slots)
            .into_iter()
            .partition(|s| s.animation.label() == label);
        self.slots = kept;
        let count = cancelled.len();
        for mut slot in cancelled {
            slot.animation.cancel(ctx);
        }
        if count > 0 {
            trace!(label, count, "animations cancelled");
        }
        count
    }

    /// Advances every active animation by `frame.dt_s`.
    pub fn tick(&mut self, frame: Frame, ctx: &mut Ctx) -> TickSummary {
        // Total ordering: (priority, label, insertion_order).
        self.slots.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.animation.label().cmp(b.animation.label()))
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut summary = TickSummary::default();
        let mut kept = Vec::with_capacity(self.slots.len());
        for mut slot in std::mem::take(&mut self.slots) {
            summary.advanced += 1;
            match slot.animation.advance(frame.dt_s, ctx) {
                Status::Running => kept.push(slot),
                Status::Done => {
                    slot.animation.finish(ctx);
                    summary.completed.push(Completed {
                        id: slot.id,
                        label: slot.animation.label(),
                    });
                }
            }
        }
        self.slots = kept;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::Scheduler;
    use crate::animation::{Animation, Delay, Status};
    use crate::frame::Frame;

    /// Appends its tag to the context log every frame, for `frames` frames.
    struct Tagger {
        label: &'static str,
        frames: u32,
        seen: u32,
    }

    impl Animation<Vec<String>> for Tagger {
        fn label(&self) -> &'static str {
            self.label
        }

        fn progress(&self) -> f64 {
            self.seen as f64 / self.frames as f64
        }

        fn advance(&mut self, _dt_s: f64, log: &mut Vec<String>) -> Status {
            self.seen += 1;
            log.push(self.label.to_string());
            if self.seen >= self.frames {
                Status::Done
            } else {
                Status::Running
            }
        }

        fn finish(&mut self, log: &mut Vec<String>) {
            log.push(format!("{}:finish", self.label));
        }

        fn cancel(&mut self, log: &mut Vec<String>) {
            log.push(format!("{}:cancel", self.label));
        }
    }

    fn tagger(label: &'static str, frames: u32) -> Box<Tagger> {
        Box::new(Tagger {
            label,
            frames,
            seen: 0,
        })
    }

    #[test]
    fn runs_in_stable_label_order() {
        let mut sched: Scheduler<Vec<String>> = Scheduler::new();
        sched.start(tagger("b", 1));
        sched.start(tagger("a", 1));

        let mut log: Vec<String> = Vec::new();
        sched.tick(Frame::new(0, 1.0), &mut log);
        assert_eq!(log, vec!["a", "a:finish", "b", "b:finish"]);
    }

    #[test]
    fn runs_higher_priority_first() {
        let mut sched: Scheduler<Vec<String>> = Scheduler::new();
        sched.start_with_priority(10, tagger("a", 1));
        sched.start_with_priority(-1, tagger("b", 1));

        let mut log: Vec<String> = Vec::new();
        sched.tick(Frame::new(0, 1.0), &mut log);
        assert_eq!(log, vec!["b", "b:finish", "a", "a:finish"]);
    }

    #[test]
    fn finish_runs_exactly_once() {
        let mut sched: Scheduler<Vec<String>> = Scheduler::new();
        sched.start(tagger("a", 2));

        let mut log: Vec<String> = Vec::new();
        let first = sched.tick(Frame::new(0, 1.0), &mut log);
        assert!(first.completed.is_empty());
        let second = sched.tick(Frame::new(1, 1.0), &mut log);
        assert!(second.completed_label("a"));
        sched.tick(Frame::new(2, 1.0), &mut log);

        assert_eq!(log.iter().filter(|l| *l == "a:finish").count(), 1);
        assert!(sched.is_empty());
    }

    #[test]
    fn cancel_by_label_skips_finish() {
        let mut sched: Scheduler<Vec<String>> = Scheduler::new();
        sched.start(tagger("a", 5));
        sched.start(tagger("keep", 5));

        let mut log: Vec<String> = Vec::new();
        assert_eq!(sched.cancel_label("a", &mut log), 1);
        assert!(!sched.is_running("a"));
        assert!(sched.is_running("keep"));
        assert_eq!(log, vec!["a:cancel"]);
    }

    #[test]
    fn cancel_by_id() {
        let mut sched: Scheduler<Vec<String>> = Scheduler::new();
        let id = sched.start(Box::new(Delay::from_millis("timer", 10.0)));
        assert!(sched.is_active(id));
        assert_eq!(sched.progress(id), Some(0.0));

        let mut log: Vec<String> = Vec::new();
        assert!(sched.cancel(id, &mut log));
        assert!(!sched.cancel(id, &mut log));
        assert!(sched.is_empty());
    }
}
