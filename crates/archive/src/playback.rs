use timeline::{PlaybackItem, PlaybackQueue, Timeline};
use tracing::debug;

/// Label of the dwell timer between playback steps.
pub const PLAYBACK_TIMER: &str = "playback";

/// Walks the chronological queue one item per dwell.
#[derive(Debug, Clone)]
pub struct PlaybackDriver {
    queue: PlaybackQueue,
    cursor: Option<usize>,
}

impl PlaybackDriver {
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            queue: PlaybackQueue::build(timeline),
            cursor: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    pub fn current(&self) -> Option<&PlaybackItem> {
        self.cursor.and_then(|i| self.queue.get(i))
    }

    /// Begins at the queue's start index. `None` for an empty queue.
    pub fn start(&mut self, present_year: i64) -> Option<&PlaybackItem> {
        if self.queue.is_empty() {
            return None;
        }
        self.cursor = Some(self.queue.start_index(present_year));
        self.current()
    }

    /// Moves to the next item; stops past the end.
    pub fn step(&mut self) -> Option<&PlaybackItem> {
        let next = self.cursor? + 1;
        if next >= self.queue.len() {
            debug!("playback reached the end of the queue");
            self.cursor = None;
            return None;
        }
        self.cursor = Some(next);
        self.current()
    }

    pub fn stop(&mut self) {
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::PlaybackDriver;
    use timeline::Timeline;

    #[test]
    fn walks_the_queue_and_stops_at_the_end() {
        let timeline = Timeline::earth().unwrap();
        let mut driver = PlaybackDriver::new(&timeline);
        assert!(!driver.is_playing());
        assert_eq!(driver.start(2026).map(|i| i.id.as_str()), Some("hadean"));

        let mut steps = 0;
        while driver.step().is_some() {
            steps += 1;
        }
        assert_eq!(steps, driver.queue().len() - 1);
        assert!(!driver.is_playing());
        assert!(driver.step().is_none());
    }

    #[test]
    fn stop_clears_cursor() {
        let mut driver = PlaybackDriver::new(&Timeline::earth().unwrap());
        driver.start(2026);
        driver.stop();
        assert!(driver.current().is_none());
    }
}
