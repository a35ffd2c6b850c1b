use serde::{Deserialize, Serialize};

use crate::dataset::Timeline;
use crate::hierarchy::NodePath;
use crate::node::TimelineNode;

/// How long playback lingers on an item.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dwell {
    /// Items starting before this year get `deep_time_ms`.
    pub deep_time_year: i64,
    pub deep_time_ms: f64,
    pub recent_ms: f64,
}

impl Default for Dwell {
    fn default() -> Self {
        Self {
            deep_time_year: -1_000_000,
            deep_time_ms: 2000.0,
            recent_ms: 1500.0,
        }
    }
}

impl Dwell {
    pub fn for_year(&self, year_start: i64) -> f64 {
        if year_start < self.deep_time_year {
            self.deep_time_ms
        } else {
            self.recent_ms
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackItem {
    pub path: NodePath,
    pub id: String,
    pub value: f64,
    pub year_start: i64,
}

/// Every node of a timeline, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaybackQueue {
    items: Vec<PlaybackItem>,
}

impl PlaybackQueue {
    pub fn build(timeline: &Timeline) -> Self {
        let mut items = Vec::new();
        flatten(&timeline.items, None, &mut items);
        items.sort_by_key(|item| item.year_start);
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlaybackItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[PlaybackItem] {
        &self.items
    }

    /// First item not older than `present_year`, or the oldest item.
    pub fn start_index(&self, present_year: i64) -> usize {
        self.items
            .iter()
            .position(|item| item.year_start >= present_year)
            .unwrap_or(0)
    }
}

fn flatten(nodes: &[TimelineNode], parent: Option<&NodePath>, out: &mut Vec<PlaybackItem>) {
    for (index, node) in nodes.iter().enumerate() {
        let path = match parent {
            Some(parent) => parent.child(index),
            None => NodePath::root(index),
        };
        out.push(PlaybackItem {
            path: path.clone(),
            id: node.id.clone(),
            value: node.value,
            year_start: node.year_start,
        });
        flatten(&node.children, Some(&path), out);
    }
}

#[cfg(test)]
mod tests {
    use super::{Dwell, PlaybackQueue};
    use crate::PRESENT_YEAR;
    use crate::dataset::Timeline;

    #[test]
    fn queue_is_chronological_and_complete() {
        let timeline = Timeline::earth().unwrap();
        let queue = PlaybackQueue::build(&timeline);
        assert_eq!(queue.len(), timeline.node_count());
        assert!(
            queue
                .items()
                .windows(2)
                .all(|w| w[0].year_start <= w[1].year_start)
        );
        assert_eq!(queue.get(0).map(|i| i.id.as_str()), Some("hadean"));
    }

    #[test]
    fn equal_starts_keep_tree_order() {
        let queue = PlaybackQueue::build(&Timeline::earth().unwrap());
        let ids: Vec<&str> = queue
            .items()
            .iter()
            .filter(|i| i.year_start == -541_000_000)
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, ["phanerozoic", "paleozoic", "cambrian"]);
    }

    #[test]
    fn starts_from_oldest_when_nothing_is_current() {
        let queue = PlaybackQueue::build(&Timeline::earth().unwrap());
        assert_eq!(queue.start_index(PRESENT_YEAR), 0);
        assert_eq!(queue.start_index(i64::MIN), 0);
        let from_cenozoic = queue.start_index(-66_000_000);
        assert_eq!(queue.get(from_cenozoic).unwrap().id, "cenozoic");
    }

    #[test]
    fn dwell_depends_on_age() {
        let dwell = Dwell::default();
        assert_eq!(dwell.for_year(-4_600_000_000), 2000.0);
        assert_eq!(dwell.for_year(-1_000_000), 1500.0);
        assert_eq!(dwell.for_year(-12_000), 1500.0);
    }
}
