use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::TimelineError;
use crate::node::TimelineNode;

const EARTH_TIMELINE_JSON: &str = include_str!("../data/earth_timeline.json");

/// The root level of a timeline tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub label: String,
    pub items: Vec<TimelineNode>,
}

impl Timeline {
    /// The built-in Earth history dataset.
    pub fn earth() -> Result<Self, TimelineError> {
        Self::from_json(EARTH_TIMELINE_JSON)
    }

    /// Parses and validates a dataset.
    pub fn from_json(json: &str) -> Result<Self, TimelineError> {
        let timeline: Timeline = serde_json::from_str(json)?;
        timeline.validate()?;
        Ok(timeline)
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        for item in &self.items {
            item.walk(&mut |_| count += 1);
        }
        count
    }

    pub fn validate(&self) -> Result<(), TimelineError> {
        let mut ids = HashSet::new();
        validate_siblings(&self.items, None, &mut ids)
    }
}

fn validate_siblings<'a>(
    items: &'a [TimelineNode],
    parent: Option<&TimelineNode>,
    ids: &mut HashSet<&'a str>,
) -> Result<(), TimelineError> {
    let mut values: Vec<f64> = Vec::with_capacity(items.len());
    let mut previous_start: Option<i64> = None;

    for node in items {
        if !ids.insert(node.id.as_str()) {
            return Err(invalid(format!("duplicate id `{}`", node.id)));
        }
        if node.year_start >= node.year_end {
            return Err(invalid(format!(
                "`{}` starts at {} but ends at {}",
                node.id, node.year_start, node.year_end
            )));
        }
        if !(0.0..=100.0).contains(&node.value) {
            return Err(invalid(format!(
                "`{}` has value {} outside 0..=100",
                node.id, node.value
            )));
        }
        if values.contains(&node.value) {
            return Err(invalid(format!(
                "`{}` reuses sibling value {}",
                node.id, node.value
            )));
        }
        values.push(node.value);

        if previous_start.is_some_and(|start| node.year_start < start) {
            return Err(invalid(format!("`{}` is out of chronological order", node.id)));
        }
        previous_start = Some(node.year_start);

        if let Some(parent) = parent {
            if node.year_start < parent.year_start || node.year_end > parent.year_end {
                return Err(invalid(format!(
                    "`{}` lies outside its parent `{}`",
                    node.id, parent.id
                )));
            }
        }

        validate_siblings(&node.children, Some(node), ids)?;
    }
    Ok(())
}

fn invalid(message: String) -> TimelineError {
    TimelineError::InvalidDataset(message)
}
