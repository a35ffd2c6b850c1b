use serde::Serialize;
use tracing::{debug, info};

use crate::dataset::Timeline;
use crate::error::TimelineError;
use crate::hierarchy::{HierarchyStore, NavigationLevel, NodePath};
use crate::locator::locate_index;
use crate::node::TimelineNode;

/// Longest breadcrumb shown, preview segment included.
pub const MAX_BREADCRUMB_SEGMENTS: usize = 4;

/// A level left behind by a drill-down, with the label of that level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub level: NavigationLevel,
    pub label: String,
    pub visited: NodePath,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentState {
    Visited,
    Current,
    Preview,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreadcrumbSegment {
    pub index: usize,
    pub label: String,
    pub state: SegmentState,
}

/// Levels entered by drilling down, ending with the current one.
///
/// Empty at the top level. `preview` names the level one step deeper.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Breadcrumb {
    pub segments: Vec<BreadcrumbSegment>,
    pub preview: Option<BreadcrumbSegment>,
}

impl Breadcrumb {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.segments
            .iter()
            .chain(self.preview.iter())
            .map(|s| s.label.as_str())
            .collect()
    }
}

/// Drill-down/drill-up state over a [`HierarchyStore`].
#[derive(Debug, Clone)]
pub struct Navigator {
    store: HierarchyStore,
    history: Vec<HistoryEntry>,
    displayed: Option<NodePath>,
}

impl Navigator {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            store: HierarchyStore::new(timeline),
            history: Vec::new(),
            displayed: None,
        }
    }

    pub fn store(&self) -> &HierarchyStore {
        &self.store
    }

    pub fn current_level(&self) -> &NavigationLevel {
        self.store.current_level()
    }

    pub fn current_items(&self) -> &[TimelineNode] {
        self.store.current_items()
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn displayed(&self) -> Option<&TimelineNode> {
        self.displayed.as_ref().and_then(|p| self.store.node(p))
    }

    pub fn displayed_path(&self) -> Option<&NodePath> {
        self.displayed.as_ref()
    }

    /// Level the scrubber lays out: the current level, or the parent's
    /// siblings when the current level has no items.
    pub fn scrubber_level(&self) -> NavigationLevel {
        let current = self.store.current_level();
        if self.store.items(current).is_empty() {
            if let Some(parent) = &current.parent {
                return self.store.level_of(parent);
            }
        }
        current.clone()
    }

    pub fn scrubber_items(&self) -> &[TimelineNode] {
        let level = self.scrubber_level();
        self.store.items(&level)
    }

    /// Marks the node at `path` as shown in the detail panel.
    pub fn show(&mut self, path: NodePath) -> Result<&TimelineNode, TimelineError> {
        if self.store.node(&path).is_none() {
            return Err(TimelineError::NothingDisplayed);
        }
        self.displayed = Some(path);
        self.displayed().ok_or(TimelineError::NothingDisplayed)
    }

    /// Path of the scrubber-level item nearest to `position`.
    pub fn path_at(&self, position: f64) -> Result<NodePath, TimelineError> {
        let level = self.scrubber_level();
        let index = locate_index(position, self.store.items(&level))?;
        Ok(self.store.path_in(&level, index))
    }

    /// Shows the scrubber-level item nearest to `position`.
    pub fn show_at(&mut self, position: f64) -> Result<&TimelineNode, TimelineError> {
        let path = self.path_at(position)?;
        self.show(path)
    }

    /// Item under a scrubber position, without changing what is shown.
    pub fn peek_at(&self, position: f64) -> Result<&TimelineNode, TimelineError> {
        let items = self.scrubber_items();
        locate_index(position, items).map(|i| &items[i])
    }

    /// Enters `child_id`: a child of the displayed node, or the displayed
    /// node itself when it has not been entered yet.
    ///
    /// History is rebuilt from the entered node's ancestry, so breadcrumb
    /// segment `i` always names the level `navigate_to_ancestor(i)` restores.
    /// A refused entry leaves every piece of state untouched.
    pub fn drill_down(&mut self, child_id: &str) -> Result<&TimelineNode, TimelineError> {
        let displayed = self.displayed.clone().ok_or(TimelineError::NothingDisplayed)?;
        let Some(target) = self.entry_target(&displayed, child_id) else {
            debug!(child_id, "drill-down refused: not enterable from the displayed node");
            return Err(TimelineError::UnknownChild {
                id: child_id.to_string(),
            });
        };

        self.history = target
            .ancestry()
            .into_iter()
            .map(|visited| {
                let level = self.store.level_of(&visited);
                HistoryEntry {
                    label: level.label.clone(),
                    level,
                    visited,
                }
            })
            .collect();
        info!(child = child_id, depth = self.history.len(), "drill down");

        let level = self.store.level_under(Some(target.clone()));
        self.store.set_current_level(level);
        self.show(target)
    }

    fn entry_target(&self, displayed: &NodePath, id: &str) -> Option<NodePath> {
        if let Some(child) = self.store.find_child(displayed, id) {
            return Some(child);
        }
        let entered = self.store.current_level().parent.as_ref() == Some(displayed);
        let node = self.store.node(displayed)?;
        (!entered && node.id == id).then(|| displayed.clone())
    }

    /// Returns to breadcrumb level `index` (0 = top) and closes the panel.
    pub fn navigate_to_ancestor(&mut self, index: usize) -> Result<&NavigationLevel, TimelineError> {
        let depth = self.history.len();
        if index > depth {
            debug!(index, depth, "breadcrumb level out of range");
            return Err(TimelineError::UnknownLevel { index, depth });
        }
        if index < depth {
            let level = self.history[index].level.clone();
            self.history.truncate(index);
            self.store.set_current_level(level);
        }
        self.displayed = None;
        info!(index, "navigate to ancestor");
        Ok(self.store.current_level())
    }

    pub fn reset_to_present(&mut self) {
        self.history.clear();
        let root = self.store.root();
        self.store.set_current_level(root);
        self.displayed = None;
    }

    pub fn close(&mut self) {
        self.displayed = None;
    }

    /// Names of the nodes drilled into, outermost first.
    pub fn trail(&self) -> Vec<&str> {
        self.history
            .iter()
            .filter_map(|e| self.store.node(&e.visited))
            .map(|n| n.name.as_str())
            .collect()
    }

    pub fn breadcrumb(&self) -> Breadcrumb {
        if self.history.is_empty() {
            return Breadcrumb::default();
        }

        let mut segments: Vec<BreadcrumbSegment> = self
            .history
            .iter()
            .enumerate()
            .map(|(index, entry)| BreadcrumbSegment {
                index,
                label: entry.label.clone(),
                state: SegmentState::Visited,
            })
            .collect();
        segments.push(BreadcrumbSegment {
            index: self.history.len(),
            label: self.store.current_level().label.clone(),
            state: SegmentState::Current,
        });
        segments.truncate(MAX_BREADCRUMB_SEGMENTS);

        let preview = if segments.len() < MAX_BREADCRUMB_SEGMENTS {
            self.next_level_label().map(|label| BreadcrumbSegment {
                index: segments.len(),
                label: label.to_string(),
                state: SegmentState::Preview,
            })
        } else {
            None
        };

        Breadcrumb { segments, preview }
    }

    fn next_level_label(&self) -> Option<&'static str> {
        self.store
            .current_items()
            .iter()
            .flat_map(|n| n.children.first())
            .map(|c| c.kind.plural_label())
            .next()
    }
}

#[cfg(test)]
mod tests {
    use super::{Navigator, SegmentState};
    use crate::dataset::Timeline;
    use crate::error::TimelineError;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn navigator() -> Navigator {
        Navigator::new(Timeline::earth().expect("dataset"))
    }

    fn ids(nav: &Navigator) -> Vec<&str> {
        nav.current_items().iter().map(|n| n.id.as_str()).collect()
    }

    fn open(nav: &mut Navigator, id: &str) {
        let path = nav.store().path_of(id).expect("known id");
        nav.show(path).expect("show");
    }

    #[test]
    fn deep_dive_and_return() {
        let mut nav = navigator();
        assert_eq!(nav.current_items().len(), 4);

        nav.show_at(65.0).unwrap();
        nav.drill_down("phanerozoic").unwrap();
        assert_eq!(ids(&nav), ["paleozoic", "mesozoic", "cenozoic"]);

        nav.drill_down("cenozoic").unwrap();
        assert_eq!(ids(&nav), ["paleogene", "neogene", "quaternary"]);
        assert_eq!(nav.trail(), ["Phanerozoic", "Cenozoic"]);

        nav.navigate_to_ancestor(1).unwrap();
        assert_eq!(ids(&nav), ["paleozoic", "mesozoic", "cenozoic"]);
        assert_eq!(nav.breadcrumb().len(), 2);
        assert!(nav.displayed().is_none());

        nav.reset_to_present();
        assert_eq!(nav.current_items().len(), 4);
        assert!(nav.breadcrumb().is_empty());
    }

    #[test]
    fn drill_down_requires_displayed_parent() {
        let mut nav = navigator();
        assert!(matches!(
            nav.drill_down("paleozoic"),
            Err(TimelineError::NothingDisplayed)
        ));

        open(&mut nav, "archean");
        assert!(matches!(
            nav.drill_down("paleozoic"),
            Err(TimelineError::UnknownChild { .. })
        ));
        assert_eq!(nav.depth(), 0);
        assert_eq!(nav.current_items().len(), 4);
    }

    #[test]
    fn displayed_node_is_entered_only_once() {
        let mut nav = navigator();
        open(&mut nav, "phanerozoic");
        nav.drill_down("phanerozoic").unwrap();
        assert!(matches!(
            nav.drill_down("phanerozoic"),
            Err(TimelineError::UnknownChild { .. })
        ));
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn history_labels_name_restored_levels() {
        let mut nav = navigator();
        open(&mut nav, "phanerozoic");
        nav.drill_down("phanerozoic").unwrap();
        nav.drill_down("cenozoic").unwrap();
        let labels: Vec<&str> = nav.history().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["Eons", "Eras"]);

        let crumb = nav.breadcrumb();
        assert_eq!(crumb.labels(), ["Eons", "Eras", "Periods", "Epochs"]);
        assert_eq!(crumb.segments[1].state, SegmentState::Visited);
        assert_eq!(crumb.segments[2].state, SegmentState::Current);
        assert_eq!(crumb.preview.map(|p| p.state), Some(SegmentState::Preview));
    }

    #[test]
    fn entering_a_child_of_an_unentered_node_records_its_level_too() {
        let mut nav = navigator();
        open(&mut nav, "phanerozoic");
        nav.drill_down("cenozoic").unwrap();
        assert_eq!(nav.depth(), 2);
        assert_eq!(nav.trail(), ["Phanerozoic", "Cenozoic"]);
        assert_eq!(ids(&nav), ["paleogene", "neogene", "quaternary"]);

        let crumb = nav.breadcrumb();
        assert_eq!(crumb.labels(), ["Eons", "Eras", "Periods", "Epochs"]);
        for segment in &crumb.segments {
            let mut climbed = nav.clone();
            let restored = climbed.navigate_to_ancestor(segment.index).unwrap();
            assert_eq!(restored.label, segment.label);
        }
    }

    #[test]
    fn entered_leaf_cannot_be_entered_again() {
        let mut nav = navigator();
        open(&mut nav, "hadean");
        nav.drill_down("hadean").unwrap();
        assert!(nav.current_items().is_empty());
        let before = (nav.current_level().clone(), nav.breadcrumb());

        for _ in 0..3 {
            assert!(matches!(
                nav.drill_down("hadean"),
                Err(TimelineError::UnknownChild { .. })
            ));
        }
        assert_eq!(nav.depth(), 1);
        assert_eq!((nav.current_level().clone(), nav.breadcrumb()), before);
    }

    #[test]
    fn preview_is_omitted_when_no_deeper_level_exists() {
        let mut nav = navigator();
        open(&mut nav, "phanerozoic");
        nav.drill_down("phanerozoic").unwrap();
        nav.drill_down("paleozoic").unwrap();
        assert_eq!(nav.breadcrumb().labels(), ["Eons", "Eras", "Periods"]);
    }

    #[test]
    fn ancestor_at_current_depth_keeps_level() {
        let mut nav = navigator();
        open(&mut nav, "phanerozoic");
        nav.drill_down("phanerozoic").unwrap();
        nav.navigate_to_ancestor(1).unwrap();
        assert_eq!(ids(&nav), ["paleozoic", "mesozoic", "cenozoic"]);
        assert_eq!(nav.depth(), 1);
        assert!(nav.displayed().is_none());
    }

    #[test]
    fn out_of_range_ancestor_is_refused() {
        let mut nav = navigator();
        open(&mut nav, "hadean");
        assert!(matches!(
            nav.navigate_to_ancestor(1),
            Err(TimelineError::UnknownLevel { index: 1, depth: 0 })
        ));
        assert_eq!(nav.displayed().map(|n| n.id.as_str()), Some("hadean"));
        assert!(nav.navigate_to_ancestor(0).is_ok());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut nav = navigator();
        open(&mut nav, "phanerozoic");
        nav.drill_down("phanerozoic").unwrap();
        nav.reset_to_present();
        let once = (nav.current_level().clone(), nav.depth(), nav.breadcrumb());
        nav.reset_to_present();
        assert_eq!((nav.current_level().clone(), nav.depth(), nav.breadcrumb()), once);
    }

    #[test]
    fn scrubber_falls_back_to_parent_siblings_for_leaf_levels() {
        let mut nav = navigator();
        open(&mut nav, "phanerozoic");
        nav.drill_down("phanerozoic").unwrap();
        nav.drill_down("cenozoic").unwrap();
        nav.drill_down("quaternary").unwrap();
        nav.drill_down("holocene").unwrap();
        assert!(nav.current_items().is_empty());
        assert_eq!(nav.current_level().label, "Ages");

        let scrubber: Vec<&str> = nav.scrubber_items().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(scrubber, ["pleistocene", "holocene"]);
        assert_eq!(nav.show_at(0.0).unwrap().id, "pleistocene");
    }

    proptest! {
        #[test]
        fn drilling_then_climbing_restores_initial_state(choices in prop::collection::vec(0usize..8, 0..4)) {
            let mut nav = navigator();
            let initial = (nav.current_level().clone(), nav.breadcrumb());

            open(&mut nav, "phanerozoic");
            let mut drilled = 0;
            if nav.drill_down("phanerozoic").is_ok() {
                drilled += 1;
            }
            for choice in choices {
                let Some(child) = nav.displayed().and_then(|n| {
                    (!n.children.is_empty()).then(|| n.children[choice % n.children.len()].id.clone())
                }) else {
                    break;
                };
                nav.drill_down(&child).unwrap();
                drilled += 1;
            }

            for _ in 0..drilled {
                let depth = nav.depth();
                nav.navigate_to_ancestor(depth - 1).unwrap();
            }
            prop_assert_eq!((nav.current_level().clone(), nav.breadcrumb()), initial);
            prop_assert_eq!(nav.depth(), 0);
        }
    }
}
