use serde::Serialize;

use crate::dataset::Timeline;
use crate::node::TimelineNode;

/// Child-index path from the root level to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path of the node owning this one; `None` for top-level nodes.
    pub fn parent(&self) -> Option<Self> {
        if self.0.len() > 1 {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        } else {
            None
        }
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Every prefix of this path, outermost first, ending with `self`.
    pub fn ancestry(&self) -> Vec<Self> {
        (1..=self.0.len()).map(|n| Self(self.0[..n].to_vec())).collect()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }
}

/// One sibling list of the tree: the children of `parent`, or the root items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationLevel {
    pub label: String,
    pub parent: Option<NodePath>,
}

impl NavigationLevel {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Owns the dataset and the level currently laid out on the scrubber.
#[derive(Debug, Clone)]
pub struct HierarchyStore {
    timeline: Timeline,
    current: NavigationLevel,
}

impl HierarchyStore {
    pub fn new(timeline: Timeline) -> Self {
        let current = NavigationLevel {
            label: timeline.label.clone(),
            parent: None,
        };
        Self { timeline, current }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn root(&self) -> NavigationLevel {
        self.level_under(None)
    }

    pub fn current_level(&self) -> &NavigationLevel {
        &self.current
    }

    pub fn set_current_level(&mut self, level: NavigationLevel) {
        self.current = level;
    }

    pub fn current_items(&self) -> &[TimelineNode] {
        self.items(&self.current)
    }

    /// Sibling slice a level stands for; empty if its parent no longer resolves.
    pub fn items(&self, level: &NavigationLevel) -> &[TimelineNode] {
        match &level.parent {
            None => &self.timeline.items,
            Some(path) => self.node(path).map_or(&[], |n| n.children.as_slice()),
        }
    }

    /// Level made of the children of `parent` (the root level for `None`).
    pub fn level_under(&self, parent: Option<NodePath>) -> NavigationLevel {
        let label = match &parent {
            None => self.timeline.label.clone(),
            Some(path) => match self.node(path) {
                Some(node) => match node.children.first() {
                    Some(first) => first.kind.plural_label().to_string(),
                    None => node.kind.subdivision_label().to_string(),
                },
                None => String::new(),
            },
        };
        NavigationLevel { label, parent }
    }

    /// Level containing the node at `path`.
    pub fn level_of(&self, path: &NodePath) -> NavigationLevel {
        self.level_under(path.parent())
    }

    pub fn node(&self, path: &NodePath) -> Option<&TimelineNode> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.timeline.items.get(*first)?;
        for index in rest {
            node = node.children.get(*index)?;
        }
        Some(node)
    }

    pub fn find_child(&self, parent: &NodePath, id: &str) -> Option<NodePath> {
        let node = self.node(parent)?;
        let index = node.children.iter().position(|c| c.id == id)?;
        Some(parent.child(index))
    }

    /// Depth-first search for a node id anywhere in the tree.
    pub fn path_of(&self, id: &str) -> Option<NodePath> {
        fn search(items: &[TimelineNode], prefix: &[usize], id: &str) -> Option<Vec<usize>> {
            for (index, node) in items.iter().enumerate() {
                let mut path = prefix.to_vec();
                path.push(index);
                if node.id == id {
                    return Some(path);
                }
                if let Some(found) = search(&node.children, &path, id) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.timeline.items, &[], id).map(NodePath)
    }

    /// Path of the `index`-th item of `level`.
    pub fn path_in(&self, level: &NavigationLevel, index: usize) -> NodePath {
        match &level.parent {
            None => NodePath::root(index),
            Some(parent) => parent.child(index),
        }
    }
}
