use serde::{Deserialize, Serialize};

/// Geological granularity of a [`TimelineNode`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Eon,
    Era,
    Period,
    Epoch,
}

impl NodeKind {
    /// Label of a level made of nodes of this kind.
    pub fn plural_label(self) -> &'static str {
        match self {
            NodeKind::Eon => "Eons",
            NodeKind::Era => "Eras",
            NodeKind::Period => "Periods",
            NodeKind::Epoch => "Epochs",
        }
    }

    /// Label of the section listing a node's children.
    pub fn subdivision_label(self) -> &'static str {
        match self {
            NodeKind::Eon => "Eras",
            NodeKind::Era => "Periods",
            NodeKind::Period => "Epochs",
            NodeKind::Epoch => "Ages",
        }
    }
}

/// Location text meaning "no specific coordinates".
pub const GLOBAL_LOCATION: &str = "Global";

/// A point-in-time occurrence inside a [`TimelineNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoEvent {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

impl GeoEvent {
    pub fn is_global(&self) -> bool {
        self.location == GLOBAL_LOCATION
    }

    /// `(lat, lon)` in degrees, or `None` for global events.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        if self.is_global() {
            None
        } else {
            Some((self.lat, self.lon))
        }
    }

    /// Activating this event plays the Moon-formation sequence.
    pub fn is_moon_formation(&self) -> bool {
        self.name.contains("Moon Formation")
    }
}

/// One geological interval.
///
/// `value` places the node on the 0–100 scrubber; it is unique among siblings
/// only. Years are signed, negative meaning before present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub name: String,
    pub value: f64,
    pub year_start: i64,
    pub year_end: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub children: Vec<TimelineNode>,
    #[serde(default)]
    pub events: Vec<GeoEvent>,
}

impl TimelineNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child(&self, id: &str) -> Option<&TimelineNode> {
        self.children.iter().find(|c| c.id == id)
    }

    /// Calls `f` on this node and every descendant, parents before children.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a TimelineNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoEvent, NodeKind, TimelineNode};

    fn event(name: &str, location: &str, lat: f64, lon: f64) -> GeoEvent {
        GeoEvent {
            name: name.to_string(),
            location: location.to_string(),
            lat,
            lon,
        }
    }

    #[test]
    fn global_events_have_no_coordinates() {
        assert_eq!(event("Mammals Diversify", "Global", 20.0, 0.0).coordinates(), None);
        assert_eq!(
            event("Asteroid Impact", "Chicxulub, Mexico", 21.3, -89.5).coordinates(),
            Some((21.3, -89.5))
        );
    }

    #[test]
    fn moon_formation_is_detected_by_name() {
        assert!(event("Moon Formation (Giant Impact)", "Global", 0.0, 0.0).is_moon_formation());
        assert!(!event("Earth Formation", "Global", 0.0, 0.0).is_moon_formation());
    }

    #[test]
    fn kind_labels() {
        assert_eq!(NodeKind::Era.plural_label(), "Eras");
        assert_eq!(NodeKind::Epoch.subdivision_label(), "Ages");
    }

    #[test]
    fn deserializes_source_shape() {
        let json = r#"{
            "id": "holocene", "type": "epoch", "name": "Holocene", "value": 95,
            "yearStart": -12000, "yearEnd": 2026,
            "events": [{ "name": "First Cities", "location": "Mesopotamia", "lat": 33, "lon": 44 }]
        }"#;
        let node: TimelineNode = serde_json::from_str(json).expect("parse");
        assert_eq!(node.kind, NodeKind::Epoch);
        assert_eq!(node.year_start, -12_000);
        assert!(node.children.is_empty());
        assert_eq!(node.events[0].coordinates(), Some((33.0, 44.0)));
    }
}
