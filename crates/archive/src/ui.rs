//! Narrow interfaces to the detail panel and the timeline scrubber.
//!
//! Calls are fire-and-forget: a host whose target element is missing simply
//! ignores them.

use scene::{Body, SurfaceTexture};
use serde::Serialize;
use timeline::{Breadcrumb, NodeKind, TimelineLabel, TimelineNode, format_year};

pub trait DetailPanel {
    fn open(&mut self, view: &PanelView);
    fn open_body(&mut self, info: &BodyInfo);
    fn close(&mut self);
    fn set_theme(&mut self, body: Body);
    fn set_breadcrumb(&mut self, breadcrumb: &Breadcrumb);
}

pub trait Scrubber {
    fn set_markers(&mut self, markers: &[Marker]);
    fn set_position(&mut self, position: f64);
    fn set_label(&mut self, label: &TimelineLabel);
    /// Playback indicator position, hidden for `None`.
    fn set_playback(&mut self, indicator: Option<f64>);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildLink {
    pub id: String,
    pub name: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventLink {
    pub index: usize,
    pub name: String,
    pub location: String,
    /// Pinned events carry coordinates and a surface rotation to face them.
    pub coordinates: Option<(f64, f64)>,
    pub plays_moon_formation: bool,
}

/// Everything the detail panel shows for one timeline node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub id: String,
    pub kind: NodeKind,
    pub title: String,
    pub date: String,
    pub description: String,
    pub subdivision_label: &'static str,
    pub children: Vec<ChildLink>,
    pub events: Vec<EventLink>,
    pub surface: SurfaceTexture,
}

impl PanelView {
    pub fn from_node(node: &TimelineNode) -> Self {
        Self {
            id: node.id.clone(),
            kind: node.kind,
            title: node.name.clone(),
            date: format_year(node.year_start),
            description: node.description.clone(),
            subdivision_label: node.kind.subdivision_label(),
            children: node
                .children
                .iter()
                .map(|c| ChildLink {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    date: format_year(c.year_start),
                })
                .collect(),
            events: node
                .events
                .iter()
                .enumerate()
                .map(|(index, e)| EventLink {
                    index,
                    name: e.name.clone(),
                    location: e.location.clone(),
                    coordinates: e.coordinates(),
                    plays_moon_formation: e.is_moon_formation(),
                })
                .collect(),
            surface: SurfaceTexture::for_node(&node.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyInfo {
    pub body: Body,
    pub title: String,
    pub subtitle: String,
    pub description: String,
}

impl BodyInfo {
    pub fn moon() -> Self {
        Self {
            body: Body::Moon,
            title: "The Moon".to_string(),
            subtitle: "Formed ~4.5 Billion Years Ago".to_string(),
            description: "Earth's only natural satellite. Formed from debris after a Mars-sized \
                          body (Theia) collided with early Earth. The Moon stabilizes Earth's \
                          axial tilt and creates tides."
                .to_string(),
        }
    }
}

/// One dot on the scrubber.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub active: bool,
}

/// A recorded collaborator call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiCommand {
    OpenPanel(PanelView),
    OpenBody(BodyInfo),
    ClosePanel,
    SetTheme { body: Body },
    SetBreadcrumb(Breadcrumb),
    SetMarkers { markers: Vec<Marker> },
    SetPosition { position: f64 },
    SetLabel(TimelineLabel),
    SetPlayback { indicator: Option<f64> },
}

/// Queues collaborator calls for a host to apply later.
#[derive(Debug, Clone, Default)]
pub struct UiOutbox {
    commands: Vec<UiCommand>,
}

impl UiOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[UiCommand] {
        &self.commands
    }

    pub fn drain(&mut self) -> Vec<UiCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn drain_json(&mut self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.drain())
    }

    /// Most recent command matching `f`.
    pub fn last_matching(&self, f: impl Fn(&UiCommand) -> bool) -> Option<&UiCommand> {
        self.commands.iter().rev().find(|c| f(c))
    }
}

impl DetailPanel for UiOutbox {
    fn open(&mut self, view: &PanelView) {
        self.commands.push(UiCommand::OpenPanel(view.clone()));
    }

    fn open_body(&mut self, info: &BodyInfo) {
        self.commands.push(UiCommand::OpenBody(info.clone()));
    }

    fn close(&mut self) {
        self.commands.push(UiCommand::ClosePanel);
    }

    fn set_theme(&mut self, body: Body) {
        self.commands.push(UiCommand::SetTheme { body });
    }

    fn set_breadcrumb(&mut self, breadcrumb: &Breadcrumb) {
        self.commands.push(UiCommand::SetBreadcrumb(breadcrumb.clone()));
    }
}

impl Scrubber for UiOutbox {
    fn set_markers(&mut self, markers: &[Marker]) {
        self.commands.push(UiCommand::SetMarkers {
            markers: markers.to_vec(),
        });
    }

    fn set_position(&mut self, position: f64) {
        self.commands.push(UiCommand::SetPosition { position });
    }

    fn set_label(&mut self, label: &TimelineLabel) {
        self.commands.push(UiCommand::SetLabel(label.clone()));
    }

    fn set_playback(&mut self, indicator: Option<f64>) {
        self.commands.push(UiCommand::SetPlayback { indicator });
    }
}

#[cfg(test)]
mod tests {
    use super::{DetailPanel, PanelView, Scrubber, UiCommand, UiOutbox};
    use scene::Body;
    use timeline::Timeline;

    #[test]
    fn panel_view_lists_children_and_events() {
        let timeline = Timeline::earth().unwrap();
        let hadean = &timeline.items[0];
        let view = PanelView::from_node(hadean);
        assert_eq!(view.date, "4.6 Billion Years Ago");
        assert!(view.children.is_empty());
        assert!(view.events.iter().any(|e| e.plays_moon_formation));
        assert!(view.events.iter().all(|e| e.coordinates.is_none()));

        let phanerozoic = &timeline.items[3];
        let view = PanelView::from_node(phanerozoic);
        assert_eq!(view.subdivision_label, "Eras");
        assert_eq!(view.children.len(), 3);
    }

    #[test]
    fn outbox_records_and_drains_as_json() {
        let mut outbox = UiOutbox::new();
        outbox.set_theme(Body::Moon);
        outbox.set_position(100.0);
        outbox.close();
        assert_eq!(outbox.commands().len(), 3);
        assert_eq!(
            outbox.last_matching(|c| matches!(c, UiCommand::SetPosition { .. })),
            Some(&UiCommand::SetPosition { position: 100.0 })
        );

        let json = outbox.drain_json().unwrap();
        assert_eq!(
            json,
            r#"[{"type":"set_theme","body":"moon"},{"type":"set_position","position":100.0},{"type":"close_panel"}]"#
        );
        assert!(outbox.commands().is_empty());
    }
}
