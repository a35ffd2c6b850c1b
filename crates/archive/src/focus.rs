pub use scene::Body;
use serde::Serialize;

/// A camera animation currently owning the camera.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "body")]
pub enum CameraMove {
    Focus(Body),
    Zoom,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusOutcome {
    Started,
    AlreadyFocused,
    /// Another camera move is in flight; the request is not queued.
    Dropped,
    /// The target is hidden at the displayed time or while it forms.
    Unavailable,
}

/// Which body the camera orbits, plus the single camera-move guard.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct FocusState {
    body: Body,
    transition: Option<CameraMove>,
}

impl Default for FocusState {
    fn default() -> Self {
        Self {
            body: Body::Earth,
            transition: None,
        }
    }
}

impl FocusState {
    pub fn body(&self) -> Body {
        self.body
    }

    pub fn transition(&self) -> Option<CameraMove> {
        self.transition
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Claims the camera for a focus change to `target`.
    pub fn request(&mut self, target: Body) -> FocusOutcome {
        if self.transition.is_some() {
            return FocusOutcome::Dropped;
        }
        if self.body == target {
            return FocusOutcome::AlreadyFocused;
        }
        self.transition = Some(CameraMove::Focus(target));
        FocusOutcome::Started
    }

    /// Claims the camera for a zoom. `false` while another move is in flight.
    pub fn begin_zoom(&mut self) -> bool {
        if self.transition.is_some() {
            return false;
        }
        self.transition = Some(CameraMove::Zoom);
        true
    }

    /// Releases the camera; a finished focus move commits its body.
    pub fn complete(&mut self) -> Option<CameraMove> {
        let finished = self.transition.take();
        if let Some(CameraMove::Focus(body)) = finished {
            self.body = body;
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::{Body, CameraMove, FocusOutcome, FocusState};

    #[test]
    fn focus_commits_on_completion() {
        let mut focus = FocusState::default();
        assert_eq!(focus.request(Body::Moon), FocusOutcome::Started);
        assert_eq!(focus.body(), Body::Earth);
        assert!(focus.is_transitioning());

        assert_eq!(focus.complete(), Some(CameraMove::Focus(Body::Moon)));
        assert_eq!(focus.body(), Body::Moon);
        assert!(!focus.is_transitioning());
    }

    #[test]
    fn requests_in_flight_are_dropped() {
        let mut focus = FocusState::default();
        focus.request(Body::Moon);
        assert_eq!(focus.request(Body::Moon), FocusOutcome::Dropped);
        assert_eq!(focus.request(Body::Earth), FocusOutcome::Dropped);
        assert!(!focus.begin_zoom());
    }

    #[test]
    fn same_body_is_a_no_op() {
        let mut focus = FocusState::default();
        assert_eq!(focus.request(Body::Earth), FocusOutcome::AlreadyFocused);
        assert!(!focus.is_transitioning());
    }

    #[test]
    fn zoom_does_not_change_body() {
        let mut focus = FocusState::default();
        assert!(focus.begin_zoom());
        assert_eq!(focus.request(Body::Moon), FocusOutcome::Dropped);
        assert_eq!(focus.complete(), Some(CameraMove::Zoom));
        assert_eq!(focus.body(), Body::Earth);
    }
}
