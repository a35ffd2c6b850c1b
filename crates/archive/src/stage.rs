use foundation::math::Vec3;
use scene::{Bodies, HasBodies, HasCamera, OrbitCamera};
use serde::Serialize;

use crate::focus::{CameraMove, FocusState};
use crate::layers::LayerStates;

/// A located event marked on the Earth surface, in Earth-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct EventPin {
    pub name: String,
    pub local_position: Vec3,
}

/// Something an animation completion left for the mediator to report.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum StageNotice {
    CameraMoveFinished(CameraMove),
}

/// Mutable world state shared by every animation: what the renderer draws.
#[derive(Debug, Clone)]
pub struct Stage {
    pub camera: OrbitCamera,
    pub bodies: Bodies,
    pub focus: FocusState,
    pub layers: LayerStates,
    pub pin: Option<EventPin>,
    notices: Vec<StageNotice>,
}

impl Stage {
    pub fn new(camera: OrbitCamera, bodies: Bodies, layers: LayerStates) -> Self {
        Self {
            camera,
            bodies,
            focus: FocusState::default(),
            layers,
            pin: None,
            notices: Vec::new(),
        }
    }

    /// Releases the camera guard and records the finished move.
    pub fn finish_camera_move(&mut self) {
        if let Some(finished) = self.focus.complete() {
            self.notices.push(StageNotice::CameraMoveFinished(finished));
        }
    }

    pub fn take_notices(&mut self) -> Vec<StageNotice> {
        std::mem::take(&mut self.notices)
    }
}

impl HasCamera for Stage {
    fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }
}

impl HasBodies for Stage {
    fn bodies(&self) -> &Bodies {
        &self.bodies
    }

    fn bodies_mut(&mut self) -> &mut Bodies {
        &mut self.bodies
    }
}
