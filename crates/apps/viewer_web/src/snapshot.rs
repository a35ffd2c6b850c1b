use archive::{FocusState, LayerStates, Stage};
use scene::{BodyState, FormationPhase, FormationView};
use serde::Serialize;

/// Everything the page's renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct StageSnapshot {
    pub camera: CameraSnapshot,
    pub earth: EarthSnapshot,
    pub moon: BodySnapshot,
    pub formation: Option<FormationSnapshot>,
    pub pin: Option<PinSnapshot>,
    pub focus: FocusState,
    pub layers: LayerStates,
}

#[derive(Debug, Clone, Serialize)]
pub struct CameraSnapshot {
    pub eye: [f64; 3],
    pub look_at: [f64; 3],
    pub fov_y_deg: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BodySnapshot {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: f64,
    pub radius: f64,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EarthSnapshot {
    #[serde(flatten)]
    pub body: BodySnapshot,
    pub texture: &'static str,
    pub atmosphere_opacity: f64,
    pub night_lights: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormationSnapshot {
    pub phase: FormationPhase,
    pub theia: Option<[f64; 3]>,
    pub flash: Option<([f64; 3], f64)>,
    /// Flattened `x, y, z` triples.
    pub particle_positions: Vec<f64>,
    pub particle_opacity: Vec<f64>,
    pub particle_molten: Vec<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PinSnapshot {
    pub name: String,
    pub local_position: [f64; 3],
}

impl StageSnapshot {
    pub fn capture(stage: &Stage) -> Self {
        let bodies = &stage.bodies;
        let earth = &bodies.earth;
        Self {
            camera: CameraSnapshot {
                eye: stage.camera.eye().into(),
                look_at: stage.camera.look_at().into(),
                fov_y_deg: stage.camera.fov_y_deg(),
            },
            earth: EarthSnapshot {
                body: BodySnapshot::from(&earth.body),
                texture: earth.surface.asset_path(),
                atmosphere_opacity: earth.atmosphere_opacity,
                night_lights: earth.night_lights,
            },
            moon: BodySnapshot::from(&bodies.moon.body),
            formation: bodies.formation.as_ref().map(FormationSnapshot::from),
            pin: stage.pin.as_ref().map(|pin| PinSnapshot {
                name: pin.name.clone(),
                local_position: pin.local_position.into(),
            }),
            focus: stage.focus,
            layers: stage.layers,
        }
    }
}

impl From<&BodyState> for BodySnapshot {
    fn from(body: &BodyState) -> Self {
        Self {
            position: body.position.into(),
            rotation: body.rotation.into(),
            scale: body.scale,
            radius: body.radius,
            visible: body.visible,
        }
    }
}

impl From<&FormationView> for FormationSnapshot {
    fn from(view: &FormationView) -> Self {
        let mut particle_positions = Vec::with_capacity(view.particles.len() * 3);
        for p in &view.particles {
            particle_positions.extend([p.position.x, p.position.y, p.position.z]);
        }
        Self {
            phase: view.phase,
            theia: view.theia.map(Into::into),
            flash: view.flash.map(|f| (f.position.into(), f.opacity)),
            particle_positions,
            particle_opacity: view.particles.iter().map(|p| p.opacity()).collect(),
            particle_molten: view.particles.iter().map(|p| p.molten).collect(),
        }
    }
}
