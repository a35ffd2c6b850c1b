//! Giant-impact sequence that forms the Moon.
//!
//! Theia approaches Earth, a flash marks the impact, a debris cloud spreads
//! and falls back, then the Moon appears on its orbit. The animation owns the
//! timing and the random source; what the renderer draws lives in
//! [`Bodies::formation`].

use foundation::math::{Vec3, ease_out_quad};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use runtime::{Animation, Status};
use serde::Serialize;
use tracing::info;

use crate::bodies::{Bodies, HasBodies};

pub const APPROACH_S: f64 = 3.5;
pub const FLASH_S: f64 = 0.3;
pub const DEBRIS_S: f64 = 5.0;

const THEIA_START: Vec3 = Vec3 { x: 3.5, y: 1.2, z: 1.0 };
const THEIA_TRAVEL: Vec3 = Vec3 { x: -4.0, y: -1.0, z: -1.0 };
const IMPACT_POINT: Vec3 = Vec3 { x: -0.5, y: 0.2, z: 0.0 };

/// Particle constants are per 60 Hz frame.
const GRAVITY: f64 = 0.000_02;
const LIFE_DECAY: f64 = 0.003;
const FRAMES_PER_SECOND: f64 = 60.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormationPhase {
    Approach,
    Flash,
    Debris,
    Complete,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub life: f64,
    pub size: f64,
    /// Glowing rock rather than grey dust.
    pub molten: bool,
}

impl Particle {
    pub fn opacity(&self) -> f64 {
        self.life.max(0.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Flash {
    pub position: Vec3,
    pub opacity: f64,
}

/// Renderable state of a running sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct FormationView {
    pub phase: FormationPhase,
    pub theia: Option<Vec3>,
    pub flash: Option<Flash>,
    pub particles: Vec<Particle>,
}

impl Default for FormationView {
    fn default() -> Self {
        Self {
            phase: FormationPhase::Approach,
            theia: Some(THEIA_START),
            flash: None,
            particles: Vec::new(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FormationConfig {
    pub seed: u64,
    pub particle_count: usize,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            seed: 0x7e1a,
            particle_count: 300,
        }
    }
}

pub struct MoonFormation {
    config: FormationConfig,
    rng: StdRng,
    elapsed_s: f64,
    spawned: bool,
}

impl MoonFormation {
    pub const LABEL: &'static str = "moon-formation";

    /// Hides the Moon and installs the formation view.
    pub fn begin(config: FormationConfig, bodies: &mut Bodies) -> Self {
        bodies.formation = Some(FormationView::default());
        bodies.moon.body.visible = false;
        info!(seed = config.seed, "moon formation started");
        Self {
            config,
            rng: StdRng::seed_from_u64(config.seed),
            elapsed_s: 0.0,
            spawned: false,
        }
    }

    pub fn total_duration_s() -> f64 {
        APPROACH_S + FLASH_S + DEBRIS_S
    }

    pub fn phase_at(elapsed_s: f64) -> FormationPhase {
        if elapsed_s < APPROACH_S {
            FormationPhase::Approach
        } else if elapsed_s < APPROACH_S + FLASH_S {
            FormationPhase::Flash
        } else if elapsed_s < Self::total_duration_s() {
            FormationPhase::Debris
        } else {
            FormationPhase::Complete
        }
    }

    fn spawn_debris(&mut self, view: &mut FormationView) {
        if self.spawned {
            return;
        }
        self.spawned = true;
        let rng = &mut self.rng;
        view.particles = (0..self.config.particle_count)
            .map(|_| {
                let theta = rng.gen_range(0.0..std::f64::consts::TAU);
                let phi = std::f64::consts::PI * (0.2 + 0.6 * rng.gen_range(0.0..1.0));
                let speed = 0.004 + rng.gen_range(0.0..1.0) * 0.009;
                Particle {
                    position: IMPACT_POINT,
                    velocity: Vec3::new(
                        phi.sin() * theta.cos() * speed,
                        phi.sin() * theta.sin() * speed,
                        phi.cos() * speed * 0.5,
                    ),
                    life: 1.0,
                    size: 0.008 + rng.gen_range(0.0..1.0) * 0.025,
                    molten: rng.gen_range(0.0..1.0) > 0.6,
                }
            })
            .collect();
    }
}

fn step_particles(particles: &mut [Particle], frames: f64) {
    for p in particles {
        p.position += p.velocity * frames;
        if let Some(to_center) = (Vec3::ZERO - p.position).normalized() {
            p.velocity += to_center * (GRAVITY * frames);
        }
        p.life -= LIFE_DECAY * frames;
    }
}

impl<Ctx: HasBodies> Animation<Ctx> for MoonFormation {
    fn label(&self) -> &'static str {
        Self::LABEL
    }

    fn progress(&self) -> f64 {
        (self.elapsed_s / Self::total_duration_s()).clamp(0.0, 1.0)
    }

    fn advance(&mut self, dt_s: f64, ctx: &mut Ctx) -> Status {
        let dt_s = dt_s.max(0.0);
        self.elapsed_s += dt_s;
        let phase = Self::phase_at(self.elapsed_s);

        let bodies = ctx.bodies_mut();
        bodies.moon.body.visible = false;
        let mut view = bodies.formation.take().unwrap_or_default();
        view.phase = phase;

        match phase {
            FormationPhase::Approach => {
                let eased = ease_out_quad(self.elapsed_s / APPROACH_S);
                view.theia = Some(THEIA_START + THEIA_TRAVEL * eased);
            }
            FormationPhase::Flash => {
                view.theia = None;
                self.spawn_debris(&mut view);
                view.flash = Some(Flash {
                    position: IMPACT_POINT,
                    opacity: 1.0 - (self.elapsed_s - APPROACH_S) / FLASH_S,
                });
            }
            FormationPhase::Debris => {
                view.theia = None;
                view.flash = None;
                self.spawn_debris(&mut view);
                step_particles(&mut view.particles, dt_s * FRAMES_PER_SECOND);
            }
            FormationPhase::Complete => {}
        }

        bodies.formation = Some(view);
        if phase == FormationPhase::Complete {
            Status::Done
        } else {
            Status::Running
        }
    }

    fn finish(&mut self, ctx: &mut Ctx) {
        let bodies = ctx.bodies_mut();
        bodies.formation = None;
        bodies.restore_moon();
        bodies.moon.body.visible = true;
        info!("moon formation complete");
    }

    fn cancel(&mut self, ctx: &mut Ctx) {
        let bodies = ctx.bodies_mut();
        bodies.formation = None;
        bodies.restore_moon();
    }
}
