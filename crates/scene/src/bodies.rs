use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::formation::FormationView;
use crate::picking::PickCandidate;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Earth,
    Moon,
}

/// Earth surface imagery for a timeline node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceTexture {
    Hadean,
    Archean,
    IcePlanet,
    Pangaea,
    ModernDay,
}

impl SurfaceTexture {
    /// Unknown ids fall back to the modern-day surface.
    pub fn for_node(id: &str) -> Self {
        match id {
            "hadean" => Self::Hadean,
            "archean" => Self::Archean,
            "proterozoic" | "pleistocene" => Self::IcePlanet,
            "phanerozoic" | "paleozoic" | "mesozoic" => Self::Pangaea,
            _ => Self::ModernDay,
        }
    }

    pub fn asset_path(self) -> &'static str {
        match self {
            Self::Hadean => "textures/hadean.jpg",
            Self::Archean => "textures/archean.jpg",
            Self::IcePlanet => "textures/ice_planet.jpg",
            Self::Pangaea => "textures/pangaea.jpg",
            Self::ModernDay => "textures/earth_day.jpg",
        }
    }
}

/// Transform and visibility of one body.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    /// Euler angles in radians.
    pub rotation: Vec3,
    pub scale: f64,
    pub radius: f64,
    pub visible: bool,
}

impl BodyState {
    pub fn new(position: Vec3, radius: f64) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: 1.0,
            radius,
            visible: true,
        }
    }

    pub fn world_radius(&self) -> f64 {
        self.radius * self.scale
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BodyConfig {
    pub earth_radius: f64,
    pub moon_radius: f64,
    pub moon_orbit_radius: f64,
    /// Radians per second.
    pub moon_orbit_speed: f64,
    pub moon_spin_speed: f64,
    pub earth_spin_speed: f64,
    /// Drag pixels to radians for body rotation.
    pub drag_rotate_speed: f64,
    /// Opacity per second.
    pub atmosphere_fade_rate: f64,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            earth_radius: 0.85,
            moon_radius: 0.068,
            moon_orbit_radius: 3.0,
            moon_orbit_speed: 0.02,
            moon_spin_speed: 0.06,
            earth_spin_speed: 0.18,
            drag_rotate_speed: 0.005,
            atmosphere_fade_rate: 1.2,
        }
    }
}

/// Years after which world features exist.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VisibilityThresholds {
    pub moon_formation: i64,
    pub atmosphere: i64,
    pub city_lights: i64,
}

impl Default for VisibilityThresholds {
    fn default() -> Self {
        Self {
            moon_formation: -4_500_000_000,
            atmosphere: -2_400_000_000,
            city_lights: -150,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Earth {
    pub body: BodyState,
    pub surface: SurfaceTexture,
    pub atmosphere_opacity: f64,
    pub night_lights: bool,
}

impl Earth {
    pub fn atmosphere_visible(&self) -> bool {
        self.atmosphere_opacity > 0.01
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Moon {
    pub body: BodyState,
    pub orbit_angle: f64,
    pub orbit_paused: bool,
    /// Hidden because the timeline year predates it.
    pub before_formation: bool,
}

/// Earth, Moon and the timeline-driven state of the world around them.
#[derive(Debug, Clone)]
pub struct Bodies {
    pub earth: Earth,
    pub moon: Moon,
    pub formation: Option<FormationView>,
    config: BodyConfig,
    thresholds: VisibilityThresholds,
    year: i64,
    atmosphere_present: bool,
    city_lights_layer: bool,
}

impl Bodies {
    pub fn new(config: BodyConfig, thresholds: VisibilityThresholds, present_year: i64) -> Self {
        let mut bodies = Self {
            earth: Earth {
                body: BodyState::new(Vec3::ZERO, config.earth_radius),
                surface: SurfaceTexture::ModernDay,
                atmosphere_opacity: 0.0,
                night_lights: false,
            },
            moon: Moon {
                body: BodyState::new(Vec3::new(config.moon_orbit_radius, 0.0, 0.0), config.moon_radius),
                orbit_angle: 0.0,
                orbit_paused: false,
                before_formation: false,
            },
            formation: None,
            config,
            thresholds,
            year: present_year,
            atmosphere_present: false,
            city_lights_layer: true,
        };
        bodies.apply_timeline_year(present_year);
        bodies.earth.atmosphere_opacity = if bodies.atmosphere_present { 1.0 } else { 0.0 };
        bodies
    }

    pub fn config(&self) -> &BodyConfig {
        &self.config
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    pub fn state(&self, body: Body) -> &BodyState {
        match body {
            Body::Earth => &self.earth.body,
            Body::Moon => &self.moon.body,
        }
    }

    pub fn state_mut(&mut self, body: Body) -> &mut BodyState {
        match body {
            Body::Earth => &mut self.earth.body,
            Body::Moon => &mut self.moon.body,
        }
    }

    /// Shows or hides features that do not exist yet in `year`.
    pub fn apply_timeline_year(&mut self, year: i64) {
        self.year = year;
        self.moon.before_formation = year <= self.thresholds.moon_formation;
        if self.formation.is_none() {
            self.moon.body.visible = !self.moon.before_formation;
        }
        self.atmosphere_present = year > self.thresholds.atmosphere;
        self.refresh_night_lights();
    }

    pub fn set_city_lights_layer(&mut self, on: bool) {
        self.city_lights_layer = on;
        self.refresh_night_lights();
    }

    pub fn set_surface(&mut self, node_id: &str) {
        self.earth.surface = SurfaceTexture::for_node(node_id);
    }

    pub fn set_moon_orbit_paused(&mut self, paused: bool) {
        self.moon.orbit_paused = paused;
    }

    /// Puts the Moon back on its orbit at angle zero.
    pub fn restore_moon(&mut self) {
        self.moon.orbit_angle = 0.0;
        self.moon.body.position = Vec3::new(self.config.moon_orbit_radius, 0.0, 0.0);
        self.moon.body.visible = !self.moon.before_formation;
    }

    /// Turns a drag into rotation of `body`.
    pub fn rotate(&mut self, body: Body, dx: f64, dy: f64) {
        let speed = self.config.drag_rotate_speed;
        let state = self.state_mut(body);
        state.rotation.y += dx * speed;
        state.rotation.x += dy * speed;
    }

    /// Idle spin, Moon orbit and atmosphere fade.
    pub fn update(&mut self, dt_s: f64, dragging: bool) {
        if !dragging {
            self.earth.body.rotation.y += self.config.earth_spin_speed * dt_s;
        }

        let moon = &mut self.moon;
        if moon.body.visible && !moon.orbit_paused && self.formation.is_none() {
            moon.orbit_angle += self.config.moon_orbit_speed * dt_s;
            let r = self.config.moon_orbit_radius;
            moon.body.position = Vec3::new(moon.orbit_angle.cos() * r, 0.0, moon.orbit_angle.sin() * r);
            moon.body.rotation.y += self.config.moon_spin_speed * dt_s;
        }

        let step = self.config.atmosphere_fade_rate * dt_s;
        let opacity = &mut self.earth.atmosphere_opacity;
        *opacity = if self.atmosphere_present {
            (*opacity + step).min(1.0)
        } else {
            (*opacity - step).max(0.0)
        };
    }

    /// Bodies a pick ray may hit; the Moon only while visible.
    pub fn pick_candidates(&self) -> Vec<PickCandidate<Body>> {
        let mut candidates = Vec::with_capacity(2);
        if self.moon.body.visible {
            candidates.push(PickCandidate {
                target: Body::Moon,
                center: self.moon.body.position,
                radius: self.moon.body.world_radius(),
            });
        }
        candidates.push(PickCandidate {
            target: Body::Earth,
            center: self.earth.body.position,
            radius: self.earth.body.world_radius(),
        });
        candidates
    }

    fn refresh_night_lights(&mut self) {
        self.earth.night_lights = self.year > self.thresholds.city_lights && self.city_lights_layer;
    }
}

/// Access to the bodies inside an animation context.
pub trait HasBodies {
    fn bodies(&self) -> &Bodies;
    fn bodies_mut(&mut self) -> &mut Bodies;
}

impl HasBodies for Bodies {
    fn bodies(&self) -> &Bodies {
        self
    }

    fn bodies_mut(&mut self) -> &mut Bodies {
        self
    }
}
