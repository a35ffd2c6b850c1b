//! Tunables of the archive, loadable from JSON.
//!
//! Every section and field has a default, so a partial document such as
//! `{"camera": {"orbit_radius": 4.0}}` only overrides what it names.

use scene::{BodyConfig, FormationConfig, InputConfig, OrbitLimits, VisibilityThresholds};
use serde::{Deserialize, Serialize};
use timeline::Dwell;

use crate::error::ArchiveError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub camera: CameraConfig,
    pub transitions: TransitionConfig,
    pub input: InputSettings,
    pub bodies: BodySettings,
    pub thresholds: ThresholdConfig,
    pub playback: PlaybackConfig,
    pub layers: LayerConfig,
    pub formation: FormationSettings,
}

impl ArchiveConfig {
    pub fn from_json(json: &str) -> Result<Self, ArchiveError> {
        serde_json::from_str(json).map_err(ArchiveError::Config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Default distance from Earth.
    pub orbit_radius: f64,
    /// Distance used while the satellites layer is on.
    pub leo_radius: f64,
    pub fov_y_deg: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub min_polar: f64,
    pub max_polar: f64,
    pub rotate_speed: f64,
    pub pinch_zoom_speed: f64,
    pub wheel_zoom_speed: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            orbit_radius: 3.5,
            leo_radius: 1.8,
            fov_y_deg: 45.0,
            min_radius: 1.5,
            max_radius: 60.0,
            min_polar: 0.15,
            max_polar: std::f64::consts::PI - 0.15,
            rotate_speed: 0.005,
            pinch_zoom_speed: 0.005,
            wheel_zoom_speed: 0.001,
        }
    }
}

impl CameraConfig {
    pub fn limits(&self) -> OrbitLimits {
        OrbitLimits {
            min_radius: self.min_radius,
            max_radius: self.max_radius,
            min_polar: self.min_polar,
            max_polar: self.max_polar,
            rotate_speed: self.rotate_speed,
            zoom_speed: self.pinch_zoom_speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub focus_ms: f64,
    pub layer_zoom_ms: f64,
    /// Camera distance in front of the focused Moon, along +Z.
    pub moon_focus_offset: f64,
    pub moon_focus_position: [f64; 3],
    pub moon_focus_scale: f64,
    /// Orbit radius range while the Moon is focused.
    pub moon_min_radius: f64,
    pub moon_max_radius: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            focus_ms: 1500.0,
            layer_zoom_ms: 1000.0,
            moon_focus_offset: 0.8,
            moon_focus_position: [2.0, 1.5, 0.5],
            moon_focus_scale: 2.5,
            moon_min_radius: 0.4,
            moon_max_radius: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub click_threshold_px: f64,
    /// Scrubber units a hover must differ from the slider to preview.
    pub preview_threshold: f64,
    /// Viewports narrower than this use the compact Earth.
    pub compact_width_px: f64,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            click_threshold_px: 5.0,
            preview_threshold: timeline::PREVIEW_THRESHOLD,
            compact_width_px: 768.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodySettings {
    pub earth_radius: f64,
    pub compact_earth_radius: f64,
    pub moon_radius: f64,
    pub moon_orbit_radius: f64,
    pub moon_orbit_speed: f64,
    pub moon_spin_speed: f64,
    pub earth_spin_speed: f64,
    pub drag_rotate_speed: f64,
    pub atmosphere_fade_rate: f64,
}

impl Default for BodySettings {
    fn default() -> Self {
        let b = BodyConfig::default();
        Self {
            earth_radius: b.earth_radius,
            compact_earth_radius: 0.55,
            moon_radius: b.moon_radius,
            moon_orbit_radius: b.moon_orbit_radius,
            moon_orbit_speed: b.moon_orbit_speed,
            moon_spin_speed: b.moon_spin_speed,
            earth_spin_speed: b.earth_spin_speed,
            drag_rotate_speed: b.drag_rotate_speed,
            atmosphere_fade_rate: b.atmosphere_fade_rate,
        }
    }
}

impl BodySettings {
    pub fn body_config(&self) -> BodyConfig {
        BodyConfig {
            earth_radius: self.earth_radius,
            moon_radius: self.moon_radius,
            moon_orbit_radius: self.moon_orbit_radius,
            moon_orbit_speed: self.moon_orbit_speed,
            moon_spin_speed: self.moon_spin_speed,
            earth_spin_speed: self.earth_spin_speed,
            drag_rotate_speed: self.drag_rotate_speed,
            atmosphere_fade_rate: self.atmosphere_fade_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub moon_formation: i64,
    pub atmosphere: i64,
    pub city_lights: i64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        let t = VisibilityThresholds::default();
        Self {
            moon_formation: t.moon_formation,
            atmosphere: t.atmosphere,
            city_lights: t.city_lights,
        }
    }
}

impl ThresholdConfig {
    pub fn visibility(&self) -> VisibilityThresholds {
        VisibilityThresholds {
            moon_formation: self.moon_formation,
            atmosphere: self.atmosphere,
            city_lights: self.city_lights,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub present_year: i64,
    pub dwell: Dwell,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            present_year: timeline::PRESENT_YEAR,
            dwell: Dwell::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    pub satellites: bool,
    pub city_lights: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            satellites: false,
            city_lights: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationSettings {
    pub seed: u64,
    pub particle_count: usize,
}

impl Default for FormationSettings {
    fn default() -> Self {
        let f = FormationConfig::default();
        Self {
            seed: f.seed,
            particle_count: f.particle_count,
        }
    }
}

impl FormationSettings {
    pub fn formation_config(&self) -> FormationConfig {
        FormationConfig {
            seed: self.seed,
            particle_count: self.particle_count,
        }
    }
}

impl ArchiveConfig {
    pub fn input_config(&self) -> InputConfig {
        InputConfig {
            click_threshold_px: self.input.click_threshold_px,
            pinch_zoom_speed: self.camera.pinch_zoom_speed,
            wheel_zoom_speed: self.camera.wheel_zoom_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ArchiveConfig;
    use crate::error::ArchiveError;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_reference_scene() {
        let c = ArchiveConfig::default();
        assert_eq!(c.camera.orbit_radius, 3.5);
        assert_eq!(c.camera.leo_radius, 1.8);
        assert_eq!(c.transitions.focus_ms, 1500.0);
        assert_eq!(c.playback.present_year, 2026);
        assert!(!c.layers.satellites);
        assert_eq!(c.formation.particle_count, 300);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let c = ArchiveConfig::from_json(r#"{"camera": {"orbit_radius": 4.0}, "layers": {"city_lights": false}}"#)
            .expect("config");
        assert_eq!(c.camera.orbit_radius, 4.0);
        assert_eq!(c.camera.min_radius, 1.5);
        assert!(!c.layers.city_lights);
        assert_eq!(c.transitions, ArchiveConfig::default().transitions);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(ArchiveConfig::from_json("{}").unwrap(), ArchiveConfig::default());
    }

    #[test]
    fn bad_json_is_a_config_error() {
        assert!(matches!(
            ArchiveConfig::from_json(r#"{"camera": {"orbit_radius": "far"}}"#),
            Err(ArchiveError::Config(_))
        ));
    }
}
