use serde::{Deserialize, Serialize};

use crate::config::LayerConfig;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Satellites,
    CityLights,
}

/// On/off switches for optional overlays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct LayerStates {
    pub satellites: bool,
    pub city_lights: bool,
}

impl LayerStates {
    pub fn from_config(config: &LayerConfig) -> Self {
        Self {
            satellites: config.satellites,
            city_lights: config.city_lights,
        }
    }

    pub fn get(&self, layer: Layer) -> bool {
        match layer {
            Layer::Satellites => self.satellites,
            Layer::CityLights => self.city_lights,
        }
    }

    pub fn set(&mut self, layer: Layer, on: bool) {
        match layer {
            Layer::Satellites => self.satellites = on,
            Layer::CityLights => self.city_lights = on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Layer, LayerStates};
    use crate::config::LayerConfig;

    #[test]
    fn starts_from_config() {
        let layers = LayerStates::from_config(&LayerConfig::default());
        assert!(!layers.get(Layer::Satellites));
        assert!(layers.get(Layer::CityLights));
    }

    #[test]
    fn set_is_per_layer() {
        let mut layers = LayerStates::from_config(&LayerConfig::default());
        layers.set(Layer::Satellites, true);
        layers.set(Layer::CityLights, false);
        assert_eq!(
            layers,
            LayerStates {
                satellites: true,
                city_lights: false
            }
        );
    }
}
