use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::engine::camera::orbit_controls::OrbitControls;
use crate::engine::scene::registry::CameraConfig;
use crate::errors::ViewerError;
use constants::presets::{
    AMBIENT_BRIGHTNESS_PER_UNIT, DIRECTIONAL_LUX_PER_UNIT, MAX_DISTANCE, MIN_DISTANCE,
    NORMAL_DIRECTIONAL_DIRECTION, NORMAL_MAX_POLAR_ANGLE, ROTATE_SPEED, WHITE_HEX, ZOOM_SPEED,
};

fn white() -> String {
    WHITE_HEX.to_string()
}

fn default_direction() -> [f32; 3] {
    NORMAL_DIRECTIONAL_DIRECTION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalPreset {
    #[serde(default = "white")]
    pub color: String,
    pub intensity: f32,
    #[serde(default = "default_direction")]
    pub direction: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientPreset {
    #[serde(default = "white")]
    pub color: String,
    pub intensity: f32,
}

/// Named lighting setup. Either light may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LightPreset {
    #[serde(default)]
    pub directional: Option<DirectionalPreset>,
    #[serde(default)]
    pub ambient: Option<AmbientPreset>,
}

/// Named orbit behaviour. Missing fields fall back to the "normal" preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlPreset {
    pub enable_pan: bool,
    pub enable_zoom: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlPreset {
    fn default() -> Self {
        Self {
            enable_pan: false,
            enable_zoom: true,
            rotate_speed: ROTATE_SPEED,
            zoom_speed: ZOOM_SPEED,
            min_polar_angle: 0.0,
            max_polar_angle: NORMAL_MAX_POLAR_ANGLE,
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalRig {
    pub color: Color,
    pub intensity: f32,
    pub direction: Vec3,
}

impl DirectionalRig {
    pub fn illuminance(&self) -> f32 {
        self.intensity * DIRECTIONAL_LUX_PER_UNIT
    }

    pub fn transform(&self) -> Transform {
        Transform::IDENTITY.looking_to(self.direction, Vec3::Y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmbientRig {
    pub color: Color,
    pub intensity: f32,
}

impl AmbientRig {
    pub fn brightness(&self) -> f32 {
        self.intensity * AMBIENT_BRIGHTNESS_PER_UNIT
    }
}

/// Resolved lights ready to hand to Bevy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LightRig {
    pub directional: Option<DirectionalRig>,
    pub ambient: Option<AmbientRig>,
}

pub fn parse_color(hex: &str) -> Result<Color, ViewerError> {
    Srgba::hex(hex)
        .map(Color::from)
        .map_err(|_| ViewerError::configuration("colour", hex))
}

/// Registry of light and control presets, looked up by name.
#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    lights: BTreeMap<String, LightPreset>,
    controls: BTreeMap<String, ControlPreset>,
}

impl PresetLibrary {
    pub fn new(
        lights: BTreeMap<String, LightPreset>,
        controls: BTreeMap<String, ControlPreset>,
    ) -> Self {
        Self { lights, controls }
    }

    pub fn light_rig(&self, name: &str) -> Result<LightRig, ViewerError> {
        let preset = self
            .lights
            .get(name)
            .ok_or_else(|| ViewerError::configuration("light preset", name))?;

        let directional = match &preset.directional {
            Some(light) => Some(DirectionalRig {
                color: parse_color(&light.color)?,
                intensity: light.intensity,
                direction: Vec3::from_array(light.direction),
            }),
            None => None,
        };

        let ambient = match &preset.ambient {
            Some(light) => Some(AmbientRig {
                color: parse_color(&light.color)?,
                intensity: light.intensity,
            }),
            None => None,
        };

        Ok(LightRig {
            directional,
            ambient,
        })
    }

    pub fn orbit_controls(
        &self,
        name: &str,
        camera: &CameraConfig,
    ) -> Result<OrbitControls, ViewerError> {
        let preset = self
            .controls
            .get(name)
            .ok_or_else(|| ViewerError::configuration("control preset", name))?;

        Ok(OrbitControls::from_preset(
            preset,
            Vec3::from_array(camera.position),
            Vec3::from_array(camera.target),
        ))
    }
}
