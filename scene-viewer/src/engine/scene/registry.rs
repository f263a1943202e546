use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::camera::orbit_controls::OrbitControls;
use crate::engine::scene::presets::{LightRig, PresetLibrary, parse_color};
use crate::errors::ViewerError;
use constants::render_settings::{
    CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, CAMERA_TARGET, MAIN_CAMERA_POSITION,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: CAMERA_FOV_DEGREES,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            position: MAIN_CAMERA_POSITION,
            target: CAMERA_TARGET,
        }
    }
}

impl CameraConfig {
    pub fn aspect_for(width: f32, height: f32) -> f32 {
        if width > 0.0 && height > 0.0 {
            width / height
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub id: String,
    pub background: String,
    #[serde(default)]
    pub camera: CameraConfig,
    pub lights: String,
    pub controls: String,
    #[serde(default)]
    pub models: Vec<String>,
}

/// Perspective parameters resolved for one scene. The aspect ratio is left
/// to the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraRig {
    pub fn projection(&self, aspect_ratio: f32) -> Projection {
        Projection::from(PerspectiveProjection {
            fov: self.fov,
            near: self.near,
            far: self.far,
            aspect_ratio,
        })
    }
}

/// Everything needed to show a scene, built in one go from a single config.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneRig {
    pub scene_id: String,
    pub background: Color,
    pub camera: CameraRig,
    pub controls: OrbitControls,
    pub lights: LightRig,
    pub models: Vec<String>,
}

/// Named scenes plus the one currently shown.
///
/// `generation` is bumped on every successful activation so that systems can
/// detect a switch without holding on to the previous rig.
#[derive(Resource, Debug, Default)]
pub struct SceneRegistry {
    presets: PresetLibrary,
    scenes: Vec<SceneConfig>,
    active: Option<SceneRig>,
    generation: u64,
}

impl SceneRegistry {
    pub fn new(presets: PresetLibrary) -> Self {
        Self {
            presets,
            scenes: Vec::new(),
            active: None,
            generation: 0,
        }
    }

    pub fn register_scene(&mut self, config: SceneConfig) -> Result<(), ViewerError> {
        if self.config(&config.id).is_some() {
            return Err(ViewerError::configuration("duplicate scene", config.id));
        }
        // Resolve once up front so a bad scene never reaches activation.
        self.build_rig(&config)?;

        self.scenes.push(config);
        Ok(())
    }

    fn config(&self, id: &str) -> Option<&SceneConfig> {
        self.scenes.iter().find(|scene| scene.id == id)
    }

    fn build_rig(&self, config: &SceneConfig) -> Result<SceneRig, ViewerError> {
        let background = parse_color(&config.background)?;
        let lights = self.presets.light_rig(&config.lights)?;
        let controls = self.presets.orbit_controls(&config.controls, &config.camera)?;

        Ok(SceneRig {
            scene_id: config.id.clone(),
            background,
            camera: CameraRig {
                fov: config.camera.fov_degrees.to_radians(),
                near: config.camera.near,
                far: config.camera.far,
            },
            controls,
            lights,
            models: config.models.clone(),
        })
    }

    /// Swap in the named scene. On error the current scene stays active.
    pub fn activate(&mut self, id: &str) -> Result<&SceneRig, ViewerError> {
        let config = self
            .config(id)
            .ok_or_else(|| ViewerError::configuration("scene", id))?;
        let rig = self.build_rig(config)?;

        self.generation += 1;
        info!("Scene '{}' activated (generation {})", id, self.generation);
        Ok(self.active.insert(rig))
    }

    pub fn active(&self) -> Option<&SceneRig> {
        self.active.as_ref()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|rig| rig.scene_id.as_str())
    }

    /// Registered ids in registration order.
    pub fn scene_ids(&self) -> impl Iterator<Item = &str> {
        self.scenes.iter().map(|scene| scene.id.as_str())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
