use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::engine::loading::progress::ProgressStrategy;
use crate::engine::scene::presets::{AmbientPreset, ControlPreset, DirectionalPreset, LightPreset};
use crate::engine::scene::registry::{CameraConfig, SceneConfig};
use crate::errors::ViewerError;
use constants::asset_paths::{BUS_MODEL_ID, BUS_MODEL_PATH, MUTE_ICON_PATH, SOUND_ICON_PATH};
use constants::audio::AMBIENT_CHANNELS;
use constants::presets::{
    NORMAL_AMBIENT_INTENSITY, NORMAL_DIRECTIONAL_DIRECTION, NORMAL_DIRECTIONAL_INTENSITY,
    NORMAL_PRESET, VIEWER_AMBIENT_INTENSITY, VIEWER_MAX_POLAR_ANGLE, VIEWER_PRESET, WHITE_HEX,
};
use constants::render_settings::{
    CAMERA_TARGET, MAIN_BACKGROUND_HEX, MAIN_SCENE_ID, VIEWER_BACKGROUND_HEX,
    VIEWER_CAMERA_POSITION, VIEWER_SCENE_ID,
};
use constants::ui::LOADING_LABEL;

fn one() -> f32 {
    1.0
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    /// glTF path relative to the asset root. The first scene in the file is shown.
    pub path: String,
    #[serde(default = "one")]
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioChannelEntry {
    pub id: String,
    pub path: String,
    #[serde(default = "yes")]
    pub looping: bool,
    pub volume: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Shown while audio plays.
    pub mute_icon: String,
    /// Shown while muted.
    pub sound_icon: String,
    pub loading_label: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            mute_icon: MUTE_ICON_PATH.to_string(),
            sound_icon: SOUND_ICON_PATH.to_string(),
            loading_label: LOADING_LABEL.to_string(),
        }
    }
}

/// Viewer configuration loaded from `viewer_manifest.json`. Mirrors the JSON
/// structure exactly.
#[derive(Asset, TypePath, Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerManifest {
    pub models: Vec<ModelEntry>,
    pub audio_channels: Vec<AudioChannelEntry>,
    pub light_presets: BTreeMap<String, LightPreset>,
    pub control_presets: BTreeMap<String, ControlPreset>,
    pub scenes: Vec<SceneConfig>,
    pub initial_scene: String,
    #[serde(default)]
    pub progress: ProgressStrategy,
    /// Skip the Start button and begin as soon as loading finishes.
    #[serde(default)]
    pub auto_start: bool,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for ViewerManifest {
    fn default() -> Self {
        let light_presets = BTreeMap::from([
            (
                NORMAL_PRESET.to_string(),
                LightPreset {
                    directional: Some(DirectionalPreset {
                        color: WHITE_HEX.to_string(),
                        intensity: NORMAL_DIRECTIONAL_INTENSITY,
                        direction: NORMAL_DIRECTIONAL_DIRECTION,
                    }),
                    ambient: Some(AmbientPreset {
                        color: WHITE_HEX.to_string(),
                        intensity: NORMAL_AMBIENT_INTENSITY,
                    }),
                },
            ),
            (
                VIEWER_PRESET.to_string(),
                LightPreset {
                    directional: None,
                    ambient: Some(AmbientPreset {
                        color: WHITE_HEX.to_string(),
                        intensity: VIEWER_AMBIENT_INTENSITY,
                    }),
                },
            ),
        ]);

        let control_presets = BTreeMap::from([
            (NORMAL_PRESET.to_string(), ControlPreset::default()),
            (
                VIEWER_PRESET.to_string(),
                ControlPreset {
                    enable_zoom: false,
                    max_polar_angle: VIEWER_MAX_POLAR_ANGLE,
                    min_distance: 0.01,
                    ..default()
                },
            ),
        ]);

        let scenes = vec![
            SceneConfig {
                id: MAIN_SCENE_ID.to_string(),
                background: MAIN_BACKGROUND_HEX.to_string(),
                camera: CameraConfig::default(),
                lights: NORMAL_PRESET.to_string(),
                controls: NORMAL_PRESET.to_string(),
                models: vec![BUS_MODEL_ID.to_string()],
            },
            SceneConfig {
                id: VIEWER_SCENE_ID.to_string(),
                background: VIEWER_BACKGROUND_HEX.to_string(),
                camera: CameraConfig {
                    position: VIEWER_CAMERA_POSITION,
                    target: CAMERA_TARGET,
                    ..default()
                },
                lights: VIEWER_PRESET.to_string(),
                controls: VIEWER_PRESET.to_string(),
                models: Vec::new(),
            },
        ];

        Self {
            models: vec![ModelEntry {
                id: BUS_MODEL_ID.to_string(),
                path: BUS_MODEL_PATH.to_string(),
                scale: 1.0,
            }],
            audio_channels: AMBIENT_CHANNELS
                .iter()
                .map(|channel| AudioChannelEntry {
                    id: channel.id.to_string(),
                    path: channel.path.to_string(),
                    looping: true,
                    volume: channel.volume,
                })
                .collect(),
            light_presets,
            control_presets,
            scenes,
            initial_scene: MAIN_SCENE_ID.to_string(),
            progress: ProgressStrategy::default(),
            auto_start: false,
            ui: UiConfig::default(),
        }
    }
}

impl ViewerManifest {
    pub fn model(&self, id: &str) -> Option<&ModelEntry> {
        self.models.iter().find(|model| model.id == id)
    }

    /// Structural checks that do not depend on presets. Each problem is
    /// reported separately; none of them stops the rest of bootstrap.
    pub fn validate(&self) -> Vec<ViewerError> {
        let mut errors = Vec::new();

        for scene in &self.scenes {
            for model in &scene.models {
                if self.model(model).is_none() {
                    errors.push(ViewerError::configuration("model", model.clone()));
                }
            }
        }

        let mut model_ids = BTreeSet::new();
        for model in &self.models {
            if !model_ids.insert(model.id.as_str()) {
                errors.push(ViewerError::configuration("duplicate model", model.id.clone()));
            }
        }

        let mut channel_ids = BTreeSet::new();
        for channel in &self.audio_channels {
            if !channel_ids.insert(channel.id.as_str()) {
                errors.push(ViewerError::configuration(
                    "duplicate audio channel",
                    channel.id.clone(),
                ));
            }
            if !(0.0..=1.0).contains(&channel.volume) {
                errors.push(ViewerError::configuration("audio volume", channel.id.clone()));
            }
        }

        errors
    }
}
