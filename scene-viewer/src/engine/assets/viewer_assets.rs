use bevy::asset::UntypedAssetId;
use bevy::gltf::Gltf;
use bevy::prelude::*;

use crate::engine::assets::viewer_manifest::ViewerManifest;
use crate::engine::loading::load_tracker::LoadKind;
use crate::engine::session::controller::MuteIcon;

pub fn model_unit(id: &str) -> String {
    format!("model:{id}")
}

pub fn audio_unit(id: &str) -> String {
    format!("audio:{id}")
}

/// Channel id for an audio load unit, if it is one.
pub fn channel_of_unit(unit: &str) -> Option<&str> {
    unit.strip_prefix("audio:")
}

#[derive(Debug, Clone)]
pub struct ModelAsset {
    pub id: String,
    /// Root handle, polled for load state.
    pub gltf: Handle<Gltf>,
    pub scene: Handle<Scene>,
    pub scale: f32,
}

/// Playback settings live on the session's channels, not here.
#[derive(Debug, Clone)]
pub struct AudioAsset {
    pub id: String,
    pub source: Handle<AudioSource>,
}

/// Handles for everything the manifest asked for.
#[derive(Resource, Debug, Default)]
pub struct ViewerAssets {
    models: Vec<ModelAsset>,
    audio: Vec<AudioAsset>,
    mute_icon: Handle<Image>,
    sound_icon: Handle<Image>,
}

impl ViewerAssets {
    /// Kick off every load named by the manifest. Loads run in parallel on
    /// the asset server and are observed through [`ViewerAssets::load_units`].
    pub fn load(manifest: &ViewerManifest, asset_server: &AssetServer) -> Self {
        let models = manifest
            .models
            .iter()
            .map(|model| {
                info!("Loading model '{}' from {}", model.id, model.path);
                ModelAsset {
                    id: model.id.clone(),
                    gltf: asset_server.load(model.path.clone()),
                    scene: asset_server.load(GltfAssetLabel::Scene(0).from_asset(model.path.clone())),
                    scale: model.scale,
                }
            })
            .collect();

        let audio = manifest
            .audio_channels
            .iter()
            .map(|channel| {
                info!("Loading audio '{}' from {}", channel.id, channel.path);
                AudioAsset {
                    id: channel.id.clone(),
                    source: asset_server.load(channel.path.clone()),
                }
            })
            .collect();

        Self {
            models,
            audio,
            mute_icon: asset_server.load(manifest.ui.mute_icon.clone()),
            sound_icon: asset_server.load(manifest.ui.sound_icon.clone()),
        }
    }

    /// One entry per asset whose completion counts towards readiness.
    /// Icons are not load units.
    pub fn load_units(&self) -> Vec<(String, LoadKind, UntypedAssetId)> {
        let models = self
            .models
            .iter()
            .map(|m| (model_unit(&m.id), LoadKind::Model, m.gltf.id().untyped()));
        let audio = self
            .audio
            .iter()
            .map(|a| (audio_unit(&a.id), LoadKind::Audio, a.source.id().untyped()));
        models.chain(audio).collect()
    }

    pub fn model(&self, id: &str) -> Option<&ModelAsset> {
        self.models.iter().find(|model| model.id == id)
    }

    pub fn audio(&self) -> &[AudioAsset] {
        &self.audio
    }

    pub fn icon(&self, icon: MuteIcon) -> Handle<Image> {
        match icon {
            MuteIcon::Mute => self.mute_icon.clone(),
            MuteIcon::Sound => self.sound_icon.clone(),
        }
    }
}
