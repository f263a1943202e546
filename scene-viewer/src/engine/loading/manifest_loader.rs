use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::assets::viewer_assets::ViewerAssets;
use crate::engine::assets::viewer_manifest::ViewerManifest;
use crate::engine::loading::load_tracker::{AssetLoadTracker, LoadKind};
use crate::engine::scene::presets::PresetLibrary;
use crate::engine::scene::registry::SceneRegistry;
use crate::engine::session::controller::SessionController;
use crate::errors::{ViewerDiagnostic, ViewerError, report};
use constants::asset_paths::MANIFEST_PATH;

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<ViewerManifest>>,
    bootstrapped: bool,
}

/// Everything built from the manifest before the first load completes.
#[derive(Debug)]
pub struct Bootstrap {
    pub registry: SceneRegistry,
    pub tracker: AssetLoadTracker,
    pub controller: SessionController,
    pub errors: Vec<ViewerError>,
}

impl Bootstrap {
    /// Register scenes, activate the initial one, register one load unit per
    /// asset, then freeze the tracker. Problems are collected rather than
    /// aborting so a single bad entry does not take the viewer down.
    pub fn from_manifest(
        manifest: &ViewerManifest,
        units: impl IntoIterator<Item = (String, LoadKind)>,
    ) -> Self {
        let mut errors = manifest.validate();

        let presets = PresetLibrary::new(
            manifest.light_presets.clone(),
            manifest.control_presets.clone(),
        );
        let mut registry = SceneRegistry::new(presets);
        for scene in &manifest.scenes {
            if let Err(err) = registry.register_scene(scene.clone()) {
                errors.push(err);
            }
        }
        if let Err(err) = registry.activate(&manifest.initial_scene) {
            errors.push(err);
        }

        let mut tracker = AssetLoadTracker::new(&manifest.progress);
        for (unit, kind) in units {
            if let Err(err) = tracker.register(unit, kind) {
                errors.push(err);
            }
        }
        tracker.freeze();

        Self {
            registry,
            tracker,
            controller: SessionController::new(&manifest.audio_channels),
            errors,
        }
    }
}

pub fn start_loading(mut manifest_loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    info!("Loading viewer manifest from {}", MANIFEST_PATH);
    manifest_loader.handle = Some(asset_server.load(MANIFEST_PATH));
}

/// Waits for the manifest, then starts every asset load and installs the
/// registry, tracker and controller built from it.
pub fn bootstrap_when_manifest_ready(
    mut commands: Commands,
    mut manifest_loader: ResMut<ManifestLoader>,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<ViewerManifest>>,
    mut diagnostics: EventWriter<ViewerDiagnostic>,
) {
    if manifest_loader.bootstrapped {
        return;
    }
    let Some(handle) = manifest_loader.handle.as_ref() else {
        return;
    };

    let manifest = match asset_server.get_load_state(handle) {
        Some(LoadState::Loaded) => match manifests.get(handle) {
            Some(manifest) => manifest.clone(),
            None => return,
        },
        Some(LoadState::Failed(err)) => {
            warn!("Viewer manifest unavailable ({}), using built-in defaults", err);
            ViewerManifest::default()
        }
        _ => return,
    };
    manifest_loader.bootstrapped = true;
    info!("✓ Viewer manifest ready");

    let viewer_assets = ViewerAssets::load(&manifest, &asset_server);
    let units = viewer_assets
        .load_units()
        .into_iter()
        .map(|(unit, kind, _)| (unit, kind));
    let bootstrap = Bootstrap::from_manifest(&manifest, units);

    for err in &bootstrap.errors {
        report(err, &mut diagnostics);
    }
    info!(
        "Tracking {} load units ({:?} progress)",
        bootstrap.tracker.expected(),
        manifest.progress
    );

    commands.insert_resource(bootstrap.registry);
    commands.insert_resource(bootstrap.tracker);
    commands.insert_resource(bootstrap.controller);
    commands.insert_resource(viewer_assets);
    commands.insert_resource(manifest);
}
