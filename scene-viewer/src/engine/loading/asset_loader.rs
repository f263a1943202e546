use bevy::asset::{LoadState, RecursiveDependencyLoadState, UntypedAssetId};
use bevy::prelude::*;

use crate::engine::assets::viewer_assets::{ViewerAssets, channel_of_unit};
use crate::engine::loading::load_tracker::{AssetLoadTracker, LoadKind};
use crate::engine::session::controller::SessionController;
use crate::errors::{ViewerDiagnostic, ViewerError, report};

/// Fired once when the tracker reports every load unit settled.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetsReady;

/// Settled outcome of one load unit, `None` while it is still in flight.
///
/// A model is only done once its textures and buffers are, so models follow
/// the recursive dependency state of the root glTF. Audio has no
/// dependencies and follows its own state.
pub fn unit_outcome(
    asset_server: &AssetServer,
    kind: LoadKind,
    id: UntypedAssetId,
) -> Option<Result<(), String>> {
    match kind {
        LoadKind::Model => match asset_server.get_recursive_dependency_load_state(id)? {
            RecursiveDependencyLoadState::Loaded => Some(Ok(())),
            RecursiveDependencyLoadState::Failed(err) => Some(Err(err.to_string())),
            _ => None,
        },
        LoadKind::Audio => match asset_server.get_load_state(id)? {
            LoadState::Loaded => Some(Ok(())),
            LoadState::Failed(err) => Some(Err(err.to_string())),
            _ => None,
        },
    }
}

/// Feed asset server load states into the tracker. Order of completion is
/// irrelevant; each unit is resolved the first frame its state settles.
pub fn poll_load_states(
    asset_server: Res<AssetServer>,
    viewer_assets: Option<Res<ViewerAssets>>,
    mut tracker: ResMut<AssetLoadTracker>,
    mut controller: ResMut<SessionController>,
    mut diagnostics: EventWriter<ViewerDiagnostic>,
) {
    let Some(viewer_assets) = viewer_assets else {
        return;
    };

    for (unit, kind, id) in viewer_assets.load_units() {
        let pending = tracker
            .task(&unit)
            .is_some_and(|task| !task.status.is_resolved());
        if !pending {
            continue;
        }

        let outcome = match unit_outcome(&asset_server, kind, id) {
            Some(Ok(())) => {
                info!("✓ {:?} '{}' loaded", kind, unit);
                tracker.complete(&unit)
            }
            Some(Err(reason)) => {
                report(&ViewerError::asset_load(&unit, &reason), &mut diagnostics);
                if let Some(channel) = channel_of_unit(&unit) {
                    if let Err(err) = controller.mark_channel_unavailable(channel) {
                        report(&err, &mut diagnostics);
                    }
                }
                tracker.fail(&unit, reason)
            }
            None => Ok(()),
        };

        if let Err(err) = outcome {
            report(&err, &mut diagnostics);
        }
    }
}

pub fn tick_progress_timer(time: Res<Time>, mut tracker: ResMut<AssetLoadTracker>) {
    if tracker.timer_active() {
        tracker.tick(time.delta());
    }
}

/// Mirror progress into the session and fire [`AssetsReady`] exactly once.
pub fn emit_assets_ready(
    mut tracker: ResMut<AssetLoadTracker>,
    mut controller: ResMut<SessionController>,
    mut ready_events: EventWriter<AssetsReady>,
) {
    let progress = tracker.progress();
    if controller.ui().progress < progress {
        controller.set_progress(progress);
    }

    if tracker.take_ready() {
        let failed = tracker.failures().count();
        info!(
            "✓ All load units settled ({} of {} failed)",
            failed,
            tracker.expected()
        );
        ready_events.write(AssetsReady);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::viewer_manifest::ViewerManifest;
    use crate::engine::loading::manifest_loader::Bootstrap;
    use crate::engine::session::controller::Playback;
    use bevy::asset::io::Reader;
    use bevy::asset::{AssetLoader, AssetMetaCheck, LoadContext};
    use bevy::gltf::Gltf;
    use std::time::Duration;

    const MAX_FRAMES: usize = 500;

    fn headless_app(file_path: String) -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin {
                file_path,
                meta_check: AssetMetaCheck::Never,
                ..default()
            },
        ))
        .init_asset::<Gltf>()
        .init_asset::<Scene>()
        .init_asset::<AudioSource>()
        .init_asset::<Image>();
        app
    }

    /// Viewer wired as after bootstrap, pointed at an asset root that does
    /// not exist so every load fails.
    fn unreachable_assets_app() -> App {
        let mut app = headless_app("no-such-asset-root".into());
        app.add_event::<AssetsReady>()
            .add_event::<ViewerDiagnostic>()
            .add_systems(Update, (poll_load_states, emit_assets_ready).chain());

        let manifest = ViewerManifest::default();
        let viewer_assets = ViewerAssets::load(&manifest, app.world().resource::<AssetServer>());
        let units = viewer_assets
            .load_units()
            .into_iter()
            .map(|(unit, kind, _)| (unit, kind));
        let bootstrap = Bootstrap::from_manifest(&manifest, units);
        assert!(bootstrap.errors.is_empty());

        app.insert_resource(bootstrap.tracker)
            .insert_resource(bootstrap.controller)
            .insert_resource(viewer_assets);
        app
    }

    #[test]
    fn test_failed_loads_settle_and_disable_audio() {
        let mut app = unreachable_assets_app();
        let mut cursor = app.world().resource::<Events<AssetsReady>>().get_cursor();
        let mut ready_count = 0;

        for _ in 0..MAX_FRAMES {
            app.update();
            ready_count += cursor
                .read(app.world().resource::<Events<AssetsReady>>())
                .count();
            if app.world().resource::<AssetLoadTracker>().is_ready() {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }

        // A few more frames must not fire again.
        for _ in 0..5 {
            app.update();
            ready_count += cursor
                .read(app.world().resource::<Events<AssetsReady>>())
                .count();
        }
        assert_eq!(ready_count, 1);

        let tracker = app.world().resource::<AssetLoadTracker>();
        let mut failed: Vec<_> = tracker.failures().map(|(id, _)| id.to_string()).collect();
        failed.sort();
        assert_eq!(
            failed,
            vec!["audio:birds", "audio:bus", "audio:music", "model:bus"]
        );
        assert_eq!(tracker.progress(), 1.0);

        let controller = app.world().resource::<SessionController>();
        assert_eq!(controller.channels().len(), 3);
        assert!(
            controller
                .channels()
                .iter()
                .all(|channel| channel.playback == Playback::Unavailable)
        );
        assert_eq!(controller.ui().progress, 1.0);
    }

    /// Root asset that pulls in one image named by its file contents.
    #[derive(Asset, TypePath, Debug)]
    struct Shell {
        #[allow(dead_code)]
        texture: Handle<Image>,
    }

    #[derive(Default)]
    struct ShellLoader;

    impl AssetLoader for ShellLoader {
        type Asset = Shell;
        type Settings = ();
        type Error = std::io::Error;

        async fn load(
            &self,
            reader: &mut dyn Reader,
            _settings: &(),
            load_context: &mut LoadContext<'_>,
        ) -> Result<Shell, Self::Error> {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            let path = String::from_utf8_lossy(&bytes).trim().to_string();
            Ok(Shell {
                texture: load_context.load(path),
            })
        }

        fn extensions(&self) -> &[&str] {
            &["shell"]
        }
    }

    #[test]
    fn test_model_waits_for_dependencies() {
        let root = std::env::temp_dir().join(format!("scene-viewer-deps-{}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("bus.shell"), "textures/bus_tex.png").unwrap();

        let mut app = headless_app(root.to_string_lossy().into_owned());
        app.init_asset::<Shell>().init_asset_loader::<ShellLoader>();
        let asset_server = app.world().resource::<AssetServer>().clone();
        let id = asset_server.load::<Shell>("bus.shell").id().untyped();

        let mut outcome = None;
        for _ in 0..MAX_FRAMES {
            app.update();
            outcome = unit_outcome(&asset_server, LoadKind::Model, id);
            if outcome.is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        std::fs::remove_dir_all(&root).ok();

        // The root parsed fine, yet its texture is missing.
        assert!(matches!(
            asset_server.get_load_state(id),
            Some(LoadState::Loaded)
        ));
        assert_eq!(
            unit_outcome(&asset_server, LoadKind::Audio, id),
            Some(Ok(()))
        );
        assert!(matches!(outcome, Some(Err(_))), "outcome was {outcome:?}");
    }
}
