use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

// Crate engine modules
use crate::engine::assets::viewer_manifest::ViewerManifest;
use crate::engine::core::app_state::{AppState, sync_app_state};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::asset_loader::{
    AssetsReady, emit_assets_ready, poll_load_states, tick_progress_timer,
};
use crate::engine::loading::load_tracker::AssetLoadTracker;
use crate::engine::loading::manifest_loader::{
    ManifestLoader, bootstrap_when_manifest_ready, start_loading,
};
use crate::engine::scene::registry::SceneRegistry;
use crate::engine::scene::spawn::{SceneCommand, apply_active_scene, handle_scene_commands};
use crate::engine::session::audio::{reconcile_audio_sinks, spawn_audio_channels};
use crate::engine::session::controller::SessionController;
use crate::engine::session::systems::{
    SessionCommand, handle_session_commands, handle_session_keyboard_shortcuts,
    start_session_when_ready,
};
use crate::engine::systems::render_loop::{
    Viewport, handle_window_resize, init_viewport, step_orbit_controls,
};
use crate::engine::ui::OverlayPlugin;
use crate::errors::ViewerDiagnostic;
// Create Web RPC modules
use crate::rpc::web_rpc::WebRpcPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        // Registers ViewerManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ViewerManifest>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(OverlayPlugin);

    // Placeholders until bootstrap replaces them with manifest-built values.
    app.init_resource::<ManifestLoader>()
        .init_resource::<Viewport>()
        .init_resource::<SceneRegistry>()
        .init_resource::<AssetLoadTracker>()
        .init_resource::<SessionController>()
        .add_event::<AssetsReady>()
        .add_event::<SessionCommand>()
        .add_event::<SceneCommand>()
        .add_event::<ViewerDiagnostic>();

    app.add_systems(Startup, (start_loading, init_viewport));

    // Bootstrap and loading feed straight into the session so that a ready
    // signal, an auto start and the state mirror all land in the same frame.
    app.add_systems(
        Update,
        (
            bootstrap_when_manifest_ready.run_if(in_state(AppState::Loading)),
            (poll_load_states, tick_progress_timer, emit_assets_ready)
                .chain()
                .run_if(in_state(AppState::Loading)),
            start_session_when_ready,
            handle_session_keyboard_shortcuts, // Native shortcuts or no-op for WASM
            handle_session_commands,
            sync_app_state,
        )
            .chain(),
    );

    // Scene switching may happen at any point once the registry is populated.
    app.add_systems(
        Update,
        (handle_scene_commands, apply_active_scene)
            .chain()
            .after(handle_session_keyboard_shortcuts),
    );

    app.add_systems(OnExit(AppState::Loading), spawn_audio_channels)
        .add_systems(Update, reconcile_audio_sinks.after(handle_session_commands))
        .add_systems(
            Update,
            (
                handle_window_resize,
                step_orbit_controls.run_if(in_state(AppState::Interactive)),
            )
                .chain()
                .after(apply_active_scene),
        );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
