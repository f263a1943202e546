use bevy::prelude::*;

use crate::engine::assets::viewer_manifest::ViewerManifest;
use crate::engine::loading::asset_loader::AssetsReady;
use crate::engine::session::controller::SessionController;
use crate::errors::{ViewerDiagnostic, report};

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::scene::registry::SceneRegistry;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::scene::spawn::SceneCommand;

/// User intent coming from the overlay, the host page or the keyboard.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Begin,
    ToggleMute,
}

/// Loading -> ReadyToStart on the ready signal. With `auto_start` the
/// session begins straight away.
pub fn start_session_when_ready(
    mut ready_events: EventReader<AssetsReady>,
    mut controller: ResMut<SessionController>,
    manifest: Option<Res<ViewerManifest>>,
    mut session_commands: EventWriter<SessionCommand>,
    mut diagnostics: EventWriter<ViewerDiagnostic>,
) {
    for _ in ready_events.read() {
        match controller.start() {
            Ok(()) => {
                info!("Session ready to start");
                if manifest.as_ref().is_some_and(|m| m.auto_start) {
                    info!("Auto start enabled, beginning session");
                    session_commands.write(SessionCommand::Begin);
                }
            }
            Err(err) => report(&err, &mut diagnostics),
        }
    }
}

pub fn handle_session_commands(
    mut events: EventReader<SessionCommand>,
    mut controller: ResMut<SessionController>,
    mut diagnostics: EventWriter<ViewerDiagnostic>,
) {
    for command in events.read() {
        info!("Session command: {:?}", command);
        let outcome = match command {
            SessionCommand::Begin => controller.begin().map(|()| {
                info!("Session started, {} channels", controller.channels().len());
            }),
            SessionCommand::ToggleMute => controller.toggle_mute().map(|muted| {
                info!("Audio {}", if muted { "muted" } else { "unmuted" });
            }),
        };
        if let Err(err) = outcome {
            report(&err, &mut diagnostics);
        }
    }
}

/// Enter begins, M toggles mute, digits select scenes in registration order.
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_session_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    registry: Res<SceneRegistry>,
    mut session_commands: EventWriter<SessionCommand>,
    mut scene_commands: EventWriter<SceneCommand>,
) {
    if keyboard.any_just_pressed([KeyCode::Enter, KeyCode::NumpadEnter]) {
        session_commands.write(SessionCommand::Begin);
    }
    if keyboard.just_pressed(KeyCode::KeyM) {
        session_commands.write(SessionCommand::ToggleMute);
    }

    const DIGITS: [KeyCode; 9] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];
    for (key, scene_id) in DIGITS.iter().zip(registry.scene_ids()) {
        if keyboard.just_pressed(*key) {
            scene_commands.write(SceneCommand::Select(scene_id.to_string()));
        }
    }
}

/// Placeholder system for WASM builds where the host page drives the session via RPC.
#[cfg(target_arch = "wasm32")]
pub fn handle_session_keyboard_shortcuts() {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::app_state::{AppState, sync_app_state};
    use crate::engine::loading::asset_loader::emit_assets_ready;
    use crate::engine::loading::load_tracker::AssetLoadTracker;
    use crate::engine::loading::progress::ProgressStrategy;
    use crate::engine::session::controller::{Playback, SessionState};
    use bevy::state::app::StatesPlugin;

    fn session_app(auto_start: bool) -> App {
        let manifest = ViewerManifest {
            auto_start,
            ..default()
        };
        let mut tracker = AssetLoadTracker::new(&ProgressStrategy::Completion);
        tracker.freeze();

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<AppState>()
            .insert_resource(SessionController::new(&manifest.audio_channels))
            .insert_resource(tracker)
            .insert_resource(manifest)
            .add_event::<AssetsReady>()
            .add_event::<SessionCommand>()
            .add_event::<ViewerDiagnostic>()
            .add_systems(
                Update,
                (
                    emit_assets_ready,
                    start_session_when_ready,
                    handle_session_commands,
                    sync_app_state,
                )
                    .chain(),
            );
        app
    }

    fn app_state(app: &App) -> AppState {
        *app.world().resource::<State<AppState>>().get()
    }

    #[test]
    fn test_ready_waits_for_begin() {
        let mut app = session_app(false);
        app.update();
        app.update();

        let controller = app.world().resource::<SessionController>();
        assert_eq!(controller.state(), SessionState::ReadyToStart);
        assert_eq!(app_state(&app), AppState::ReadyToStart);

        app.world_mut().send_event(SessionCommand::Begin);
        app.update();
        app.update();

        let controller = app.world().resource::<SessionController>();
        assert_eq!(controller.state(), SessionState::Interactive);
        assert!(controller.channels().iter().all(|c| c.playback == Playback::Playing));
        assert_eq!(app_state(&app), AppState::Interactive);
    }

    #[test]
    fn test_auto_start_begins_without_input() {
        let mut app = session_app(true);
        app.update();
        app.update();

        let controller = app.world().resource::<SessionController>();
        assert_eq!(controller.state(), SessionState::Interactive);
        assert!(controller.mute_handler_attached());
        assert_eq!(app_state(&app), AppState::Interactive);
    }

    #[test]
    fn test_out_of_order_commands_are_diagnosed() {
        let mut app = session_app(false);
        app.world_mut().send_event(SessionCommand::ToggleMute);
        app.update();

        let controller = app.world().resource::<SessionController>();
        assert!(!controller.is_muted());

        let diagnostics = app.world().resource::<Events<ViewerDiagnostic>>();
        let mut cursor = diagnostics.get_cursor();
        let kinds: Vec<_> = cursor.read(diagnostics).map(|d| d.kind).collect();
        assert_eq!(kinds, vec!["invalid_transition"]);
    }
}
