use bevy::prelude::*;

use crate::engine::session::controller::{SessionController, SessionState};

/// Schedule-level mirror of the session state. Systems gate on this with
/// `in_state`; the session controller remains the source of truth.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    ReadyToStart,
    Interactive,
}

impl From<SessionState> for AppState {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Loading => AppState::Loading,
            SessionState::ReadyToStart => AppState::ReadyToStart,
            SessionState::Interactive => AppState::Interactive,
        }
    }
}

pub fn sync_app_state(
    controller: Res<SessionController>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let target = AppState::from(controller.state());
    if *state.get() != target {
        info!("→ Transitioning to {:?} state", target);
        next_state.set(target);
    }
}
