//! In-canvas overlay built with Bevy UI.
//!
//! Overlay systems only read the session controller's `UiState`; button
//! presses go back out as `SessionCommand` events.

use bevy::prelude::*;

use crate::engine::core::app_state::AppState;

/// Loading panel, Start button and mute toggle.
pub mod overlay;

use overlay::*;

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_loading_overlay)
            .add_systems(OnEnter(AppState::ReadyToStart), spawn_start_button)
            .add_systems(OnEnter(AppState::Interactive), spawn_interface)
            .add_systems(
                Update,
                (
                    apply_loading_label,
                    update_progress_bar,
                    sync_overlay_visibility,
                    update_mute_icon,
                    start_button_interaction.run_if(in_state(AppState::ReadyToStart)),
                    mute_button_interaction.run_if(in_state(AppState::Interactive)),
                ),
            );
    }
}
