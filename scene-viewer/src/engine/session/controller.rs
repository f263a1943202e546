use bevy::prelude::*;
use serde::Serialize;

use crate::engine::assets::viewer_manifest::AudioChannelEntry;
use crate::errors::ViewerError;

/// User-facing lifecycle. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Loading,
    ReadyToStart,
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Playback {
    Idle,
    Playing,
    Paused,
    /// The source failed to load; the channel never plays.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioChannel {
    pub id: String,
    pub looping: bool,
    pub volume: f32,
    pub muted: bool,
    pub playback: Playback,
}

impl AudioChannel {
    pub fn is_available(&self) -> bool {
        self.playback != Playback::Unavailable
    }
}

/// Icon shown on the mute toggle. `Mute` invites muting (sound is on),
/// `Sound` invites restoring it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MuteIcon {
    Mute,
    Sound,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiState {
    pub progress: f32,
    pub progress_visible: bool,
    pub loading_label_visible: bool,
    pub start_button_visible: bool,
    pub loading_panel_visible: bool,
    pub interface_visible: bool,
    pub mute_icon: MuteIcon,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            progress: 0.0,
            progress_visible: true,
            loading_label_visible: true,
            start_button_visible: false,
            loading_panel_visible: true,
            interface_visible: false,
            mute_icon: MuteIcon::Mute,
        }
    }
}

/// Owns session state, audio channel intent and what the overlay should show.
///
/// Bevy-side audio sinks and UI nodes are reconciled against this resource;
/// nothing else writes session state.
#[derive(Resource, Debug, Default)]
pub struct SessionController {
    state: SessionState,
    muted: bool,
    channels: Vec<AudioChannel>,
    ui: UiState,
    mute_handler_attached: bool,
}

impl SessionController {
    pub fn new(channels: &[AudioChannelEntry]) -> Self {
        Self {
            channels: channels
                .iter()
                .map(|entry| AudioChannel {
                    id: entry.id.clone(),
                    looping: entry.looping,
                    volume: entry.volume.clamp(0.0, 1.0),
                    muted: false,
                    playback: Playback::Idle,
                })
                .collect(),
            ..default()
        }
    }

    fn reject(&self, operation: &'static str) -> ViewerError {
        ViewerError::InvalidTransition {
            operation,
            state: self.state,
        }
    }

    /// Loading -> ReadyToStart.
    pub fn start(&mut self) -> Result<(), ViewerError> {
        if self.state != SessionState::Loading {
            return Err(self.reject("start"));
        }
        self.state = SessionState::ReadyToStart;
        self.ui.progress = 1.0;
        self.ui.progress_visible = false;
        self.ui.loading_label_visible = false;
        self.ui.start_button_visible = true;
        Ok(())
    }

    /// ReadyToStart -> Interactive. Starts every available channel and
    /// attaches the mute handler.
    pub fn begin(&mut self) -> Result<(), ViewerError> {
        if self.state != SessionState::ReadyToStart {
            return Err(self.reject("begin"));
        }
        self.state = SessionState::Interactive;
        self.ui.start_button_visible = false;
        self.ui.loading_panel_visible = false;
        self.ui.interface_visible = true;

        for channel in self.channels.iter_mut().filter(|c| c.is_available()) {
            channel.playback = Playback::Playing;
        }
        self.mute_handler_attached = true;
        Ok(())
    }

    /// Flip mute for all channels together. Returns the new mute flag.
    pub fn toggle_mute(&mut self) -> Result<bool, ViewerError> {
        if self.state != SessionState::Interactive || !self.mute_handler_attached {
            return Err(self.reject("toggle_mute"));
        }
        self.muted = !self.muted;

        let playback = if self.muted {
            Playback::Paused
        } else {
            Playback::Playing
        };
        for channel in self.channels.iter_mut().filter(|c| c.is_available()) {
            channel.muted = self.muted;
            channel.playback = playback;
        }

        self.ui.mute_icon = if self.muted {
            MuteIcon::Sound
        } else {
            MuteIcon::Mute
        };
        Ok(self.muted)
    }

    /// Mirror tracker progress while loading. Ignored afterwards.
    pub fn set_progress(&mut self, progress: f32) {
        if self.state == SessionState::Loading {
            self.ui.progress = progress.clamp(0.0, 1.0).max(self.ui.progress);
        }
    }

    pub fn mark_channel_unavailable(&mut self, id: &str) -> Result<(), ViewerError> {
        let channel = self
            .channels
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ViewerError::configuration("audio channel", id))?;
        channel.playback = Playback::Unavailable;
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn channels(&self) -> &[AudioChannel] {
        &self.channels
    }

    pub fn channel(&self, id: &str) -> Option<&AudioChannel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn mute_handler_attached(&self) -> bool {
        self.mute_handler_attached
    }
}
