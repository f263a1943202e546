use bevy::audio::{AudioSink, AudioSinkPlayback, PlaybackSettings, Volume};
use bevy::prelude::*;

use crate::engine::assets::viewer_assets::ViewerAssets;
use crate::engine::session::controller::{Playback, SessionController};

/// Links an audio entity to its session channel.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct AudioChannelTag(pub String);

pub fn playback_settings(looping: bool, volume: f32) -> PlaybackSettings {
    let base = if looping {
        PlaybackSettings::LOOP
    } else {
        PlaybackSettings::ONCE
    };
    base.paused().with_volume(Volume::Linear(volume))
}

/// Whether a sink for a channel in this state should be paused.
pub fn should_pause(playback: Playback) -> bool {
    playback != Playback::Playing
}

/// Spawn a paused player for every channel whose source loaded. Volume is
/// fixed here and never touched again.
pub fn spawn_audio_channels(
    mut commands: Commands,
    viewer_assets: Option<Res<ViewerAssets>>,
    controller: Res<SessionController>,
) {
    let Some(viewer_assets) = viewer_assets else {
        return;
    };

    for asset in viewer_assets.audio() {
        let Some(channel) = controller.channel(&asset.id) else {
            continue;
        };
        if !channel.is_available() {
            info!("Audio channel '{}' unavailable, not spawning", channel.id);
            continue;
        }
        commands.spawn((
            Name::new(format!("audio {}", channel.id)),
            AudioChannelTag(channel.id.clone()),
            AudioPlayer::new(asset.source.clone()),
            playback_settings(channel.looping, channel.volume),
        ));
    }
}

/// Bring every sink in line with the controller's playback intent.
pub fn reconcile_audio_sinks(
    controller: Res<SessionController>,
    sinks: Query<(&AudioChannelTag, &AudioSink)>,
) {
    for (tag, sink) in &sinks {
        let Some(channel) = controller.channel(&tag.0) else {
            continue;
        };
        let pause = should_pause(channel.playback);
        if pause && !sink.is_paused() {
            sink.pause();
        } else if !pause && sink.is_paused() {
            sink.play();
        }
    }
}
