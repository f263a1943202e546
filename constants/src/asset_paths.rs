/// Manifest path relative to the asset root.
pub const MANIFEST_PATH: &str = "viewer_manifest.json";

pub const BUS_MODEL_ID: &str = "bus";
pub const BUS_MODEL_PATH: &str = "models/bus.gltf";

pub const BUS_LOOP_PATH: &str = "sound/electricBusLoop.ogg";
pub const BIRDS_LOOP_PATH: &str = "sound/Birds.More.Loud.ogg";
pub const MUSIC_LOOP_PATH: &str = "sound/piano.loop.ogg";

/// Icon shown while audio plays; clicking it mutes.
pub const MUTE_ICON_PATH: &str = "img/mute.png";

/// Icon shown while muted; clicking it restores sound.
pub const SOUND_ICON_PATH: &str = "img/sound.png";
