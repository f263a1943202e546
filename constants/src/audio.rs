pub struct ChannelDefaults {
    pub id: &'static str,
    pub path: &'static str,
    pub volume: f32,
}

/// Ambient vehicle loop, ambient nature loop, music loop.
pub const AMBIENT_CHANNELS: &[ChannelDefaults] = &[
    ChannelDefaults {
        id: "bus",
        path: crate::asset_paths::BUS_LOOP_PATH,
        volume: 0.3,
    },
    ChannelDefaults {
        id: "birds",
        path: crate::asset_paths::BIRDS_LOOP_PATH,
        volume: 0.5,
    },
    ChannelDefaults {
        id: "music",
        path: crate::asset_paths::MUSIC_LOOP_PATH,
        volume: 0.1,
    },
];
