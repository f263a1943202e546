pub const LOADING_LABEL: &str = "Loading...";
pub const START_LABEL: &str = "Start";

pub const PANEL_COLOUR: [f32; 3] = [0.10, 0.11, 0.13];
pub const BUTTON_COLOUR: [f32; 3] = [0.22, 0.24, 0.28];
pub const BUTTON_HOVER_COLOUR: [f32; 3] = [0.26, 0.28, 0.32];
pub const BUTTON_PRESSED_COLOUR: [f32; 3] = [0.18, 0.20, 0.24];
pub const PROGRESS_TRACK_COLOUR: [f32; 3] = [0.20, 0.21, 0.24];
pub const PROGRESS_FILL_COLOUR: [f32; 3] = [0.35, 0.65, 0.95];

pub const PROGRESS_BAR_WIDTH_PX: f32 = 240.0;
pub const PROGRESS_BAR_HEIGHT_PX: f32 = 8.0;
pub const MUTE_BUTTON_SIZE_PX: f32 = 40.0;
