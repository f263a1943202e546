pub const MAIN_SCENE_ID: &str = "main";
pub const VIEWER_SCENE_ID: &str = "viewer";

pub const MAIN_BACKGROUND_HEX: &str = "#f7f7f7";
pub const VIEWER_BACKGROUND_HEX: &str = "#101014";

/// Vertical field of view in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const MAIN_CAMERA_POSITION: [f32; 3] = [0.0, 50.0, 75.0];
pub const VIEWER_CAMERA_POSITION: [f32; 3] = [0.0, 0.0, 0.1];
pub const CAMERA_TARGET: [f32; 3] = [0.0, 0.0, 0.0];

/// Fallback progress timer: +0.25 every 500 ms.
pub const TIMER_PROGRESS_STEP: f32 = 0.25;
pub const TIMER_PROGRESS_INTERVAL_SECS: f32 = 0.5;

pub const CANVAS_SELECTOR: &str = "#viewer-canvas";
pub const WINDOW_TITLE: &str = "Scene Viewer";
