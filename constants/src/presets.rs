use std::f32::consts::{FRAC_PI_2, PI};

pub const NORMAL_PRESET: &str = "normal";
pub const VIEWER_PRESET: &str = "viewer";

/// Preset intensities are unitless; these scale them into lux and cd/m².
pub const DIRECTIONAL_LUX_PER_UNIT: f32 = 10_000.0;
pub const AMBIENT_BRIGHTNESS_PER_UNIT: f32 = 500.0;

pub const NORMAL_DIRECTIONAL_INTENSITY: f32 = 0.8;
pub const NORMAL_AMBIENT_INTENSITY: f32 = 0.7;
pub const NORMAL_DIRECTIONAL_DIRECTION: [f32; 3] = [-0.5, -1.0, -0.3];

pub const VIEWER_AMBIENT_INTENSITY: f32 = 1.0;

/// Polar ceiling for the normal orbit: just under the horizon (~72.8°).
pub const NORMAL_MAX_POLAR_ANGLE: f32 = FRAC_PI_2 - 0.3;
pub const VIEWER_MAX_POLAR_ANGLE: f32 = PI;

pub const ROTATE_SPEED: f32 = 0.005;
pub const ZOOM_SPEED: f32 = 0.1;
pub const MIN_DISTANCE: f32 = 5.0;
pub const MAX_DISTANCE: f32 = 500.0;

/// Colour used by every default light.
pub const WHITE_HEX: &str = "#ffffff";
