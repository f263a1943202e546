use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::engine::scene::presets::ControlPreset;

/// Keeps the eye off the poles so `looking_at` never sees a degenerate up vector.
const POLE_EPSILON: f32 = 1e-3;

/// World units panned per pixel, per unit of orbit radius.
const PAN_SCALE: f32 = 0.0015;

/// Orbit camera state around a target point.
///
/// `polar` is measured from +Y (0 looks straight down), `azimuth` around +Y
/// starting at +Z. Every mutation re-clamps polar angle and distance to the
/// preset range.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    pub radius: f32,
    pub azimuth: f32,
    pub polar: f32,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitControls {
    pub fn from_preset(preset: &ControlPreset, position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let radius = offset.length();
        let polar = if radius > f32::EPSILON {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            FRAC_PI_2
        };

        let mut controls = Self {
            target,
            radius,
            azimuth: offset.x.atan2(offset.z),
            polar,
            enable_pan: preset.enable_pan,
            enable_zoom: preset.enable_zoom,
            rotate_speed: preset.rotate_speed,
            zoom_speed: preset.zoom_speed,
            min_polar_angle: preset.min_polar_angle,
            max_polar_angle: preset.max_polar_angle,
            min_distance: preset.min_distance,
            max_distance: preset.max_distance,
        };
        controls.clamp();
        controls
    }

    fn polar_range(&self) -> (f32, f32) {
        let lo = self.min_polar_angle.max(POLE_EPSILON);
        let hi = self.max_polar_angle.min(PI - POLE_EPSILON).max(lo);
        (lo, hi)
    }

    fn clamp(&mut self) {
        let (lo, hi) = self.polar_range();
        self.polar = self.polar.clamp(lo, hi);

        let max_distance = self.max_distance.max(self.min_distance);
        self.radius = self.radius.clamp(self.min_distance, max_distance);
    }

    /// Orbit by a pointer delta in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.azimuth -= delta.x * self.rotate_speed;
        self.polar -= delta.y * self.rotate_speed;
        self.clamp();
    }

    /// Dolly towards (positive) or away from (negative) the target.
    /// Returns `false` when zoom is disabled.
    pub fn zoom(&mut self, amount: f32) -> bool {
        if !self.enable_zoom {
            return false;
        }
        self.radius *= (-amount * self.zoom_speed).exp();
        self.clamp();
        true
    }

    /// Slide the target in the view plane. Returns `false` when pan is disabled.
    pub fn pan(&mut self, delta: Vec2) -> bool {
        if !self.enable_pan {
            return false;
        }
        let transform = self.transform();
        let scale = self.radius * PAN_SCALE;
        self.target += (transform.left() * delta.x + transform.up() * delta.y) * scale;
        true
    }

    pub fn offset(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        Vec3::new(
            self.radius * sin_polar * sin_azimuth,
            self.radius * cos_polar,
            self.radius * sin_polar * cos_azimuth,
        )
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.offset()
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::presets::NORMAL_MAX_POLAR_ANGLE;

    fn normal() -> ControlPreset {
        ControlPreset::default()
    }

    #[test]
    fn test_orbit_recovers_start_position() {
        let position = Vec3::new(0.0, 50.0, 75.0);
        let controls = OrbitControls::from_preset(&normal(), position, Vec3::ZERO);
        assert!(controls.eye().distance(position) < 1e-3);
        assert!((controls.radius - position.length()).abs() < 1e-4);
    }

    #[test]
    fn test_polar_never_passes_ceiling() {
        let mut controls =
            OrbitControls::from_preset(&normal(), Vec3::new(0.0, 50.0, 75.0), Vec3::ZERO);

        // Dragging up pushes the eye towards the horizon.
        controls.rotate(Vec2::new(0.0, -100_000.0));
        assert!((controls.polar - NORMAL_MAX_POLAR_ANGLE).abs() < 1e-6);
        assert!(controls.eye().y > 0.0);

        controls.rotate(Vec2::new(0.0, 100_000.0));
        assert!(controls.polar >= POLE_EPSILON);
    }

    #[test]
    fn test_pan_is_ignored_when_disabled() {
        let mut controls =
            OrbitControls::from_preset(&normal(), Vec3::new(0.0, 50.0, 75.0), Vec3::ZERO);
        assert!(!controls.pan(Vec2::new(40.0, 10.0)));
        assert_eq!(controls.target, Vec3::ZERO);

        controls.enable_pan = true;
        assert!(controls.pan(Vec2::new(40.0, 10.0)));
        assert_ne!(controls.target, Vec3::ZERO);
    }

    #[test]
    fn test_zoom_is_clamped_and_can_be_disabled() {
        let preset = normal();
        let mut controls =
            OrbitControls::from_preset(&preset, Vec3::new(0.0, 50.0, 75.0), Vec3::ZERO);

        controls.zoom(1_000.0);
        assert_eq!(controls.radius, preset.min_distance);
        controls.zoom(-1_000.0);
        assert_eq!(controls.radius, preset.max_distance);

        controls.enable_zoom = false;
        assert!(!controls.zoom(5.0));
        assert_eq!(controls.radius, preset.max_distance);
    }

    #[test]
    fn test_start_outside_range_is_clamped() {
        // Directly overhead sits on the pole, below the minimum.
        let controls =
            OrbitControls::from_preset(&normal(), Vec3::new(0.0, 1_000.0, 0.0), Vec3::ZERO);
        assert!(controls.polar >= POLE_EPSILON);
        assert_eq!(controls.radius, normal().max_distance);
    }
}
