use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::engine::camera::orbit_controls::OrbitControls;
use crate::engine::scene::registry::CameraConfig;

/// Pixel-unit wheel deltas are roughly this many times larger than line units.
const PIXELS_PER_LINE: f32 = 20.0;

/// Current drawable size of the primary window.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn aspect_ratio(&self) -> f32 {
        CameraConfig::aspect_for(self.width, self.height)
    }
}

pub fn init_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<Viewport>,
) {
    if let Ok(window) = windows.single() {
        viewport.width = window.width();
        viewport.height = window.height();
    }
}

/// Keep the viewport and the active camera's aspect ratio in step with the
/// window.
pub fn handle_window_resize(
    mut resize_events: EventReader<WindowResized>,
    mut viewport: ResMut<Viewport>,
    mut projections: Query<&mut Projection, With<OrbitControls>>,
) {
    let Some(resized) = resize_events.read().last() else {
        return;
    };
    viewport.width = resized.width;
    viewport.height = resized.height;

    let aspect_ratio = viewport.aspect_ratio();
    for mut projection in &mut projections {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = aspect_ratio;
        }
    }
}

/// Left drag orbits, right drag pans (when allowed), wheel zooms.
pub fn step_orbit_controls(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    ui_interactions: Query<&Interaction>,
    mut cameras: Query<(&mut OrbitControls, &mut Transform)>,
) {
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    let scroll: f32 = scroll_events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / PIXELS_PER_LINE,
        })
        .sum();

    // Drags that start on the overlay belong to the overlay.
    if ui_interactions
        .iter()
        .any(|interaction| *interaction != Interaction::None)
    {
        return;
    }

    for (mut controls, mut transform) in &mut cameras {
        let mut moved = false;

        if mouse_button.pressed(MouseButton::Left) && mouse_delta != Vec2::ZERO {
            controls.rotate(mouse_delta);
            moved = true;
        }
        if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
            moved |= controls.pan(mouse_delta);
        }
        if scroll.abs() > f32::EPSILON {
            moved |= controls.zoom(scroll);
        }

        if moved {
            *transform = controls.transform();
        }
    }
}
