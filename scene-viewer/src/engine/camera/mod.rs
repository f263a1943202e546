//! Camera behaviour for the active scene.
//!
//! Orbit state lives on the camera entity as a component so that a scene
//! switch replaces it together with the camera.

/// Orbit controller with polar and distance clamping.
pub mod orbit_controls;
