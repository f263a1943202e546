//! Scene configuration and application.
//!
//! Scenes are declared in the manifest and held by the registry. Exactly one
//! is active at a time; activating another replaces its camera, controls,
//! lights and models together.

/// Light and control presets and the factories that resolve them.
pub mod presets;

/// Scene registry and the rig built for the active scene.
pub mod registry;

/// Entity spawning for the active scene and scene selection commands.
pub mod spawn;
