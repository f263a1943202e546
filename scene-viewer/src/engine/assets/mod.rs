//! Viewer configuration and asset handles.

/// Handles for models, audio and icons requested by the manifest.
pub mod viewer_assets;

/// `viewer_manifest.json` as a Bevy asset, with built-in defaults.
pub mod viewer_manifest;
