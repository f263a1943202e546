//! Shared default values for the scene viewer.
//!
//! These back `ViewerManifest::default()` when no manifest is shipped, so the
//! built-in viewer matches the bundled `viewer_manifest.json`.

pub mod asset_paths;
pub mod audio;
pub mod presets;
pub mod render_settings;
pub mod ui;
