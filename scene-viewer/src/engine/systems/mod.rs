//! Per-frame runtime systems.

/// Viewport tracking, resize handling and orbit camera input.
///
/// Camera input only runs while the session is interactive.
pub mod render_loop;
