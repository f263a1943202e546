//! Bootstrap and load tracking.
//!
//! The manifest is loaded first. Once it settles, every model and audio
//! source it names is requested and registered as a load unit; per-frame
//! polling then drives the tracker until it reports ready.

/// Per-frame load state polling and the one-shot ready event.
pub mod asset_loader;

/// Aggregate of independent load units into progress and readiness.
pub mod load_tracker;

/// Manifest loading and bootstrap of registry, tracker and session.
pub mod manifest_loader;

/// Progress strategies, including the fixed-cadence fallback timer.
pub mod progress;
