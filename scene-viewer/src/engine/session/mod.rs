//! Session lifecycle: Loading, ReadyToStart, Interactive.
//!
//! The controller is plain state. Systems translate Bevy events into
//! controller operations and reconcile audio sinks against it afterwards.

/// Audio players per channel and sink reconciliation.
pub mod audio;

/// Session state, audio channel intent and overlay visibility.
pub mod controller;

/// Session commands, ready handling and keyboard shortcuts.
pub mod systems;
