use bevy::prelude::*;

use crate::engine::session::controller::SessionState;

/// Failures surfaced by the viewer core.
///
/// None of these halt the application: each one fails the operation that
/// raised it and is reported through the log and the RPC diagnostic channel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewerError {
    /// Unknown scene or preset id, duplicate registration, or malformed value.
    #[error("Configuration error: {what} '{id}'")]
    Configuration { what: &'static str, id: String },

    /// A single model or audio load failed, or a completion report was bogus.
    #[error("Asset load error for '{resource_id}': {reason}")]
    AssetLoad { resource_id: String, reason: String },

    /// A session operation was invoked out of sequence.
    #[error("Invalid transition: {operation} while {state:?}")]
    InvalidTransition {
        operation: &'static str,
        state: SessionState,
    },
}

impl ViewerError {
    pub fn configuration(what: &'static str, id: impl Into<String>) -> Self {
        Self::Configuration {
            what,
            id: id.into(),
        }
    }

    pub fn asset_load(resource_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AssetLoad {
            resource_id: resource_id.into(),
            reason: reason.into(),
        }
    }

    /// Short tag used by the RPC diagnostic notification.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::AssetLoad { .. } => "asset_load",
            Self::InvalidTransition { .. } => "invalid_transition",
        }
    }
}

/// A rejected operation or failed load, forwarded to the host page.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ViewerDiagnostic {
    pub kind: &'static str,
    pub message: String,
}

impl From<&ViewerError> for ViewerDiagnostic {
    fn from(error: &ViewerError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Log an error and queue it for the diagnostic channel.
pub fn report(error: &ViewerError, diagnostics: &mut EventWriter<ViewerDiagnostic>) {
    warn!("{}", error);
    diagnostics.write(ViewerDiagnostic::from(error));
}
