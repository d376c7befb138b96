//! Error types for vibration keyframe synthesis.

use serde::{Deserialize, Serialize};

use crate::frame::FrameRange;

/// Everything that can stop a vibration run.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum VibrationError {
    /// Parameters that can never produce a valid run.
    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },

    /// Destination frames would overwrite frames still to be read.
    #[error("Destination frames {dest} conflict with {source_label} source frames {source_range}")]
    RangeConflict {
        dest: FrameRange,
        source_range: FrameRange,
        source_label: String,
    },

    /// The entity has no animation channels for "available" keying to extend.
    #[error("No existing animation data to copy for '{entity}'")]
    NoAnimationData { entity: String },

    /// Entity id not known to the host.
    #[error("Entity not found: {entity}")]
    UnknownEntity { entity: String },

    /// Part id not known for the entity.
    #[error("Part not found: {part} on entity {entity}")]
    UnknownPart { entity: String, part: String },

    /// Any other failure reported by the host.
    #[error("Host error: {message}")]
    Host { message: String },
}

impl VibrationError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }

    /// Errors raised before the first write of a run. Nothing has been mutated.
    #[inline]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. }
                | Self::RangeConflict { .. }
                | Self::NoAnimationData { .. }
                | Self::UnknownEntity { .. }
        )
    }

    /// Get error category for logging/reporting
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "config",
            Self::RangeConflict { .. } => "range",
            Self::NoAnimationData { .. } | Self::UnknownEntity { .. } | Self::UnknownPart { .. } => {
                "data"
            }
            Self::Host { .. } => "host",
        }
    }
}

impl From<serde_json::Error> for VibrationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration {
            reason: err.to_string(),
        }
    }
}
