//! Capability traits the host application implements.
//!
//! The core never owns scene or timeline data. It reads samples through
//! [`Sampler`] and mutates the host only through [`Writer`]. Adapters (the
//! in-memory [`crate::memory::MemoryScene`], or a DCC bridge) implement both.

use serde::{Deserialize, Serialize};

use crate::error::VibrationError;
use crate::frame::Frame;
use crate::transform::{Channels, PartSelector, Transform, TransformSample};

/// Interpolation mode recorded on a key, applied from that key to the next.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Hold the key's value until the next key.
    Constant,
    Linear,
    #[default]
    Bezier,
}

/// Read access to evaluated transforms.
pub trait Sampler {
    fn has_entity(&self, entity: &str) -> bool;

    /// Snapshot the entity and the selected parts as evaluated at `frame`.
    ///
    /// The whole snapshot must be taken at `frame` before anything moves the
    /// timeline elsewhere. Entities without parts return an empty part list
    /// regardless of `parts`.
    fn read_transform(
        &mut self,
        entity: &str,
        parts: &PartSelector,
        frame: Frame,
    ) -> Result<TransformSample, VibrationError>;
}

/// Write access to the timeline and the entity's animation channels.
pub trait Writer {
    fn current_frame(&self) -> Frame;

    /// Move the shared timeline cursor, re-evaluating animated state.
    fn set_current_frame(&mut self, frame: Frame);

    /// True if the entity has at least one recorded animation channel.
    fn has_animation_data(&self, entity: &str) -> bool;

    /// Override the live transform of the entity (`part == None`) or one part.
    fn write_transform(
        &mut self,
        entity: &str,
        part: Option<&str>,
        frame: Frame,
        transform: &Transform,
        channels: Channels,
    ) -> Result<(), VibrationError>;

    /// Key every channel the entity already animates, at `frame`, using the
    /// live values. Returns the number of keys inserted or replaced.
    fn insert_available_keyframes(&mut self, entity: &str, frame: Frame)
        -> Result<usize, VibrationError>;

    /// Set the interpolation of every key of the entity sitting exactly on
    /// `frame`. Returns the number of keys changed.
    fn set_interpolation(
        &mut self,
        entity: &str,
        frame: Frame,
        mode: Interpolation,
    ) -> Result<usize, VibrationError>;
}
