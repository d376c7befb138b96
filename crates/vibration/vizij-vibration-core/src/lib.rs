//! Vizij Vibration Core (host-agnostic)
//!
//! Builds a "side to side" vibration: keys for a destination frame range are
//! copied alternately from two source ranges of the same entity, every
//! `stride` offsets, switching source every `stay_on` offsets. The destination
//! range is walled off with keys at both ends and every copied key is set to
//! constant interpolation.
//!
//! The crate never owns scene data. Hosts implement [`Sampler`], [`Writer`]
//! and [`HostContext`]; [`MemoryScene`] is the in-memory reference host.

pub mod config;
pub mod context;
pub mod error;
pub mod frame;
pub mod host;
pub mod interleave;
pub mod memory;
pub mod ranges;
pub mod run;
pub mod schedule;
pub mod transform;

// Re-exports for consumers (adapters)
pub use config::{ConfigFrameField, VibrationConfig};
pub use context::{ContextGuard, EditMode, HostContext, KeyingPreparation, SavedContext};
pub use error::VibrationError;
pub use frame::{Frame, FrameRange};
pub use host::{Interpolation, Sampler, Writer};
pub use interleave::{Interleaver, RunReport};
pub use memory::{HostOp, MemoryScene, Property, SceneEntity};
pub use ranges::{conflicts_exist, normalize, Source, VibrationRanges};
pub use run::{create_keyframes, preflight};
pub use schedule::{AlternationSchedule, PlanStep, SamplingPlan};
pub use transform::{ChannelMask, Channels, PartSelector, PartTransform, Transform, TransformSample};

/// Vibration core result type
pub type Result<T> = core::result::Result<T, VibrationError>;
