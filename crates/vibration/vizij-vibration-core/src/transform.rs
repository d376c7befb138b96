//! Transform snapshots and the selectors that decide which parts of them are copied.

use serde::{Deserialize, Serialize};

use crate::frame::Frame;

/// Location / rotation / scale of one entity or part.
///
/// Rotation is carried in both Euler and quaternion form; whichever the host
/// animates is the one that ends up keyed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub location: [f32; 3],
    pub rotation_euler: [f32; 3],
    /// Quaternion (w, x, y, z)
    pub rotation_quaternion: [f32; 4],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: [0.0; 3],
            rotation_euler: [0.0; 3],
            rotation_quaternion: [1.0, 0.0, 0.0, 0.0],
            scale: [1.0; 3],
        }
    }
}

impl Transform {
    /// Copy the components enabled in `channels` from `src`.
    pub fn apply(&mut self, src: &Transform, channels: Channels) {
        if channels.location {
            self.location = src.location;
        }
        if channels.rotation {
            self.rotation_euler = src.rotation_euler;
            self.rotation_quaternion = src.rotation_quaternion;
        }
        if channels.scale {
            self.scale = src.scale;
        }
    }
}

/// Which transform components a write touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channels {
    pub location: bool,
    pub rotation: bool,
    pub scale: bool,
}

impl Channels {
    pub const ALL: Channels = Channels {
        location: true,
        rotation: true,
        scale: true,
    };
    pub const NONE: Channels = Channels {
        location: false,
        rotation: false,
        scale: false,
    };

    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.location || self.rotation || self.scale)
    }
}

impl Default for Channels {
    fn default() -> Self {
        Self::ALL
    }
}

/// Independent component selection for the whole entity and for its parts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMask {
    pub entity: Channels,
    pub part: Channels,
}

/// Which parts of an articulated entity are read and written.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartSelector {
    #[default]
    All,
    Named(String),
}

impl PartSelector {
    /// An empty name selects every part; any other name must match exactly.
    pub fn from_name(name: &str) -> Self {
        if name.is_empty() {
            Self::All
        } else {
            Self::Named(name.to_string())
        }
    }

    #[inline]
    pub fn matches(&self, part: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == part,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Named(name) => Some(name.as_str()),
        }
    }
}

/// Transform of one named part.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartTransform {
    pub name: String,
    pub transform: Transform,
}

/// Immutable snapshot of an entity (and the selected parts) at one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformSample {
    pub frame: Frame,
    pub entity: Transform,
    #[serde(default)]
    pub parts: Vec<PartTransform>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_respects_channels() {
        let mut dst = Transform::default();
        let src = Transform {
            location: [1.0, 2.0, 3.0],
            rotation_euler: [0.5, 0.0, 0.0],
            rotation_quaternion: [0.0, 1.0, 0.0, 0.0],
            scale: [2.0; 3],
        };
        dst.apply(
            &src,
            Channels {
                location: true,
                rotation: false,
                scale: true,
            },
        );
        assert_eq!(dst.location, [1.0, 2.0, 3.0]);
        assert_eq!(dst.rotation_euler, [0.0; 3]);
        assert_eq!(dst.rotation_quaternion, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(dst.scale, [2.0; 3]);

        dst.apply(&src, Channels::NONE);
        assert_eq!(dst.rotation_euler, [0.0; 3]);
    }

    #[test]
    fn selector_from_name() {
        assert_eq!(PartSelector::from_name(""), PartSelector::All);
        let named = PartSelector::from_name("forearm.L");
        assert!(named.matches("forearm.L"));
        assert!(!named.matches("forearm.R"));
        let padded = PartSelector::from_name(" forearm.L");
        assert_eq!(padded.name(), Some(" forearm.L"));
        assert!(!padded.matches("forearm.L"));
        assert!(!PartSelector::from_name("  ").matches("forearm.L"));
        assert!(PartSelector::All.matches("anything"));
    }
}
