//! User-facing parameters of a vibration run.

use serde::{Deserialize, Serialize};

use crate::error::VibrationError;
use crate::frame::Frame;
use crate::ranges::VibrationRanges;
use crate::transform::{ChannelMask, Channels, PartSelector};

/// Parameters collected by the host UI. Defaults match the stock preferences.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VibrationConfig {
    /// Entity to vibrate.
    pub entity: String,
    pub entity_location: bool,
    pub entity_rotation: bool,
    pub entity_scale: bool,

    /// Part to vibrate; empty means every part.
    pub part: String,
    pub part_location: bool,
    pub part_rotation: bool,
    pub part_scale: bool,

    pub vib1_start: Frame,
    pub vib1_end: Frame,
    pub vib2_start: Frame,
    /// Offsets to keep pulling from one vibration before switching to the other.
    pub stay_on: u32,
    pub dest_start: Frame,
    /// Write a destination key every `stride` offsets.
    pub stride: u32,
}

impl Default for VibrationConfig {
    fn default() -> Self {
        Self {
            entity: String::new(),
            entity_location: true,
            entity_rotation: true,
            entity_scale: true,
            part: String::new(),
            part_location: true,
            part_rotation: true,
            part_scale: true,
            vib1_start: 301,
            vib1_end: 400,
            vib2_start: 401,
            stay_on: 1,
            dest_start: 101,
            stride: 1,
        }
    }
}

/// Frame fields that can be filled from the host's current frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigFrameField {
    Vib1Start,
    Vib1End,
    Vib2Start,
    DestStart,
}

impl VibrationConfig {
    pub fn for_entity(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, VibrationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, VibrationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn channel_mask(&self) -> ChannelMask {
        ChannelMask {
            entity: Channels {
                location: self.entity_location,
                rotation: self.entity_rotation,
                scale: self.entity_scale,
            },
            part: Channels {
                location: self.part_location,
                rotation: self.part_rotation,
                scale: self.part_scale,
            },
        }
    }

    pub fn part_selector(&self) -> PartSelector {
        PartSelector::from_name(&self.part)
    }

    pub fn ranges(&self) -> Result<VibrationRanges, VibrationError> {
        VibrationRanges::derive(self.vib1_start, self.vib1_end, self.vib2_start, self.dest_start)
    }

    /// Record `frame` into one of the frame fields.
    pub fn record(&mut self, field: ConfigFrameField, frame: Frame) {
        match field {
            ConfigFrameField::Vib1Start => self.vib1_start = frame,
            ConfigFrameField::Vib1End => self.vib1_end = frame,
            ConfigFrameField::Vib2Start => self.vib2_start = frame,
            ConfigFrameField::DestStart => self.dest_start = frame,
        }
    }

    /// Checks that need no host: entity named, counts positive, Vibration #1
    /// longer than one frame.
    pub fn validate(&self) -> Result<VibrationRanges, VibrationError> {
        if self.entity.trim().is_empty() {
            return Err(VibrationError::configuration("no entity selected"));
        }
        if self.stride == 0 {
            return Err(VibrationError::configuration(
                "keyframe stride must be at least 1",
            ));
        }
        if self.stay_on == 0 {
            return Err(VibrationError::configuration(
                "switch interval must be at least 1",
            ));
        }
        let ranges = self.ranges()?;
        ranges.check_length()?;
        Ok(ranges)
    }
}
