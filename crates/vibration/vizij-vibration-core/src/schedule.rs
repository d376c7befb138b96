//! Alternation schedule and sampling plan.
//!
//! The schedule advances once per offset whether or not the offset is sampled,
//! so `stay_on` counts timeline offsets, not written keys.

use serde::{Deserialize, Serialize};

use crate::error::VibrationError;
use crate::frame::Frame;
use crate::ranges::{Source, VibrationRanges};

/// Run-length counter that flips the active source every `stay_on` offsets,
/// starting on Vibration #1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlternationSchedule {
    active: Source,
    run: u32,
    stay_on: u32,
}

impl AlternationSchedule {
    pub fn new(stay_on: u32) -> Self {
        Self {
            active: Source::Vib1,
            run: 0,
            stay_on: stay_on.max(1),
        }
    }

    #[inline]
    pub fn active(&self) -> Source {
        self.active
    }

    pub fn advance(&mut self) {
        self.run += 1;
        if self.run >= self.stay_on {
            self.run = 0;
            self.active = self.active.other();
        }
    }
}

impl Iterator for AlternationSchedule {
    type Item = Source;

    fn next(&mut self) -> Option<Source> {
        let current = self.active;
        self.advance();
        Some(current)
    }
}

/// One sampled offset: read `source_frame`, write `dest_frame`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub offset: Frame,
    pub source: Source,
    pub source_frame: Frame,
    pub dest_frame: Frame,
}

/// Derived per-offset plan for one run. Nothing is stored beyond the inputs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SamplingPlan {
    ranges: VibrationRanges,
    stride: u32,
    stay_on: u32,
}

impl SamplingPlan {
    pub fn new(ranges: VibrationRanges, stride: u32, stay_on: u32) -> Result<Self, VibrationError> {
        ranges.check_length()?;
        if stride == 0 {
            return Err(VibrationError::configuration(
                "keyframe stride must be at least 1",
            ));
        }
        if stay_on == 0 {
            return Err(VibrationError::configuration(
                "switch interval must be at least 1",
            ));
        }
        Ok(Self {
            ranges,
            stride,
            stay_on,
        })
    }

    pub fn ranges(&self) -> &VibrationRanges {
        &self.ranges
    }

    #[inline]
    pub fn is_sampled(&self, offset: Frame) -> bool {
        offset % Frame::from(self.stride) == 0
    }

    /// Every offset of the run paired with its active source.
    pub fn offsets(&self) -> impl Iterator<Item = (Frame, Source)> {
        (0..self.ranges.len()).zip(AlternationSchedule::new(self.stay_on))
    }

    /// Sampled offsets only, in increasing order.
    pub fn steps(&self) -> impl Iterator<Item = PlanStep> + '_ {
        self.offsets()
            .filter(|(offset, _)| self.is_sampled(*offset))
            .map(|(offset, source)| PlanStep {
                offset,
                source,
                source_frame: self.ranges.source(source).at(offset),
                dest_frame: self.ranges.dest.at(offset),
            })
    }

    pub fn sampled_count(&self) -> usize {
        let len = self.ranges.len();
        ((len - 1) / Frame::from(self.stride) + 1) as usize
    }

    pub fn skipped_count(&self) -> usize {
        self.ranges.len() as usize - self.sampled_count()
    }
}
