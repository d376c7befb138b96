//! Interleaver: walls off the destination range, then copies sampled offsets
//! alternately from the two source ranges.
//!
//! Order of effects for one run:
//! 1. leading wall at `dest.start` (key whatever the host evaluates there),
//! 2. trailing wall at `dest.end`,
//! 3. for each sampled offset: read the source frame, move to the destination
//!    frame, override the selected channels, key "available" channels, and
//!    force the keys on that exact frame to constant interpolation.
//!
//! Loop content at offsets 0 and `len - 1` lands on the wall frames and
//! supersedes the wall values there.

use log::{debug, info, log_enabled, trace, Level};
use serde::{Deserialize, Serialize};

use crate::context::KeyingPreparation;
use crate::error::VibrationError;
use crate::frame::Frame;
use crate::host::{Interpolation, Sampler, Writer};
use crate::ranges::VibrationRanges;
use crate::schedule::{PlanStep, SamplingPlan};
use crate::transform::{ChannelMask, PartSelector, TransformSample};

/// What a finished run wrote.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub entity: String,
    pub ranges: Option<VibrationRanges>,
    /// Destination frames keyed as boundary walls (leading, trailing).
    pub walls: Vec<Frame>,
    /// Sampled offsets in write order.
    pub written: Vec<PlanStep>,
    /// Offsets passed over because of the stride.
    pub skipped: usize,
    /// Keys inserted or replaced across walls and body.
    pub keys_inserted: usize,
    /// Keys switched to constant interpolation.
    pub keys_made_constant: usize,
    /// Host notices from readying the entity for keying.
    #[serde(default)]
    pub preparation: KeyingPreparation,
}

/// Copy engine for one entity.
#[derive(Clone, Debug)]
pub struct Interleaver<'a> {
    pub entity: &'a str,
    pub parts: &'a PartSelector,
    pub mask: ChannelMask,
}

impl<'a> Interleaver<'a> {
    pub fn new(entity: &'a str, parts: &'a PartSelector, mask: ChannelMask) -> Self {
        Self {
            entity,
            parts,
            mask,
        }
    }

    /// Run over already-derived ranges. Does not check range conflicts; see
    /// [`crate::run::create_keyframes`] for the gated entry point.
    pub fn run<H>(
        &self,
        host: &mut H,
        ranges: VibrationRanges,
        stride: u32,
        stay_on: u32,
    ) -> Result<RunReport, VibrationError>
    where
        H: Sampler + Writer + ?Sized,
    {
        let plan = SamplingPlan::new(ranges, stride, stay_on)?;

        if !host.has_animation_data(self.entity) {
            return Err(VibrationError::NoAnimationData {
                entity: self.entity.to_string(),
            });
        }

        let mut report = RunReport {
            entity: self.entity.to_string(),
            ranges: Some(ranges),
            skipped: plan.skipped_count(),
            ..RunReport::default()
        };

        info!(
            "walling off destination frames {} for '{}'",
            ranges.dest, self.entity
        );
        for frame in [ranges.dest.start, ranges.dest.end] {
            report.keys_inserted += self.wall(host, frame)?;
            report.walls.push(frame);
        }

        info!(
            "writing {} destination frames ({} skipped by stride {})",
            plan.sampled_count(),
            report.skipped,
            stride
        );
        if log_enabled!(Level::Trace) {
            for (offset, source) in plan.offsets() {
                if !plan.is_sampled(offset) {
                    trace!("offset {offset} ({source:?}) skipped");
                }
            }
        }
        for step in plan.steps() {
            let (inserted, constant) = self.copy_step(host, &step)?;
            report.keys_inserted += inserted;
            report.keys_made_constant += constant;
            report.written.push(step);
        }

        Ok(report)
    }

    fn wall<H>(&self, host: &mut H, frame: Frame) -> Result<usize, VibrationError>
    where
        H: Writer + ?Sized,
    {
        host.set_current_frame(frame);
        let keyed = host.insert_available_keyframes(self.entity, frame)?;
        debug!("wall at frame {frame}: {keyed} keys");
        Ok(keyed)
    }

    fn copy_step<H>(&self, host: &mut H, step: &PlanStep) -> Result<(usize, usize), VibrationError>
    where
        H: Sampler + Writer + ?Sized,
    {
        // Snapshot everything at the source frame before the cursor moves.
        let sample = host.read_transform(self.entity, self.parts, step.source_frame)?;

        host.set_current_frame(step.dest_frame);
        self.write_sample(host, step.dest_frame, &sample)?;

        let inserted = host.insert_available_keyframes(self.entity, step.dest_frame)?;
        let constant = host.set_interpolation(self.entity, step.dest_frame, Interpolation::Constant)?;
        debug!(
            "frame {} <- {:?} frame {} ({} keys, {} constant)",
            step.dest_frame, step.source, step.source_frame, inserted, constant
        );
        Ok((inserted, constant))
    }

    fn write_sample<H>(
        &self,
        host: &mut H,
        frame: Frame,
        sample: &TransformSample,
    ) -> Result<(), VibrationError>
    where
        H: Writer + ?Sized,
    {
        if !self.mask.entity.is_empty() {
            host.write_transform(self.entity, None, frame, &sample.entity, self.mask.entity)?;
        }
        if !self.mask.part.is_empty() {
            for part in &sample.parts {
                host.write_transform(
                    self.entity,
                    Some(part.name.as_str()),
                    frame,
                    &part.transform,
                    self.mask.part,
                )?;
            }
        }
        Ok(())
    }
}
