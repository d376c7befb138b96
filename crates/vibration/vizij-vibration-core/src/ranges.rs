//! Source/destination range derivation and conflict detection.
//!
//! Vibration #1 is given by two endpoints (possibly inverted). Vibration #2 and
//! the destination are given by their start frame only and inherit the
//! length of Vibration #1.

use serde::{Deserialize, Serialize};

use crate::error::VibrationError;
use crate::frame::{Frame, FrameRange};

/// Which source range an offset copies from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Vib1,
    Vib2,
}

impl Source {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Source::Vib1 => Source::Vib2,
            Source::Vib2 => Source::Vib1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Source::Vib1 => "Vibration #1",
            Source::Vib2 => "Vibration #2",
        }
    }
}

/// Normalize user-given Vibration #1 endpoints.
#[inline]
pub fn normalize(vib1_start: Frame, vib1_end: Frame) -> FrameRange {
    FrameRange::normalize(vib1_start, vib1_end)
}

/// True if the destination range starting at `dest_start` shares any frame
/// with `vib1` or with the Vibration #2 range derived at `vib1.start`.
///
/// Ranges that run off the end of the timeline cannot be keyed and count as
/// conflicting.
pub fn conflicts_exist(vib1: FrameRange, dest_start: Frame) -> bool {
    let Some(len) = vib1.checked_len() else {
        return true;
    };
    match (
        FrameRange::with_len(vib1.start, len),
        FrameRange::with_len(dest_start, len),
    ) {
        (Some(vib2), Some(dest)) => dest.overlaps(&vib1) || dest.overlaps(&vib2),
        _ => true,
    }
}

fn derived_range(start: Frame, len: Frame, what: &str) -> Result<FrameRange, VibrationError> {
    FrameRange::with_len(start, len).ok_or_else(|| {
        VibrationError::configuration(format!(
            "{what} starting at frame {start} runs past the last frame"
        ))
    })
}

/// The three ranges of one run, all of equal length.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VibrationRanges {
    pub vib1: FrameRange,
    pub vib2: FrameRange,
    pub dest: FrameRange,
}

impl VibrationRanges {
    /// Fails with a configuration error when Vibration #1 is too long to
    /// count or a derived range would end past the last representable frame.
    pub fn derive(
        vib1_start: Frame,
        vib1_end: Frame,
        vib2_start: Frame,
        dest_start: Frame,
    ) -> Result<Self, VibrationError> {
        let vib1 = normalize(vib1_start, vib1_end);
        let len = vib1.checked_len().ok_or_else(|| {
            VibrationError::configuration(format!("Vibration #1 {vib1} is too long"))
        })?;
        Ok(Self {
            vib1,
            vib2: derived_range(vib2_start, len, "Vibration #2")?,
            dest: derived_range(dest_start, len, "Destination")?,
        })
    }

    /// Number of offsets in the run.
    #[inline]
    pub fn len(&self) -> Frame {
        self.vib1.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vib1.is_empty()
    }

    pub fn source(&self, source: Source) -> FrameRange {
        match source {
            Source::Vib1 => self.vib1,
            Source::Vib2 => self.vib2,
        }
    }

    /// A single-frame Vibration #1 leaves nothing to alternate between.
    pub fn check_length(&self) -> Result<(), VibrationError> {
        if self.vib1.len() < 2 {
            return Err(VibrationError::configuration(
                "Vibration #1 Start Frame and End Frame cannot be the same frame",
            ));
        }
        Ok(())
    }

    /// First source range the destination overlaps, Vibration #1 checked first.
    pub fn conflicting_source(&self) -> Option<Source> {
        [Source::Vib1, Source::Vib2]
            .into_iter()
            .find(|s| self.dest.overlaps(&self.source(*s)))
    }

    pub fn check_conflicts(&self) -> Result<(), VibrationError> {
        match self.conflicting_source() {
            Some(source) => Err(VibrationError::RangeConflict {
                dest: self.dest,
                source_range: self.source(source),
                source_label: source.label().to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_ranges_share_length() {
        let r = VibrationRanges::derive(301, 400, 500, 101).unwrap();
        assert_eq!(r.vib1, FrameRange { start: 301, end: 400 });
        assert_eq!(r.vib2, FrameRange { start: 500, end: 599 });
        assert_eq!(r.dest, FrameRange { start: 101, end: 200 });
        assert_eq!(r.len(), 100);
    }

    #[test]
    fn inverted_vib1_is_normalized_before_deriving() {
        let r = VibrationRanges::derive(400, 301, 500, 101).unwrap();
        assert_eq!(r.vib1, FrameRange { start: 301, end: 400 });
        assert_eq!(r.dest.end, 200);
    }

    #[test]
    fn single_frame_vib1_is_rejected() {
        let r = VibrationRanges::derive(301, 301, 500, 101).unwrap();
        let err = r.check_length().unwrap_err();
        assert!(matches!(err, VibrationError::Configuration { .. }));
    }

    #[test]
    fn conflict_against_vib1() {
        let vib1 = normalize(301, 400);
        assert!(conflicts_exist(vib1, 350));
        assert!(conflicts_exist(vib1, 400));
        assert!(conflicts_exist(vib1, 202));
        assert!(!conflicts_exist(vib1, 201));
        assert!(!conflicts_exist(vib1, 500));
    }

    #[test]
    fn conflict_against_vib2_is_reported_with_label() {
        let r = VibrationRanges::derive(301, 400, 500, 550).unwrap();
        assert_eq!(r.conflicting_source(), Some(Source::Vib2));
        match r.check_conflicts().unwrap_err() {
            VibrationError::RangeConflict {
                source_range,
                source_label,
                ..
            } => {
                assert_eq!(source_range, FrameRange { start: 500, end: 599 });
                assert_eq!(source_label, "Vibration #2");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(VibrationRanges::derive(301, 400, 500, 101)
            .unwrap()
            .check_conflicts()
            .is_ok());
    }

    #[test]
    fn extreme_frames_are_configuration_errors() {
        let err = VibrationRanges::derive(Frame::MIN, Frame::MAX, 0, 0).unwrap_err();
        assert!(matches!(err, VibrationError::Configuration { .. }));
        let err = VibrationRanges::derive(301, 400, 500, Frame::MAX - 10).unwrap_err();
        assert!(matches!(err, VibrationError::Configuration { .. }));
        assert!(VibrationRanges::derive(301, 400, Frame::MAX - 10, 101).is_err());

        let r = VibrationRanges::derive(-400, -301, Frame::MIN, Frame::MAX - 99).unwrap();
        assert_eq!(r.dest.end, Frame::MAX);
        assert!(r.check_conflicts().is_ok());
    }

    #[test]
    fn conflicts_exist_refuses_unrepresentable_ranges() {
        assert!(conflicts_exist(normalize(301, 400), Frame::MAX - 10));
        assert!(conflicts_exist(normalize(Frame::MIN, Frame::MAX), 0));
        assert!(!conflicts_exist(normalize(301, 400), Frame::MAX - 99));
    }
}
