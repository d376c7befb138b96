//! Integer frame numbers and closed frame ranges.

use serde::{Deserialize, Serialize};

/// Timeline frame index. Negative frames are legal.
pub type Frame = i64;

/// Closed integer interval `[start, end]` on the timeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: Frame,
    pub end: Frame,
}

impl FrameRange {
    /// Build a range from two endpoints given in any order.
    pub fn normalize(start: Frame, end: Frame) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Range of `len` frames beginning at `start`, or `None` when the end
    /// frame does not fit in a [`Frame`].
    ///
    /// A `len` below 1 yields the single frame `start`.
    pub fn with_len(start: Frame, len: Frame) -> Option<Self> {
        let end = start.checked_add(len.max(1) - 1)?;
        Some(Self { start, end })
    }

    /// Inclusive frame count, or `None` when it does not fit in a [`Frame`].
    #[inline]
    pub fn checked_len(&self) -> Option<Frame> {
        self.end.checked_sub(self.start)?.checked_add(1)
    }

    /// Inclusive frame count of a range built by [`VibrationRanges::derive`],
    /// whose length is known to fit.
    ///
    /// [`VibrationRanges::derive`]: crate::ranges::VibrationRanges::derive
    #[inline]
    pub fn len(&self) -> Frame {
        self.end - self.start + 1
    }

    /// A normalized range always holds at least one frame.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// True when the range covers a single frame (`start == end`).
    #[inline]
    pub fn is_single_frame(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn contains(&self, frame: Frame) -> bool {
        frame >= self.start && frame <= self.end
    }

    /// Closed-interval intersection test; one shared frame is enough.
    #[inline]
    pub fn overlaps(&self, other: &FrameRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Frame at `offset` from the start (no bounds check).
    #[inline]
    pub fn at(&self, offset: Frame) -> Frame {
        self.start + offset
    }

    pub fn frames(&self) -> impl Iterator<Item = Frame> {
        self.start..=self.end
    }
}

impl std::fmt::Display for FrameRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_swaps_inverted_endpoints() {
        assert_eq!(
            FrameRange::normalize(400, 301),
            FrameRange {
                start: 301,
                end: 400
            }
        );
        assert_eq!(
            FrameRange::normalize(301, 400),
            FrameRange {
                start: 301,
                end: 400
            }
        );
    }

    #[test]
    fn length_is_inclusive() {
        assert_eq!(FrameRange::normalize(301, 400).len(), 100);
        assert_eq!(FrameRange::normalize(-5, -5).len(), 1);
        assert_eq!(FrameRange::with_len(500, 100).unwrap().end, 599);
    }

    #[test]
    fn extreme_frames_report_overflow() {
        assert_eq!(FrameRange::normalize(Frame::MIN, Frame::MAX).checked_len(), None);
        assert_eq!(FrameRange::normalize(Frame::MIN, -2).checked_len(), Some(Frame::MAX));
        assert_eq!(FrameRange::with_len(Frame::MAX - 10, 100), None);
        assert_eq!(
            FrameRange::with_len(Frame::MAX - 99, 100),
            Some(FrameRange {
                start: Frame::MAX - 99,
                end: Frame::MAX
            })
        );
    }

    #[test]
    fn overlap_is_closed_on_both_ends() {
        let a = FrameRange::normalize(301, 400);
        assert!(a.overlaps(&FrameRange::normalize(400, 499)));
        assert!(a.overlaps(&FrameRange::normalize(200, 301)));
        assert!(a.overlaps(&FrameRange::normalize(350, 360)));
        assert!(!a.overlaps(&FrameRange::normalize(401, 500)));
        assert!(!a.overlaps(&FrameRange::normalize(-10, 300)));
    }

    #[test]
    fn negative_frames_compare_plainly() {
        let a = FrameRange::normalize(-10, -1);
        assert!(a.contains(-10));
        assert!(!a.contains(0));
        assert!(a.overlaps(&FrameRange::normalize(-1, 5)));
    }
}
