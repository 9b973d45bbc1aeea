//! Merging several pose sequences into one multi-person sequence.

use posecraft_pose_model::{Frame, PoseSequence};

use crate::alignment::FrameAlignment;

/// Default canvas written by merges.
pub const DEFAULT_CANVAS_WIDTH: u32 = 512;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 768;

/// Concatenates people lists frame by frame.
///
/// Output length is the longest input; shorter inputs hold their last frame.
/// People are not deduplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoseMerger {
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Default for PoseMerger {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

impl PoseMerger {
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            canvas_width,
            canvas_height,
        }
    }

    pub fn apply(&self, inputs: &[PoseSequence]) -> PoseSequence {
        let frame_count = inputs.iter().map(PoseSequence::len).max().unwrap_or(0);
        tracing::debug!(
            inputs = inputs.len(),
            frames = frame_count,
            "Merging pose sequences"
        );

        (0..frame_count)
            .map(|frame_idx| {
                let people = inputs
                    .iter()
                    .filter_map(|input| {
                        FrameAlignment::HoldLast
                            .resolve(frame_idx, input.len())
                            .map(|i| &input.frames[i])
                    })
                    .filter_map(Frame::people)
                    .flat_map(|people| people.iter().cloned())
                    .collect();
                Frame::new(people, self.canvas_width, self.canvas_height)
            })
            .collect()
    }
}

/// Shorthand for [`PoseMerger::apply`].
pub fn merge(inputs: &[PoseSequence], canvas_width: u32, canvas_height: u32) -> PoseSequence {
    PoseMerger::new(canvas_width, canvas_height).apply(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{body_with, frame_of, sequence_of};
    use posecraft_pose_model::Person;

    fn marker(x: f64) -> Person {
        Person::with_body(body_with(&[(0, x, x, 1.0)]))
    }

    #[test]
    fn test_length_is_longest_input() {
        let a = frame_of(vec![marker(1.0)]);
        let b = sequence_of(vec![vec![marker(10.0)], vec![marker(11.0)], vec![marker(12.0)]]);
        let out = merge(&[a.clone(), b.clone()], 640, 480);
        assert_eq!(out.len(), 3);

        // Frame 2: a's only frame held, then b[2].
        let people = out.frames[2].people().unwrap();
        assert_eq!(people, &[marker(1.0), marker(12.0)]);
    }

    #[test]
    fn test_canvas_comes_from_merger() {
        let a = frame_of(vec![marker(1.0)]);
        let out = merge(&[a], 640, 480);
        assert_eq!(out.frames[0].canvas_width, Some(640));
        assert_eq!(out.frames[0].canvas_height, Some(480));

        let defaults = PoseMerger::default();
        assert_eq!((defaults.canvas_width, defaults.canvas_height), (512, 768));
    }

    #[test]
    fn test_input_order_and_duplicates_kept() {
        let a = frame_of(vec![marker(1.0), marker(2.0)]);
        let out = merge(&[a.clone(), a], 512, 768);
        let people = out.frames[0].people().unwrap();
        assert_eq!(people, &[marker(1.0), marker(2.0), marker(1.0), marker(2.0)]);
    }

    #[test]
    fn test_frames_without_people_contribute_nothing() {
        let a = PoseSequence::from(Frame::default());
        let b = frame_of(vec![marker(3.0)]);
        let out = merge(&[a, b, PoseSequence::default()], 512, 768);
        assert_eq!(out.len(), 1);
        assert_eq!(out.frames[0].people().unwrap(), &[marker(3.0)]);
    }

    #[test]
    fn test_no_inputs() {
        assert!(merge(&[], 512, 768).is_empty());
    }
}
