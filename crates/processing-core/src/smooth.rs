//! Temporal smoothing of keypoints across frames.
//!
//! First-order exponential smoothing that feeds on its own output: frame `i`
//! is blended toward the raw input from smoothed frame `i - 1`, so the filter
//! cascades over the whole sequence.
//!
//! ```text
//! new = previous_output + factor * (current_input - previous_output)
//! ```
//!
//! A keypoint is only smoothed when it is tracked in both the previous output
//! and the current input; otherwise it keeps its raw value.

use std::collections::BTreeSet;

use posecraft_pose_model::{
    all_body_indices, Frame, KeypointArray, KeypointGroup, Person, PoseSequence, Selection,
};

use crate::alignment::PersonTarget;

/// Default smoothing factor.
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.3;

/// Resolved smoothing scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmoothScope {
    pub body_indices: BTreeSet<usize>,
    pub hands: bool,
    pub face: bool,
}

/// Exponential smoother over the frame axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalSmoother {
    /// `0` freezes on the first frame, `1` passes input through.
    pub factor: f64,
    pub selection: Option<Selection>,
    /// Body index smoothed ahead of the others.
    pub focus: Option<usize>,
    pub person: PersonTarget,
    pub smooth_hands: bool,
    pub smooth_face: bool,
}

impl Default for TemporalSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_FACTOR)
    }
}

impl TemporalSmoother {
    /// Create a smoother; `factor` is clamped to `[0, 1]`.
    pub fn new(factor: f64) -> Self {
        Self {
            factor: clamp01(factor),
            selection: None,
            focus: None,
            person: PersonTarget::All,
            smooth_hands: true,
            smooth_face: false,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_focus(mut self, focus: usize) -> Self {
        self.focus = Some(focus);
        self
    }

    pub fn for_person(mut self, person: PersonTarget) -> Self {
        self.person = person;
        self
    }

    pub fn smoothing(mut self, hands: bool, face: bool) -> Self {
        self.smooth_hands = hands;
        self.smooth_face = face;
        self
    }

    pub fn scope(&self) -> SmoothScope {
        match &self.selection {
            Some(selection) => SmoothScope {
                body_indices: selection.valid_body_indices().collect(),
                hands: selection.includes_any_hand() || self.smooth_hands,
                face: selection.include_face || self.smooth_face,
            },
            None => SmoothScope {
                body_indices: all_body_indices(),
                hands: self.smooth_hands,
                face: self.smooth_face,
            },
        }
    }

    /// Smooth a sequence. Sequences of one frame or fewer are returned as-is.
    pub fn apply(&self, sequence: &PoseSequence) -> PoseSequence {
        if sequence.len() <= 1 {
            return sequence.clone();
        }

        let scope = self.scope();
        let factor = clamp01(self.factor);
        let mut output: Vec<Frame> = Vec::with_capacity(sequence.len());
        output.push(sequence.frames[0].clone());

        for (frame_idx, raw) in sequence.iter().enumerate().skip(1) {
            let mut current = raw.clone();
            let previous = &output[frame_idx - 1];
            self.smooth_frame(frame_idx, previous, &mut current, &scope, factor);
            output.push(current);
        }

        PoseSequence::new(output)
    }

    fn smooth_frame(
        &self,
        frame_idx: usize,
        previous: &Frame,
        current: &mut Frame,
        scope: &SmoothScope,
        factor: f64,
    ) {
        let (Some(previous_people), Some(current_people)) =
            (previous.people(), current.people_mut())
        else {
            tracing::debug!(frame = frame_idx, "No people list, frame left unsmoothed");
            return;
        };

        for idx in self.person.indices(current_people.len()) {
            match previous_people.get(idx) {
                Some(previous_person) => {
                    self.smooth_person(previous_person, &mut current_people[idx], scope, factor)
                }
                None => tracing::trace!(
                    frame = frame_idx,
                    person = idx,
                    "Person absent from previous frame"
                ),
            }
        }
    }

    fn smooth_person(
        &self,
        previous: &Person,
        current: &mut Person,
        scope: &SmoothScope,
        factor: f64,
    ) {
        if let (Some(previous_body), Some(current_body)) = (
            previous.non_empty_group(KeypointGroup::Body),
            current
                .group_mut(KeypointGroup::Body)
                .filter(|body| !body.is_empty()),
        ) {
            // The focus point is smoothed first; the rest are then smoothed
            // independently and are not re-expressed relative to it.
            if let Some(focus) = self.focus {
                smooth_keypoint(previous_body, current_body, focus, factor);
            }
            for &index in scope
                .body_indices
                .iter()
                .filter(|&&i| Some(i) != self.focus)
            {
                smooth_keypoint(previous_body, current_body, index, factor);
            }
        }

        let mut groups = Vec::with_capacity(3);
        if scope.hands {
            groups.extend([KeypointGroup::LeftHand, KeypointGroup::RightHand]);
        }
        if scope.face {
            groups.push(KeypointGroup::Face);
        }
        for group in groups {
            if let (Some(previous_kps), Some(current_kps)) =
                (previous.group(group), current.group_mut(group))
            {
                smooth_array(previous_kps, current_kps, factor);
            }
        }
    }
}

fn smooth_keypoint(
    previous: &KeypointArray,
    current: &mut KeypointArray,
    index: usize,
    factor: f64,
) {
    if let (Some(prev), Some(curr)) = (previous.get_tracked(index), current.get_tracked(index)) {
        let mut blended = curr;
        blended.x = blend(prev.x, curr.x, factor);
        blended.y = blend(prev.y, curr.y, factor);
        current.set(index, blended);
    }
}

/// Smooth a whole hand/face array; skipped when lengths differ.
fn smooth_array(previous: &KeypointArray, current: &mut KeypointArray, factor: f64) {
    if previous.len() != current.len() {
        tracing::trace!(
            previous = previous.len(),
            current = current.len(),
            "Keypoint array length changed, group left unsmoothed"
        );
        return;
    }
    for index in 0..current.keypoint_count() {
        smooth_keypoint(previous, current, index, factor);
    }
}

fn blend(previous: f64, current: f64, factor: f64) -> f64 {
    previous + factor * (current - previous)
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Shorthand for [`TemporalSmoother::apply`].
pub fn smooth(
    sequence: &PoseSequence,
    factor: f64,
    selection: Option<&Selection>,
    focus: Option<usize>,
) -> PoseSequence {
    let mut smoother = TemporalSmoother::new(factor);
    smoother.selection = selection.cloned();
    smoother.focus = focus;
    smoother.apply(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{body_at, body_with, hand, sequence_of, wide_body};
    use posecraft_pose_model::Keypoint;

    fn at(index: usize, x: f64) -> Person {
        Person::with_body(body_with(&[(index, x, x, 1.0)]))
    }

    fn xs(seq: &PoseSequence, index: usize) -> Vec<f64> {
        (0..seq.len())
            .map(|f| body_at(seq, f, 0).get(index).unwrap().x)
            .collect()
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_converges_on_constant_target() {
        let seq = sequence_of([0.0, 1.0, 1.0, 1.0, 1.0].map(|x| vec![at(4, x)]).to_vec());
        let out = smooth(&seq, 0.2, None, None);
        assert_close(&xs(&out, 4), &[0.0, 0.2, 0.36, 0.488, 0.5904]);
    }

    #[test]
    fn test_cascades_through_a_drop() {
        let seq = sequence_of([0.0, 1.0, 1.0, 1.0, 0.0].map(|x| vec![at(4, x)]).to_vec());
        let out = smooth(&seq, 0.2, None, None);
        assert_close(&xs(&out, 4), &[0.0, 0.2, 0.36, 0.488, 0.3904]);
    }

    #[test]
    fn test_confidence_comes_from_current_frame() {
        let seq = sequence_of(vec![
            vec![Person::with_body(body_with(&[(2, 0.0, 0.0, 0.9)]))],
            vec![Person::with_body(body_with(&[(2, 10.0, 10.0, 0.4)]))],
        ]);
        let out = smooth(&seq, 0.5, None, None);
        assert_eq!(body_at(&out, 1, 0).get(2), Some(Keypoint::new(5.0, 5.0, 0.4)));
    }

    #[test]
    fn test_untracked_in_either_frame_keeps_raw_value() {
        let seq = sequence_of(vec![
            vec![Person::with_body(body_with(&[(2, 0.0, 0.0, 0.0)]))],
            vec![Person::with_body(body_with(&[(2, 10.0, 10.0, 1.0)]))],
            vec![Person::with_body(body_with(&[(2, 20.0, 20.0, 0.0)]))],
        ]);
        let out = smooth(&seq, 0.5, None, None);
        assert_eq!(xs(&out, 2), vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_selection_limits_body_indices() {
        let person = |x: f64| Person::with_body(body_with(&[(4, x, x, 1.0), (7, x, x, 1.0)]));
        let seq = sequence_of(vec![vec![person(0.0)], vec![person(10.0)]]);
        let out = smooth(&seq, 0.5, Some(&Selection::body([7])), None);
        assert_eq!(xs(&out, 4), vec![0.0, 10.0]);
        assert_eq!(xs(&out, 7), vec![0.0, 5.0]);
    }

    #[test]
    fn test_focus_point_smoothed_even_outside_selection() {
        let person = |x: f64| Person::with_body(body_with(&[(1, x, x, 1.0), (7, x, x, 1.0)]));
        let seq = sequence_of(vec![vec![person(0.0)], vec![person(10.0)]]);
        let out = smooth(&seq, 0.5, Some(&Selection::body([7])), Some(1));
        assert_eq!(xs(&out, 1), vec![0.0, 5.0]);
        assert_eq!(xs(&out, 7), vec![0.0, 5.0]);
    }

    #[test]
    fn test_focus_mode_matches_independent_mode() {
        let person = |x: f64| {
            Person::with_body(body_with(&[(1, x, 2.0 * x, 1.0), (4, 3.0 * x, x, 1.0)]))
        };
        let seq = sequence_of(vec![vec![person(0.0)], vec![person(4.0)], vec![person(9.0)]]);
        let focused = smooth(&seq, 0.3, None, Some(1));
        let independent = smooth(&seq, 0.3, None, None);
        assert_eq!(focused, independent);
    }

    #[test]
    fn test_hands_smoothed_only_when_lengths_match() {
        let with_hand = |x: f64, points: usize| {
            let mut person = at(0, x);
            let mut h = hand(x, 1.0).into_values();
            h.truncate(points * 3);
            person.set_group(KeypointGroup::LeftHand, KeypointArray::new(h));
            person
        };
        let seq = sequence_of(vec![vec![with_hand(0.0, 21)], vec![with_hand(10.0, 21)]]);
        let out = smooth(&seq, 0.5, None, None);
        let left = out.frames[1].people().unwrap()[0]
            .group(KeypointGroup::LeftHand)
            .unwrap()
            .clone();
        assert_eq!(left.get(0), Some(Keypoint::new(5.0, 5.0, 1.0)));

        let seq = sequence_of(vec![vec![with_hand(0.0, 21)], vec![with_hand(10.0, 20)]]);
        let out = smooth(&seq, 0.5, None, None);
        let left = out.frames[1].people().unwrap()[0]
            .group(KeypointGroup::LeftHand)
            .unwrap()
            .clone();
        assert_eq!(left.get(0), Some(Keypoint::new(10.0, 10.0, 1.0)));
    }

    #[test]
    fn test_face_off_by_default() {
        let with_face = |x: f64| {
            let mut person = at(0, x);
            person.set_group(KeypointGroup::Face, hand(x, 1.0));
            person
        };
        let seq = sequence_of(vec![vec![with_face(0.0)], vec![with_face(10.0)]]);
        let out = TemporalSmoother::new(0.5).apply(&seq);
        let face = out.frames[1].people().unwrap()[0]
            .group(KeypointGroup::Face)
            .unwrap()
            .clone();
        assert_eq!(face.get(0), Some(Keypoint::new(10.0, 10.0, 1.0)));

        let out = TemporalSmoother::new(0.5).smoothing(false, true).apply(&seq);
        let face = out.frames[1].people().unwrap()[0]
            .group(KeypointGroup::Face)
            .unwrap()
            .clone();
        assert_eq!(face.get(0), Some(Keypoint::new(5.0, 5.0, 1.0)));
    }

    #[test]
    fn test_single_frame_and_factor_extremes() {
        let single = sequence_of(vec![vec![at(4, 3.0)]]);
        assert_eq!(smooth(&single, 0.5, None, None), single);

        let seq = sequence_of([0.0, 4.0, 8.0].map(|x| vec![at(4, x)]).to_vec());
        assert_eq!(xs(&smooth(&seq, 1.0, None, None), 4), vec![0.0, 4.0, 8.0]);
        assert_eq!(xs(&smooth(&seq, 0.0, None, None), 4), vec![0.0, 0.0, 0.0]);
        assert_eq!(TemporalSmoother::new(7.0).factor, 1.0);
    }

    #[test]
    fn test_person_target_and_missing_previous_person() {
        let seq = sequence_of(vec![
            vec![at(4, 0.0)],
            vec![at(4, 10.0), at(4, 10.0)],
        ]);
        let out = TemporalSmoother::new(0.5).apply(&seq);
        assert_eq!(body_at(&out, 1, 0).get(4).unwrap().x, 5.0);
        assert_eq!(body_at(&out, 1, 1).get(4).unwrap().x, 10.0);

        let seq = sequence_of(vec![vec![at(4, 0.0), at(4, 0.0)]; 2]);
        let out = TemporalSmoother::new(0.5)
            .for_person(PersonTarget::Index(1))
            .apply(&seq);
        assert_eq!(out, seq);
    }

    #[test]
    fn test_selected_indices_past_eighteen_are_ignored() {
        let seq = sequence_of(vec![
            vec![Person::with_body(wide_body(0.0, 1.0))],
            vec![Person::with_body(wide_body(10.0, 1.0))],
        ]);
        let out = smooth(&seq, 0.5, Some(&Selection::body([4, 20])), None);
        assert_eq!(body_at(&out, 1, 0).get(4), Some(Keypoint::new(9.0, 4.0, 1.0)));
        assert_eq!(body_at(&out, 1, 0).get(20), Some(Keypoint::new(30.0, 20.0, 1.0)));
    }
}
