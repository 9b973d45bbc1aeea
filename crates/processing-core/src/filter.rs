//! Keypoint filtering by confidence masking.
//!
//! Hides keypoints by zeroing their confidence channel. Coordinates are never
//! changed, so a filtered pose keeps its geometry for later stages.

use posecraft_pose_model::{KeypointGroup, Person, PoseSequence, Selection};

use crate::alignment::PersonTarget;

/// Zeroes confidence outside (or, inverted, inside) a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct KeypointFilter {
    pub selection: Selection,
    pub person: PersonTarget,
    /// Hide the selected keypoints instead of keeping them.
    pub invert: bool,
}

impl KeypointFilter {
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            person: PersonTarget::All,
            invert: false,
        }
    }

    pub fn for_person(mut self, person: PersonTarget) -> Self {
        self.person = person;
        self
    }

    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Filter a sequence, returning an independent copy.
    pub fn apply(&self, sequence: &PoseSequence) -> PoseSequence {
        let mut output = sequence.clone();

        for (frame_idx, frame) in output.frames.iter_mut().enumerate() {
            let Some(people) = frame.people_mut() else {
                tracing::debug!(frame = frame_idx, "No people list, frame passed through");
                continue;
            };

            let targets = self.person.indices(people.len());
            if targets.is_empty() {
                tracing::debug!(
                    frame = frame_idx,
                    people = people.len(),
                    "Target person not present, frame passed through"
                );
            }
            for person in &mut people[targets] {
                self.filter_person(person);
            }
        }

        output
    }

    fn filter_person(&self, person: &mut Person) {
        if let Some(body) = person.group_mut(KeypointGroup::Body) {
            for index in 0..body.keypoint_count() {
                let keep = self.selection.contains(index) != self.invert;
                if !keep {
                    body.set_confidence(index, 0.0);
                }
            }
        }

        // Hands and face are all-or-nothing.
        let groups = [
            (KeypointGroup::LeftHand, self.selection.include_left_hand),
            (KeypointGroup::RightHand, self.selection.include_right_hand),
            (KeypointGroup::Face, self.selection.include_face),
        ];
        for (group, included) in groups {
            if included == self.invert {
                if let Some(keypoints) = person.group_mut(group) {
                    keypoints.clear_confidence();
                }
            }
        }
    }
}

/// Shorthand for [`KeypointFilter::apply`].
pub fn filter(
    sequence: &PoseSequence,
    selection: &Selection,
    person: PersonTarget,
    invert: bool,
) -> PoseSequence {
    KeypointFilter::new(selection.clone())
        .for_person(person)
        .inverted(invert)
        .apply(sequence)
}
