//! Keypoint offsetting, optionally animated per frame.
//!
//! Moves are plain coordinate offsets gated on confidence: an untracked
//! keypoint is never moved. Confidence values are never changed.

use std::collections::BTreeSet;

use posecraft_pose_model::{body_parts, KeypointGroup, Person, PoseSequence, Selection};

use crate::alignment::{MismatchPolicy, Offset, PersonTarget};

/// What a move touches once the selection rules are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveScope {
    pub body_indices: BTreeSet<usize>,
    pub left_hand: bool,
    pub right_hand: bool,
    pub face: bool,
}

/// Adds an x/y offset to selected keypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct KeypointMover {
    pub x_offset: Offset,
    pub y_offset: Offset,
    /// Takes priority over `fallback_part`.
    pub selection: Option<Selection>,
    /// Catalog group used when no selection is given.
    pub fallback_part: String,
    pub person: PersonTarget,
    pub mismatch_policy: MismatchPolicy,
    /// Also move a hand when its wrist is in scope.
    pub affect_hands: bool,
    /// Also move the face when a head landmark is in scope.
    pub affect_face: bool,
}

impl Default for KeypointMover {
    fn default() -> Self {
        Self {
            x_offset: Offset::default(),
            y_offset: Offset::default(),
            selection: None,
            fallback_part: "all".to_string(),
            person: PersonTarget::All,
            mismatch_policy: MismatchPolicy::default(),
            affect_hands: false,
            affect_face: false,
        }
    }
}

impl KeypointMover {
    pub fn new(x_offset: impl Into<Offset>, y_offset: impl Into<Offset>) -> Self {
        Self {
            x_offset: x_offset.into(),
            y_offset: y_offset.into(),
            ..Self::default()
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_fallback_part(mut self, part: impl Into<String>) -> Self {
        self.fallback_part = part.into();
        self
    }

    pub fn for_person(mut self, person: PersonTarget) -> Self {
        self.person = person;
        self
    }

    pub fn with_mismatch_policy(mut self, policy: MismatchPolicy) -> Self {
        self.mismatch_policy = policy;
        self
    }

    pub fn affecting(mut self, hands: bool, face: bool) -> Self {
        self.affect_hands = hands;
        self.affect_face = face;
        self
    }

    /// Resolve the selection priority rules into a concrete scope.
    pub fn scope(&self) -> MoveScope {
        let selection = match &self.selection {
            Some(selection) => Selection {
                body_indices: selection.valid_body_indices().collect(),
                ..selection.clone()
            },
            None => Selection::body(body_parts::lookup(&self.fallback_part)),
        };

        let left_hand = selection.include_left_hand
            || (self.affect_hands && selection.contains_left_wrist());
        let right_hand = selection.include_right_hand
            || (self.affect_hands && selection.contains_right_wrist());
        let face = selection.include_face || (self.affect_face && selection.contains_head());

        MoveScope {
            body_indices: selection.body_indices,
            left_hand,
            right_hand,
            face,
        }
    }

    /// Move keypoints, returning an independent copy.
    pub fn apply(&self, sequence: &PoseSequence) -> PoseSequence {
        let mut output = sequence.clone();
        let frame_count = output.len();
        let scope = self.scope();
        let x_offsets = self.x_offset.per_frame(frame_count, self.mismatch_policy);
        let y_offsets = self.y_offset.per_frame(frame_count, self.mismatch_policy);

        tracing::debug!(
            frames = frame_count,
            body = scope.body_indices.len(),
            left_hand = scope.left_hand,
            right_hand = scope.right_hand,
            face = scope.face,
            "Moving keypoints"
        );

        for (frame_idx, frame) in output.frames.iter_mut().enumerate() {
            let Some(people) = frame.people_mut() else {
                tracing::debug!(frame = frame_idx, "No people list, frame passed through");
                continue;
            };
            let (dx, dy) = (x_offsets[frame_idx], y_offsets[frame_idx]);

            let targets = self.person.indices(people.len());
            for person in &mut people[targets] {
                move_person(person, &scope, dx, dy);
            }
        }

        output
    }
}

fn move_person(person: &mut Person, scope: &MoveScope, dx: f64, dy: f64) {
    if let Some(body) = person.group_mut(KeypointGroup::Body) {
        for &index in &scope.body_indices {
            body.translate_tracked(index, dx, dy);
        }
    }

    let groups = [
        (KeypointGroup::LeftHand, scope.left_hand),
        (KeypointGroup::RightHand, scope.right_hand),
        (KeypointGroup::Face, scope.face),
    ];
    for (group, in_scope) in groups {
        if !in_scope {
            continue;
        }
        if let Some(keypoints) = person.group_mut(group) {
            keypoints.translate_all_tracked(dx, dy);
        }
    }
}

/// Shorthand for [`KeypointMover::apply`] with a selection or fallback part.
pub fn move_keypoints(
    sequence: &PoseSequence,
    x_offset: impl Into<Offset>,
    y_offset: impl Into<Offset>,
    selection: Option<&Selection>,
    fallback_part: &str,
) -> PoseSequence {
    let mut mover = KeypointMover::new(x_offset, y_offset).with_fallback_part(fallback_part);
    mover.selection = selection.cloned();
    mover.apply(sequence)
}
