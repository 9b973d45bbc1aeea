//! Rigid transplant of keypoints from a donor pose onto a recipient pose.
//!
//! A single anchor keypoint is located in both poses; the translation that
//! maps the donor anchor onto the recipient anchor is applied to every
//! transplanted keypoint. The donor's relative geometry is preserved as-is.

use std::collections::BTreeSet;

use posecraft_pose_model::{Frame, KeypointGroup, Person, PoseSequence, Selection};

use crate::alignment::FrameAlignment;

/// Transplants keypoints from an attachment pose onto a base pose.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseAttacher {
    /// Body index used as the alignment reference.
    pub anchor: usize,
    /// Body indices to transplant; `None` transplants every tracked donor index.
    pub selection: Option<Selection>,
    pub base_person: usize,
    pub attachment_person: usize,
    pub attach_hands: bool,
    pub attach_face: bool,
}

impl PoseAttacher {
    pub fn new(anchor: usize) -> Self {
        Self {
            anchor,
            selection: None,
            base_person: 0,
            attachment_person: 0,
            attach_hands: false,
            attach_face: false,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_people(mut self, base_person: usize, attachment_person: usize) -> Self {
        self.base_person = base_person;
        self.attachment_person = attachment_person;
        self
    }

    pub fn attaching(mut self, hands: bool, face: bool) -> Self {
        self.attach_hands = hands;
        self.attach_face = face;
        self
    }

    /// Attach onto `base`, returning a new sequence of
    /// `max(len(base), len(attachment))` frames. The shorter input wraps.
    pub fn apply(&self, base: &PoseSequence, attachment: &PoseSequence) -> PoseSequence {
        let frame_count = base.len().max(attachment.len());
        let mut output = PoseSequence::new(Vec::with_capacity(frame_count));

        for frame_idx in 0..frame_count {
            let Some(base_idx) = FrameAlignment::Cyclic.resolve(frame_idx, base.len()) else {
                break;
            };
            let mut frame = base.frames[base_idx].clone();

            match FrameAlignment::Cyclic.resolve(frame_idx, attachment.len()) {
                Some(attach_idx) => {
                    self.attach_frame(frame_idx, &mut frame, &attachment.frames[attach_idx])
                }
                None => tracing::debug!(frame = frame_idx, "Attachment sequence is empty"),
            }

            output.push(frame);
        }

        output
    }

    fn attach_frame(&self, frame_idx: usize, base: &mut Frame, attachment: &Frame) {
        let donor = attachment
            .people()
            .and_then(|people| people.get(self.attachment_person));
        let recipient = base
            .people_mut()
            .and_then(|people| people.get_mut(self.base_person));

        match (recipient, donor) {
            (Some(recipient), Some(donor)) => {
                if !self.attach_person(recipient, donor) {
                    tracing::debug!(
                        frame = frame_idx,
                        anchor = self.anchor,
                        "Anchor keypoint not tracked in both poses, frame left unchanged"
                    );
                }
            }
            _ => tracing::debug!(
                frame = frame_idx,
                base_person = self.base_person,
                attachment_person = self.attachment_person,
                "Person missing, frame passed through"
            ),
        }
    }

    /// Returns `false` when nothing could be attached.
    fn attach_person(&self, recipient: &mut Person, donor: &Person) -> bool {
        let Some(donor_body) = donor.non_empty_group(KeypointGroup::Body) else {
            return false;
        };
        let Some(base_body) = recipient
            .group_mut(KeypointGroup::Body)
            .filter(|body| !body.is_empty())
        else {
            return false;
        };

        let (Some(base_anchor), Some(donor_anchor)) = (
            base_body.get_tracked(self.anchor),
            donor_body.get_tracked(self.anchor),
        ) else {
            return false;
        };

        let dx = base_anchor.x - donor_anchor.x;
        let dy = base_anchor.y - donor_anchor.y;

        let (indices, hands, face): (BTreeSet<usize>, bool, bool) = match &self.selection {
            Some(selection) => (
                selection.valid_body_indices().collect(),
                selection.includes_any_hand() || self.attach_hands,
                selection.include_face || self.attach_face,
            ),
            // The anchor itself stays as the base's reference.
            None => (
                donor_body
                    .tracked_indices()
                    .filter(|&index| index != self.anchor)
                    .collect(),
                self.attach_hands,
                self.attach_face,
            ),
        };

        // Replace, not blend: donor confidence is copied verbatim.
        for index in indices {
            if let Some(keypoint) = donor_body.get(index) {
                base_body.set(index, keypoint.translated(dx, dy));
            }
        }

        if hands {
            transplant_group(recipient, donor, KeypointGroup::LeftHand, dx, dy);
            transplant_group(recipient, donor, KeypointGroup::RightHand, dx, dy);
        }
        if face {
            transplant_group(recipient, donor, KeypointGroup::Face, dx, dy);
        }

        true
    }
}

/// Wholesale-replace one recipient group with the shifted donor group.
fn transplant_group(
    recipient: &mut Person,
    donor: &Person,
    group: KeypointGroup,
    dx: f64,
    dy: f64,
) {
    if let Some(donor_keypoints) = donor.non_empty_group(group) {
        let mut shifted = donor_keypoints.clone();
        shifted.translate_all_tracked(dx, dy);
        recipient.set_group(group, shifted);
    }
}

/// Shorthand for [`PoseAttacher::apply`].
pub fn attach(
    base: &PoseSequence,
    attachment: &PoseSequence,
    anchor: usize,
    selection: Option<&Selection>,
) -> PoseSequence {
    let mut attacher = PoseAttacher::new(anchor);
    attacher.selection = selection.cloned();
    attacher.apply(base, attachment)
}
