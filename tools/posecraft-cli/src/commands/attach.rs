//! Attach keypoints from one sequence onto another.

use std::path::PathBuf;

use posecraft_pose_model::CocoKeypoint;
use posecraft_processing_core::PoseAttacher;

use crate::{SelectionArgs, TransformArgs};

pub fn run(
    base: PathBuf,
    attachment: PathBuf,
    anchor: &str,
    selection: SelectionArgs,
    (base_person, attachment_person): (usize, usize),
    (hands, face): (bool, bool),
    transform: TransformArgs,
) -> anyhow::Result<()> {
    let anchor = super::parse_keypoint(anchor)?;
    let base = super::read_sequence(&base)?;
    let attachment = super::read_sequence(&attachment)?;

    let mut attacher = PoseAttacher::new(anchor)
        .with_people(base_person, attachment_person)
        .attaching(hands, face);
    attacher.selection = super::read_selection(&selection)?;

    if let Some(keypoint) = CocoKeypoint::from_index(anchor) {
        eprintln!(
            "Attaching {} frame(s) onto {} frame(s) at {}",
            attachment.len(),
            base.len(),
            keypoint.label()
        );
    }

    let attached = attacher.apply(&base, &attachment);
    super::write_sequence(&attached, &transform)
}
