//! Hide keypoints outside a selection.

use std::path::PathBuf;

use posecraft_common::PosecraftError;
use posecraft_pose_model::SelectionBuilder;
use posecraft_processing_core::{KeypointFilter, PersonTarget};

use crate::{SelectionArgs, TransformArgs};

pub fn run(
    input: PathBuf,
    selection: SelectionArgs,
    part: Option<String>,
    person: i64,
    invert: bool,
    transform: TransformArgs,
) -> anyhow::Result<()> {
    let sequence = super::read_sequence(&input)?;

    let selection = match (super::read_selection(&selection)?, part) {
        (Some(selection), _) => selection,
        (None, Some(part)) => SelectionBuilder::preset(part).build(),
        (None, None) => {
            return Err(PosecraftError::config("filter needs --selection or --part").into())
        }
    };

    eprintln!(
        "Filtering {} frame(s), keeping {} body keypoint(s){}",
        sequence.len(),
        selection.body_indices.len(),
        if invert { " (inverted)" } else { "" }
    );

    let filtered = KeypointFilter::new(selection)
        .for_person(PersonTarget::from_signed(person))
        .inverted(invert)
        .apply(&sequence);

    super::write_sequence(&filtered, &transform)
}
