//! Translate keypoints by constant or per-frame offsets.

use std::path::PathBuf;

use posecraft_common::PosecraftError;
use posecraft_processing_core::{KeypointMover, MismatchPolicy, Offset, PersonTarget};

use crate::{SelectionArgs, TransformArgs};

/// Parameters of the `move` command.
pub struct MoveOptions {
    pub x: f64,
    pub y: f64,
    pub x_list: Option<Vec<f64>>,
    pub y_list: Option<Vec<f64>>,
    pub part: String,
    pub person: i64,
    pub mismatch: String,
    pub affect_hands: bool,
    pub affect_face: bool,
}

fn offset(constant: f64, list: Option<Vec<f64>>) -> Offset {
    match list {
        Some(values) => Offset::Animated(values),
        None => Offset::Constant(constant),
    }
}

pub fn run(
    input: PathBuf,
    options: MoveOptions,
    selection: SelectionArgs,
    transform: TransformArgs,
) -> anyhow::Result<()> {
    let sequence = super::read_sequence(&input)?;
    let policy = options
        .mismatch
        .parse::<MismatchPolicy>()
        .map_err(|e| PosecraftError::config(e.to_string()))?;

    let mut mover = KeypointMover::new(
        offset(options.x, options.x_list),
        offset(options.y, options.y_list),
    )
    .with_fallback_part(options.part)
    .for_person(PersonTarget::from_signed(options.person))
    .with_mismatch_policy(policy)
    .affecting(options.affect_hands, options.affect_face);
    mover.selection = super::read_selection(&selection)?;

    let scope = mover.scope();
    if scope.body_indices.is_empty() {
        tracing::warn!(part = %mover.fallback_part, "Nothing selected to move");
    }
    eprintln!(
        "Moving {} body keypoint(s) over {} frame(s) (policy: {policy})",
        scope.body_indices.len(),
        sequence.len()
    );

    let moved = mover.apply(&sequence);
    super::write_sequence(&moved, &transform)
}
