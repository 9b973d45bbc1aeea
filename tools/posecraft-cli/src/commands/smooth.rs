//! Temporal smoothing.

use std::path::PathBuf;

use posecraft_processing_core::{PersonTarget, TemporalSmoother};

use crate::{SelectionArgs, TransformArgs};

pub fn run(
    input: PathBuf,
    factor: f64,
    focus: Option<&str>,
    selection: SelectionArgs,
    person: i64,
    (hands, face): (bool, bool),
    transform: TransformArgs,
) -> anyhow::Result<()> {
    let sequence = super::read_sequence(&input)?;

    let mut smoother = TemporalSmoother::new(factor)
        .for_person(PersonTarget::from_signed(person))
        .smoothing(hands, face);
    smoother.selection = super::read_selection(&selection)?;
    smoother.focus = focus.map(super::parse_keypoint).transpose()?;

    if smoother.factor != factor {
        tracing::warn!(requested = factor, used = smoother.factor, "Smoothing factor clamped");
    }
    eprintln!(
        "Smoothing {} frame(s) (factor: {})",
        sequence.len(),
        smoother.factor
    );

    let smoothed = smoother.apply(&sequence);
    super::write_sequence(&smoothed, &transform)
}
