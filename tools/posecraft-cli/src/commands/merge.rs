//! Merge several sequences into one.

use std::path::PathBuf;

use posecraft_processing_core::PoseMerger;

use crate::TransformArgs;

pub fn run(
    inputs: Vec<PathBuf>,
    width: u32,
    height: u32,
    transform: TransformArgs,
) -> anyhow::Result<()> {
    let sequences = inputs
        .iter()
        .map(|path| super::read_sequence(path))
        .collect::<Result<Vec<_>, _>>()?;

    let merged = PoseMerger::new(width, height).apply(&sequences);
    eprintln!(
        "Merged {} input(s) into {} frame(s) at {}x{}",
        sequences.len(),
        merged.len(),
        width,
        height
    );

    super::write_sequence(&merged, &transform)
}
