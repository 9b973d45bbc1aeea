pub mod attach;
pub mod filter;
pub mod info;
pub mod merge;
pub mod move_keypoints;
pub mod parts;
pub mod select;
pub mod smooth;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use posecraft_common::{PosecraftError, PosecraftResult};
use posecraft_pose_model::{
    load_sequence, serialize_sequence, CocoKeypoint, PoseFileError, PoseSequence, Selection,
};

use crate::{SelectionArgs, TransformArgs};

/// Load a pose sequence, mapping file errors into the shared error type.
pub fn read_sequence(path: &Path) -> PosecraftResult<PoseSequence> {
    if !path.exists() {
        return Err(PosecraftError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let sequence = load_sequence(path).map_err(|e| match e {
        PoseFileError::IoError { source, .. } => PosecraftError::Io(source),
        err @ PoseFileError::ParseError { .. } => PosecraftError::model(err.to_string()),
    })?;
    tracing::debug!(path = %path.display(), frames = sequence.len(), "Loaded pose sequence");
    Ok(sequence)
}

/// Read the selection file, if one was given.
pub fn read_selection(args: &SelectionArgs) -> PosecraftResult<Option<Selection>> {
    let Some(path) = &args.selection else {
        return Ok(None);
    };
    if !path.exists() {
        return Err(PosecraftError::FileNotFound { path: path.clone() });
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

/// Parse a keypoint argument such as `4`, `RWrist` or `4: RWrist`.
pub fn parse_keypoint(value: &str) -> PosecraftResult<usize> {
    value
        .parse::<CocoKeypoint>()
        .map(CocoKeypoint::index)
        .map_err(|e| PosecraftError::config(e.to_string()))
}

/// Write JSON text to the output file, or stdout.
pub fn write_json(json: &str, output: Option<&PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

/// Write a transformed sequence per the shared output flags.
pub fn write_sequence(sequence: &PoseSequence, args: &TransformArgs) -> anyhow::Result<()> {
    let json = serialize_sequence(sequence).context("Failed to serialize pose sequence")?;
    write_json(&json, args.output.as_ref())
}
