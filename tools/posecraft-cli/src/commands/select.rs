//! Build a selection and write it as JSON.

use std::path::PathBuf;

use anyhow::Context;
use posecraft_pose_model::SelectionBuilder;

pub fn run(builder: SelectionBuilder, output: Option<PathBuf>) -> anyhow::Result<()> {
    let selection = builder.build();
    tracing::debug!(
        mode = ?builder.mode,
        body = selection.body_indices.len(),
        "Built selection"
    );

    let json = serde_json::to_string_pretty(&selection).context("Failed to serialize selection")?;
    super::write_json(&json, output.as_ref())
}
