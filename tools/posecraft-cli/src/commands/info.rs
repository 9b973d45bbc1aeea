//! Show sequence information.

use std::path::PathBuf;

use anyhow::Context;
use posecraft_pose_model::{KeypointGroup, PoseSequence};
use serde::Serialize;

/// Summary printed by `posecraft info`.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct SequenceInfo {
    pub frames: usize,
    pub frames_without_people: usize,
    pub max_people: usize,
    pub canvas: Option<(u32, u32)>,
    /// Tracked keypoints per group, summed over every frame and person.
    pub tracked_body: usize,
    pub tracked_left_hand: usize,
    pub tracked_right_hand: usize,
    pub tracked_face: usize,
}

impl SequenceInfo {
    pub fn collect(sequence: &PoseSequence) -> Self {
        let mut info = Self {
            frames: sequence.len(),
            ..Self::default()
        };

        for frame in sequence {
            if info.canvas.is_none() {
                info.canvas = frame.canvas_width.zip(frame.canvas_height);
            }
            let Some(people) = frame.people() else {
                info.frames_without_people += 1;
                continue;
            };
            info.max_people = info.max_people.max(people.len());

            for person in people {
                let tracked =
                    |group| person.group(group).map_or(0, |kps| kps.tracked_indices().count());
                info.tracked_body += tracked(KeypointGroup::Body);
                info.tracked_left_hand += tracked(KeypointGroup::LeftHand);
                info.tracked_right_hand += tracked(KeypointGroup::RightHand);
                info.tracked_face += tracked(KeypointGroup::Face);
            }
        }

        info
    }
}

pub fn run(path: PathBuf, json: bool) -> anyhow::Result<()> {
    let sequence = super::read_sequence(&path)?;
    let info = SequenceInfo::collect(&sequence);

    if json {
        let text = serde_json::to_string_pretty(&info).context("Failed to serialize info")?;
        println!("{text}");
        return Ok(());
    }

    println!("Sequence: {}", path.display());
    println!("  Frames: {}", info.frames);
    println!("  Frames without people: {}", info.frames_without_people);
    println!("  Max people per frame: {}", info.max_people);
    match info.canvas {
        Some((w, h)) => println!("  Canvas: {w}x{h}"),
        None => println!("  Canvas: unspecified"),
    }
    println!();

    println!("Tracked keypoints:");
    println!("  Body: {}", info.tracked_body);
    println!("  Left hand: {}", info.tracked_left_hand);
    println!("  Right hand: {}", info.tracked_right_hand);
    println!("  Face: {}", info.tracked_face);

    Ok(())
}
