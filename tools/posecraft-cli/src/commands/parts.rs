//! List the body-part catalog.

use posecraft_pose_model::{CocoKeypoint, BODY_PART_GROUPS};

pub fn run() -> anyhow::Result<()> {
    println!("Keypoints (COCO-18):");
    for keypoint in CocoKeypoint::ALL {
        println!("  {}", keypoint.label());
    }
    println!();

    println!("Body-part groups:");
    let width = BODY_PART_GROUPS
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);
    for (name, indices) in BODY_PART_GROUPS {
        let indices = indices
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {name:<width$}  [{indices}]");
    }

    Ok(())
}
