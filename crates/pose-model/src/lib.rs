//! Posecraft Pose Model
//!
//! Defines the core data contracts shared by every keypoint transform:
//! - **Keypoints:** `(x, y, confidence)` triplets stored in flat arrays
//! - **Sequences:** frames of people, each with body/hand/face arrays
//! - **Body parts:** the COCO-18 landmark names and named index groups
//! - **Selections:** which body indices and optional groups a transform touches
//!
//! Keypoint arrays keep the flat OpenPose wire layout so data round-trips
//! through a transform without reshaping.

pub mod body_parts;
pub mod keypoint;
pub mod selection;
pub mod sequence;

pub use body_parts::*;
pub use keypoint::*;
pub use selection::*;
pub use sequence::*;
