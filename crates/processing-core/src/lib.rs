//! Posecraft Processing Core — Keypoint Transforms
//!
//! Pure transforms over OpenPose-style pose sequences:
//! - **Filter:** Hide keypoints outside a selection by zeroing confidence
//! - **Move:** Translate selected keypoints by constant or animated offsets
//! - **Attach:** Graft parts of one pose onto another at an anchor keypoint
//! - **Merge:** Combine several sequences into one multi-person sequence
//! - **Smooth:** Recursive exponential smoothing across frames
//!
//! This crate is pure computation — no I/O, no platform dependencies.
//! Every transform takes its inputs by reference and returns a new sequence.

pub mod alignment;
pub mod attach;
pub mod filter;
pub mod merge;
pub mod mover;
pub mod smooth;

#[cfg(test)]
mod test_support;

pub use alignment::{FrameAlignment, MismatchPolicy, Offset, PersonTarget};
pub use attach::{attach, PoseAttacher};
pub use filter::{filter, KeypointFilter};
pub use merge::{merge, PoseMerger};
pub use mover::{move_keypoints, KeypointMover};
pub use smooth::{smooth, TemporalSmoother};
