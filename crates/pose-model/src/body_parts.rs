//! COCO-18 landmark names and the named body-part catalog.
//!
//! The catalog is a static, read-only table mapping a group name such as
//! `"left_forearm"` to the body keypoint indices it covers. Unknown names
//! resolve to an empty set, never an error.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::keypoint::BODY_KEYPOINT_COUNT;

/// The 18 body landmarks in COCO order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CocoKeypoint {
    Nose,
    Neck,
    RightShoulder,
    RightElbow,
    RightWrist,
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    RightHip,
    RightKnee,
    RightAnkle,
    LeftHip,
    LeftKnee,
    LeftAnkle,
    RightEye,
    LeftEye,
    RightEar,
    LeftEar,
}

impl CocoKeypoint {
    pub const ALL: [CocoKeypoint; BODY_KEYPOINT_COUNT] = [
        Self::Nose,
        Self::Neck,
        Self::RightShoulder,
        Self::RightElbow,
        Self::RightWrist,
        Self::LeftShoulder,
        Self::LeftElbow,
        Self::LeftWrist,
        Self::RightHip,
        Self::RightKnee,
        Self::RightAnkle,
        Self::LeftHip,
        Self::LeftKnee,
        Self::LeftAnkle,
        Self::RightEye,
        Self::LeftEye,
        Self::RightEar,
        Self::LeftEar,
    ];

    /// Zero-based COCO index.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Short OpenPose label, e.g. `RWrist`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "Nose",
            Self::Neck => "Neck",
            Self::RightShoulder => "RShoulder",
            Self::RightElbow => "RElbow",
            Self::RightWrist => "RWrist",
            Self::LeftShoulder => "LShoulder",
            Self::LeftElbow => "LElbow",
            Self::LeftWrist => "LWrist",
            Self::RightHip => "RHip",
            Self::RightKnee => "RKnee",
            Self::RightAnkle => "RAnkle",
            Self::LeftHip => "LHip",
            Self::LeftKnee => "LKnee",
            Self::LeftAnkle => "LAnkle",
            Self::RightEye => "REye",
            Self::LeftEye => "LEye",
            Self::RightEar => "REar",
            Self::LeftEar => "LEar",
        }
    }

    /// Dropdown label, e.g. `4: RWrist`.
    pub fn label(self) -> String {
        format!("{}: {}", self.index(), self.name())
    }
}

impl fmt::Display for CocoKeypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for unrecognized keypoint or option names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for CocoKeypoint {
    type Err = ParseEnumError;

    /// Accepts `"4"`, `"RWrist"` (case-insensitive) or `"4: RWrist"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseEnumError {
            kind: "keypoint",
            value: s.to_string(),
        };
        let head = s.split(':').next().unwrap_or(s).trim();

        if let Ok(index) = head.parse::<usize>() {
            return Self::from_index(index).ok_or_else(err);
        }

        Self::ALL
            .iter()
            .copied()
            .find(|kp| kp.name().eq_ignore_ascii_case(head))
            .ok_or_else(err)
    }
}

/// Wrist index per side; hands hang off these.
pub const LEFT_WRIST: usize = 7;
pub const RIGHT_WRIST: usize = 4;

/// Body indices whose presence implies the face group.
pub const HEAD_INDICES: [usize; 5] = [0, 14, 15, 16, 17];

/// Named body-part groups under COCO-18 ordering, sorted by name.
pub const BODY_PART_GROUPS: &[(&str, &[usize])] = &[
    ("all", &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17]),
    ("arms", &[2, 3, 4, 5, 6, 7]),
    ("head", &[0, 14, 15, 16, 17]),
    ("head_and_neck", &[0, 1, 14, 15, 16, 17]),
    ("left_foot", &[13]),
    ("left_forearm", &[6, 7]),
    ("left_full_arm", &[5, 6, 7]),
    ("left_full_leg", &[11, 12, 13]),
    ("left_lower_leg", &[12, 13]),
    ("left_side", &[5, 6, 7, 11, 12, 13, 15, 17]),
    ("left_upper_arm", &[5, 6]),
    ("left_upper_leg", &[11, 12]),
    ("legs", &[8, 9, 10, 11, 12, 13]),
    ("lower_body", &[8, 9, 10, 11, 12, 13]),
    ("right_foot", &[10]),
    ("right_forearm", &[3, 4]),
    ("right_full_arm", &[2, 3, 4]),
    ("right_full_leg", &[8, 9, 10]),
    ("right_lower_leg", &[9, 10]),
    ("right_side", &[2, 3, 4, 8, 9, 10, 14, 16]),
    ("right_upper_arm", &[2, 3]),
    ("right_upper_leg", &[8, 9]),
    ("shoulders", &[2, 5]),
    ("torso", &[1, 2, 5, 8, 11]),
    ("upper_body", &[0, 1, 2, 3, 4, 5, 6, 7, 14, 15, 16, 17]),
];

/// Raw indices for a named group, if the name is known.
pub fn group_indices(name: &str) -> Option<&'static [usize]> {
    BODY_PART_GROUPS
        .binary_search_by(|(group, _)| (*group).cmp(name))
        .ok()
        .map(|pos| BODY_PART_GROUPS[pos].1)
}

/// Body keypoint indices for a named group; empty for unknown names.
pub fn lookup(name: &str) -> BTreeSet<usize> {
    group_indices(name)
        .map(|indices| indices.iter().copied().collect())
        .unwrap_or_default()
}

/// Every catalog name, sorted.
pub fn all_names() -> Vec<&'static str> {
    BODY_PART_GROUPS.iter().map(|(name, _)| *name).collect()
}

/// Every body index `0..18`.
pub fn all_body_indices() -> BTreeSet<usize> {
    (0..BODY_KEYPOINT_COUNT).collect()
}
