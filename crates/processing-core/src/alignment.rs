//! Frame targeting and sequence-length reconciliation.
//!
//! Two frame-alignment policies exist on purpose: attaching wraps the shorter
//! sequence around (`Cyclic`), merging freezes it on its last frame
//! (`HoldLast`).

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use posecraft_pose_model::ParseEnumError;
use serde::{Deserialize, Serialize};

/// Which people in each frame a transform edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersonTarget {
    /// Every person in every frame.
    #[default]
    All,
    /// Only the person at this index; frames with fewer people are skipped.
    Index(usize),
}

impl PersonTarget {
    /// Host convention: any negative index means "all people".
    pub fn from_signed(index: i64) -> Self {
        usize::try_from(index).map_or(Self::All, Self::Index)
    }

    /// Person indices to visit in a frame holding `count` people.
    pub fn indices(self, count: usize) -> Range<usize> {
        match self {
            Self::All => 0..count,
            Self::Index(i) if i < count => i..i + 1,
            Self::Index(_) => 0..0,
        }
    }
}

/// How a shorter sequence is indexed past its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAlignment {
    /// `frame_idx mod len`.
    Cyclic,
    /// Clamp to the last frame.
    HoldLast,
}

impl FrameAlignment {
    /// Source index for output frame `frame_idx`; `None` for an empty source.
    pub fn resolve(self, frame_idx: usize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(match self {
            Self::Cyclic => frame_idx % len,
            Self::HoldLast => frame_idx.min(len - 1),
        })
    }
}

/// How an animated value list is fitted to the frame count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MismatchPolicy {
    /// Drop excess values. Frames past the end of a short list clamp to the
    /// last value.
    Truncate,
    /// Wrap around: frame `i` uses `values[i % len]`.
    #[default]
    Loop,
    /// Pad a short list with its last value.
    Repeat,
}

impl MismatchPolicy {
    fn alignment(self) -> FrameAlignment {
        match self {
            Self::Loop => FrameAlignment::Cyclic,
            Self::Truncate | Self::Repeat => FrameAlignment::HoldLast,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Truncate => "truncate",
            Self::Loop => "loop",
            Self::Repeat => "repeat",
        }
    }
}

impl fmt::Display for MismatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MismatchPolicy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truncate" => Ok(Self::Truncate),
            "loop" => Ok(Self::Loop),
            "repeat" => Ok(Self::Repeat),
            _ => Err(ParseEnumError {
                kind: "mismatch policy",
                value: s.to_string(),
            }),
        }
    }
}

/// A scalar offset, either fixed or animated per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Offset {
    Constant(f64),
    Animated(Vec<f64>),
}

impl Offset {
    /// Offset for frame `frame_idx` of a `frame_count`-frame sequence.
    ///
    /// An empty animated list yields `0.0`.
    pub fn at(&self, frame_idx: usize, frame_count: usize, policy: MismatchPolicy) -> f64 {
        match self {
            Self::Constant(value) => *value,
            Self::Animated(values) if values.len() == frame_count => values[frame_idx],
            Self::Animated(values) => policy
                .alignment()
                .resolve(frame_idx, values.len())
                .map_or(0.0, |i| values[i]),
        }
    }

    /// Effective offset for every frame.
    pub fn per_frame(&self, frame_count: usize, policy: MismatchPolicy) -> Vec<f64> {
        (0..frame_count)
            .map(|i| self.at(i, frame_count, policy))
            .collect()
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self::Constant(0.0)
    }
}

impl From<f64> for Offset {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<Vec<f64>> for Offset {
    fn from(values: Vec<f64>) -> Self {
        Self::Animated(values)
    }
}
