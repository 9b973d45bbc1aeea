//! People, frames and pose sequences.
//!
//! Mirrors the OpenPose JSON layout: a sequence is a list of frames, a frame
//! holds `people` plus canvas size, and a person holds up to four flat
//! keypoint arrays. Fields this model does not know about are carried through
//! untouched.

use std::path::{Path, PathBuf};

use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::keypoint::KeypointArray;

/// One of the four keypoint arrays a person may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypointGroup {
    Body,
    LeftHand,
    RightHand,
    Face,
}

impl KeypointGroup {
    pub const ALL: [KeypointGroup; 4] = [Self::Body, Self::LeftHand, Self::RightHand, Self::Face];

    /// JSON field name of this group.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Body => "pose_keypoints_2d",
            Self::LeftHand => "hand_left_keypoints_2d",
            Self::RightHand => "hand_right_keypoints_2d",
            Self::Face => "face_keypoints_2d",
        }
    }
}

/// A single detected person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose_keypoints_2d: Option<KeypointArray>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand_left_keypoints_2d: Option<KeypointArray>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand_right_keypoints_2d: Option<KeypointArray>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_keypoints_2d: Option<KeypointArray>,

    /// Fields not modelled here, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Person {
    /// A person with only a body array.
    pub fn with_body(body: KeypointArray) -> Self {
        Self {
            pose_keypoints_2d: Some(body),
            ..Self::default()
        }
    }

    pub fn group(&self, group: KeypointGroup) -> Option<&KeypointArray> {
        match group {
            KeypointGroup::Body => self.pose_keypoints_2d.as_ref(),
            KeypointGroup::LeftHand => self.hand_left_keypoints_2d.as_ref(),
            KeypointGroup::RightHand => self.hand_right_keypoints_2d.as_ref(),
            KeypointGroup::Face => self.face_keypoints_2d.as_ref(),
        }
    }

    pub fn group_mut(&mut self, group: KeypointGroup) -> Option<&mut KeypointArray> {
        self.slot_mut(group).as_mut()
    }

    /// Replace (or create) one keypoint array.
    pub fn set_group(&mut self, group: KeypointGroup, keypoints: KeypointArray) {
        *self.slot_mut(group) = Some(keypoints);
    }

    /// The group's array only if it is present and non-empty.
    pub fn non_empty_group(&self, group: KeypointGroup) -> Option<&KeypointArray> {
        self.group(group).filter(|kps| !kps.is_empty())
    }

    fn slot_mut(&mut self, group: KeypointGroup) -> &mut Option<KeypointArray> {
        match group {
            KeypointGroup::Body => &mut self.pose_keypoints_2d,
            KeypointGroup::LeftHand => &mut self.hand_left_keypoints_2d,
            KeypointGroup::RightHand => &mut self.hand_right_keypoints_2d,
            KeypointGroup::Face => &mut self.face_keypoints_2d,
        }
    }
}

/// The `people` field of a frame.
///
/// Anything that is not a list of person-shaped objects is kept verbatim as
/// `Malformed`; transforms treat such frames as unprocessable and pass them
/// through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum People {
    Parsed(Vec<Person>),
    Malformed(Value),
}

/// One frame of pose data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people: Option<People>,

    /// Canvas size in pixels. Float values are rounded; negative or
    /// non-numeric values read as unspecified.
    #[serde(
        default,
        deserialize_with = "lenient_dimension",
        skip_serializing_if = "Option::is_none"
    )]
    pub canvas_width: Option<u32>,

    #[serde(
        default,
        deserialize_with = "lenient_dimension",
        skip_serializing_if = "Option::is_none"
    )]
    pub canvas_height: Option<u32>,

    /// Fields not modelled here, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Frame {
    pub fn new(people: Vec<Person>, canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            people: Some(People::Parsed(people)),
            canvas_width: Some(canvas_width),
            canvas_height: Some(canvas_height),
            extra: Map::new(),
        }
    }

    /// People in this frame, or `None` if the frame has no usable list.
    pub fn people(&self) -> Option<&[Person]> {
        match &self.people {
            Some(People::Parsed(people)) => Some(people),
            _ => None,
        }
    }

    pub fn people_mut(&mut self) -> Option<&mut Vec<Person>> {
        match &mut self.people {
            Some(People::Parsed(people)) => Some(people),
            _ => None,
        }
    }

    /// Number of people, zero when the list is absent or malformed.
    pub fn person_count(&self) -> usize {
        self.people().map_or(0, <[Person]>::len)
    }
}

/// An ordered sequence of frames.
///
/// Deserializes from either a JSON array of frames or a single frame object
/// (read as a one-frame sequence). Always serializes as an array.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PoseSequence {
    pub frames: Vec<Frame>,
}

impl<'de> Deserialize<'de> for PoseSequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| {
                    Frame::deserialize(item)
                        .map_err(|e| D::Error::custom(format!("frame {idx}: {e}")))
                })
                .collect(),
            item @ Value::Object(_) => Frame::deserialize(item)
                .map(Self::from)
                .map_err(D::Error::custom),
            other => Err(D::Error::invalid_type(
                unexpected(&other),
                &"an array of frames or a single frame object",
            )),
        }
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

fn lenient_dimension<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_f64).and_then(|v| {
        (v.is_finite() && v >= 0.0 && v <= f64::from(u32::MAX)).then(|| v.round() as u32)
    }))
}

impl PoseSequence {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }
}

impl From<Frame> for PoseSequence {
    fn from(frame: Frame) -> Self {
        Self {
            frames: vec![frame],
        }
    }
}

impl From<Vec<Frame>> for PoseSequence {
    fn from(frames: Vec<Frame>) -> Self {
        Self { frames }
    }
}

impl FromIterator<Frame> for PoseSequence {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PoseSequence {
    type Item = Frame;
    type IntoIter = std::vec::IntoIter<Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}

impl<'a> IntoIterator for &'a PoseSequence {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Parse a sequence (or a single frame) from JSON text.
pub fn parse_sequence(json: &str) -> Result<PoseSequence, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize a sequence as pretty-printed JSON.
pub fn serialize_sequence(sequence: &PoseSequence) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(sequence)
}

/// Read a pose sequence from a JSON file.
pub fn load_sequence(path: impl AsRef<Path>) -> Result<PoseSequence, PoseFileError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| PoseFileError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_sequence(&json).map_err(|e| PoseFileError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write a pose sequence to a JSON file, creating parent directories.
pub fn save_sequence(path: impl AsRef<Path>, sequence: &PoseSequence) -> Result<(), PoseFileError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PoseFileError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let json = serialize_sequence(sequence).map_err(|e| PoseFileError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    std::fs::write(path, json).map_err(|e| PoseFileError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Errors that can occur when reading or writing pose files.
#[derive(Debug, thiserror::Error)]
pub enum PoseFileError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoint::Keypoint;

    const TWO_FRAMES: &str = r#"[
        {
            "people": [
                {
                    "pose_keypoints_2d": [10, 20, 0.9, 30, 40, 0.8],
                    "hand_left_keypoints_2d": [1, 1, 1],
                    "face_keypoints_3d": [0, 0, 0, 0]
                }
            ],
            "canvas_width": 512,
            "canvas_height": 768
        },
        { "canvas_width": 512, "canvas_height": 768 }
    ]"#;

    #[test]
    fn test_parse_sequence() {
        let seq = parse_sequence(TWO_FRAMES).unwrap();
        assert_eq!(seq.len(), 2);

        let person = &seq.frames[0].people().unwrap()[0];
        let body = person.group(KeypointGroup::Body).unwrap();
        assert_eq!(body.get(1), Some(Keypoint::new(30.0, 40.0, 0.8)));
        assert!(person.face_keypoints_2d.is_none());
        assert!(person.extra.contains_key("face_keypoints_3d"));

        assert!(seq.frames[1].people().is_none());
        assert_eq!(seq.frames[1].person_count(), 0);
    }

    #[test]
    fn test_single_frame_reads_as_one_frame_sequence() {
        let seq = parse_sequence(r#"{"people": [], "canvas_width": 64, "canvas_height": 64}"#)
            .unwrap();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.frames[0].canvas_width, Some(64));
    }

    #[test]
    fn test_malformed_people_is_retained() {
        let seq = parse_sequence(r#"[{"people": [1, 2, 3], "canvas_width": 8}]"#).unwrap();
        let frame = &seq.frames[0];
        assert!(frame.people().is_none());
        assert_eq!(
            frame.people,
            Some(People::Malformed(serde_json::json!([1, 2, 3])))
        );

        let out = serialize_sequence(&seq).unwrap();
        let reparsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(reparsed[0]["people"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_unknown_fields_survive_serialization() {
        let seq = parse_sequence(TWO_FRAMES).unwrap();
        let value: Value = serde_json::from_str(&serialize_sequence(&seq).unwrap()).unwrap();
        assert_eq!(
            value[0]["people"][0]["face_keypoints_3d"],
            serde_json::json!([0, 0, 0, 0])
        );
        assert!(value[1].get("people").is_none());
    }

    #[test]
    fn test_null_array_reads_as_absent() {
        let seq = parse_sequence(r#"[{"people": [{"pose_keypoints_2d": null}]}]"#).unwrap();
        let person = &seq.frames[0].people().unwrap()[0];
        assert!(person.group(KeypointGroup::Body).is_none());
    }

    #[test]
    fn test_set_group_creates_array() {
        let mut person = Person::default();
        assert!(person.non_empty_group(KeypointGroup::Face).is_none());
        person.set_group(KeypointGroup::Face, KeypointArray::new(vec![1.0, 2.0, 0.5]));
        assert_eq!(person.group(KeypointGroup::Face).unwrap().keypoint_count(), 1);
        person.set_group(KeypointGroup::LeftHand, KeypointArray::default());
        assert!(person.non_empty_group(KeypointGroup::LeftHand).is_none());
    }

    #[test]
    fn test_load_and_save_roundtrip() {
        let dir = std::env::temp_dir().join("posecraft_test_sequence_io");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("pose.json");

        let seq = parse_sequence(TWO_FRAMES).unwrap();
        save_sequence(&path, &seq).unwrap();
        let loaded = load_sequence(&path).unwrap();
        assert_eq!(loaded, seq);

        let missing = load_sequence(dir.join("missing.json"));
        assert!(matches!(missing, Err(PoseFileError::IoError { .. })));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_float_canvas_does_not_abort_parse() {
        let seq = parse_sequence(
            r#"[
                {"people": [], "canvas_width": 512.0, "canvas_height": 768},
                {"people": [], "canvas_width": -1, "canvas_height": "tall"},
                {"people": []}
            ]"#,
        )
        .unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.frames[0].canvas_width, Some(512));
        assert_eq!(seq.frames[0].canvas_height, Some(768));
        assert_eq!(seq.frames[1].canvas_width, None);
        assert_eq!(seq.frames[1].canvas_height, None);
        assert_eq!(seq.frames[1].people().map(<[Person]>::len), Some(0));
    }

    #[test]
    fn test_parse_error_names_the_frame() {
        let err = parse_sequence(r#"[{"people": []}, 5]"#).unwrap_err();
        assert!(err.to_string().starts_with("frame 1:"), "{err}");

        let err = parse_sequence("true").unwrap_err();
        assert!(err.to_string().contains("array of frames"), "{err}");
    }
}
