//! Fixture builders shared by the transform unit tests.

use posecraft_pose_model::{
    Frame, Keypoint, KeypointArray, Person, PoseSequence, BODY_KEYPOINT_COUNT,
};

/// An 18-point body, untracked except for the given `(index, x, y, conf)`.
pub fn body_with(points: &[(usize, f64, f64, f64)]) -> KeypointArray {
    let mut body = KeypointArray::untracked(BODY_KEYPOINT_COUNT);
    for &(index, x, y, confidence) in points {
        body.set(index, Keypoint::new(x, y, confidence));
    }
    body
}

/// A 21-point hand; keypoint `i` sits at `(x, x + i)`.
pub fn hand(x: f64, confidence: f64) -> KeypointArray {
    KeypointArray::from_keypoints((0..21).map(|i| Keypoint::new(x, x + i as f64, confidence)))
}

/// A one-frame sequence.
pub fn frame_of(people: Vec<Person>) -> PoseSequence {
    PoseSequence::from(Frame::new(people, 512, 768))
}

/// A multi-frame sequence, one people list per frame.
pub fn sequence_of(frames: Vec<Vec<Person>>) -> PoseSequence {
    frames
        .into_iter()
        .map(|people| Frame::new(people, 512, 768))
        .collect()
}

/// Body array of person `person` in frame `frame`.
pub fn body_at(sequence: &PoseSequence, frame: usize, person: usize) -> KeypointArray {
    sequence.frames[frame].people().expect("frame has people")[person]
        .pose_keypoints_2d
        .clone()
        .expect("person has a body array")
}

/// A 25-point body; keypoint `i` sits at `(i + shift, i * y_scale)`, all tracked.
pub fn wide_body(shift: f64, y_scale: f64) -> KeypointArray {
    KeypointArray::from_keypoints(
        (0..25).map(|i| Keypoint::new(i as f64 + shift, i as f64 * y_scale, 1.0)),
    )
}
