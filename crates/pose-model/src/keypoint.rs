//! Keypoint triplets and flat keypoint arrays.
//!
//! A keypoint array stores `x0, y0, c0, x1, y1, c1, ...`; keypoint `i`
//! lives at offset `3 * i`. A trailing partial triplet is kept as-is but is
//! never addressed as a keypoint.

use serde::{Deserialize, Serialize};

/// Number of landmarks in the COCO-18 body model.
pub const BODY_KEYPOINT_COUNT: usize = 18;

/// A single `(x, y, confidence)` keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self { x, y, confidence }
    }

    /// Whether this keypoint may be read as a transform source.
    ///
    /// Confidence `<= 0` means absent/untracked.
    pub fn is_tracked(&self) -> bool {
        self.confidence > 0.0
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Same keypoint shifted by `(dx, dy)`; confidence is untouched.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            confidence: self.confidence,
        }
    }
}

/// Flat keypoint array for one anatomical group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeypointArray(Vec<f64>);

impl KeypointArray {
    /// Wrap raw flat values.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Build a flat array from keypoints.
    pub fn from_keypoints(keypoints: impl IntoIterator<Item = Keypoint>) -> Self {
        Self(
            keypoints
                .into_iter()
                .flat_map(|kp| [kp.x, kp.y, kp.confidence])
                .collect(),
        )
    }

    /// An array of `count` untracked keypoints at the origin.
    pub fn untracked(count: usize) -> Self {
        Self(vec![0.0; count * 3])
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn into_values(self) -> Vec<f64> {
        self.0
    }

    /// Number of complete triplets.
    pub fn keypoint_count(&self) -> usize {
        self.0.len() / 3
    }

    /// Length of the flat value list.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Keypoint> {
        match self.0.get(triplet_span(index)?) {
            Some(&[x, y, confidence]) => Some(Keypoint { x, y, confidence }),
            _ => None,
        }
    }

    /// Get a keypoint only if it exists and is tracked.
    pub fn get_tracked(&self, index: usize) -> Option<Keypoint> {
        self.get(index).filter(Keypoint::is_tracked)
    }

    /// Overwrite keypoint `index`. Returns `false` if the array is too short.
    pub fn set(&mut self, index: usize, keypoint: Keypoint) -> bool {
        match self.triplet_mut(index) {
            Some(slot) => {
                slot[0] = keypoint.x;
                slot[1] = keypoint.y;
                slot[2] = keypoint.confidence;
                true
            }
            None => false,
        }
    }

    /// Overwrite only the confidence channel of keypoint `index`.
    pub fn set_confidence(&mut self, index: usize, confidence: f64) -> bool {
        match self.triplet_mut(index) {
            Some(slot) => {
                slot[2] = confidence;
                true
            }
            None => false,
        }
    }

    /// Zero the confidence of every keypoint, leaving coordinates intact.
    pub fn clear_confidence(&mut self) {
        for slot in self.0.chunks_exact_mut(3) {
            slot[2] = 0.0;
        }
    }

    /// Shift keypoint `index` by `(dx, dy)` if it is tracked.
    ///
    /// Returns `true` when the keypoint was moved.
    pub fn translate_tracked(&mut self, index: usize, dx: f64, dy: f64) -> bool {
        match self.triplet_mut(index) {
            Some(slot) if slot[2] > 0.0 => {
                slot[0] += dx;
                slot[1] += dy;
                true
            }
            _ => false,
        }
    }

    /// Shift every tracked keypoint by `(dx, dy)`.
    pub fn translate_all_tracked(&mut self, dx: f64, dy: f64) {
        for slot in self.0.chunks_exact_mut(3) {
            if slot[2] > 0.0 {
                slot[0] += dx;
                slot[1] += dy;
            }
        }
    }

    /// Iterate over complete keypoints in order.
    pub fn iter(&self) -> impl Iterator<Item = Keypoint> + '_ {
        self.0.chunks_exact(3).map(|slot| Keypoint {
            x: slot[0],
            y: slot[1],
            confidence: slot[2],
        })
    }

    /// Indices of tracked keypoints.
    pub fn tracked_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter()
            .enumerate()
            .filter(|(_, kp)| kp.is_tracked())
            .map(|(i, _)| i)
    }

    fn triplet_mut(&mut self, index: usize) -> Option<&mut [f64]> {
        self.0.get_mut(triplet_span(index)?)
    }
}

fn triplet_span(index: usize) -> Option<std::ops::Range<usize>> {
    let base = index.checked_mul(3)?;
    Some(base..base.checked_add(3)?)
}

impl From<Vec<f64>> for KeypointArray {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl FromIterator<Keypoint> for KeypointArray {
    fn from_iter<I: IntoIterator<Item = Keypoint>>(iter: I) -> Self {
        Self::from_keypoints(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KeypointArray {
        KeypointArray::new(vec![1.0, 2.0, 0.9, 3.0, 4.0, 0.0, 5.0, 6.0, 0.5])
    }

    #[test]
    fn test_triplet_addressing() {
        let arr = sample();
        assert_eq!(arr.keypoint_count(), 3);
        assert_eq!(arr.get(1), Some(Keypoint::new(3.0, 4.0, 0.0)));
        assert_eq!(arr.get(3), None);
        assert_eq!(arr.get_tracked(1), None);
        assert_eq!(arr.get_tracked(2), Some(Keypoint::new(5.0, 6.0, 0.5)));
    }

    #[test]
    fn test_partial_triplet_is_preserved_but_not_addressed() {
        let mut arr = KeypointArray::new(vec![1.0, 2.0, 0.9, 7.0, 8.0]);
        assert_eq!(arr.keypoint_count(), 1);
        assert_eq!(arr.get(1), None);
        arr.clear_confidence();
        assert_eq!(arr.values(), &[1.0, 2.0, 0.0, 7.0, 8.0]);
    }

    #[test]
    fn test_translate_skips_untracked() {
        let mut arr = sample();
        assert!(arr.translate_tracked(0, 1.0, -1.0));
        assert!(!arr.translate_tracked(1, 1.0, -1.0));
        assert!(!arr.translate_tracked(9, 1.0, -1.0));
        assert_eq!(arr.get(0), Some(Keypoint::new(2.0, 1.0, 0.9)));
        assert_eq!(arr.get(1), Some(Keypoint::new(3.0, 4.0, 0.0)));

        arr.translate_all_tracked(10.0, 10.0);
        assert_eq!(arr.get(2), Some(Keypoint::new(15.0, 16.0, 0.5)));
        assert_eq!(arr.get(1), Some(Keypoint::new(3.0, 4.0, 0.0)));
    }

    #[test]
    fn test_set_and_confidence() {
        let mut arr = sample();
        assert!(arr.set(1, Keypoint::new(9.0, 9.0, 1.0)));
        assert!(!arr.set(5, Keypoint::new(9.0, 9.0, 1.0)));
        assert!(arr.set_confidence(0, 0.0));
        assert_eq!(arr.tracked_indices().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_serializes_flat() {
        let arr = KeypointArray::from_keypoints([Keypoint::new(1.5, 2.5, 1.0)]);
        assert_eq!(serde_json::to_string(&arr).unwrap(), "[1.5,2.5,1.0]");
        let parsed: KeypointArray = serde_json::from_str("[1, 2, 0.5]").unwrap();
        assert_eq!(parsed.get(0), Some(Keypoint::new(1.0, 2.0, 0.5)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn translate_all_tracked_keeps_confidence_and_length(
            values in proptest::collection::vec(-1000.0f64..1000.0, 0..64),
            dx in -100.0f64..100.0,
            dy in -100.0f64..100.0,
        ) {
            let original = KeypointArray::new(values);
            let mut moved = original.clone();
            moved.translate_all_tracked(dx, dy);

            prop_assert_eq!(moved.len(), original.len());
            for (before, after) in original.iter().zip(moved.iter()) {
                prop_assert_eq!(before.confidence, after.confidence);
                if !before.is_tracked() {
                    prop_assert_eq!(before, after);
                }
            }
            // Trailing partial triplet is never touched.
            let tail = original.len() - original.len() % 3;
            prop_assert_eq!(&moved.values()[tail..], &original.values()[tail..]);
        }

        #[test]
        fn clear_confidence_untracks_everything(
            values in proptest::collection::vec(-10.0f64..10.0, 0..64),
        ) {
            let mut array = KeypointArray::new(values);
            array.clear_confidence();
            prop_assert_eq!(array.tracked_indices().count(), 0);
        }
    }
}
