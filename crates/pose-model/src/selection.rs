//! Keypoint selections and the selection builder.
//!
//! A [`Selection`] names the body indices a transform acts on plus three
//! all-or-nothing groups (left hand, right hand, face). Consumers ignore body
//! indices outside `0..18`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::body_parts::{self, all_body_indices, HEAD_INDICES, LEFT_WRIST, RIGHT_WRIST};
use crate::keypoint::BODY_KEYPOINT_COUNT;

/// Catalog presets for which the face group is always excluded.
const FACELESS_PRESETS: [&str; 6] = [
    "lower_body",
    "legs",
    "left_full_leg",
    "right_full_leg",
    "left_foot",
    "right_foot",
];

/// Which keypoints a transform should affect.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub body_indices: BTreeSet<usize>,
    pub include_left_hand: bool,
    pub include_right_hand: bool,
    pub include_face: bool,
}

impl Selection {
    /// A body-only selection with no hand or face groups.
    pub fn body(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            body_indices: indices.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Every body index plus both hands and the face.
    pub fn everything() -> Self {
        Self {
            body_indices: all_body_indices(),
            include_left_hand: true,
            include_right_hand: true,
            include_face: true,
        }
    }

    pub fn with_hands(mut self, left: bool, right: bool) -> Self {
        self.include_left_hand = left;
        self.include_right_hand = right;
        self
    }

    pub fn with_face(mut self, include_face: bool) -> Self {
        self.include_face = include_face;
        self
    }

    /// Whether body `index` is selected. Indices past the COCO-18 range
    /// never count as selected.
    pub fn contains(&self, index: usize) -> bool {
        index < BODY_KEYPOINT_COUNT && self.body_indices.contains(&index)
    }

    /// Body indices that address a real COCO-18 landmark.
    pub fn valid_body_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.body_indices
            .iter()
            .copied()
            .filter(|&i| i < BODY_KEYPOINT_COUNT)
    }

    pub fn contains_left_wrist(&self) -> bool {
        self.contains(LEFT_WRIST)
    }

    pub fn contains_right_wrist(&self) -> bool {
        self.contains(RIGHT_WRIST)
    }

    /// Whether any head landmark (nose, eyes, ears) is selected.
    pub fn contains_head(&self) -> bool {
        HEAD_INDICES.iter().any(|i| self.body_indices.contains(i))
    }

    pub fn includes_any_hand(&self) -> bool {
        self.include_left_hand || self.include_right_hand
    }
}

/// How the builder chooses body indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    /// Union of the builder's body toggles.
    Custom,
    /// A catalog group by name; unknown names select every body index.
    Preset(String),
}

impl SelectionMode {
    /// Parse a host mode string: `"custom"` or a catalog name.
    pub fn parse(mode: &str) -> Self {
        if mode == "custom" {
            Self::Custom
        } else {
            Self::Preset(mode.to_string())
        }
    }
}

impl Default for SelectionMode {
    fn default() -> Self {
        Self::Preset("all".to_string())
    }
}

/// Builds a [`Selection`] from a mode plus toggles.
///
/// Every toggle defaults to `true`. Body toggles only matter in
/// [`SelectionMode::Custom`]; hand and face toggles apply in every mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionBuilder {
    pub mode: SelectionMode,
    pub include_head: bool,
    pub include_neck: bool,
    pub include_torso: bool,
    pub include_left_arm: bool,
    pub include_right_arm: bool,
    pub include_left_leg: bool,
    pub include_right_leg: bool,
    pub include_left_hand: bool,
    pub include_right_hand: bool,
    pub include_face: bool,
}

impl Default for SelectionBuilder {
    fn default() -> Self {
        Self {
            mode: SelectionMode::default(),
            include_head: true,
            include_neck: true,
            include_torso: true,
            include_left_arm: true,
            include_right_arm: true,
            include_left_leg: true,
            include_right_leg: true,
            include_left_hand: true,
            include_right_hand: true,
            include_face: true,
        }
    }
}

impl SelectionBuilder {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Builder for a catalog preset.
    pub fn preset(name: impl Into<String>) -> Self {
        Self::new(SelectionMode::Preset(name.into()))
    }

    /// Builder for a custom union with every body toggle switched off.
    pub fn custom_empty() -> Self {
        Self {
            mode: SelectionMode::Custom,
            include_head: false,
            include_neck: false,
            include_torso: false,
            include_left_arm: false,
            include_right_arm: false,
            include_left_leg: false,
            include_right_leg: false,
            ..Self::default()
        }
    }

    pub fn build(&self) -> Selection {
        let mut selection = Selection {
            body_indices: BTreeSet::new(),
            include_left_hand: self.include_left_hand,
            include_right_hand: self.include_right_hand,
            include_face: self.include_face,
        };

        match &self.mode {
            SelectionMode::Custom => {
                let toggles = [
                    (self.include_head, "head"),
                    (self.include_torso, "torso"),
                    (self.include_left_arm, "left_full_arm"),
                    (self.include_right_arm, "right_full_arm"),
                    (self.include_left_leg, "left_full_leg"),
                    (self.include_right_leg, "right_full_leg"),
                ];
                for (_, group) in toggles.iter().filter(|(enabled, _)| *enabled) {
                    selection.body_indices.extend(body_parts::lookup(group));
                }
                if self.include_neck {
                    selection.body_indices.insert(1);
                }
            }
            SelectionMode::Preset(name) => {
                selection.body_indices = match body_parts::group_indices(name) {
                    Some(indices) => indices.iter().copied().collect(),
                    None => all_body_indices(),
                };
                if FACELESS_PRESETS.contains(&name.as_str()) {
                    selection.include_face = false;
                }
            }
        }

        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_torso_only() {
        let selection = SelectionBuilder {
            include_torso: true,
            ..SelectionBuilder::custom_empty()
        }
        .build();
        assert_eq!(selection.body_indices, BTreeSet::from([1, 2, 5, 8, 11]));
    }

    #[test]
    fn test_custom_defaults_cover_every_index() {
        let selection = SelectionBuilder::new(SelectionMode::Custom).build();
        assert_eq!(selection.body_indices, all_body_indices());
        assert!(selection.include_face);
        assert!(selection.include_left_hand && selection.include_right_hand);
    }

    #[test]
    fn test_custom_neck_toggle_adds_index_one() {
        let selection = SelectionBuilder {
            include_neck: true,
            include_head: true,
            ..SelectionBuilder::custom_empty()
        }
        .build();
        assert_eq!(
            selection.body_indices,
            BTreeSet::from([0, 1, 14, 15, 16, 17])
        );
    }

    #[test]
    fn test_preset_uses_catalog() {
        let selection = SelectionBuilder::preset("right_forearm").build();
        assert_eq!(selection.body_indices, BTreeSet::from([3, 4]));
        assert!(selection.include_face);
    }

    #[test]
    fn test_leg_presets_force_face_off() {
        for name in FACELESS_PRESETS {
            let selection = SelectionBuilder::preset(name).build();
            assert!(!selection.include_face, "{name} should exclude face");
            assert!(selection.include_left_hand);
        }
        let selection = SelectionBuilder::preset("upper_body").build();
        assert!(selection.include_face);
    }

    #[test]
    fn test_unknown_preset_falls_back_to_all() {
        let selection = SelectionBuilder::preset("wings").build();
        assert_eq!(selection.body_indices, all_body_indices());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(SelectionMode::parse("custom"), SelectionMode::Custom);
        assert_eq!(
            SelectionMode::parse("legs"),
            SelectionMode::Preset("legs".to_string())
        );
    }

    #[test]
    fn test_selection_helpers() {
        let selection = Selection::body([4, 0, 42]);
        assert!(selection.contains_right_wrist());
        assert!(!selection.contains_left_wrist());
        assert!(selection.contains_head());
        assert_eq!(selection.valid_body_indices().collect::<Vec<_>>(), vec![0, 4]);
        assert!(selection.contains(4));
        assert!(!selection.contains(42));
    }

    #[test]
    fn test_selection_json_shape() {
        let selection = SelectionBuilder::preset("shoulders").build();
        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["body_indices"], serde_json::json!([2, 5]));
        assert_eq!(json["include_face"], serde_json::json!(true));

        let parsed: Selection = serde_json::from_str(r#"{"body_indices": [7]}"#).unwrap();
        assert_eq!(parsed, Selection::body([7]));
    }
}
