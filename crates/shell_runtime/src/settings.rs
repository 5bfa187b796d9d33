//! Hierarchical settings values, dot-path addressing, and the defaults/overrides deep merge.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A nested settings level, keyed by segment name.
pub type SettingsTree = BTreeMap<String, SettingsValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// Leaf value stored in a [`SettingsTree`].
pub enum Scalar {
    /// Boolean toggle.
    Bool(bool),
    /// Integer or floating point number.
    Number(Number),
    /// Free-form text.
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// Any value addressable by a settings path.
///
/// Serializes as plain JSON. `null` has no representation and fails deserialization.
pub enum SettingsValue {
    /// Leaf value.
    Scalar(Scalar),
    /// Ordered list, always replaced wholesale by the merge.
    List(Vec<SettingsValue>),
    /// Nested level.
    Tree(SettingsTree),
}

impl SettingsValue {
    /// Builds a number value, or `None` for NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        Number::from_f64(value).map(|n| Self::Scalar(Scalar::Number(n)))
    }

    /// Returns the boolean payload.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    /// Returns the number payload when it fits an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(Scalar::Number(value)) => value.as_i64(),
            _ => None,
        }
    }

    /// Returns the number payload as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Scalar(Scalar::Number(value)) => value.as_f64(),
            _ => None,
        }
    }

    /// Returns the text payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the nested level.
    pub fn as_tree(&self) -> Option<&SettingsTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Returns whether this value is a nested level.
    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree(_))
    }
}

impl From<bool> for SettingsValue {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for SettingsValue {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Number(Number::from(value)))
    }
}

impl From<i32> for SettingsValue {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl From<&str> for SettingsValue {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::Text(value.to_string()))
    }
}

impl From<String> for SettingsValue {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::Text(value))
    }
}

impl From<Vec<SettingsValue>> for SettingsValue {
    fn from(values: Vec<SettingsValue>) -> Self {
        Self::List(values)
    }
}

impl From<SettingsTree> for SettingsValue {
    fn from(tree: SettingsTree) -> Self {
        Self::Tree(tree)
    }
}

/// Splits a dot-separated path into segments.
///
/// Returns `None` for the empty path and for paths with empty segments (`a..b`, `a.`).
pub fn split_path(path: &str) -> Option<Vec<&str>> {
    let segments = path.split('.').collect::<Vec<_>>();
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    Some(segments)
}

/// Walks `tree` along `segments`. Any missing segment, or a non-tree in the middle, yields `None`.
pub fn lookup<'a>(tree: &'a SettingsTree, segments: &[&str]) -> Option<&'a SettingsValue> {
    let (leaf, parents) = segments.split_last()?;
    let mut current = tree;
    for segment in parents {
        current = current.get(*segment)?.as_tree()?;
    }
    current.get(*leaf)
}

/// Stores `value` at `segments`, creating intermediate levels and replacing any non-tree value
/// that sits where a level is needed.
pub fn assign(tree: &mut SettingsTree, segments: &[&str], value: SettingsValue) {
    let Some((leaf, parents)) = segments.split_last() else {
        return;
    };
    let mut current = tree;
    for segment in parents {
        let slot = current
            .entry((*segment).to_string())
            .or_insert_with(|| SettingsValue::Tree(SettingsTree::new()));
        if !slot.is_tree() {
            *slot = SettingsValue::Tree(SettingsTree::new());
        }
        let SettingsValue::Tree(next) = slot else {
            return;
        };
        current = next;
    }
    current.insert((*leaf).to_string(), value);
}

/// Removes the value at `segments` and prunes intermediate levels left empty.
///
/// Returns whether anything was removed.
pub fn remove(tree: &mut SettingsTree, segments: &[&str]) -> bool {
    match segments {
        [] => false,
        [leaf] => tree.remove(*leaf).is_some(),
        [head, rest @ ..] => {
            let Some(SettingsValue::Tree(child)) = tree.get_mut(*head) else {
                return false;
            };
            let removed = remove(child, rest);
            if removed && child.is_empty() {
                tree.remove(*head);
            }
            removed
        }
    }
}

/// Deep-merges `overrides` onto `defaults`.
///
/// Levels present on both sides merge recursively. Anything else on the override side (scalars,
/// lists, a scalar replacing a level or the reverse) wins outright. Default-only keys pass through
/// and override-only keys are kept.
pub fn merge_trees(defaults: &SettingsTree, overrides: &SettingsTree) -> SettingsTree {
    let mut merged = defaults.clone();
    for (key, value) in overrides {
        let next = match (defaults.get(key), value) {
            (Some(SettingsValue::Tree(base)), SettingsValue::Tree(patch)) => {
                SettingsValue::Tree(merge_trees(base, patch))
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}

/// Collects `(key, value)` pairs into a tree.
pub fn tree_of<const N: usize>(entries: [(&str, SettingsValue); N]) -> SettingsTree {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Collects `(key, value)` pairs into a nested level value.
pub fn section<const N: usize>(entries: [(&str, SettingsValue); N]) -> SettingsValue {
    SettingsValue::Tree(tree_of(entries))
}
