//! Option and option-group types.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A selectable, labeled value.
///
/// Extra attributes (used for grouping or display) are flattened into the
/// same JSON object, so `{"value": "d1", "label": "Dr. Ruiz", "specialty": "GP"}`
/// round-trips with `specialty` in [`attributes`](Self::attributes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Unique value within an option set.
    pub value: String,
    /// Display text.
    pub label: String,
    /// Listed but not selectable.
    #[serde(default, alias = "disable", skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    /// Cannot be removed by the user once selected.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fixed: bool,
    /// Scalar attributes keyed by name.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl SelectOption {
    /// Create an option with a value and label.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
            fixed: false,
            attributes: BTreeMap::new(),
        }
    }

    /// Mark the option as not selectable.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Mark the option as not removable.
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Attach an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// The group key for this option under `group_by`.
    ///
    /// Missing, null and empty attributes map to the default group `""`.
    pub fn group_key(&self, group_by: &str) -> String {
        match self.attributes.get(group_by) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// A named bucket of options.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionGroup {
    /// Group heading. The default group uses `""`.
    pub key: String,
    /// Options in display order.
    pub options: Vec<SelectOption>,
}

/// Partition options into groups by an attribute.
///
/// Groups appear in the order their key is first seen; options keep their
/// relative order. Without `group_by`, everything goes into one group keyed
/// `""` (present even when `options` is empty).
pub fn group_options(options: &[SelectOption], group_by: Option<&str>) -> Vec<OptionGroup> {
    let Some(group_by) = group_by else {
        return vec![OptionGroup {
            key: String::new(),
            options: options.to_vec(),
        }];
    };

    let mut groups: Vec<OptionGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for option in options {
        let key = option.group_key(group_by);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(OptionGroup {
                key,
                options: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].options.push(option.clone());
    }
    groups
}
