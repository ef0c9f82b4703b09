//! Option model
//!
//! An option is identified by its value alone. Two options with the same
//! label but different values are distinct; two options with the same value
//! are the same option even if their labels differ.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// The identity of an option: text or a number
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Text(String),
    Number(f64),
}

impl OptionValue {
    /// Canonical bits for a number, so that `0.0 == -0.0` and NaN == NaN
    fn number_bits(n: f64) -> u64 {
        if n == 0.0 {
            0
        } else if n.is_nan() {
            f64::NAN.to_bits()
        } else {
            n.to_bits()
        }
    }
}

impl PartialEq for OptionValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => Self::number_bits(*a) == Self::number_bits(*b),
            _ => false,
        }
    }
}

impl Eq for OptionValue {}

impl Hash for OptionValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Text(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            Self::Number(n) => {
                1u8.hash(state);
                Self::number_bits(*n).hash(state);
            }
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for OptionValue {
    fn from(n: i32) -> Self {
        Self::Number(n as f64)
    }
}

/// Opaque reference to an icon asset (a path or URL owned by the host)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconRef(pub String);

impl IconRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A selectable entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectOption {
    /// Text shown in the list and on chips; used for filtering
    pub label: String,
    /// Identity of the option
    pub value: OptionValue,
    /// Optional icon shown next to the label in the list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconRef>,
}

impl SelectOption {
    /// Create a new option with label and value
    pub fn new(label: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            icon: None,
        }
    }

    /// Create an option whose value is its own label
    pub fn free_text(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            value: OptionValue::Text(label.clone()),
            label,
            icon: None,
        }
    }

    /// Attach an icon
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(IconRef::new(icon));
        self
    }

    /// Whether two options share an identity
    pub fn same_value(&self, other: &SelectOption) -> bool {
        self.value == other.value
    }
}

/// Options compare by value only
impl PartialEq for SelectOption {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for SelectOption {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_by_value() {
        let a = SelectOption::new("Art", "art");
        let b = SelectOption::new("Fine Art", "art");
        let c = SelectOption::new("Art", "painting");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.same_value(&b));
    }

    #[test]
    fn test_text_and_number_values_differ() {
        assert_ne!(OptionValue::from("1"), OptionValue::from(1));
        assert_eq!(OptionValue::from(1), OptionValue::from(1.0));
        assert_eq!(OptionValue::Number(0.0), OptionValue::Number(-0.0));
    }

    #[test]
    fn test_free_text_uses_label_as_value() {
        let opt = SelectOption::free_text("Music");
        assert_eq!(opt.label, "Music");
        assert_eq!(opt.value, OptionValue::from("Music"));
        assert!(opt.icon.is_none());
    }

    #[test]
    fn test_deserialize_untagged_values() {
        let opts: Vec<SelectOption> = serde_json::from_str(
            r#"[
                {"label": "Education", "value": "education", "icon": "assets/education.png"},
                {"label": "Three", "value": 3}
            ]"#,
        )
        .unwrap();

        assert_eq!(opts[0].value, OptionValue::from("education"));
        assert_eq!(opts[0].icon.as_ref().map(IconRef::as_str), Some("assets/education.png"));
        assert_eq!(opts[1].value, OptionValue::from(3));
        assert_eq!(opts[1].value.to_string(), "3");
    }
}
