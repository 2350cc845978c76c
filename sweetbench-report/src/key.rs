//! Grouping keys
//!
//! Values extracted from records to partition them, name rows and name
//! columns. Keys are totally ordered so partitions can be sorted.

use crate::label::{Label, LabelValue};
use std::fmt;

/// A value extracted from a record by a [`KeySpec`](crate::KeySpec)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// A single attribute value
    Value(LabelValue),
    /// Several attribute values kept apart, for exact-match grouping
    Tuple(Vec<Option<Key>>),
    /// A whole label
    Label(Label),
}

impl Key {
    /// String key
    pub fn text(s: impl Into<String>) -> Self {
        Key::Value(LabelValue::Str(s.into()))
    }

    /// Compact form for headers: labels show only their values joined by `_`
    pub fn short(&self) -> String {
        match self {
            Key::Label(l) => l.short(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Value(v) => write!(f, "{v}"),
            Key::Label(l) => write!(f, "{l}"),
            Key::Tuple(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if let Some(part) = part {
                        write!(f, "{part}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::text(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::text(s)
    }
}

impl From<LabelValue> for Key {
    fn from(v: LabelValue) -> Self {
        Key::Value(v)
    }
}

impl From<Label> for Key {
    fn from(l: Label) -> Self {
        Key::Label(l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Key::text("nil").to_string(), "nil");
        assert_eq!(Key::Value(LabelValue::Int(3)).to_string(), "3");
        assert_eq!(
            Key::Tuple(vec![Some(Key::text("3.4")), None, Some(Key::text("str"))]).to_string(),
            "3.4, , str"
        );
        assert_eq!(
            Key::Label(Label::method("split")).to_string(),
            "{method: split}"
        );
    }

    #[test]
    fn test_short() {
        let label = Label::method("split").with("data", "nil");
        assert_eq!(Key::Label(label).short(), "split_nil");
        assert_eq!(Key::text("ips").short(), "ips");
    }

    #[test]
    fn test_ordering() {
        let mut keys = vec![Key::text("str"), Key::text("nil"), Key::text("empty")];
        keys.sort();
        assert_eq!(keys, vec![Key::text("empty"), Key::text("nil"), Key::text("str")]);
    }
}
