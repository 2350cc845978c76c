//! Labels
//!
//! A label is an ordered attribute mapping identifying one tested variant,
//! e.g. `{method: to_s.split, data: nil, version: 3.2}`. Display keeps the
//! insertion order, while equality, ordering and hashing look at the
//! attributes sorted by name so labels work as lookup keys.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single label attribute value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelValue {
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    Str(String),
    /// Absent value; accepted but not JSON friendly
    Null,
}

impl LabelValue {
    fn rank(&self) -> u8 {
        match self {
            LabelValue::Null => 0,
            LabelValue::Int(_) => 1,
            LabelValue::Float(_) => 2,
            LabelValue::Str(_) => 3,
        }
    }

    /// Whether this is [`LabelValue::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, LabelValue::Null)
    }

    /// String value, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LabelValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Replace null with the empty string
    pub fn normalized(self) -> LabelValue {
        match self {
            LabelValue::Null => LabelValue::Str(String::new()),
            other => other,
        }
    }
}

impl PartialEq for LabelValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LabelValue {}

impl PartialOrd for LabelValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LabelValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (LabelValue::Int(a), LabelValue::Int(b)) => a.cmp(b),
            (LabelValue::Float(a), LabelValue::Float(b)) => a.total_cmp(b),
            (LabelValue::Str(a), LabelValue::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for LabelValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            LabelValue::Int(i) => i.hash(state),
            LabelValue::Float(f) => f.to_bits().hash(state),
            LabelValue::Str(s) => s.hash(state),
            LabelValue::Null => {}
        }
    }
}

impl fmt::Display for LabelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelValue::Int(i) => write!(f, "{i}"),
            LabelValue::Float(v) => write!(f, "{v}"),
            LabelValue::Str(s) => f.write_str(s),
            LabelValue::Null => Ok(()),
        }
    }
}

impl From<&str> for LabelValue {
    fn from(s: &str) -> Self {
        LabelValue::Str(s.to_string())
    }
}

impl From<String> for LabelValue {
    fn from(s: String) -> Self {
        LabelValue::Str(s)
    }
}

impl From<i64> for LabelValue {
    fn from(i: i64) -> Self {
        LabelValue::Int(i)
    }
}

impl From<i32> for LabelValue {
    fn from(i: i32) -> Self {
        LabelValue::Int(i64::from(i))
    }
}

impl From<f64> for LabelValue {
    fn from(f: f64) -> Self {
        LabelValue::Float(f)
    }
}

impl<T: Into<LabelValue>> From<Option<T>> for LabelValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(LabelValue::Null, Into::into)
    }
}

/// Ordered attribute mapping identifying one tested variant
#[derive(Debug, Clone, Default)]
pub struct Label {
    attrs: Vec<(String, LabelValue)>,
}

impl Label {
    /// Empty label
    pub fn new() -> Self {
        Self::default()
    }

    /// Label with a single `method` attribute
    pub fn method(name: impl Into<String>) -> Self {
        Self::new().with("method", name.into())
    }

    /// Builder-style [`Label::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<LabelValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set an attribute, keeping its original position when it already exists
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<LabelValue>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.attrs.push((key, value)),
        }
    }

    /// Remove an attribute
    pub fn remove(&mut self, key: &str) -> Option<LabelValue> {
        let idx = self.attrs.iter().position(|(k, _)| k == key)?;
        Some(self.attrs.remove(idx).1)
    }

    /// Look up an attribute
    pub fn get(&self, key: &str) -> Option<&LabelValue> {
        self.attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether the attribute is set
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Attributes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LabelValue)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Attribute names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attrs.iter().map(|(k, _)| k.as_str())
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Whether the label has no attributes
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// This label's attributes overridden by `other`'s
    pub fn merged(&self, other: &Label) -> Label {
        let mut merged = self.clone();
        for (k, v) in other.iter() {
            merged.insert(k, v.clone());
        }
        merged
    }

    /// Replace null values with empty strings
    pub fn normalized(self) -> Label {
        Label {
            attrs: self
                .attrs
                .into_iter()
                .map(|(k, v)| (k, v.normalized()))
                .collect(),
        }
    }

    /// Whether any attribute value is null
    pub fn has_null(&self) -> bool {
        self.attrs.iter().any(|(_, v)| v.is_null())
    }

    /// Attribute values joined by `_`, used for compact headers
    pub fn short(&self) -> String {
        self.attrs
            .iter()
            .map(|(_, v)| v.to_string())
            .collect::<Vec<_>>()
            .join("_")
    }

    fn sorted(&self) -> Vec<&(String, LabelValue)> {
        let mut sorted: Vec<_> = self.attrs.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        sorted
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.attrs.len() == other.attrs.len() && self.sorted() == other.sorted()
    }
}

impl Eq for Label {}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sorted().cmp(&other.sorted())
    }
}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (k, v) in self.sorted() {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.attrs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, V: Into<LabelValue>> FromIterator<(K, V)> for Label {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut label = Label::new();
        for (k, v) in iter {
            label.insert(k, v);
        }
        label
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attrs.len()))?;
        for (k, v) in &self.attrs {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelVisitor;

        impl<'de> Visitor<'de> for LabelVisitor {
            type Value = Label;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of label attributes or a method name")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Label, E> {
                Ok(Label::method(v))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Label, A::Error> {
                let mut label = Label::new();
                while let Some((k, v)) = access.next_entry::<String, LabelValue>()? {
                    label.insert(k, v);
                }
                Ok(label)
            }
        }

        deserializer.deserialize_any(LabelVisitor)
    }
}
