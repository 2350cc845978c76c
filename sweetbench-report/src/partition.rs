//! Partitioner
//!
//! One generic grouping routine shared by baseline partitioning (grouping
//! label/statistics entries before ranking) and display pivoting (grouping
//! comparisons into tables and rows).
//!
//! ## Key specifications
//!
//! | spec                               | key                                   |
//! |------------------------------------|---------------------------------------|
//! | `None`                             | one partition holding every item      |
//! | `KeySpec::Field("data")`           | the record's `data` field             |
//! | `KeySpec::Fields { join: Some }`   | field strings joined (`"3.4_nil"`)    |
//! | `KeySpec::Fields { join: None }`   | uncombined tuple of field values      |
//! | `KeySpec::Function(f)`             | whatever `f` returns                  |
//!
//! Items whose key is absent are dropped, not grouped under a null key.

use crate::key::Key;
use fxhash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Named field access, so records can be grouped by attribute name
pub trait Record {
    /// Value of the named field, or `None` when the record lacks it
    fn field(&self, name: &str) -> Option<Key>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<Key> {
        (**self).field(name)
    }
}

/// Key extraction closure
pub type KeyFn<T> = Arc<dyn Fn(&T) -> Option<Key> + Send + Sync>;

/// How to extract a grouping key from a record
pub enum KeySpec<T: ?Sized> {
    /// A single named field
    Field(String),
    /// Several named fields, joined into one string or kept as a tuple
    Fields {
        /// Field names in key order
        names: Vec<String>,
        /// Separator; `None` keeps the values apart as [`Key::Tuple`]
        join: Option<String>,
    },
    /// Arbitrary extraction function
    Function(KeyFn<T>),
}

/// Separator used when several fields form one key
pub const DEFAULT_JOIN: &str = "_";

impl<T: ?Sized> KeySpec<T> {
    /// Group by one field
    pub fn field(name: impl Into<String>) -> Self {
        KeySpec::Field(name.into())
    }

    /// Group by several fields joined with `_`
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeySpec::Fields {
            names: names.into_iter().map(Into::into).collect(),
            join: Some(DEFAULT_JOIN.to_string()),
        }
    }

    /// Group by the exact tuple of several fields
    pub fn tuple<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeySpec::Fields {
            names: names.into_iter().map(Into::into).collect(),
            join: None,
        }
    }

    /// Group by an arbitrary function
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&T) -> Option<Key> + Send + Sync + 'static,
    {
        KeySpec::Function(Arc::new(f))
    }

    /// Group by a list of field names: one name is a plain field, more are joined.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Option<Self> {
        match names {
            [] => None,
            [name] => Some(KeySpec::field(name.as_ref())),
            _ => Some(KeySpec::fields(names.iter().map(|n| n.as_ref().to_string()))),
        }
    }

    /// Name shown above tables grouped by this spec
    pub fn header_name(&self) -> String {
        match self {
            KeySpec::Field(name) => name.clone(),
            KeySpec::Fields { names, .. } => names.join(DEFAULT_JOIN),
            KeySpec::Function(_) => "grouping".to_string(),
        }
    }

    /// The single field name, if this spec is one
    pub fn field_name(&self) -> Option<&str> {
        match self {
            KeySpec::Field(name) => Some(name),
            _ => None,
        }
    }
}

impl<T: Record + ?Sized> KeySpec<T> {
    /// Resolve the spec into a uniform extraction closure
    pub fn extractor(&self) -> Box<dyn Fn(&T) -> Option<Key> + '_> {
        match self {
            KeySpec::Field(name) => Box::new(move |item: &T| item.field(name)),
            KeySpec::Fields {
                names,
                join: Some(sep),
            } => Box::new(move |item: &T| {
                let joined = names
                    .iter()
                    .map(|n| item.field(n).map(|k| k.to_string()).unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join(sep);
                Some(Key::text(joined))
            }),
            KeySpec::Fields { names, join: None } => Box::new(move |item: &T| {
                Some(Key::Tuple(names.iter().map(|n| item.field(n)).collect()))
            }),
            KeySpec::Function(f) => Box::new(move |item: &T| f(item)),
        }
    }

    /// Extract the key of a single record
    pub fn key_of(&self, item: &T) -> Option<Key> {
        (self.extractor())(item)
    }
}

impl<T: ?Sized> Clone for KeySpec<T> {
    fn clone(&self) -> Self {
        match self {
            KeySpec::Field(name) => KeySpec::Field(name.clone()),
            KeySpec::Fields { names, join } => KeySpec::Fields {
                names: names.clone(),
                join: join.clone(),
            },
            KeySpec::Function(f) => KeySpec::Function(Arc::clone(f)),
        }
    }
}

impl<T: ?Sized> fmt::Debug for KeySpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySpec::Field(name) => f.debug_tuple("Field").field(name).finish(),
            KeySpec::Fields { names, join } => f
                .debug_struct("Fields")
                .field("names", names)
                .field("join", join)
                .finish(),
            KeySpec::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Items sharing one key value
#[derive(Debug, Clone)]
pub struct Partition<T> {
    /// Shared key, `None` only when no grouping was requested
    pub key: Option<Key>,
    /// Members in input order
    pub items: Vec<T>,
}

/// Partition `items` by `spec`.
///
/// Without a spec a single partition (with no key) holds every item.
/// Otherwise items with an absent key are dropped, and partitions come in
/// first-appearance order, or ascending key order when `sort` is set.
pub fn group<'a, T, I>(items: I, spec: Option<&KeySpec<T>>, sort: bool) -> Vec<Partition<&'a T>>
where
    T: Record + ?Sized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let Some(spec) = spec else {
        return vec![Partition {
            key: None,
            items: items.into_iter().collect(),
        }];
    };

    let extract = spec.extractor();
    let mut index: FxHashMap<Key, usize> = FxHashMap::default();
    let mut partitions: Vec<Partition<&'a T>> = Vec::new();

    for item in items {
        let Some(key) = extract(item) else {
            continue;
        };
        match index.get(&key) {
            Some(&idx) => partitions[idx].items.push(item),
            None => {
                index.insert(key.clone(), partitions.len());
                partitions.push(Partition {
                    key: Some(key),
                    items: vec![item],
                });
            }
        }
    }

    if sort {
        partitions.sort_by(|a, b| a.key.cmp(&b.key));
    }

    partitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{Label, LabelValue};

    struct Row(Label);

    impl Record for Row {
        fn field(&self, name: &str) -> Option<Key> {
            self.0.get(name).cloned().map(Key::Value)
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row(Label::method("a").with("data", "str").with("version", "3.4")),
            Row(Label::method("b").with("data", "nil").with("version", "3.4")),
            Row(Label::method("c").with("data", "str").with("version", "3.3")),
            Row(Label::method("d")),
        ]
    }

    fn methods(p: &Partition<&Row>) -> Vec<String> {
        p.items
            .iter()
            .map(|r| r.0.get("method").unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_no_spec_single_partition() {
        let rows = rows();
        let parts = group(&rows, None, false);
        assert_eq!(parts.len(), 1);
        assert!(parts[0].key.is_none());
        assert_eq!(parts[0].items.len(), 4);
    }

    #[test]
    fn test_field_first_appearance_order() {
        let rows = rows();
        let spec = KeySpec::field("data");
        let parts = group(&rows, Some(&spec), false);

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].key, Some(Key::text("str")));
        assert_eq!(methods(&parts[0]), vec!["a", "c"]);
        assert_eq!(parts[1].key, Some(Key::text("nil")));
        assert_eq!(methods(&parts[1]), vec!["b"]);
    }

    #[test]
    fn test_sorted_by_key() {
        let rows = rows();
        let spec = KeySpec::field("data");
        let parts = group(&rows, Some(&spec), true);
        assert_eq!(parts[0].key, Some(Key::text("nil")));
        assert_eq!(parts[1].key, Some(Key::text("str")));
    }

    #[test]
    fn test_absent_keys_are_dropped() {
        let rows = rows();
        let spec = KeySpec::field("data");
        let parts = group(&rows, Some(&spec), false);
        let grouped: usize = parts.iter().map(|p| p.items.len()).sum();
        // "d" has no data attribute
        assert_eq!(grouped, 3);
    }

    #[test]
    fn test_joined_fields() {
        let rows = rows();
        let spec = KeySpec::fields(["version", "data"]);
        let parts = group(&rows, Some(&spec), true);

        let keys: Vec<String> = parts
            .iter()
            .map(|p| p.key.as_ref().unwrap().to_string())
            .collect();
        // missing fields join as empty strings, so "d" is kept
        assert_eq!(keys, vec!["3.3_str", "3.4_nil", "3.4_str", "_"]);
    }

    #[test]
    fn test_tuple_fields() {
        let rows = rows();
        let spec = KeySpec::tuple(["version", "data"]);
        let parts = group(&rows, Some(&spec), false);

        assert_eq!(parts.len(), 4);
        assert_eq!(
            parts[0].key,
            Some(Key::Tuple(vec![
                Some(Key::Value(LabelValue::from("3.4"))),
                Some(Key::Value(LabelValue::from("str"))),
            ]))
        );
        assert_eq!(parts[3].key, Some(Key::Tuple(vec![None, None])));
    }

    #[test]
    fn test_function_spec() {
        let rows = rows();
        let spec: KeySpec<Row> = KeySpec::function(|r: &Row| {
            r.0.get("version")
                .filter(|v| v.as_str() == Some("3.4"))
                .map(|_| Key::text("current"))
        });
        let parts = group(&rows, Some(&spec), false);
        assert_eq!(parts.len(), 1);
        assert_eq!(methods(&parts[0]), vec!["a", "b"]);
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let rows = rows();
        let spec = KeySpec::field("version");
        let parts = group(&rows, Some(&spec), false);

        let mut seen: Vec<String> = parts.iter().flat_map(methods).collect();
        seen.sort();
        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_from_names() {
        assert!(KeySpec::<Row>::from_names::<&str>(&[]).is_none());
        let one = KeySpec::<Row>::from_names(&["data"]).unwrap();
        assert_eq!(one.field_name(), Some("data"));
        let two = KeySpec::<Row>::from_names(&["metric", "version"]).unwrap();
        assert_eq!(two.header_name(), "metric_version");
    }
}
