use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::keyword::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Int(i64),
    Name(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{}", i),
            Key::Name(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Name(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Name(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
    Coords([f64; 3]),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    List(Vec<Value>),
    Map(Map),
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::Text(s.to_owned()))
    }
}

impl From<[f64; 3]> for Value {
    fn from(c: [f64; 3]) -> Self {
        Value::Scalar(Scalar::Coords(c))
    }
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(Scalar::Int(_)) => "integer",
            Value::Scalar(Scalar::Float(_)) => "float",
            Value::Scalar(Scalar::Text(_)) => "text",
            Value::Scalar(Scalar::Coords(_)) => "coordinates",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn as_map(&self, path: &str) -> Result<&Map> {
        match self {
            Value::Map(m) => Ok(m),
            _ => Err(self.unexpected(path, "map")),
        }
    }

    pub fn as_list(&self, path: &str) -> Result<&[Value]> {
        match self {
            Value::List(l) => Ok(l),
            _ => Err(self.unexpected(path, "list")),
        }
    }

    pub fn as_int(&self, path: &str) -> Result<i64> {
        match self {
            Value::Scalar(Scalar::Int(i)) => Ok(*i),
            _ => Err(self.unexpected(path, "integer")),
        }
    }

    pub fn as_float(&self, path: &str) -> Result<f64> {
        match self {
            Value::Scalar(Scalar::Float(f)) => Ok(*f),
            _ => Err(self.unexpected(path, "float")),
        }
    }

    pub fn as_text(&self, path: &str) -> Result<&str> {
        match self {
            Value::Scalar(Scalar::Text(s)) => Ok(s),
            _ => Err(self.unexpected(path, "text")),
        }
    }

    pub fn as_coords(&self, path: &str) -> Result<[f64; 3]> {
        match self {
            Value::Scalar(Scalar::Coords(c)) => Ok(*c),
            _ => Err(self.unexpected(path, "coordinates")),
        }
    }

    fn unexpected(&self, path: &str, expected: &'static str) -> Error {
        trace!(path, found = self.kind(), expected, "unexpected value");
        Error::UnexpectedValue(path.to_owned(), expected)
    }
}

/// Insertion ordered map. Emission walks entries in the order the deck
/// introduced them.
#[derive(Debug, Clone, Default)]
pub struct Map {
    entries: Vec<(Key, Value)>,
    index: HashMap<Key, usize>,
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get<K: Into<Key>>(&self, key: K) -> Option<&Value> {
        self.index.get(&key.into()).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key<K: Into<Key>>(&self, key: K) -> bool {
        self.index.contains_key(&key.into())
    }

    /// Inserts or replaces a value, keeping the original position when the key
    /// already exists.
    pub fn insert<K: Into<Key>, V: Into<Value>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn remove<K: Into<Key>>(&mut self, key: K) -> Option<Value> {
        let i = self.index.remove(&key.into())?;
        let (_, value) = self.entries.remove(i);
        for v in self.index.values_mut() {
            if *v > i {
                *v -= 1;
            }
        }
        Some(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    fn get_mut(&mut self, key: &Key) -> Option<&mut Value> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Deep merges `other` into `self`.
    ///
    /// Maps merge key by key, lists concatenate (existing entries first) and
    /// equal scalars are left alone. Any other combination is a conflict
    /// reported with the dotted path of the offending key.
    pub fn merge(&mut self, other: Map) -> Result<()> {
        self.merge_at(other, &mut Vec::new())
    }

    fn merge_at(&mut self, other: Map, path: &mut Vec<String>) -> Result<()> {
        for (key, incoming) in other.entries {
            let existing = match self.get_mut(&key) {
                Some(existing) => existing,
                None => {
                    self.insert(key, incoming);
                    continue;
                }
            };
            path.push(key.to_string());
            match (existing, incoming) {
                (Value::Map(a), Value::Map(b)) => a.merge_at(b, path)?,
                (Value::List(a), Value::List(b)) => a.extend(b),
                (Value::Scalar(a), Value::Scalar(b)) if *a == b => {}
                _ => return Err(Error::Conflict(path.join("."))),
            }
            path.pop();
        }
        Ok(())
    }
}

impl IntoIterator for Map {
    type Item = (Key, Value);
    type IntoIter = std::vec::IntoIter<(Key, Value)>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::map;

    #[test]
    fn merge_disjoint_keys_keeps_order() {
        let mut model = map! { "nodes" => map! { 2i64 => [1.0, 0.0, 0.0] } };
        model
            .merge(map! { "nodes" => map! { 1i64 => [0.0, 0.0, 0.0] } })
            .unwrap();
        let nodes = model.get("nodes").unwrap().as_map("nodes").unwrap();
        let keys: Vec<_> = nodes.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec![Key::Int(2), Key::Int(1)]);
    }

    #[test]
    fn merge_equal_scalar_is_idempotent() {
        let mut model = map! { "title" => "BEAM" };
        let before = model.clone();
        model.merge(map! { "title" => "BEAM" }).unwrap();
        assert_eq!(model, before);
    }

    #[test]
    fn merge_conflict_names_dotted_path() {
        let mut model = map! { "curves" => map! { 7i64 => map! { "sfo" => 1.0 } } };
        let err = model
            .merge(map! { "curves" => map! { 7i64 => map! { "sfo" => 2.0 } } })
            .unwrap_err();
        match err {
            Error::Conflict(path) => assert_eq!(path, "curves.7.sfo"),
            e => panic!("unexpected error {}", e),
        }
    }

    #[test]
    fn merge_lists_concatenate() {
        let nodes = || Value::List(vec![Value::from(1i64), Value::from(2i64)]);
        let mut model = map! { "nodelist" => map! { 1i64 => map! { "nodes" => nodes() } } };
        model
            .merge(map! { "nodelist" => map! { 1i64 => map! { "nodes" => nodes() } } })
            .unwrap();
        let merged = model
            .get("nodelist")
            .and_then(|v| v.as_map("nodelist").ok())
            .and_then(|m| m.get(1i64))
            .and_then(|v| v.as_map("nodelist.1").ok())
            .and_then(|m| m.get("nodes"))
            .unwrap();
        assert_eq!(
            merged,
            &Value::List(vec![
                Value::from(1i64),
                Value::from(2i64),
                Value::from(1i64),
                Value::from(2i64)
            ])
        );
    }

    #[test]
    fn merge_mismatched_kinds_conflict() {
        let mut model = map! { "title" => "BEAM" };
        let err = model.merge(map! { "title" => map! {} }).unwrap_err();
        assert!(matches!(err, Error::Conflict(ref p) if p == "title"));
    }

    // Parsed decks never put an int and a float at the same path; a mixed
    // pair is treated as differing scalars rather than compared numerically.
    #[test]
    fn merge_int_and_float_are_distinct() {
        let mut model = map! { "sf" => 1i64 };
        assert!(model.merge(map! { "sf" => 1.0 }).is_err());
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut m = map! { "a" => 1i64, "b" => 2i64, "c" => 3i64 };
        assert_eq!(m.remove("a"), Some(Value::from(1i64)));
        assert_eq!(m.get("c"), Some(&Value::from(3i64)));
        assert_eq!(m.len(), 2);
    }
}
