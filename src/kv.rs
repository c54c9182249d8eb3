// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Key-value pairs in a log record.

use std::borrow::Cow;
use std::fmt;
use std::slice;

use crate::Error;

/// Represents a value in a key-value pair.
///
/// A value is either a string or an opaque scalar. Layouts tell them apart with
/// [`Value::to_borrowed_str`], which only succeeds for strings.
pub type Value<'a> = value_bag::ValueBag<'a>;

/// Represents a key in a key-value pair.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Key<'a>(Cow<'a, str>);

impl<'a> Key<'a> {
    /// Create a key borrowed for `'a`.
    pub const fn new(key: &'a str) -> Self {
        Key(Cow::Borrowed(key))
    }

    /// Create a key from an owned string.
    pub fn new_owned(key: impl Into<String>) -> Self {
        Key(Cow::Owned(key.into()))
    }

    /// Gets the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(key: &'a str) -> Self {
        Key::new(key)
    }
}

impl From<String> for Key<'_> {
    fn from(key: String) -> Self {
        Key::new_owned(key)
    }
}

impl fmt::Debug for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

/// A visitor to walk through key-value pairs.
pub trait Visitor {
    /// Visit a key-value pair.
    fn visit(&mut self, key: Key<'_>, value: Value<'_>) -> Result<(), Error>;
}

/// An ordered collection of key-value pairs.
///
/// Keys are not deduplicated; pairs are visited in insertion order.
#[derive(Clone, Debug, Default)]
pub struct KeyValues<'a>(KeyValuesState<'a>);

#[derive(Clone, Debug, Default)]
enum KeyValuesState<'a> {
    #[default]
    Empty,
    Borrowed(&'a [(Key<'a>, Value<'a>)]),
    Owned(Vec<(Key<'a>, Value<'a>)>),
}

impl<'a> KeyValues<'a> {
    fn as_slice(&self) -> &[(Key<'a>, Value<'a>)] {
        match &self.0 {
            KeyValuesState::Empty => &[],
            KeyValuesState::Borrowed(kvs) => kvs,
            KeyValuesState::Owned(kvs) => kvs.as_slice(),
        }
    }

    /// Get the number of key-value pairs.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Check if there are no key-value pairs.
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Get an iterator over the key-value pairs.
    pub fn iter(&self) -> KeyValuesIter<'_, 'a> {
        KeyValuesIter(self.as_slice().iter())
    }

    /// Get the value of the first pair with the given key.
    pub fn get(&self, key: &str) -> Option<Value<'_>> {
        self.iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.by_ref())
    }

    /// Visit the key-value pairs in order, stopping at the first error.
    pub fn visit(&self, visitor: &mut dyn Visitor) -> Result<(), Error> {
        for (k, v) in self.iter() {
            visitor.visit(k.clone(), v.by_ref())?;
        }
        Ok(())
    }
}

impl<'a> From<&'a [(Key<'a>, Value<'a>)]> for KeyValues<'a> {
    fn from(kvs: &'a [(Key<'a>, Value<'a>)]) -> Self {
        KeyValues(KeyValuesState::Borrowed(kvs))
    }
}

impl<'a> From<Vec<(Key<'a>, Value<'a>)>> for KeyValues<'a> {
    fn from(kvs: Vec<(Key<'a>, Value<'a>)>) -> Self {
        KeyValues(KeyValuesState::Owned(kvs))
    }
}

impl<'a, const N: usize> From<[(&'a str, Value<'a>); N]> for KeyValues<'a> {
    fn from(kvs: [(&'a str, Value<'a>); N]) -> Self {
        kvs.into_iter()
            .map(|(k, v)| (Key::new(k), v))
            .collect::<Vec<_>>()
            .into()
    }
}

/// An iterator over the key-value pairs of [`KeyValues`].
#[derive(Debug)]
pub struct KeyValuesIter<'b, 'a>(slice::Iter<'b, (Key<'a>, Value<'a>)>);

impl<'b, 'a> Iterator for KeyValuesIter<'b, 'a> {
    type Item = (&'b Key<'a>, &'b Value<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let kvs = KeyValues::from([
            ("zebra", Value::from("stripes")),
            ("animal", Value::from("walrus")),
            ("count", Value::from(3u64)),
        ]);

        let keys = kvs.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, ["zebra", "animal", "count"]);
        assert_eq!(kvs.len(), 3);
    }

    #[test]
    fn string_capability() {
        let kvs = KeyValues::from([("s", Value::from("text")), ("n", Value::from(42i64))]);

        assert_eq!(kvs.get("s").unwrap().to_borrowed_str(), Some("text"));
        assert_eq!(kvs.get("n").unwrap().to_borrowed_str(), None);
        assert_eq!(kvs.get("n").unwrap().to_string(), "42");
        assert!(kvs.get("missing").is_none());
    }

    #[test]
    fn borrowed_pairs() {
        let pairs = [(Key::new("a"), Value::from(1u64)), (Key::new("b"), Value::from(true))];
        let kvs = KeyValues::from(&pairs[..]);
        let rendered = kvs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>();
        assert_eq!(rendered, ["a=1", "b=true"]);
    }

    struct Collect {
        pairs: Vec<String>,
        stop_at: Option<&'static str>,
    }

    impl Visitor for Collect {
        fn visit(&mut self, key: Key<'_>, value: Value<'_>) -> Result<(), Error> {
            if self.stop_at == Some(key.as_str()) {
                return Err(Error::new("stop").with_context("key", key));
            }
            self.pairs.push(format!("{key}={value}"));
            Ok(())
        }
    }

    #[test]
    fn visit_in_order() {
        let kvs = KeyValues::from([("a", Value::from(1u64)), ("b", Value::from("x"))]);
        let mut collect = Collect {
            pairs: vec![],
            stop_at: None,
        };
        kvs.visit(&mut collect).unwrap();
        assert_eq!(collect.pairs, ["a=1", "b=x"]);
    }

    #[test]
    fn visit_stops_at_first_error() {
        let kvs = KeyValues::from([
            ("a", Value::from(1u64)),
            ("b", Value::from(2u64)),
            ("c", Value::from(3u64)),
        ]);
        let mut collect = Collect {
            pairs: vec![],
            stop_at: Some("b"),
        };
        let err = kvs.visit(&mut collect).unwrap_err();
        assert_eq!(err.to_string(), "stop, context: { key: b }");
        assert_eq!(collect.pairs, ["a=1"]);
    }
}
