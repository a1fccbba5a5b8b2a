use alloc::string::String;
use alloc::vec::{self, Vec};
use core::{fmt, mem, slice};

use docmap_utils::hash::{HashTable, hash_one};

use crate::Value;

// -----------------------------------------------------------------------------
// Document

/// An insertion ordered mapping from string keys to [`Value`]s.
///
/// Keys are unique. Inserting an existing key replaces its value in place,
/// keeping the original position. Iteration always follows insertion order,
/// while equality ignores order, so two documents holding the same entries
/// compare equal regardless of how they were built.
///
/// # Examples
///
/// ```
/// use docmap_value::{Document, Value};
///
/// let mut doc = Document::new();
/// doc.insert("b", 2);
/// doc.insert("a", 1);
/// assert_eq!(doc.insert("b", 3), Some(Value::Integer(2)));
///
/// assert_eq!(doc.keys().collect::<Vec<_>>(), ["b", "a"]);
/// assert_eq!(doc.index_of("a"), Some(1));
/// ```
#[derive(Clone, Default)]
pub struct Document {
    entries: Vec<(String, Value)>,
    // Positions into `entries`, hashed by key.
    indices: HashTable<usize>,
}

#[inline]
fn hash_key(key: &str) -> u64 {
    hash_one(key)
}

impl Document {
    /// Creates an empty `Document`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty `Document` with room for `capacity` entries.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            indices: HashTable::with_capacity(capacity),
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the insertion position of `key`, if present.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        let entries = &self.entries;
        self.indices
            .find(hash_key(key), |&index| entries[index].0 == key)
            .copied()
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    /// Returns the value stored under `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        let index = self.index_of(key)?;
        Some(&self.entries[index].1)
    }

    /// Returns a mutable reference to the value stored under `key`.
    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        let index = self.index_of(key)?;
        Some(&mut self.entries[index].1)
    }

    /// Returns the entry at insertion position `index`.
    #[inline]
    pub fn get_index(&self, index: usize) -> Option<(&str, &Value)> {
        self.entries.get(index).map(|(k, v)| (k.as_str(), v))
    }

    /// Inserts a key-value pair.
    ///
    /// If the key already exists its value is replaced in place and the old
    /// value is returned. Otherwise the entry is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key: String = key.into();
        let value: Value = value.into();

        if let Some(index) = self.index_of(&key) {
            return Some(mem::replace(&mut self.entries[index].1, value));
        }

        let hash = hash_key(&key);
        let Self { entries, indices } = self;
        entries.push((key, value));
        let index = entries.len() - 1;
        indices.insert_unique(hash, index, |&i| hash_key(&entries[i].0));
        None
    }

    /// Removes `key`, returning its value.
    ///
    /// Later entries shift down by one position, preserving their order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let Self { entries, indices } = self;

        let index = match indices.find_entry(hash_key(key), |&i| entries[i].0 == key) {
            Ok(entry) => entry.remove().0,
            Err(_) => return None,
        };

        let (_, value) = entries.remove(index);
        for slot in indices.iter_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Removes every entry, keeping the allocated memory.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.indices.clear();
    }

    /// Iterates entries in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.entries.iter())
    }

    /// Iterates keys in insertion order.
    #[inline]
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates values in insertion order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

// -----------------------------------------------------------------------------
// Iter

/// Borrowing iterator over the entries of a [`Document`], in insertion order.
#[derive(Clone)]
pub struct Iter<'a>(slice::Iter<'a, (String, Value)>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl DoubleEndedIterator for Iter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = vec::IntoIter<(String, Value)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Document {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut doc = Self::with_capacity(iter.size_hint().0);
        doc.extend(iter);
        doc
    }
}

// -----------------------------------------------------------------------------
// Traits

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| v == value))
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Macro

/// Builds a [`Document`] from `key => value` pairs.
///
/// Values go through [`Into<Value>`](crate::Value), nested documents are
/// written with a nested `document!`.
///
/// # Examples
///
/// ```
/// use docmap_value::document;
///
/// let note = document! { "message" => "Nice Address" };
/// let house = document! {
///     "address" => "Crystal Road 1234",
///     "note" => note,
///     "tags" => vec!["a", "b"],
/// };
/// assert_eq!(house.len(), 3);
/// ```
#[macro_export]
macro_rules! document {
    () => {
        $crate::Document::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut doc = $crate::Document::new();
        $( doc.insert($key, $value); )+
        doc
    }};
}
