//! Utility structs and methods
use std::collections::HashMap;

/// A map with `String` keys that iterates in insertion order
///
/// All term- and bait-keyed data in this crate is stored in a [`TermMap`],
/// so the order of terms (and thus tie-breaking during the
/// FDR correction) is fully determined by the input data.
///
/// # Examples
///
/// ```
/// use domain_enrichment::TermMap;
///
/// let mut map = TermMap::new();
/// map.insert("dB", 2);
/// map.insert("dA", 1);
/// map.insert("dB", 3);
///
/// let keys: Vec<&str> = map.keys().collect();
/// assert_eq!(keys, vec!["dB", "dA"]);
/// assert_eq!(map.get("dB"), Some(&3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TermMap<V> {
    positions: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V> Default for TermMap<V> {
    fn default() -> Self {
        Self {
            positions: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<V> TermMap<V> {
    /// Constructs a new, empty [`TermMap`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty [`TermMap`] with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: HashMap::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map contains no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the map contains the key
    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Returns a reference to the value of `key`
    pub fn get(&self, key: &str) -> Option<&V> {
        self.positions.get(key).map(|idx| &self.entries[*idx].1)
    }

    /// Returns a mutable reference to the value of `key`
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        match self.positions.get(key) {
            Some(idx) => Some(&mut self.entries[*idx].1),
            None => None,
        }
    }

    /// Returns the key-value pair at position `idx` (insertion order)
    pub fn get_index(&self, idx: usize) -> Option<(&str, &V)> {
        self.entries.get(idx).map(|(k, v)| (k.as_str(), v))
    }

    /// Inserts a value
    ///
    /// If the key is already present, the value is replaced but the key keeps
    /// its original position and the old value is returned.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: V) -> Option<V> {
        let key = key.into();
        if let Some(idx) = self.positions.get(&key) {
            return Some(std::mem::replace(&mut self.entries[*idx].1, value));
        }
        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Returns a mutable reference to the value of `key`,
    /// inserting `default()` at the end if the key is missing
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: &str, default: F) -> &mut V {
        let idx = if let Some(idx) = self.positions.get(key) {
            *idx
        } else {
            let idx = self.entries.len();
            let key = key.to_string();
            self.positions.insert(key.clone(), idx);
            self.entries.push((key, default()));
            idx
        };
        &mut self.entries[idx].1
    }

    /// Returns an iterator of all key-value pairs in insertion order
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Returns an iterator of all keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns an iterator of all values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

/// Iterator of key-value pairs of a [`TermMap`]
pub struct Iter<'a, V> {
    inner: std::slice::Iter<'a, (String, V)>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a TermMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V> IntoIterator for TermMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for TermMap<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = TermMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
