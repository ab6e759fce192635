use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use vc_utils::hash::{FixedHashState, HashMap};

// -----------------------------------------------------------------------------
// OrderedMap

/// String-keyed map that remembers insertion order.
///
/// Replacing the value of an existing key keeps its position. Equality
/// ignores order: two maps are equal when they hold the same keys with
/// equal values.
///
/// Entries live in a `Vec`, with a hash index from key to position.
/// Lookups and appends are constant time. Removing a key or inserting one
/// in first position shifts the later entries and their indices.
///
/// # Examples
///
/// ```
/// use vc_mapper::document::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.insert("b", 1);
/// map.insert("a", 2);
/// map.insert("b", 3);
///
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["b", "a"]);
/// assert_eq!(map.get("b"), Some(&3));
/// ```
#[derive(Clone)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    indices: HashMap<String, usize>,
}

impl<V> OrderedMap<V> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            indices: HashMap::with_hasher(FixedHashState),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            indices: HashMap::with_capacity_and_hasher(capacity, FixedHashState),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn position(&self, key: &str) -> Option<usize> {
        self.indices.get(key).copied()
    }

    /// Rebuilds the indices of every entry from `start` on.
    fn reindex_from(&mut self, start: usize) {
        for (index, (key, _)) in self.entries.iter().enumerate().skip(start) {
            if let Some(slot) = self.indices.get_mut(key.as_str()) {
                *slot = index;
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.position(key).map(|index| &self.entries[index].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.position(key)?;
        Some(&mut self.entries[index].1)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.indices.contains_key(key)
    }

    /// Inserts a value, returning the previous one.
    ///
    /// A new key goes to the end. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.position(&key) {
            Some(index) => Some(core::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.indices.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Inserts a value in first position, moving the key there if it exists.
    pub fn insert_first(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let old = self.remove(&key);
        self.indices.insert(key.clone(), 0);
        self.entries.insert(0, (key, value));
        self.reindex_from(1);
        old
    }

    /// Removes a key, shifting later entries forward.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.indices.remove(key)?;
        let (_, value) = self.entries.remove(index);
        self.reindex_from(index);
        Some(value)
    }

    /// Removes every key for which `keep` returns `false`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &mut V) -> bool) {
        let len = self.entries.len();
        self.entries.retain_mut(|(k, v)| keep(k, v));
        if self.entries.len() != len {
            self.indices.clear();
            for (index, (key, _)) in self.entries.iter().enumerate() {
                self.indices.insert(key.clone(), index);
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut V)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// The first entry, if any.
    pub fn first(&self) -> Option<(&str, &V)> {
        self.entries.first().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> Default for OrderedMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq> PartialEq for OrderedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| v == value))
    }
}

impl<V: fmt::Debug> fmt::Debug for OrderedMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for OrderedMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = alloc::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

fn entry_ref<V>(entry: &(String, V)) -> (&str, &V) {
    (entry.0.as_str(), &entry.1)
}

type EntryRef<'a, V> = fn(&'a (String, V)) -> (&'a str, &'a V);

impl<'a, V> IntoIterator for &'a OrderedMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = core::iter::Map<core::slice::Iter<'a, (String, V)>, EntryRef<'a, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().map(entry_ref as EntryRef<'a, V>)
    }
}

#[cfg(test)]
mod tests {
    use super::OrderedMap;

    #[test]
    fn replace_keeps_position() {
        let mut map: OrderedMap<i32> = [("x", 1), ("y", 2), ("z", 3)].into_iter().collect();
        assert_eq!(map.insert("y", 20), Some(2));
        assert_eq!(map.iter().collect::<Vec<_>>(), [("x", &1), ("y", &20), ("z", &3)]);
    }

    #[test]
    fn insert_first_moves_key() {
        let mut map: OrderedMap<i32> = [("x", 1), ("tag", 2)].into_iter().collect();
        assert_eq!(map.insert_first("tag", 9), Some(2));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["tag", "x"]);
    }

    #[test]
    fn equality_ignores_order() {
        let a: OrderedMap<i32> = [("x", 1), ("y", 2)].into_iter().collect();
        let b: OrderedMap<i32> = [("y", 2), ("x", 1)].into_iter().collect();
        let c: OrderedMap<i32> = [("y", 2), ("x", 5)].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn remove_shifts() {
        let mut map: OrderedMap<i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(map.remove("b"), Some(2));
        assert_eq!(map.remove("b"), None);
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "c"]);
        assert_eq!(map.get("c"), Some(&3));
    }

    #[test]
    fn wide_map_keeps_order_and_lookups() {
        let mut map = OrderedMap::new();
        for i in 0..20_000 {
            map.insert(format!("k{i}"), i);
        }
        assert_eq!(map.len(), 20_000);
        assert_eq!(map.get("k12345"), Some(&12345));
        assert_eq!(map.first(), Some(("k0", &0)));

        assert_eq!(map.remove("k0"), Some(0));
        map.insert_first("head", -1);
        map.retain(|_, v| *v % 2 != 0);

        assert_eq!(map.keys().take(3).collect::<Vec<_>>(), ["head", "k1", "k3"]);
        assert_eq!(map.get("k19999"), Some(&19999));
        assert_eq!(map.get("k2"), None);
        assert!(map.contains_key("k9999"));
        assert_eq!(map.len(), 10_001);
    }
}
