use core::any::TypeId;
use core::fmt::Debug;

use hashbrown::hash_map::Entry;

use crate::hash::{HashMap, NoOpHashState};

// -----------------------------------------------------------------------------
// TypeIdMap

/// A map keyed by [`TypeId`].
///
/// `TypeId` already hashes to a well mixed `u64`, so the map uses
/// [`NoOpHashState`] and never rehashes the key.
///
/// # Examples
///
/// ```
/// use vc_utils::TypeIdMap;
///
/// let mut map = TypeIdMap::new();
/// map.insert_type::<u8>("byte");
/// assert_eq!(map.get_type::<u8>(), Some(&"byte"));
/// assert!(map.get_type::<u16>().is_none());
/// ```
pub struct TypeIdMap<V>(HashMap<TypeId, V, NoOpHashState>);

impl<V> TypeIdMap<V> {
    /// Creates an empty map. Usable in `static` and `const` items.
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(NoOpHashState))
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value stored for `type_id`.
    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    /// Returns the value stored for `T`.
    #[inline(always)]
    pub fn get_type<T: ?Sized + 'static>(&self) -> Option<&V> {
        self.get(&TypeId::of::<T>())
    }

    #[inline]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.0.contains_key(type_id)
    }

    /// Inserts a value, returning the previous one.
    #[inline]
    pub fn insert(&mut self, type_id: TypeId, value: V) -> Option<V> {
        self.0.insert(type_id, value)
    }

    /// Inserts a value for `T`, returning the previous one.
    #[inline(always)]
    pub fn insert_type<T: ?Sized + 'static>(&mut self, value: V) -> Option<V> {
        self.insert(TypeId::of::<T>(), value)
    }

    /// Removes the value stored for `type_id`.
    #[inline]
    pub fn remove(&mut self, type_id: &TypeId) -> Option<V> {
        self.0.remove(type_id)
    }

    /// Returns the stored value, or stores the one produced by `f`.
    ///
    /// `f` runs only when the key is vacant. When it fails nothing is
    /// stored and the error is handed back.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::any::TypeId;
    /// use vc_utils::TypeIdMap;
    ///
    /// let mut map = TypeIdMap::<u32>::new();
    /// let id = TypeId::of::<bool>();
    ///
    /// assert_eq!(map.get_or_try_insert(id, || Err::<u32, _>("nope")), Err("nope"));
    /// assert!(map.is_empty());
    ///
    /// assert_eq!(map.get_or_try_insert(id, || Ok::<_, ()>(3)), Ok(&mut 3));
    /// assert_eq!(map.get_or_try_insert(id, || Ok::<_, ()>(9)), Ok(&mut 3));
    /// ```
    pub fn get_or_try_insert<E>(
        &mut self,
        type_id: TypeId,
        f: impl FnOnce() -> Result<V, E>,
    ) -> Result<&mut V, E> {
        match self.0.entry(type_id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(f()?)),
        }
    }

    /// Iterates over the stored values in unspecified order.
    #[inline]
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.values()
    }

    /// Iterates over `(TypeId, value)` pairs in unspecified order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&TypeId, &V)> {
        self.0.iter()
    }

    /// Removes every entry, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Debug> Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeIdMap;

    #[test]
    fn distinct_types_do_not_collide() {
        let mut map = TypeIdMap::new();
        map.insert_type::<u8>(1);
        map.insert_type::<i8>(2);
        map.insert_type::<[u8; 4]>(3);

        assert_eq!(map.len(), 3);
        assert_eq!(map.get_type::<i8>(), Some(&2));
        assert_eq!(map.insert_type::<u8>(5), Some(1));
        assert_eq!(map.remove(&TypeId::of::<[u8; 4]>()), Some(3));
        assert!(!map.contains(&TypeId::of::<[u8; 4]>()));
    }
}
