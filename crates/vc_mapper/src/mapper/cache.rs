//! Per-mapper storage of values built once per type.
//!
//! Lookups take a read lock on a [`TypeIdMap`]. A miss takes the cache's
//! build mutex, checks again and builds, so every type is built at most
//! once even when first used from several threads.
//!
//! Builds nest: describing a type describes the types it unwraps. The
//! building thread already holds the mutex, so nested builds on the same
//! cache skip it. A thread-local stack of the builds in progress tells
//! nested builds apart and catches a type that needs itself.

use alloc::vec::Vec;
use core::any::TypeId;
use core::cell::RefCell;
use std::sync::{Mutex, PoisonError, RwLock};

use vc_utils::TypeIdMap;

use crate::error::SchemaError;

std::thread_local! {
    /// Builds in progress on this thread, as (cache address, type).
    static BUILDING: RefCell<Vec<(usize, TypeId)>> = const { RefCell::new(Vec::new()) };
}

/// Pops the build stack, also when the build panics.
struct BuildGuard;

impl BuildGuard {
    fn push(cache: usize, type_id: TypeId) -> Self {
        BUILDING.with_borrow_mut(|stack| stack.push((cache, type_id)));
        BuildGuard
    }
}

impl Drop for BuildGuard {
    fn drop(&mut self) {
        BUILDING.with_borrow_mut(|stack| {
            stack.pop();
        });
    }
}

// -----------------------------------------------------------------------------
// TypeCache

/// Values of type `V` built at most once per [`TypeId`].
///
/// Failed builds are cached like successful ones.
pub(crate) struct TypeCache<V> {
    table: RwLock<TypeIdMap<Result<V, SchemaError>>>,
    build_lock: Mutex<()>,
}

impl<V: Clone> TypeCache<V> {
    pub const fn new() -> Self {
        Self {
            table: RwLock::new(TypeIdMap::new()),
            build_lock: Mutex::new(()),
        }
    }

    #[inline(never)]
    fn lookup(&self, type_id: TypeId) -> Option<Result<V, SchemaError>> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned()
    }

    /// Returns the cached value for `type_id`, building it on first use.
    pub fn get_or_build(
        &self,
        type_id: TypeId,
        type_path: &'static str,
        build: impl FnOnce() -> Result<V, SchemaError>,
    ) -> Result<V, SchemaError> {
        if let Some(found) = self.lookup(type_id) {
            return found;
        }

        let cache = core::ptr::from_ref(self).addr();
        let (cyclic, nested) = BUILDING.with_borrow(|stack| {
            let cyclic = stack.contains(&(cache, type_id));
            let nested = stack.iter().any(|(other, _)| *other == cache);
            (cyclic, nested)
        });
        if cyclic {
            return Err(SchemaError::RecursiveUnwrap { type_path });
        }

        let _lock = match nested {
            true => None,
            false => Some(self.build_lock.lock().unwrap_or_else(PoisonError::into_inner)),
        };
        if let Some(found) = self.lookup(type_id) {
            return found;
        }

        let built = {
            let _guard = BuildGuard::push(cache, type_id);
            build()
        };
        self.table
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(type_id, built.clone());
        built
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.table.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
