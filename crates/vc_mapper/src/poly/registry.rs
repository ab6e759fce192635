use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use vc_utils::TypeIdMap;
use vc_utils::hash::{FixedHashState, HashMap};

use crate::Mapper;
use crate::Mapped;
use crate::error::{MapError, SchemaError};
use crate::info::TypeDescriptor;
use crate::poly::{Discriminator, PolymorphicBase, TagId};

type Upcast<B> = Box<dyn Fn(Box<dyn Any + Send + Sync>) -> Option<Box<B>> + Send + Sync>;

pub(crate) fn short_name(type_path: &'static str) -> &'static str {
    let plain = type_path.split('<').next().unwrap_or(type_path);
    plain.rsplit("::").next().unwrap_or(plain)
}

// -----------------------------------------------------------------------------
// Subtypes

struct PendingSubtype<B: ?Sized> {
    alias: Option<&'static str>,
    type_id: TypeId,
    type_path: &'static str,
    describe: fn(&Mapper) -> Result<Arc<TypeDescriptor>, SchemaError>,
    upcast: Upcast<B>,
}

/// Collects the subtypes of a polymorphic base.
///
/// Filled by [`PolymorphicBase::subtypes`].
pub struct Subtypes<B: ?Sized> {
    discriminator: Discriminator,
    pending: Vec<PendingSubtype<B>>,
}

impl<B: ?Sized + 'static> Subtypes<B> {
    fn new() -> Self {
        Self {
            discriminator: Discriminator::DEFAULT,
            pending: Vec::new(),
        }
    }

    /// Sets how tags are written for this base.
    pub fn discriminator(&mut self, discriminator: Discriminator) -> &mut Self {
        self.discriminator = discriminator;
        self
    }

    /// Registers `S` under the name it declares with `type_name`, or its
    /// short type name.
    pub fn register<S: Mapped>(&mut self, upcast: fn(S) -> Box<B>) -> &mut Self {
        self.push::<S>(None, upcast)
    }

    /// Registers `S` under an explicit name tag.
    pub fn register_as<S: Mapped>(
        &mut self,
        tag: &'static str,
        upcast: fn(S) -> Box<B>,
    ) -> &mut Self {
        self.push::<S>(Some(tag), upcast)
    }

    fn push<S: Mapped>(
        &mut self,
        alias: Option<&'static str>,
        upcast: fn(S) -> Box<B>,
    ) -> &mut Self {
        self.pending.push(PendingSubtype {
            alias,
            type_id: TypeId::of::<S>(),
            type_path: core::any::type_name::<S>(),
            describe: Mapper::describe::<S>,
            upcast: Box::new(move |any: Box<dyn Any + Send + Sync>| {
                any.downcast::<S>().ok().map(|value| upcast(*value))
            }),
        });
        self
    }
}

// -----------------------------------------------------------------------------
// SubtypeRegistry

/// A registered subtype.
pub struct SubtypeEntry<B: ?Sized> {
    name: String,
    type_path: &'static str,
    type_id: TypeId,
    describe: fn(&Mapper) -> Result<Arc<TypeDescriptor>, SchemaError>,
    upcast: Upcast<B>,
}

impl<B: ?Sized> SubtypeEntry<B> {
    /// The tag written for this subtype.
    pub fn tag(&self, id: TagId) -> &str {
        match id {
            TagId::Name => &self.name,
            TagId::Class => self.type_path,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    pub(crate) fn descriptor(&self, mapper: &Mapper) -> Result<Arc<TypeDescriptor>, SchemaError> {
        (self.describe)(mapper)
    }

    pub(crate) fn upcast(&self, value: Box<dyn Any + Send + Sync>) -> Result<Box<B>, MapError> {
        (self.upcast)(value)
            .ok_or_else(|| MapError::custom(alloc::format!("`{}` was not produced", self.type_path)))
    }
}

/// The subtypes of a polymorphic base, with lookups in both directions.
///
/// Built once per [`Mapper`] by [`Mapper::subtypes`].
pub struct SubtypeRegistry<B: ?Sized> {
    base: &'static str,
    discriminator: Discriminator,
    entries: Box<[SubtypeEntry<B>]>,
    by_type: TypeIdMap<usize>,
    by_name: HashMap<String, usize>,
}

impl<B: ?Sized + PolymorphicBase> SubtypeRegistry<B> {
    pub(crate) fn build(mapper: &Mapper) -> Result<Self, SchemaError> {
        let base = core::any::type_name::<B>();
        let mut types = Subtypes::<B>::new();
        B::subtypes(&mut types);

        let mut entries = Vec::with_capacity(types.pending.len());
        let mut by_type = TypeIdMap::new();
        let mut by_name = HashMap::with_hasher(FixedHashState);

        for pending in types.pending {
            let name = match pending.alias {
                Some(alias) => String::from(alias),
                None => {
                    let descriptor = (pending.describe)(mapper)?;
                    String::from(descriptor.alias().unwrap_or_else(|| short_name(pending.type_path)))
                }
            };

            if let Some(&other) = by_name.get(&name) {
                let other: &SubtypeEntry<B> = &entries[other];
                if other.type_id != pending.type_id {
                    return Err(SchemaError::DuplicateTag {
                        base,
                        tag: name,
                        first: other.type_path,
                        second: pending.type_path,
                    });
                }
                continue;
            }

            log::trace!("`{base}`: subtype `{}` tagged \"{name}\"", pending.type_path);
            let index = entries.len();
            by_type.insert(pending.type_id, index);
            by_name.insert(name.clone(), index);
            entries.push(SubtypeEntry {
                name,
                type_path: pending.type_path,
                type_id: pending.type_id,
                describe: pending.describe,
                upcast: pending.upcast,
            });
        }

        Ok(Self {
            base,
            discriminator: types.discriminator,
            entries: entries.into_boxed_slice(),
            by_type,
            by_name,
        })
    }
}

impl<B: ?Sized> SubtypeRegistry<B> {
    /// Type path of the base.
    #[inline]
    pub fn base_path(&self) -> &'static str {
        self.base
    }

    /// The base's own discriminator.
    #[inline]
    pub fn discriminator(&self) -> &Discriminator {
        &self.discriminator
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubtypeEntry<B>> {
        self.entries.iter()
    }

    /// The entry of a concrete type.
    pub fn entry_of(&self, type_id: TypeId) -> Option<&SubtypeEntry<B>> {
        self.by_type.get(&type_id).map(|&index| &self.entries[index])
    }

    /// The entry a tag resolves to.
    pub fn resolve(&self, tag: &str, id: TagId) -> Option<&SubtypeEntry<B>> {
        match id {
            TagId::Name => self.by_name.get(tag).map(|&index| &self.entries[index]),
            TagId::Class => self.entries.iter().find(|entry| entry.type_path == tag),
        }
    }

    /// The tag of a concrete type.
    pub fn tag_of(&self, type_id: TypeId, id: TagId) -> Option<&str> {
        self.entry_of(type_id).map(|entry| entry.tag(id))
    }
}
