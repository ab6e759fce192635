use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use vc_utils::hash::{FixedHashState, HashMap};

use crate::construct::{ConstructorSpec, Creator, CreatorArg, CreatorArgs};
use crate::error::{MapError, SchemaError};
use crate::info::builder::{DescriptorBuilder, ErasedDelegate, PropertySpec};
use crate::info::descriptor::KeySlot;
use crate::info::naming::resolve_key;
use crate::info::property::PropertyAccess;
use crate::info::{Include, PropertyDescriptor, PropertyKind, TypeDescriptor};
use crate::{Mapped, Mapper, MapperConfig};

// -----------------------------------------------------------------------------
// Key table

/// External keys claimed so far, with the property that claimed each.
struct KeyTable {
    type_path: &'static str,
    slots: HashMap<String, KeySlot>,
    owners: HashMap<String, String>,
}

impl KeyTable {
    fn new(type_path: &'static str) -> Self {
        Self {
            type_path,
            slots: HashMap::with_hasher(FixedHashState),
            owners: HashMap::with_hasher(FixedHashState),
        }
    }

    fn claim(&mut self, key: String, slot: KeySlot, owner: String) -> Result<(), SchemaError> {
        if let Some(first) = self.owners.get(&key) {
            return Err(SchemaError::DuplicateKey {
                type_path: self.type_path,
                key,
                first: first.clone(),
                second: owner,
            });
        }
        self.owners.insert(key.clone(), owner);
        self.slots.insert(key, slot);
        Ok(())
    }

    /// Binds a key to be skipped, unless a visible property owns it.
    fn ignore(&mut self, key: String) {
        self.slots.entry(key).or_insert(KeySlot::Ignored);
    }
}

// -----------------------------------------------------------------------------
// build_descriptor

fn first_error(errors: Vec<SchemaError>) -> Result<(), SchemaError> {
    match errors.into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Resolves the declarations of `T` against `mapper`'s configuration.
pub(crate) fn build_descriptor<T: Mapped>(mapper: &Mapper) -> Result<TypeDescriptor, SchemaError> {
    let type_path = core::any::type_name::<T>();
    let mut builder = DescriptorBuilder::<T>::new();
    T::describe(&mut builder);

    let DescriptorBuilder {
        properties: specs,
        errors,
        alias,
        include,
        ignore_unknown,
        ignored,
        allow_getters,
        allow_setters,
        naming,
        visibility,
        default_fn,
        creators,
        delegates,
        value_writer,
    } = builder;
    first_error(errors)?;

    let config = mapper.config();
    let rules = visibility.unwrap_or(config.visibility);
    let naming = naming.unwrap_or(config.naming);
    let type_include = include.unwrap_or(config.default_include);

    let mut table = KeyTable::new(type_path);
    let mut properties: Vec<PropertyDescriptor> = Vec::with_capacity(specs.len());
    let mut any_bucket: Option<usize> = None;
    let mut listed = vec![false; ignored.len()];

    for mut spec in specs {
        if let PropertyAccess::Value(slot) = &spec.access
            && slot.value_ignored()
        {
            log::debug!("`{type_path}`: property `{}` has an ignored type", spec.name);
            if matches!(spec.kind, PropertyKind::Value) {
                table.ignore(resolve_key(spec.accessor_rename, spec.rename, spec.name, naming));
            }
            continue;
        }

        let key = match spec.kind {
            PropertyKind::Value => resolve_key(spec.accessor_rename, spec.rename, spec.name, naming),
            PropertyKind::Unwrapped { .. } | PropertyKind::AnyBucket => String::new(),
        };

        for (index, name) in ignored.iter().enumerate() {
            if *name == spec.name || (!key.is_empty() && *name == key) {
                listed[index] = true;
                spec.ignore_write |= !allow_getters;
                spec.ignore_read |= !allow_setters;
            }
        }

        let (has_getter, has_setter) = match &spec.access {
            PropertyAccess::Value(slot) => (slot.has_getter(), slot.has_setter()),
            PropertyAccess::Bucket(_) => (true, true),
        };
        let readable = has_setter
            && !spec.ignore_read
            && spec
                .read_vis
                .is_some_and(|vis| spec.explicit_read || rules.read.admits(vis));
        let writable = has_getter
            && !spec.ignore_write
            && spec
                .write_vis
                .is_some_and(|vis| spec.explicit_write || rules.write.admits(vis));

        let index = properties.len();
        let property = match spec.kind {
            PropertyKind::Value => {
                if readable || writable {
                    table.claim(key.clone(), KeySlot::Property(index), String::from(spec.name))?;
                } else {
                    table.ignore(key.clone());
                }
                value_property(type_path, spec, key, readable, writable, type_include, config)
            }
            PropertyKind::Unwrapped { prefix, suffix } => {
                let child = unwrapped_child(mapper, type_path, &spec)?;
                if readable || writable {
                    let mut keys: Vec<&String> = child.slots.keys().collect();
                    keys.sort();
                    for inner in keys {
                        let outer = format!("{prefix}{inner}{suffix}");
                        let slot = KeySlot::Unwrapped(index, inner.clone());
                        table.claim(outer, slot, format!("{}.{inner}", spec.name))?;
                    }
                }
                let mut property =
                    value_property(type_path, spec, key, readable, writable, type_include, config);
                property.unwrapped = Some(child);
                property
            }
            PropertyKind::AnyBucket => {
                if let Some(first) = any_bucket {
                    let first: &PropertyDescriptor = &properties[first];
                    return Err(SchemaError::DuplicateAnyBucket {
                        type_path,
                        first: first.name,
                        second: spec.name,
                    });
                }
                any_bucket = Some(index);
                bucket_property(type_path, spec, readable, writable, type_include, config)
            }
        };
        properties.push(property);
    }

    for (name, found) in ignored.iter().zip(listed) {
        if !found {
            log::warn!("`{type_path}` ignores `{name}`, which matches no property");
        }
        table.ignore(String::from(*name));
    }

    let constructor = resolve_constructor(
        type_path,
        &properties,
        &mut table,
        default_fn,
        creators,
        delegates,
    )?;

    log::debug!(
        "described `{type_path}`: {} properties, {:?} constructor",
        properties.len(),
        constructor.kind()
    );

    Ok(TypeDescriptor {
        type_id: TypeId::of::<T>(),
        type_path,
        alias,
        properties: properties.into_boxed_slice(),
        slots: table.slots,
        any_bucket,
        constructor,
        include: type_include,
        ignore_unknown,
        value_writer,
    })
}

fn value_property(
    type_path: &'static str,
    spec: PropertySpec,
    key: String,
    readable: bool,
    writable: bool,
    type_include: Include,
    config: &MapperConfig,
) -> PropertyDescriptor {
    let include = spec.include.unwrap_or(type_include);
    let has_default = match &spec.access {
        PropertyAccess::Value(slot) => slot.has_default(),
        PropertyAccess::Bucket(_) => false,
    };
    let non_default_degraded = include == Include::NonDefault && !has_default;
    if non_default_degraded {
        log::debug!(
            "`{type_path}`: `{}` has no default value, NonDefault acts as NonEmpty",
            spec.name
        );
    }
    PropertyDescriptor {
        name: spec.name,
        key,
        kind: spec.kind,
        readable,
        writable,
        include,
        non_default_degraded,
        raw: spec.raw,
        codec: spec.codec,
        discriminator: spec.discriminator,
        accept_single_value: spec
            .accept_single_value
            .unwrap_or(config.accept_single_value),
        unwrap_single_array: spec
            .unwrap_single_array
            .unwrap_or(config.unwrap_single_arrays),
        unwrapped: None,
        access: spec.access,
    }
}

fn bucket_property(
    type_path: &'static str,
    spec: PropertySpec,
    readable: bool,
    writable: bool,
    type_include: Include,
    config: &MapperConfig,
) -> PropertyDescriptor {
    value_property(type_path, spec, String::new(), readable, writable, type_include, config)
}

fn unwrapped_child(
    mapper: &Mapper,
    type_path: &'static str,
    spec: &PropertySpec,
) -> Result<Arc<TypeDescriptor>, SchemaError> {
    let invalid = |reason| SchemaError::InvalidUnwrap {
        type_path,
        property: spec.name,
        reason,
    };
    let PropertyAccess::Value(slot) = &spec.access else {
        return Err(invalid("not a value property"));
    };
    let child = match slot.value_descriptor(mapper) {
        Some(child) => child?,
        None => return Err(invalid("not a mapped type")),
    };
    if child.any_bucket.is_some() {
        return Err(invalid("its type has an any-bucket"));
    }
    if child.value_writer.is_some() {
        return Err(invalid("its type is written as a single value"));
    }
    Ok(child)
}

// -----------------------------------------------------------------------------
// Constructor

fn resolve_constructor<T: Mapped>(
    type_path: &'static str,
    properties: &[PropertyDescriptor],
    table: &mut KeyTable,
    default_fn: Option<fn() -> T>,
    creators: Vec<Creator<T>>,
    delegates: Vec<ErasedDelegate>,
) -> Result<ConstructorSpec, SchemaError> {
    if creators.len() > 1 {
        return Err(SchemaError::DuplicateCreator {
            type_path,
            kind: "properties",
        });
    }
    if delegates.len() > 1 {
        return Err(SchemaError::DuplicateCreator {
            type_path,
            kind: "map",
        });
    }

    if let Some(creator) = creators.into_iter().next() {
        let mut args = Vec::with_capacity(creator.params.len());
        for param in &creator.params {
            let values = || {
                properties
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.kind == PropertyKind::Value)
            };
            let found = values()
                .find(|(_, p)| p.name == param.name)
                .or_else(|| values().find(|(_, p)| p.key == param.name));
            let Some((index, property)) = found else {
                return Err(SchemaError::UnknownCreatorKey {
                    type_path,
                    key: String::from(param.name),
                });
            };
            table.slots.insert(property.key.clone(), KeySlot::Creator);
            args.push(CreatorArg {
                name: param.name,
                key: property.key.clone(),
                optional: param.optional,
                property: Some(index),
            });
        }

        type Output = Result<Box<dyn Any + Send + Sync>, MapError>;
        let build = creator.build;
        return Ok(ConstructorSpec::Properties {
            args: args.into_boxed_slice(),
            build: Box::new(move |input: &CreatorArgs<'_>| -> Output {
                build(input).map(|value| Box::new(value) as Box<dyn Any + Send + Sync>)
            }),
        });
    }

    if let Some(delegate) = delegates.into_iter().next() {
        return Ok(ConstructorSpec::Delegating(delegate));
    }

    Ok(match default_fn {
        Some(construct) => ConstructorSpec::Default(Box::new(move || {
            Box::new(construct()) as Box<dyn Any + Send + Sync>
        })),
        None => ConstructorSpec::None,
    })
}

#[cfg(test)]
mod tests {
    use crate::construct::{ConstructorKind, Creator};
    use crate::error::SchemaError;
    use crate::info::{DescriptorBuilder, Include, NamingStrategy, Visibility};
    use crate::{Mapped, Mapper, MapperConfig};

    #[derive(Default)]
    struct Plain {
        first_name: String,
        age: u32,
        secret: String,
    }

    impl Mapped for Plain {
        fn describe(builder: &mut DescriptorBuilder<Self>) {
            builder.default_constructor(Plain::default);
            builder.field("first_name", Visibility::Public, |p| &p.first_name, |p| &mut p.first_name);
            builder.field("age", Visibility::Private, |p| &p.age, |p| &mut p.age);
            builder.field("secret", Visibility::Public, |p| &p.secret, |p| &mut p.secret);
            builder.ignore_properties(&["secret", "legacy"]);
        }
    }
    crate::impl_map_value!(Plain);

    #[test]
    fn visibility_defaults_differ_by_direction() {
        let mapper = Mapper::new();
        let desc = mapper.describe::<Plain>().unwrap();

        let age = desc.property("age").unwrap();
        assert!(age.is_writable());
        assert!(!age.is_readable());

        let name = desc.property("first_name").unwrap();
        assert!(name.is_writable() && name.is_readable());

        let secret = desc.property("secret").unwrap();
        assert!(!secret.is_writable() && !secret.is_readable());
        assert_eq!(desc.constructor(), ConstructorKind::Default);
    }

    #[test]
    fn naming_strategy_comes_from_the_mapper() {
        let mapper = Mapper::with_config(MapperConfig::DEFAULT.with_naming(NamingStrategy::CamelCase));
        let desc = mapper.describe::<Plain>().unwrap();
        assert_eq!(desc.property("first_name").unwrap().key(), "firstName");
        assert_eq!(desc.property_by_key("firstName").unwrap().name(), "first_name");
    }

    struct Clash {
        a: i32,
        b: i32,
    }

    impl Mapped for Clash {
        fn describe(builder: &mut DescriptorBuilder<Self>) {
            builder.field("a", Visibility::Public, |c| &c.a, |c| &mut c.a).rename("x");
            builder.field("b", Visibility::Public, |c| &c.b, |c| &mut c.b).rename("x");
        }
    }
    crate::impl_map_value!(Clash);

    #[test]
    fn duplicate_keys_are_rejected_and_cached() {
        let mapper = Mapper::new();
        let err = mapper.describe::<Clash>().unwrap_err();
        assert!(matches!(&err, SchemaError::DuplicateKey { key, .. } if key == "x"));
        assert_eq!(mapper.describe::<Clash>().unwrap_err(), err);
    }

    struct TwoCreators {
        code: i32,
    }

    impl Mapped for TwoCreators {
        fn describe(builder: &mut DescriptorBuilder<Self>) {
            builder.field("code", Visibility::Public, |t| &t.code, |t| &mut t.code);
            builder.creator(Creator::new(|args| Ok(TwoCreators { code: args.get("code")? })).arg("code"));
            builder.creator(Creator::new(|_| Ok(TwoCreators { code: 0 })));
        }
    }
    crate::impl_map_value!(TwoCreators);

    #[test]
    fn more_than_one_creator_is_rejected() {
        let err = Mapper::new().describe::<TwoCreators>().unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateCreator { .. }));
    }

    struct BadCreator {
        code: i32,
    }

    impl Mapped for BadCreator {
        fn describe(builder: &mut DescriptorBuilder<Self>) {
            builder.field("code", Visibility::Public, |t| &t.code, |t| &mut t.code);
            builder.creator(Creator::new(|args| Ok(BadCreator { code: args.get("status")? })).arg("status"));
        }
    }
    crate::impl_map_value!(BadCreator);

    #[test]
    fn creator_keys_must_match_a_property() {
        let err = Mapper::new().describe::<BadCreator>().unwrap_err();
        assert!(matches!(&err, SchemaError::UnknownCreatorKey { key, .. } if key == "status"));
    }

    struct Flags {
        on: bool,
        label: Vec<String>,
    }

    impl Mapped for Flags {
        fn describe(builder: &mut DescriptorBuilder<Self>) {
            builder.include(Include::NonDefault);
            builder.field("on", Visibility::Public, |f| &f.on, |f| &mut f.on);
            builder
                .field("label", Visibility::Public, |f| &f.label, |f| &mut f.label)
                .include(Include::NonNull);
        }
    }
    crate::impl_map_value!(Flags);

    #[test]
    fn property_include_beats_type_include() {
        let desc = Mapper::new().describe::<Flags>().unwrap();
        assert_eq!(desc.property("on").unwrap().include(), Include::NonDefault);
        assert!(!desc.property("on").unwrap().non_default_degraded());
        assert_eq!(desc.property("label").unwrap().include(), Include::NonNull);
        assert_eq!(desc.default_include(), Include::NonDefault);
    }
}
