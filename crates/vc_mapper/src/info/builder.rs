use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::marker::PhantomData;

use crate::Mapped;
use crate::construct::Creator;
use crate::error::{MapError, SchemaError};
use crate::info::property::{Accessors, Bucket, Getter, PropertyAccess, Setter, Typed};
use crate::info::{Include, NamingStrategy, PropertyKind, Visibility, VisibilityRules};
use crate::document::DocumentNode;
use crate::mapper::{ReadContext, WriteContext};
use crate::poly::Discriminator;
use crate::value::{Codec, MapLike, MapValue, RawCodec};

// -----------------------------------------------------------------------------
// PropertySpec

/// A property as declared, before visibility and naming are applied.
pub(crate) struct PropertySpec {
    pub name: &'static str,
    pub rename: Option<&'static str>,
    pub accessor_rename: Option<&'static str>,
    /// Visibility of the accessor used when reading, if any.
    pub read_vis: Option<Visibility>,
    /// Visibility of the accessor used when writing, if any.
    pub write_vis: Option<Visibility>,
    pub explicit_read: bool,
    pub explicit_write: bool,
    pub ignore_read: bool,
    pub ignore_write: bool,
    pub include: Option<Include>,
    pub kind: PropertyKind,
    pub raw: bool,
    pub codec: bool,
    pub discriminator: Option<Discriminator>,
    pub accept_single_value: Option<bool>,
    pub unwrap_single_array: Option<bool>,
    pub access: PropertyAccess,
}

impl PropertySpec {
    fn new(name: &'static str, access: PropertyAccess) -> Self {
        Self {
            name,
            rename: None,
            accessor_rename: None,
            read_vis: None,
            write_vis: None,
            explicit_read: false,
            explicit_write: false,
            ignore_read: false,
            ignore_write: false,
            include: None,
            kind: PropertyKind::Value,
            raw: false,
            codec: false,
            discriminator: None,
            accept_single_value: None,
            unwrap_single_array: None,
            access,
        }
    }
}

pub(crate) type ErasedDelegate = Box<
    dyn Fn(&DocumentNode, &ReadContext<'_>) -> Result<Box<dyn Any + Send + Sync>, MapError>
        + Send
        + Sync,
>;

pub(crate) type ErasedValueWriter =
    Box<dyn Fn(&dyn Any, &WriteContext<'_>) -> Result<DocumentNode, MapError> + Send + Sync>;

// -----------------------------------------------------------------------------
// DescriptorBuilder

/// Collects the mapping declarations of `T`.
///
/// Handed to [`Mapped::describe`]. The derive macro emits calls to it, and
/// hand-written implementations use it directly.
///
/// # Examples
///
/// ```
/// use vc_mapper::info::{DescriptorBuilder, Include, Visibility};
/// use vc_mapper::{Mapped, Mapper, object};
///
/// #[derive(Default)]
/// struct Account {
///     id: u64,
///     nickname: Option<String>,
/// }
///
/// impl Account {
///     fn display(&self) -> String {
///         format!("#{}", self.id)
///     }
/// }
///
/// impl Mapped for Account {
///     fn describe(builder: &mut DescriptorBuilder<Self>) {
///         builder.default_constructor(Account::default);
///         builder
///             .field("id", Visibility::Private, |a| &a.id, |a| &mut a.id)
///             .explicit();
///         builder
///             .field("nickname", Visibility::Private, |a| &a.nickname, |a| &mut a.nickname)
///             .explicit()
///             .include(Include::NonNull);
///         builder.getter("display", Visibility::Public, Account::display);
///     }
/// }
/// vc_mapper::impl_map_value!(Account);
///
/// let mapper = Mapper::new();
/// let node = mapper.write(&Account { id: 7, nickname: None }).unwrap();
/// assert_eq!(node, object! { "id" => 7, "display" => "#7" });
/// ```
pub struct DescriptorBuilder<T> {
    pub(crate) properties: Vec<PropertySpec>,
    pub(crate) errors: Vec<SchemaError>,
    pub(crate) alias: Option<&'static str>,
    pub(crate) include: Option<Include>,
    pub(crate) ignore_unknown: Option<bool>,
    pub(crate) ignored: Vec<&'static str>,
    pub(crate) allow_getters: bool,
    pub(crate) allow_setters: bool,
    pub(crate) naming: Option<NamingStrategy>,
    pub(crate) visibility: Option<VisibilityRules>,
    pub(crate) default_fn: Option<fn() -> T>,
    pub(crate) creators: Vec<Creator<T>>,
    pub(crate) delegates: Vec<ErasedDelegate>,
    pub(crate) value_writer: Option<ErasedValueWriter>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Origin {
    Field,
    Getter,
    Setter,
}

impl<T: Mapped> DescriptorBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            properties: Vec::new(),
            errors: Vec::new(),
            alias: None,
            include: None,
            ignore_unknown: None,
            ignored: Vec::new(),
            allow_getters: false,
            allow_setters: false,
            naming: None,
            visibility: None,
            default_fn: None,
            creators: Vec::new(),
            delegates: Vec::new(),
            value_writer: None,
        }
    }

    /// Finds or creates the value property `name` holding a `V`.
    fn value_spec<V: MapValue>(&mut self, name: &'static str) -> &mut PropertySpec {
        let existing = self.properties.iter().position(|spec| spec.name == name);
        let index = match existing {
            Some(index) => {
                let matches = match &mut self.properties[index].access {
                    PropertyAccess::Value(slot) => {
                        slot.as_any_mut().downcast_mut::<Accessors<T, V>>().is_some()
                    }
                    PropertyAccess::Bucket(_) => false,
                };
                if matches {
                    index
                } else {
                    self.errors.push(SchemaError::AccessorMismatch {
                        type_path: core::any::type_name::<T>(),
                        property: name,
                    });
                    self.push_value::<V>(name)
                }
            }
            None => self.push_value::<V>(name),
        };
        &mut self.properties[index]
    }

    fn push_value<V: MapValue>(&mut self, name: &'static str) -> usize {
        let access = PropertyAccess::Value(Box::new(Accessors::<T, V>::new()));
        self.properties.push(PropertySpec::new(name, access));
        self.properties.len() - 1
    }

    fn accessors<V: MapValue>(spec: &mut PropertySpec) -> Option<&mut Accessors<T, V>> {
        match &mut spec.access {
            PropertyAccess::Value(slot) => slot.as_any_mut().downcast_mut::<Accessors<T, V>>(),
            PropertyAccess::Bucket(_) => None,
        }
    }

    /// Declares a field, used in both directions.
    ///
    /// Getters and setters declared for the same name take precedence over
    /// the field in their direction.
    pub fn field<V: MapValue>(
        &mut self,
        name: &'static str,
        vis: Visibility,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> PropertyBuilder<'_, T, V> {
        let spec = self.value_spec::<V>(name);
        let mut fill_read = false;
        let mut fill_write = false;
        if let Some(accessors) = Self::accessors::<V>(spec) {
            if accessors.getter.is_none() {
                accessors.getter = Some(Getter::Field(get));
                fill_write = true;
            }
            if accessors.setter.is_none() {
                accessors.setter = Some(Setter::Field(get_mut));
                fill_read = true;
            }
        }
        if fill_write {
            spec.write_vis = Some(vis);
        }
        if fill_read {
            spec.read_vis = Some(vis);
        }
        PropertyBuilder::new(spec, Origin::Field)
    }

    /// Declares a computed getter, used when writing.
    pub fn getter<V: MapValue>(
        &mut self,
        name: &'static str,
        vis: Visibility,
        get: fn(&T) -> V,
    ) -> PropertyBuilder<'_, T, V> {
        let spec = self.value_spec::<V>(name);
        if let Some(accessors) = Self::accessors::<V>(spec) {
            accessors.getter = Some(Getter::Computed(get));
        }
        spec.write_vis = Some(vis);
        PropertyBuilder::new(spec, Origin::Getter)
    }

    /// Declares a setter, used when reading.
    pub fn setter<V: MapValue>(
        &mut self,
        name: &'static str,
        vis: Visibility,
        set: fn(&mut T, V),
    ) -> PropertyBuilder<'_, T, V> {
        let spec = self.value_spec::<V>(name);
        if let Some(accessors) = Self::accessors::<V>(spec) {
            accessors.setter = Some(Setter::Method(set));
        }
        spec.read_vis = Some(vis);
        PropertyBuilder::new(spec, Origin::Setter)
    }

    /// Declares the any-bucket.
    ///
    /// Unknown keys are inserted into it on read, and its entries are
    /// written as top-level keys after every other property.
    pub fn any_bucket<M: MapLike>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> &M,
        get_mut: fn(&mut T) -> &mut M,
    ) -> BucketBuilder<'_> {
        let access = PropertyAccess::Bucket(Box::new(Bucket { get, get_mut }));
        let mut spec = PropertySpec::new(name, access);
        spec.kind = PropertyKind::AnyBucket;
        spec.read_vis = Some(Visibility::Public);
        spec.write_vis = Some(Visibility::Public);
        spec.explicit_read = true;
        spec.explicit_write = true;
        self.properties.push(spec);
        let index = self.properties.len() - 1;
        BucketBuilder {
            spec: &mut self.properties[index],
        }
    }

    /// Reads by default construction followed by population.
    pub fn default_constructor(&mut self, construct: fn() -> T) -> &mut Self {
        self.default_fn = Some(construct);
        self
    }

    /// Reads through a multi-argument creator.
    ///
    /// Takes precedence over a default constructor and a map creator.
    pub fn creator(&mut self, creator: Creator<T>) -> &mut Self {
        self.creators.push(creator);
        self
    }

    /// Reads by handing the whole object, read as `M`, to `create`.
    pub fn map_creator<M: MapValue>(&mut self, create: fn(M) -> T) -> &mut Self {
        type Output = Result<Box<dyn Any + Send + Sync>, MapError>;
        self.delegates.push(Box::new(
            move |node: &DocumentNode, ctx: &ReadContext<'_>| -> Output {
                let input = M::from_node(node, ctx)?;
                Ok(Box::new(create(input)))
            },
        ));
        self
    }

    /// Writes `T` as the single value returned by `get` instead of an
    /// object.
    ///
    /// Reading is unaffected. Pair it with [`map_creator`](Self::map_creator)
    /// to read the same shape back.
    ///
    /// ```
    /// use vc_mapper::info::DescriptorBuilder;
    /// use vc_mapper::{DocumentNode, Mapped, Mapper};
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Celsius(f64);
    ///
    /// impl Mapped for Celsius {
    ///     fn describe(builder: &mut DescriptorBuilder<Self>) {
    ///         builder.value_writer(|c: &Celsius| c.0);
    ///         builder.map_creator(Celsius);
    ///     }
    /// }
    /// vc_mapper::impl_map_value!(Celsius);
    ///
    /// let mapper = Mapper::new();
    /// let node = mapper.write(&Celsius(21.5)).unwrap();
    /// assert_eq!(node, DocumentNode::from(21.5));
    /// assert_eq!(mapper.read::<Celsius>(&node).unwrap(), Celsius(21.5));
    /// ```
    pub fn value_writer<V: MapValue>(&mut self, get: fn(&T) -> V) -> &mut Self {
        type Output = Result<DocumentNode, MapError>;
        self.value_writer = Some(Box::new(
            move |owner: &dyn Any, ctx: &WriteContext<'_>| -> Output {
                match owner.downcast_ref::<T>() {
                    Some(owner) => get(owner).to_node(ctx),
                    None => Err(MapError::custom(alloc::format!(
                        "value writer of `{}` applied to another type",
                        core::any::type_name::<T>()
                    ))),
                }
            },
        ));
        self
    }

    /// The name tag used when `T` is registered as a subtype.
    pub fn type_name(&mut self, alias: &'static str) -> &mut Self {
        self.alias = Some(alias);
        self
    }

    /// Default inclusion policy of the type's properties.
    pub fn include(&mut self, include: Include) -> &mut Self {
        self.include = Some(include);
        self
    }

    pub fn ignore_unknown(&mut self, ignore: bool) -> &mut Self {
        self.ignore_unknown = Some(ignore);
        self
    }

    /// Ignores properties by internal name or key.
    ///
    /// The names are also skipped silently when they show up as unknown
    /// keys on read.
    pub fn ignore_properties(&mut self, names: &[&'static str]) -> &mut Self {
        self.ignored.extend_from_slice(names);
        self
    }

    /// Ignored properties are still written.
    pub fn allow_getters(&mut self) -> &mut Self {
        self.allow_getters = true;
        self
    }

    /// Ignored properties are still read.
    pub fn allow_setters(&mut self) -> &mut Self {
        self.allow_setters = true;
        self
    }

    pub fn rename_all(&mut self, naming: NamingStrategy) -> &mut Self {
        self.naming = Some(naming);
        self
    }

    pub fn visibility(&mut self, rules: VisibilityRules) -> &mut Self {
        self.visibility = Some(rules);
        self
    }
}

// -----------------------------------------------------------------------------
// PropertyBuilder

/// Per-property overrides, returned by the accessor declarations.
pub struct PropertyBuilder<'a, T, V> {
    spec: &'a mut PropertySpec,
    origin: Origin,
    _marker: Typed<T, V>,
}

impl<'a, T: Mapped, V: MapValue> PropertyBuilder<'a, T, V> {
    fn new(spec: &'a mut PropertySpec, origin: Origin) -> Self {
        Self {
            spec,
            origin,
            _marker: PhantomData,
        }
    }

    /// Property-level external key. Makes the property explicit.
    pub fn rename(self, key: &'static str) -> Self {
        self.spec.rename = Some(key);
        self.explicit()
    }

    /// External key given on this accessor. Makes the accessor explicit.
    ///
    /// Beats a property-level rename.
    pub fn accessor_key(self, key: &'static str) -> Self {
        self.spec.accessor_rename = Some(key);
        match self.origin {
            Origin::Field => return self.explicit(),
            Origin::Getter => self.spec.explicit_write = true,
            Origin::Setter => self.spec.explicit_read = true,
        }
        self
    }

    /// Visible in both directions whatever the thresholds.
    pub fn explicit(self) -> Self {
        self.spec.explicit_read = true;
        self.spec.explicit_write = true;
        self
    }

    /// Neither written nor read. The key is skipped silently on read.
    pub fn ignore(self) -> Self {
        self.spec.ignore_read = true;
        self.spec.ignore_write = true;
        self
    }

    pub fn ignore_read(self) -> Self {
        self.spec.ignore_read = true;
        self
    }

    pub fn ignore_write(self) -> Self {
        self.spec.ignore_write = true;
        self
    }

    pub fn include(self, include: Include) -> Self {
        self.spec.include = Some(include);
        self
    }

    /// Replaces the value's own document representation.
    pub fn codec(self, codec: impl Codec<V>) -> Self {
        if let PropertyAccess::Value(slot) = &mut self.spec.access
            && let Some(accessors) = slot.as_any_mut().downcast_mut::<Accessors<T, V>>()
        {
            accessors.codec = Some(Box::new(codec));
            self.spec.codec = true;
        }
        self
    }

    /// Writes the string verbatim.
    pub fn raw(self) -> Self
    where
        RawCodec: Codec<V>,
    {
        let this = self.codec(RawCodec);
        this.spec.raw = true;
        this
    }

    /// Splices the value's keys into the enclosing object.
    pub fn unwrapped(self) -> Self {
        self.unwrapped_with("", "")
    }

    /// Like [`unwrapped`](Self::unwrapped), adding `prefix` and `suffix` to
    /// every spliced key.
    pub fn unwrapped_with(self, prefix: &'static str, suffix: &'static str) -> Self {
        self.spec.kind = PropertyKind::Unwrapped { prefix, suffix };
        self
    }

    /// Reads a lone value as a one-element sequence.
    ///
    /// Overrides [`MapperConfig::accept_single_value`] for this property.
    ///
    /// [`MapperConfig::accept_single_value`]: crate::MapperConfig::accept_single_value
    pub fn accept_single_value(self, accept: bool) -> Self {
        self.spec.accept_single_value = Some(accept);
        self
    }

    /// Writes a one-element sequence as its only element.
    ///
    /// Overrides [`MapperConfig::unwrap_single_arrays`] for this property.
    ///
    /// [`MapperConfig::unwrap_single_arrays`]: crate::MapperConfig::unwrap_single_arrays
    pub fn unwrap_single_array(self, unwrap: bool) -> Self {
        self.spec.unwrap_single_array = Some(unwrap);
        self
    }

    /// Overrides how the polymorphic value held by this property is tagged.
    pub fn discriminator(self, discriminator: Discriminator) -> Self {
        self.spec.discriminator = Some(discriminator);
        self
    }
}

/// Overrides for the any-bucket.
pub struct BucketBuilder<'a> {
    spec: &'a mut PropertySpec,
}

impl BucketBuilder<'_> {
    /// Inclusion policy applied to each entry.
    pub fn include(self, include: Include) -> Self {
        self.spec.include = Some(include);
        self
    }
}
