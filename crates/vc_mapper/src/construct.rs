//! How a mapped type is instantiated when read.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::document::{DocumentNode, ObjectMap};
use crate::error::MapError;
use crate::info::TypeDescriptor;
use crate::info::builder::ErasedDelegate;
use crate::mapper::ReadContext;
use crate::value::MapValue;

// -----------------------------------------------------------------------------
// Creator

/// A declared creator parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CreatorParam {
    pub name: &'static str,
    pub optional: bool,
}

/// A multi-argument creator: named arguments bound to external keys.
///
/// Arguments are mandatory unless added with
/// [`optional_arg`](Creator::optional_arg). Their names match a property's
/// internal name first, then its external key.
///
/// ```
/// use vc_mapper::construct::Creator;
///
/// struct Resp {
///     code: i32,
///     msg: String,
/// }
///
/// let creator = Creator::<Resp>::new(|args| {
///     Ok(Resp {
///         code: args.get("code")?,
///         msg: args.get("msg")?,
///     })
/// })
/// .arg("code")
/// .arg("msg");
/// # let _ = creator;
/// ```
pub struct Creator<T> {
    pub(crate) params: Vec<CreatorParam>,
    pub(crate) build: fn(&CreatorArgs<'_>) -> Result<T, MapError>,
}

impl<T> Creator<T> {
    pub fn new(build: fn(&CreatorArgs<'_>) -> Result<T, MapError>) -> Self {
        Self {
            params: Vec::new(),
            build,
        }
    }

    /// Adds a mandatory argument.
    pub fn arg(mut self, name: &'static str) -> Self {
        self.params.push(CreatorParam {
            name,
            optional: false,
        });
        self
    }

    /// Adds an argument that falls back to the value type's missing value
    /// when its key is absent.
    pub fn optional_arg(mut self, name: &'static str) -> Self {
        self.params.push(CreatorParam {
            name,
            optional: true,
        });
        self
    }
}

// -----------------------------------------------------------------------------
// CreatorArg

/// A creator argument bound to its external key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatorArg {
    pub(crate) name: &'static str,
    pub(crate) key: String,
    pub(crate) optional: bool,
    pub(crate) property: Option<usize>,
}

impl CreatorArg {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

// -----------------------------------------------------------------------------
// CreatorArgs

/// The input object as seen by a creator.
pub struct CreatorArgs<'a> {
    pub(crate) object: &'a ObjectMap,
    pub(crate) args: &'a [CreatorArg],
    pub(crate) descriptor: &'a TypeDescriptor,
    pub(crate) ctx: &'a ReadContext<'a>,
}

impl CreatorArgs<'_> {
    /// Reads the argument `name`.
    ///
    /// An absent optional argument yields the value type's missing value,
    /// then its default, else [`MapError::MissingRequiredArgument`].
    pub fn get<V: MapValue>(&self, name: &str) -> Result<V, MapError> {
        let Some(arg) = self.args.iter().find(|arg| arg.name == name) else {
            return Err(MapError::custom(alloc::format!(
                "`{}` has no creator argument `{name}`",
                self.descriptor.type_path()
            )));
        };

        match self.object.get(&arg.key) {
            Some(node) => {
                let property = arg.property.map(|index| &self.descriptor.properties()[index]);
                let discriminator = property.and_then(|p| p.discriminator());
                let ctx = self.ctx.property(self.object, discriminator);
                let value = match property {
                    Some(property) => property.decode_as::<V>(node, &ctx),
                    None => V::from_node(node, &ctx),
                };
                value.map_err(|e| e.at_key(&arg.key))
            }
            None => V::missing_value()
                .or_else(V::default_value)
                .ok_or_else(|| MapError::MissingRequiredArgument {
                    type_path: self.descriptor.type_path(),
                    key: arg.key.clone(),
                }),
        }
    }

    /// Whether the key bound to `name` is present in the input.
    pub fn contains(&self, name: &str) -> bool {
        self.args
            .iter()
            .find(|arg| arg.name == name)
            .is_some_and(|arg| self.object.contains_key(&arg.key))
    }
}

// -----------------------------------------------------------------------------
// ConstructorSpec

/// The construction route chosen for a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstructorKind {
    /// Multi-argument creator.
    Properties,
    /// Single-argument map creator.
    Delegating,
    /// Default construction, then population.
    Default,
    /// Write-only type.
    None,
}

pub(crate) type ErasedCreator = Box<
    dyn Fn(&CreatorArgs<'_>) -> Result<Box<dyn Any + Send + Sync>, MapError> + Send + Sync,
>;

pub(crate) type ErasedDefault = Box<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// The resolved construction route of a descriptor.
pub enum ConstructorSpec {
    Properties {
        args: Box<[CreatorArg]>,
        build: ErasedCreator,
    },
    Delegating(ErasedDelegate),
    Default(ErasedDefault),
    None,
}

impl ConstructorSpec {
    pub fn kind(&self) -> ConstructorKind {
        match self {
            ConstructorSpec::Properties { .. } => ConstructorKind::Properties,
            ConstructorSpec::Delegating(_) => ConstructorKind::Delegating,
            ConstructorSpec::Default(_) => ConstructorKind::Default,
            ConstructorSpec::None => ConstructorKind::None,
        }
    }

    /// Creator arguments in declaration order, empty for other routes.
    pub fn args(&self) -> &[CreatorArg] {
        match self {
            ConstructorSpec::Properties { args, .. } => args,
            _ => &[],
        }
    }

    /// Instantiates through a creator or the default constructor.
    pub(crate) fn instantiate(
        &self,
        object: &ObjectMap,
        descriptor: &TypeDescriptor,
        ctx: &ReadContext<'_>,
    ) -> Result<Box<dyn Any + Send + Sync>, MapError> {
        match self {
            ConstructorSpec::Properties { args, build } => {
                if let Some(missing) = args
                    .iter()
                    .find(|arg| !arg.optional && !object.contains_key(&arg.key))
                {
                    return Err(MapError::MissingRequiredArgument {
                        type_path: descriptor.type_path(),
                        key: missing.key.clone(),
                    });
                }
                let input = CreatorArgs {
                    object,
                    args,
                    descriptor,
                    ctx,
                };
                build(&input)
            }
            ConstructorSpec::Default(construct) => Ok(construct()),
            ConstructorSpec::Delegating(delegate) => {
                delegate(&DocumentNode::Object(object.clone()), ctx)
            }
            ConstructorSpec::None => Err(MapError::NotConstructible {
                type_path: descriptor.type_path(),
            }),
        }
    }
}

impl core::fmt::Debug for ConstructorSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConstructorSpec")
            .field("kind", &self.kind())
            .field("args", &self.args())
            .finish()
    }
}
