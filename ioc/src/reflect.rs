//! Type introspection.
//!
//! Rust has no runtime reflection, so types describe themselves instead: a type
//! that implements [`Reflect`] returns a [`TypeDefinition`] listing its
//! constructor parameters, how to build it from resolved [`Arguments`], and any
//! methods the container may [`call`](crate::Container::call).

use crate::error::{BoxError, ResolveError, Result};
use crate::types::{Instance, TypeKey};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A type the container can introspect.
///
/// Concrete types return a definition with a constructor, abstract types
/// (usually `dyn Trait`) return [`TypeDefinition::abstract_type`]. The
/// [`reflect!`](crate::reflect!) macro writes the common implementations.
///
/// ```
/// use autowire_ioc::{Container, Parameter, Reflect, TypeDefinition};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Clock;
///
/// struct Scheduler {
///   clock: Arc<Clock>,
///   slots: u32,
/// }
///
/// autowire_ioc::reflect!(Clock);
///
/// impl Reflect for Scheduler {
///   fn reflect() -> TypeDefinition {
///     TypeDefinition::constructible(
///       [
///         Parameter::object::<Clock>("clock"),
///         Parameter::with_default("slots", 8_u32),
///       ],
///       |args| {
///         Ok(Scheduler {
///           clock: args.object(0)?,
///           slots: args.value(1)?,
///         })
///       },
///     )
///   }
/// }
///
/// let container = Container::new();
/// let scheduler = container.resolve::<Scheduler>().unwrap();
/// assert_eq!(scheduler.slots, 8);
/// ```
pub trait Reflect: Any + Send + Sync {
  fn reflect() -> TypeDefinition;
}

pub(crate) type Introspector = fn() -> TypeDefinition;

type BuildFn = Box<dyn Fn(&Arguments) -> std::result::Result<Instance, BoxError> + Send + Sync>;
type InvokeFn =
  Box<dyn Fn(&dyn Any, &Arguments) -> std::result::Result<Instance, BoxError> + Send + Sync>;

/// The structural description of a type.
pub struct TypeDefinition {
  key: TypeKey,
  constructor: Option<Constructor>,
  methods: Vec<Method>,
}

impl TypeDefinition {
  /// A type that cannot be instantiated by the container. It can only be
  /// resolved after a factory has been registered for it.
  pub fn abstract_type<T: ?Sized + Any>() -> Self {
    Self {
      key: TypeKey::of::<T>(),
      constructor: None,
      methods: Vec::new(),
    }
  }

  /// A concrete type without a declared constructor, built with `T::default()`.
  pub fn default_constructible<T: Default + Any + Send + Sync>() -> Self {
    Self::constructible(Vec::new(), |_| Ok(T::default()))
  }

  /// A concrete type whose constructor takes `parameters`, in order.
  ///
  /// `build` receives the resolved arguments in the same order.
  pub fn constructible<T, F>(parameters: impl IntoIterator<Item = Parameter>, build: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Arguments) -> std::result::Result<T, BoxError> + Send + Sync + 'static,
  {
    Self {
      key: TypeKey::of::<T>(),
      constructor: Some(Constructor {
        parameters: parameters.into_iter().collect(),
        build: Box::new(move |args: &Arguments| build(args).map(Instance::new)),
      }),
      methods: Vec::new(),
    }
  }

  /// Declares a method that can be invoked through [`Container::call`](crate::Container::call).
  pub fn method<T, R, F>(
    mut self,
    name: &'static str,
    parameters: impl IntoIterator<Item = Parameter>,
    body: F,
  ) -> Self
  where
    T: Any + Send + Sync,
    R: ?Sized + Any + Send + Sync,
    F: Fn(&T, &Arguments) -> std::result::Result<Arc<R>, BoxError> + Send + Sync + 'static,
  {
    let invoke: InvokeFn = Box::new(move |object: &dyn Any, args: &Arguments| {
      let this = object
        .downcast_ref::<T>()
        .ok_or_else(|| ResolveError::Downcast {
          expected: std::any::type_name::<T>(),
          actual: "receiver",
        })?;
      body(this, args).map(Instance::from_arc)
    });
    self.methods.push(Method {
      name,
      parameters: parameters.into_iter().collect(),
      invoke,
    });
    self
  }

  pub fn key(&self) -> TypeKey {
    self.key
  }

  /// `false` for abstract types.
  pub fn is_instantiable(&self) -> bool {
    self.constructor.is_some()
  }

  /// The constructor parameters, or `None` for abstract types.
  pub fn parameters(&self) -> Option<&[Parameter]> {
    self.constructor.as_ref().map(|c| c.parameters.as_slice())
  }

  pub fn method_named(&self, name: &str) -> Option<&Method> {
    self.methods.iter().find(|m| m.name == name)
  }

  pub(crate) fn into_constructor(self) -> Option<Constructor> {
    self.constructor
  }
}

impl fmt::Debug for TypeDefinition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeDefinition")
      .field("key", &self.key)
      .field("parameters", &self.parameters())
      .field("methods", &self.methods.iter().map(|m| m.name).collect::<Vec<_>>())
      .finish()
  }
}

pub(crate) struct Constructor {
  pub(crate) parameters: Vec<Parameter>,
  pub(crate) build: BuildFn,
}

/// A method descriptor: its parameters and a way to invoke it on a receiver.
pub struct Method {
  name: &'static str,
  parameters: Vec<Parameter>,
  invoke: InvokeFn,
}

impl Method {
  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  pub(crate) fn invoke(
    &self,
    receiver: &dyn Any,
    args: &Arguments,
  ) -> std::result::Result<Instance, BoxError> {
    (self.invoke)(receiver, args)
  }
}

#[derive(Clone, Copy)]
pub(crate) enum ParameterKind {
  /// Resolved through the container.
  Object { key: TypeKey, introspect: Introspector },
  /// A plain value that can only come from a default.
  Scalar { key: TypeKey },
}

/// A single constructor or method parameter.
#[derive(Clone)]
pub struct Parameter {
  name: &'static str,
  kind: ParameterKind,
  default: Option<Instance>,
}

impl Parameter {
  /// A parameter whose value is resolved from the container as `Arc<T>`.
  pub fn object<T: ?Sized + Reflect>(name: &'static str) -> Self {
    Self {
      name,
      kind: ParameterKind::Object {
        key: TypeKey::of::<T>(),
        introspect: T::reflect,
      },
      default: None,
    }
  }

  /// A plain value parameter with no default. A type declaring one cannot be
  /// auto-wired and must be registered explicitly.
  pub fn scalar<T: Any + Send + Sync>(name: &'static str) -> Self {
    Self {
      name,
      kind: ParameterKind::Scalar {
        key: TypeKey::of::<T>(),
      },
      default: None,
    }
  }

  /// A plain value parameter that falls back to `value`.
  pub fn with_default<T: Any + Send + Sync>(name: &'static str, value: T) -> Self {
    Self {
      default: Some(Instance::new(value)),
      ..Self::scalar::<T>(name)
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn type_key(&self) -> TypeKey {
    match self.kind {
      ParameterKind::Object { key, .. } | ParameterKind::Scalar { key } => key,
    }
  }

  pub fn is_object(&self) -> bool {
    matches!(self.kind, ParameterKind::Object { .. })
  }

  pub fn default_value(&self) -> Option<&Instance> {
    self.default.as_ref()
  }

  pub(crate) fn kind(&self) -> ParameterKind {
    self.kind
  }
}

impl fmt::Debug for Parameter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Parameter")
      .field("name", &self.name)
      .field("type", &self.type_key())
      .field("object", &self.is_object())
      .field("default", &self.default.is_some())
      .finish()
  }
}

/// Resolved arguments, in parameter declaration order.
#[derive(Clone, Debug, Default)]
pub struct Arguments {
  values: Vec<Instance>,
}

impl Arguments {
  pub(crate) fn new(values: Vec<Instance>) -> Self {
    Self { values }
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Instance> {
    self.values.get(index)
  }

  /// The shared value at `index`.
  pub fn object<T: ?Sized + Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
    self.instance(index)?.downcast::<T>()
  }

  /// A clone of the value at `index`.
  pub fn value<T: Clone + Any + Send + Sync>(&self, index: usize) -> Result<T> {
    self.object::<T>(index).map(|value| (*value).clone())
  }

  fn instance(&self, index: usize) -> Result<&Instance> {
    self
      .values
      .get(index)
      .ok_or_else(|| ResolveError::unresolvable(format!("argument #{}", index)))
  }
}
