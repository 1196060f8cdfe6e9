//! The main `Container` struct: registration and resolution.

use crate::error::{BoxError, ResolveError, Result};
use crate::reflect::{Introspector, Reflect};
use crate::types::{BuildTracker, Instance, ResolutionGuard, TypeKey};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::sync::Arc;

/// A registered way of producing an instance. Receives the container so it can
/// resolve its own dependencies.
pub(crate) type Factory = Arc<dyn Fn(&Container) -> Result<Instance> + Send + Sync>;

/// The Inversion of Control (IoC) container.
///
/// Holds a registry of factories keyed by type, and a cache of the instances
/// produced by singleton registrations. Types that are not registered are built
/// by introspecting their [`Reflect`] definition, and the derived factory is
/// added to the registry so later resolutions skip introspection.
///
/// All methods take `&self`; the container is thread-safe and can be shared
/// through an `Arc`.
#[derive(Default)]
pub struct Container {
  factories: DashMap<TypeKey, Factory>,
  singletons: DashMap<TypeKey, Arc<OnceCell<Instance>>>,
  builds: BuildTracker,
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn erase<T, F>(key: TypeKey, factory: F) -> Factory
  where
    T: ?Sized + Any + Send + Sync,
    F: Fn(&Container) -> std::result::Result<Arc<T>, BoxError> + Send + Sync + 'static,
  {
    Arc::new(move |container: &Container| {
      factory(container)
        .map(Instance::from_arc)
        .map_err(|err| ResolveError::from_boxed(key.type_name(), err))
    })
  }

  pub(crate) fn insert_factory(&self, key: TypeKey, factory: Factory) {
    self.factories.insert(key, factory);
  }

  /// Inserts `factory` unless a factory for `key` already exists, and returns
  /// whichever one ends up registered.
  pub(crate) fn insert_factory_if_absent(&self, key: TypeKey, factory: Factory) -> Factory {
    self.factories.entry(key).or_insert(factory).value().clone()
  }

  fn factory_for(&self, key: &TypeKey) -> Option<Factory> {
    // Clone the factory out so the map is not locked while it runs.
    self.factories.get(key).map(|entry| entry.value().clone())
  }

  fn singleton_cell(&self, key: TypeKey) -> Arc<OnceCell<Instance>> {
    self.singletons.entry(key).or_default().value().clone()
  }

  /// Distinguishes this container on the thread-local resolution stack.
  fn scope(&self) -> usize {
    self as *const Self as usize
  }

  // --- PUBLIC API ---

  // --- Registration ---

  /// Registers `factory` for `T`, replacing any previous registration.
  ///
  /// The factory runs on every resolution of `T`.
  ///
  /// ```
  /// use autowire_ioc::Container;
  /// use std::sync::Arc;
  ///
  /// trait Greeter: Send + Sync {
  ///   fn greet(&self) -> String;
  /// }
  /// struct English;
  /// impl Greeter for English {
  ///   fn greet(&self) -> String {
  ///     "Hello!".to_string()
  ///   }
  /// }
  ///
  /// let container = Container::new();
  /// container.register::<dyn Greeter, _>(|_| Ok(Arc::new(English)));
  ///
  /// let greeter = container.get::<dyn Greeter>().unwrap();
  /// assert_eq!(greeter.greet(), "Hello!");
  /// ```
  pub fn register<T, F>(&self, factory: F) -> &Self
  where
    T: ?Sized + Any + Send + Sync,
    F: Fn(&Container) -> std::result::Result<Arc<T>, BoxError> + Send + Sync + 'static,
  {
    let key = TypeKey::of::<T>();
    self.insert_factory(key, Self::erase(key, factory));
    self
  }

  /// Registers `factory` for `T` with a singleton lifetime.
  ///
  /// The first successful resolution runs `factory` and caches the instance;
  /// every later resolution returns that same instance. The cache is keyed by
  /// type, so registering a new singleton factory for a type whose instance
  /// already exists keeps serving the existing instance.
  ///
  /// A thread that would wait for a singleton being built on another thread,
  /// while that thread is itself waiting on this one, fails with
  /// [`ResolveError::CircularDependency`] instead of blocking.
  pub fn singleton<T, F>(&self, factory: F) -> &Self
  where
    T: ?Sized + Any + Send + Sync,
    F: Fn(&Container) -> std::result::Result<Arc<T>, BoxError> + Send + Sync + 'static,
  {
    let key = TypeKey::of::<T>();
    let factory = Self::erase(key, factory);
    let memoized: Factory = Arc::new(move |container: &Container| {
      let cell = container.singleton_cell(key);
      if let Some(instance) = cell.get() {
        return Ok(instance.clone());
      }

      let _waiting = container.builds.wait(key)?;
      cell
        .get_or_try_init(|| {
          let _building = container.builds.build(key);
          tracing::debug!(service = key.type_name(), "constructing singleton");
          factory(container)
        })
        .cloned()
    });
    self.insert_factory(key, memoized);
    self
  }

  /// Registers an already constructed value for `T`. Every resolution returns
  /// a clone of `instance`.
  pub fn instance<T: ?Sized + Any + Send + Sync>(&self, instance: Arc<T>) -> &Self {
    let key = TypeKey::of::<T>();
    let instance = Instance::from_arc(instance);
    self.insert_factory(key, Arc::new(move |_: &Container| Ok(instance.clone())));
    self
  }

  /// Whether a factory, explicit or derived, is registered for `T`.
  pub fn is_registered<T: ?Sized + Any>(&self) -> bool {
    self.factories.contains_key(&TypeKey::of::<T>())
  }

  // --- Resolution ---

  /// Resolves `T`, building it and its dependencies from their [`Reflect`]
  /// definitions when they are not registered.
  ///
  /// # Errors
  ///
  /// [`ResolveError::Unresolvable`] when `T` is abstract and unregistered, or
  /// when any of its dependencies cannot be resolved. A dependency cycle
  /// surfaces as an `Unresolvable` error whose source chain contains a
  /// [`ResolveError::CircularDependency`].
  pub fn resolve<T: ?Sized + Reflect>(&self) -> Result<Arc<T>> {
    self
      .resolve_instance(TypeKey::of::<T>(), Some(T::reflect as Introspector))?
      .downcast::<T>()
  }

  /// Resolves `T` from the registry only, without introspection.
  ///
  /// This is how types that do not implement [`Reflect`] are resolved.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    self
      .resolve_instance(TypeKey::of::<T>(), None)?
      .downcast::<T>()
  }

  /// The shared resolution path: registry first, then auto-registration.
  pub(crate) fn resolve_instance(
    &self,
    key: TypeKey,
    introspect: Option<Introspector>,
  ) -> Result<Instance> {
    tracing::trace!(service = key.type_name(), "resolving");
    let _guard = ResolutionGuard::enter(self.scope(), &key)?;

    let factory = match self.factory_for(&key) {
      Some(factory) => factory,
      None => self
        .auto_register(key, introspect)
        .map_err(|cause| ResolveError::unresolvable_because(key.type_name(), cause))?,
    };

    factory(self)
  }
}
