//! Public macros for ergonomic resolution and introspection.

/// Resolves a service from a container, panicking if it cannot be resolved.
///
/// Use [`Container::resolve`](crate::Container::resolve) directly for the
/// fallible version.
///
/// # Panics
///
/// Panics with the resolution error if the service cannot be resolved.
///
/// # Examples
///
/// ```
/// use autowire_ioc::{resolve, Container};
///
/// #[derive(Default)]
/// struct Clock;
/// autowire_ioc::reflect!(Clock);
///
/// let container = Container::new();
/// let _clock = resolve!(container, Clock);
/// ```
///
/// ```
/// use autowire_ioc::{resolve, Container};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
/// autowire_ioc::reflect!(trait Greeter);
///
/// let container = Container::new();
/// container.register::<dyn Greeter, _>(|_| Ok(Arc::new(EnglishGreeter)));
///
/// let greeter = resolve!(container, trait Greeter);
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
  // Arm for resolving a trait object: resolve!(container, trait MyTrait)
  ($container:expr, trait $trait_ident:ident) => {
    $container
      .resolve::<dyn $trait_ident>()
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required trait service {}: {}",
          std::any::type_name::<dyn $trait_ident>(),
          err
        )
      })
  };

  // Arm for resolving a concrete type: resolve!(container, MyService)
  ($container:expr, $type:ty) => {
    $container
      .resolve::<$type>()
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required service {}: {}",
          std::any::type_name::<$type>(),
          err
        )
      })
  };
}

/// Implements [`Reflect`](crate::Reflect) for the two shapes that need no
/// hand-written definition.
///
/// - `reflect!(trait MyTrait)` marks `dyn MyTrait` as abstract: it resolves
///   only through a registration.
/// - `reflect!(MyType)` marks `MyType` as concrete with no constructor
///   parameters, built through `Default`.
#[macro_export]
macro_rules! reflect {
  (trait $trait_ident:ident) => {
    impl $crate::Reflect for dyn $trait_ident {
      fn reflect() -> $crate::TypeDefinition {
        $crate::TypeDefinition::abstract_type::<dyn $trait_ident>()
      }
    }
  };

  ($type:ty) => {
    impl $crate::Reflect for $type {
      fn reflect() -> $crate::TypeDefinition {
        $crate::TypeDefinition::default_constructible::<$type>()
      }
    }
  };
}
