//! # Autowire IoC
//!
//! A thread-safe Inversion of Control (IoC) container for Rust that builds
//! unregistered types on its own by reading their declared constructor
//! parameters.
//!
//! ## Core Concepts
//!
//! - **Container**: the registry of factories, plus the cache of singleton
//!   instances. Containers are independent values; there is no global one.
//! - **Registration**: `register` (a new instance per resolution), `singleton`
//!   (one instance, created on first resolution) and `instance` (a value built
//!   up front).
//! - **Auto-wiring**: a type that implements [`Reflect`] describes its
//!   constructor. Resolving it without a registration resolves each parameter
//!   in turn, builds the type, and registers the derived factory.
//! - **Abstract types**: trait objects are never guessed. They resolve only
//!   after an explicit registration.
//! - **Method calls**: [`Container::call`] invokes a declared method with
//!   container-resolved arguments.
//!
//! ## Quick Start
//!
//! ```
//! use autowire_ioc::{reflect, Container, Parameter, Reflect, TypeDefinition};
//! use std::sync::Arc;
//!
//! trait Storage: Send + Sync {
//!     fn name(&self) -> &'static str;
//! }
//! reflect!(trait Storage);
//!
//! struct MemoryStorage;
//! impl Storage for MemoryStorage {
//!     fn name(&self) -> &'static str {
//!         "memory"
//!     }
//! }
//!
//! struct Repository {
//!     storage: Arc<dyn Storage>,
//! }
//!
//! impl Reflect for Repository {
//!     fn reflect() -> TypeDefinition {
//!         TypeDefinition::constructible([Parameter::object::<dyn Storage>("storage")], |args| {
//!             Ok(Repository { storage: args.object(0)? })
//!         })
//!     }
//! }
//!
//! let container = Container::new();
//! container.singleton::<dyn Storage, _>(|_| Ok(Arc::new(MemoryStorage)));
//!
//! let repository = container.resolve::<Repository>().unwrap();
//! assert_eq!(repository.storage.name(), "memory");
//! ```

mod container;
mod error;
mod invoker;
mod macros;
mod reflect;
mod resolver;
mod types;

pub use container::Container;
pub use error::{BoxError, ResolveError, Result};
pub use reflect::{Arguments, Method, Parameter, Reflect, TypeDefinition};
pub use types::{Instance, TypeKey};
