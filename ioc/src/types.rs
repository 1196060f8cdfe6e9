//! Core data structures shared by the registry, resolver and invoker.

use crate::error::{ResolveError, Result};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::thread::{self, ThreadId};

thread_local! {
  // The set of (container, type) pairs currently being resolved on this thread.
  // A pair that is entered twice before it is left is a dependency cycle.
  static RESOLVING_STACK: RefCell<HashSet<(usize, TypeKey)>> = RefCell::new(HashSet::new());
}

/// An RAII guard used to detect circular dependencies.
///
/// Entering pushes the key onto the thread-local resolution stack and fails with
/// [`ResolveError::CircularDependency`] if the key is already there. Dropping the
/// guard pops it again, so the stack unwinds together with the call stack.
pub(crate) struct ResolutionGuard {
  scope: usize,
  key: TypeKey,
}

impl ResolutionGuard {
  /// `scope` distinguishes containers so that a factory in one container may
  /// resolve the same type from another one.
  pub(crate) fn enter(scope: usize, key: &TypeKey) -> Result<Self> {
    let inserted = RESOLVING_STACK.with(|stack| stack.borrow_mut().insert((scope, *key)));
    if !inserted {
      tracing::warn!(service = key.type_name(), "circular dependency detected");
      return Err(ResolveError::CircularDependency {
        label: key.type_name().to_owned(),
      });
    }
    Ok(Self {
      scope,
      key: *key,
    })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().remove(&(self.scope, self.key));
    });
  }
}

/// Tracks singleton construction across threads.
///
/// The thread-local [`ResolutionGuard`] cannot see a cycle that spans threads:
/// thread A builds `X` and waits for `Y`, while thread B builds `Y` and waits
/// for `X`. Each thread records the singletons it is waiting for, and each
/// singleton records the thread building it. A thread about to block follows
/// that wait-for chain and fails instead of blocking when the chain leads back
/// to itself.
#[derive(Default)]
pub(crate) struct BuildTracker {
  builders: DashMap<TypeKey, ThreadId>,
  waits: DashMap<ThreadId, Vec<TypeKey>>,
}

impl BuildTracker {
  /// Records that the current thread is about to wait for the singleton `key`.
  ///
  /// Fails with [`ResolveError::CircularDependency`] when waiting would
  /// deadlock. The record is pushed before the chain is inspected, so of two
  /// threads closing a cycle at the same time the later one always sees it.
  pub(crate) fn wait(&self, key: TypeKey) -> Result<WaitGuard<'_>> {
    let thread = thread::current().id();
    self.waits.entry(thread).or_default().push(key);
    let guard = WaitGuard {
      tracker: self,
      thread,
    };

    if self.leads_back_to(thread, key) {
      tracing::warn!(service = key.type_name(), "singleton cycle across threads detected");
      return Err(ResolveError::CircularDependency {
        label: key.type_name().to_owned(),
      });
    }
    Ok(guard)
  }

  /// Records that the current thread is running the factory of `key`.
  pub(crate) fn build(&self, key: TypeKey) -> BuildGuard<'_> {
    self.builders.insert(key, thread::current().id());
    BuildGuard { tracker: self, key }
  }

  fn builder_of(&self, key: &TypeKey) -> Option<ThreadId> {
    self.builders.get(key).map(|entry| *entry.value())
  }

  /// Whether the builder of `key`, or a thread it is blocked on, transitively,
  /// is `thread`.
  fn leads_back_to(&self, thread: ThreadId, key: TypeKey) -> bool {
    let mut visited = HashSet::new();
    let mut key = key;
    while visited.insert(key) {
      let Some(builder) = self.builder_of(&key) else {
        return false;
      };
      if builder == thread {
        return true;
      }
      // The innermost singleton the builder is waiting for. A builder whose
      // innermost record is its own singleton is running, not blocked.
      let next = self
        .waits
        .get(&builder)
        .and_then(|stack| stack.last().copied());
      match next {
        Some(next) if self.builder_of(&next) != Some(builder) => key = next,
        _ => return false,
      }
    }
    false
  }
}

pub(crate) struct WaitGuard<'a> {
  tracker: &'a BuildTracker,
  thread: ThreadId,
}

impl Drop for WaitGuard<'_> {
  fn drop(&mut self) {
    if let Some(mut stack) = self.tracker.waits.get_mut(&self.thread) {
      stack.pop();
    }
    self.tracker.waits.remove_if(&self.thread, |_, stack| stack.is_empty());
  }
}

pub(crate) struct BuildGuard<'a> {
  tracker: &'a BuildTracker,
  key: TypeKey,
}

impl Drop for BuildGuard<'_> {
  fn drop(&mut self) {
    let thread = thread::current().id();
    self.tracker.builders.remove_if(&self.key, |_, builder| *builder == thread);
  }
}

/// The identifier under which a type is registered and resolved.
///
/// Two keys are equal when they denote the same `TypeId`. The type name is kept
/// for diagnostics only.
#[derive(Clone, Copy)]
pub struct TypeKey {
  type_id: TypeId,
  type_name: &'static str,
}

impl TypeKey {
  /// The key of `T`. `T` may be unsized, e.g. `dyn Trait`.
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
    }
  }

  pub fn type_id(&self) -> TypeId {
    self.type_id
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }
}

impl PartialEq for TypeKey {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id
  }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
  }
}

impl fmt::Debug for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Key({})", self.type_name)
  }
}

impl fmt::Display for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.type_name)
  }
}

/// A type-erased, shared value produced by the container.
///
/// An `Instance` wraps an `Arc<T>`. Cloning it clones the `Arc`, so every
/// `Arc<T>` obtained through [`Instance::downcast`] points at the same value.
#[derive(Clone)]
pub struct Instance {
  key: TypeKey,
  value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
  /// Moves `value` into a fresh `Arc`.
  pub fn new<T: Any + Send + Sync>(value: T) -> Self {
    Self::from_arc(Arc::new(value))
  }

  /// Wraps an existing `Arc<T>` without re-allocating the value.
  pub fn from_arc<T: ?Sized + Any + Send + Sync>(value: Arc<T>) -> Self {
    Self {
      key: TypeKey::of::<T>(),
      value: Arc::new(value),
    }
  }

  /// The key of the type this instance was created as.
  pub fn type_key(&self) -> TypeKey {
    self.key
  }

  pub fn is<T: ?Sized + Any + Send + Sync>(&self) -> bool {
    self.value.is::<Arc<T>>()
  }

  /// Recovers the shared value as `Arc<T>`.
  pub fn downcast<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    self
      .value
      .downcast_ref::<Arc<T>>()
      .cloned()
      .ok_or_else(|| ResolveError::Downcast {
        expected: std::any::type_name::<T>(),
        actual: self.key.type_name(),
      })
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Instance").field("type", &self.key).finish()
  }
}
