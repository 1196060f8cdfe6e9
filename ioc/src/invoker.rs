//! Method invocation with container-resolved arguments.

use crate::container::Container;
use crate::error::{BoxError, ResolveError, Result};
use crate::reflect::Reflect;
use crate::types::Instance;

impl Container {
  /// Calls the method `method` declared in `T`'s definition on `object`,
  /// resolving its parameters the same way constructor parameters are
  /// resolved, and returns the method's result.
  ///
  /// # Errors
  ///
  /// Any failure, whether the method is unknown, a parameter cannot be
  /// resolved or the method itself returns an error, is reported as
  /// [`ResolveError::Unresolvable`] labelled `Unable to call [method]`, with
  /// the original error as its source.
  pub fn call<T: Reflect>(&self, object: &T, method: &str) -> Result<Instance> {
    self
      .invoke(object, method)
      .map_err(|cause| ResolveError::unresolvable_because(format!("Unable to call [{}]", method), cause))
  }

  fn invoke<T: Reflect>(&self, object: &T, method: &str) -> std::result::Result<Instance, BoxError> {
    let definition = T::reflect();
    let callee = definition.method_named(method).ok_or_else(|| {
      ResolveError::unresolvable(format!("{} has no method {}", definition.key(), method))
    })?;

    let arguments = self.resolve_parameters(callee.parameters())?;
    callee.invoke(object, &arguments)
  }
}
