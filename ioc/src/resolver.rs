//! Auto-registration: deriving factories for unregistered types from their
//! [`TypeDefinition`](crate::TypeDefinition), and resolving parameter lists.

use crate::container::{Container, Factory};
use crate::error::{ResolveError, Result};
use crate::reflect::{Arguments, Introspector, Parameter, ParameterKind};
use crate::types::{Instance, TypeKey};
use std::sync::Arc;

impl Container {
  /// Introspects `key`, resolves its constructor arguments and registers a
  /// factory that builds the type from exactly those arguments.
  ///
  /// Returns the factory now registered for `key`. An explicit registration
  /// made in the meantime takes precedence over the derived one.
  pub(crate) fn auto_register(
    &self,
    key: TypeKey,
    introspect: Option<Introspector>,
  ) -> Result<Factory> {
    let introspect = introspect
      .ok_or_else(|| ResolveError::unresolvable(format!("{} is not registered", key)))?;

    let definition = introspect();
    if definition.key() != key {
      return Err(ResolveError::unresolvable(format!(
        "definition of {} describes {}",
        key,
        definition.key()
      )));
    }

    let constructor = definition.into_constructor().ok_or_else(|| {
      ResolveError::unresolvable(format!("{} is abstract and has no registration", key))
    })?;

    // Arguments are resolved once, here; the derived factory reuses them.
    let arguments = self.resolve_parameters(&constructor.parameters)?;
    tracing::debug!(
      service = key.type_name(),
      parameters = arguments.len(),
      "auto-registering"
    );

    let build = constructor.build;
    let factory: Factory = Arc::new(move |_: &Container| {
      build(&arguments).map_err(|err| ResolveError::from_boxed(key.type_name(), err))
    });
    Ok(self.insert_factory_if_absent(key, factory))
  }

  /// Resolves `parameters` in declaration order. The first parameter that
  /// cannot be resolved aborts the whole list.
  pub(crate) fn resolve_parameters(&self, parameters: &[Parameter]) -> Result<Arguments> {
    parameters
      .iter()
      .map(|parameter| self.resolve_parameter(parameter))
      .collect::<Result<Vec<_>>>()
      .map(Arguments::new)
  }

  fn resolve_parameter(&self, parameter: &Parameter) -> Result<Instance> {
    match parameter.kind() {
      ParameterKind::Object { key, introspect } => self.resolve_instance(key, Some(introspect)),
      ParameterKind::Scalar { .. } => parameter
        .default_value()
        .cloned()
        .ok_or_else(|| ResolveError::unresolvable(parameter.name())),
    }
  }
}
