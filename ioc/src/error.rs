use thiserror::Error;

/// The boxed error returned by user factories, constructors and methods.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The error type for every fallible container operation.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// A type, parameter or method could not be satisfied by a registration,
  /// by inference, or by a default value.
  #[error("Unresolvable dependency [{label}]")]
  Unresolvable {
    label: String,
    #[source]
    cause: Option<BoxError>,
  },

  /// A type was requested again while it was still being constructed.
  #[error("Circular dependency detected while resolving [{label}]")]
  CircularDependency { label: String },

  /// An instance was asked for a type it was not created as.
  #[error("Instance of [{actual}] cannot be used as [{expected}]")]
  Downcast {
    expected: &'static str,
    actual: &'static str,
  },
}

impl ResolveError {
  pub fn unresolvable(label: impl Into<String>) -> Self {
    Self::Unresolvable {
      label: label.into(),
      cause: None,
    }
  }

  /// An unresolvable dependency that chains the error that caused it.
  pub fn unresolvable_because(label: impl Into<String>, cause: impl Into<BoxError>) -> Self {
    Self::Unresolvable {
      label: label.into(),
      cause: Some(cause.into()),
    }
  }

  /// The label carried by this error: a type name, a parameter name or a method
  /// description.
  pub fn label(&self) -> &str {
    match self {
      Self::Unresolvable { label, .. } | Self::CircularDependency { label } => label.as_str(),
      Self::Downcast { expected, .. } => *expected,
    }
  }

  /// Whether this error, or any error in its source chain, is a circular
  /// dependency.
  pub fn is_circular(&self) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(self);
    while let Some(err) = current {
      if let Some(ResolveError::CircularDependency { .. }) = err.downcast_ref::<ResolveError>() {
        return true;
      }
      current = err.source();
    }
    false
  }

  /// Turns the error of a user factory into a `ResolveError`. Errors that
  /// already are `ResolveError`s pass through untouched.
  pub(crate) fn from_boxed(label: &str, err: BoxError) -> Self {
    match err.downcast::<ResolveError>() {
      Ok(resolve_error) => *resolve_error,
      Err(other) => Self::unresolvable_because(label, other),
    }
  }
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
