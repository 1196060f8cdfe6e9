#![allow(dead_code)]

//! Fixture types shared by the integration tests.

use autowire_ioc::{reflect, BoxError, Parameter, Reflect, TypeDefinition};
use std::sync::Arc;

// --- Abstractions ---

/// Bound to `SmtpTransport` by the tests that need it.
pub trait Transport: Send + Sync {
  fn name(&self) -> &'static str;
}
reflect!(trait Transport);

/// Never bound to an implementation.
pub trait Cipher: Send + Sync {}
reflect!(trait Cipher);

// --- Leaf services ---

#[derive(Default)]
pub struct Clock;
reflect!(Clock);

#[derive(Default)]
pub struct SmtpTransport;
reflect!(SmtpTransport);

impl Transport for SmtpTransport {
  fn name(&self) -> &'static str {
    "smtp"
  }
}

// --- Services with constructor dependencies ---

/// Depends on two concrete types.
pub struct Scheduler {
  pub clock: Arc<Clock>,
  pub transport: Arc<SmtpTransport>,
}

impl Reflect for Scheduler {
  fn reflect() -> TypeDefinition {
    TypeDefinition::constructible(
      [
        Parameter::object::<Clock>("clock"),
        Parameter::object::<SmtpTransport>("transport"),
      ],
      |args| {
        Ok(Scheduler {
          clock: args.object(0)?,
          transport: args.object(1)?,
        })
      },
    )
  }
}

/// Depends on a concrete type and on the `Transport` abstraction.
pub struct Mailer {
  pub clock: Arc<Clock>,
  pub transport: Arc<dyn Transport>,
}

impl Reflect for Mailer {
  fn reflect() -> TypeDefinition {
    TypeDefinition::constructible(
      [
        Parameter::object::<Clock>("clock"),
        Parameter::object::<dyn Transport>("transport"),
      ],
      |args| {
        Ok(Mailer {
          clock: args.object(0)?,
          transport: args.object(1)?,
        })
      },
    )
  }
}

/// Depends on the never-bound `Cipher` abstraction.
pub struct SecureMailer {
  pub clock: Arc<Clock>,
  pub cipher: Arc<dyn Cipher>,
}

impl Reflect for SecureMailer {
  fn reflect() -> TypeDefinition {
    TypeDefinition::constructible(
      [
        Parameter::object::<Clock>("clock"),
        Parameter::object::<dyn Cipher>("cipher"),
      ],
      |args| {
        Ok(SecureMailer {
          clock: args.object(0)?,
          cipher: args.object(1)?,
        })
      },
    )
  }
}

/// Two levels deep: `Newsletter -> Mailer -> (Clock, dyn Transport)`.
pub struct Newsletter {
  pub mailer: Arc<Mailer>,
  pub transport: Arc<dyn Transport>,
}

impl Reflect for Newsletter {
  fn reflect() -> TypeDefinition {
    TypeDefinition::constructible(
      [
        Parameter::object::<Mailer>("mailer"),
        Parameter::object::<dyn Transport>("transport"),
      ],
      |args| {
        Ok(Newsletter {
          mailer: args.object(0)?,
          transport: args.object(1)?,
        })
      },
    )
  }
}

/// Takes a scalar without a default, so it can never be auto-wired.
pub struct Campaign {
  pub mailer: Arc<Mailer>,
  pub subject: String,
}

impl Reflect for Campaign {
  fn reflect() -> TypeDefinition {
    TypeDefinition::constructible(
      [
        Parameter::object::<Mailer>("mailer"),
        Parameter::scalar::<String>("subject"),
      ],
      |args| {
        Ok(Campaign {
          mailer: args.object(0)?,
          subject: args.value(1)?,
        })
      },
    )
  }
}

/// Takes a scalar with a default.
pub struct Digest {
  pub mailer: Arc<Mailer>,
  pub subject: String,
}

impl Reflect for Digest {
  fn reflect() -> TypeDefinition {
    TypeDefinition::constructible(
      [
        Parameter::object::<Mailer>("mailer"),
        Parameter::with_default("subject", String::from("weekly digest")),
      ],
      |args| {
        Ok(Digest {
          mailer: args.object(0)?,
          subject: args.value(1)?,
        })
      },
    )
  }
}

/// A defaulted scalar between two object parameters.
pub struct Window {
  pub opens: Arc<Clock>,
  pub label: String,
  pub closes: Arc<Clock>,
}

impl Reflect for Window {
  fn reflect() -> TypeDefinition {
    TypeDefinition::constructible(
      [
        Parameter::object::<Clock>("opens"),
        Parameter::with_default("label", String::from("daily")),
        Parameter::object::<Clock>("closes"),
      ],
      |args| {
        Ok(Window {
          opens: args.object(0)?,
          label: args.value(1)?,
          closes: args.object(2)?,
        })
      },
    )
  }
}

// --- A service with callable methods ---

#[derive(Debug, thiserror::Error)]
#[error("dispatcher is offline")]
pub struct Offline;

pub struct Dispatcher {
  pub prefix: &'static str,
}

impl Reflect for Dispatcher {
  fn reflect() -> TypeDefinition {
    TypeDefinition::constructible(Vec::new(), |_| Ok(Dispatcher { prefix: "mail" }))
      .method(
        "handle",
        [Parameter::object::<Clock>("clock")],
        |_: &Dispatcher, args| args.object::<Clock>(0).map_err(BoxError::from),
      )
      .method(
        "route",
        [
          Parameter::object::<dyn Transport>("transport"),
          Parameter::with_default("queue", String::from("outbox")),
        ],
        |this: &Dispatcher, args| {
          let transport = args.object::<dyn Transport>(0)?;
          let queue = args.value::<String>(1)?;
          Ok(Arc::new(format!("{}/{}/{}", this.prefix, transport.name(), queue)))
        },
      )
      .method(
        "encrypt",
        [Parameter::object::<dyn Cipher>("cipher")],
        |_: &Dispatcher, _| Ok(Arc::new(())),
      )
      .method("shutdown", Vec::new(), |_: &Dispatcher, _| {
        Err::<Arc<()>, BoxError>(Box::new(Offline))
      })
  }
}

/// Describes `Clock` instead of itself.
pub struct Misdescribed;

impl Reflect for Misdescribed {
  fn reflect() -> TypeDefinition {
    TypeDefinition::default_constructible::<Clock>()
  }
}

/// Its dependencies resolve, but building it always fails.
pub struct Unreachable {
  pub clock: Arc<Clock>,
}

impl Reflect for Unreachable {
  fn reflect() -> TypeDefinition {
    TypeDefinition::constructible(
      [Parameter::object::<Clock>("clock")],
      |_| -> Result<Unreachable, BoxError> { Err("relay host unreachable".into()) },
    )
  }
}
