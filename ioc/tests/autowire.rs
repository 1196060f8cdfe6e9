mod common;

use autowire_ioc::{Container, ResolveError};
use common::*;
use pretty_assertions::assert_eq;
use std::error::Error;
use std::sync::Arc;

fn bind_transport(container: &Container) {
  container.register::<dyn Transport, _>(|_| Ok(Arc::new(SmtpTransport)));
}

// --- Unresolvable ---

#[test]
fn test_unregistered_abstract_type_is_unresolvable() {
  let container = Container::new();

  let err = container.resolve::<dyn Cipher>().err().unwrap();

  assert!(matches!(err, ResolveError::Unresolvable { .. }));
  assert_eq!(err.label(), std::any::type_name::<dyn Cipher>());
  assert!(!container.is_registered::<dyn Cipher>());
}

#[test]
fn test_dependency_on_unregistered_abstract_type_is_unresolvable() {
  let container = Container::new();

  let err = container.resolve::<SecureMailer>().err().unwrap();

  assert!(matches!(err, ResolveError::Unresolvable { .. }));
  assert_eq!(err.label(), std::any::type_name::<SecureMailer>());
  // The failing dependency is reported as the cause.
  let cause = err.source().unwrap().downcast_ref::<ResolveError>().unwrap();
  assert_eq!(cause.label(), std::any::type_name::<dyn Cipher>());
  // Nothing is registered for the type that failed.
  assert!(!container.is_registered::<SecureMailer>());
}

#[test]
fn test_scalar_without_default_is_unresolvable() {
  let container = Container::new();
  bind_transport(&container);

  let err = container.resolve::<Campaign>().err().unwrap();

  assert_eq!(err.label(), std::any::type_name::<Campaign>());
  let cause = err.source().unwrap().downcast_ref::<ResolveError>().unwrap();
  assert_eq!(cause.label(), "subject");
}

#[test]
fn test_definition_of_another_type_is_unresolvable() {
  let container = Container::new();

  let err = container.resolve::<Misdescribed>().err().unwrap();

  assert_eq!(err.label(), std::any::type_name::<Misdescribed>());
  let cause = err.source().unwrap().to_string();
  assert!(cause.contains(std::any::type_name::<Clock>()), "{}", cause);
  assert!(!container.is_registered::<Misdescribed>());
  assert!(!container.is_registered::<Clock>());
}

#[test]
fn test_failing_constructor_is_unresolvable_with_its_cause() {
  let container = Container::new();

  let err = container.resolve::<Unreachable>().err().unwrap();

  assert!(matches!(err, ResolveError::Unresolvable { .. }));
  assert_eq!(err.label(), std::any::type_name::<Unreachable>());
  assert_eq!(err.source().unwrap().to_string(), "relay host unreachable");
  // Its dependencies resolved, so the derived factory stays registered and
  // keeps failing on every resolution.
  assert!(container.is_registered::<Unreachable>());
  assert!(container.is_registered::<Clock>());
  assert_eq!(
    container.resolve::<Unreachable>().err().unwrap().label(),
    std::any::type_name::<Unreachable>()
  );
}

#[test]
fn test_unresolvable_type_becomes_resolvable_after_registration() {
  let container = Container::new();
  assert!(container.resolve::<Campaign>().is_err());

  container.register::<Campaign, _>(|c| {
    Ok(Arc::new(Campaign {
      mailer: c.resolve()?,
      subject: String::from("launch"),
    }))
  });
  bind_transport(&container);

  let campaign = container.resolve::<Campaign>().unwrap();
  assert_eq!(campaign.subject, "launch");
}

// --- Resolvable ---

#[test]
fn test_type_without_constructor_is_default_constructed() {
  let container = Container::new();

  assert!(!container.is_registered::<Clock>());
  let clock = container.resolve::<Clock>();

  assert!(clock.is_ok());
  // The derived factory is cached in the registry.
  assert!(container.is_registered::<Clock>());
}

#[test]
fn test_concrete_dependencies_are_resolved() {
  let container = Container::new();

  let scheduler = container.resolve::<Scheduler>().unwrap();

  assert_eq!(scheduler.transport.name(), "smtp");
  assert!(container.is_registered::<Scheduler>());
  assert!(container.is_registered::<Clock>());
  assert!(container.is_registered::<SmtpTransport>());
}

#[test]
fn test_registered_abstract_dependency_is_injected() {
  let container = Container::new();
  bind_transport(&container);

  let mailer = container.resolve::<Mailer>().unwrap();

  assert_eq!(mailer.transport.name(), "smtp");
}

#[test]
fn test_deep_dependency_graph_is_resolved() {
  let container = Container::new();
  bind_transport(&container);

  let newsletter = container.resolve::<Newsletter>().unwrap();

  assert_eq!(newsletter.transport.name(), "smtp");
  assert_eq!(newsletter.mailer.transport.name(), "smtp");
}

#[test]
fn test_singleton_dependency_is_shared_across_the_graph() {
  let container = Container::new();
  container.singleton::<dyn Transport, _>(|_| Ok(Arc::new(SmtpTransport)));

  let newsletter = container.resolve::<Newsletter>().unwrap();

  assert!(Arc::ptr_eq(&newsletter.transport, &newsletter.mailer.transport));
}

#[test]
fn test_scalar_default_is_used_verbatim() {
  let container = Container::new();
  bind_transport(&container);

  let digest = container.resolve::<Digest>().unwrap();

  assert_eq!(digest.subject, "weekly digest");
}

#[test]
fn test_default_between_object_parameters() {
  let container = Container::new();

  let window = container.resolve::<Window>().unwrap();

  assert_eq!(window.label, "daily");
}

#[test]
fn test_registered_dependency_wins_over_auto_wiring() {
  let container = Container::new();
  let clock = Arc::new(Clock);
  container.instance(clock.clone());

  let window = container.resolve::<Window>().unwrap();

  assert!(Arc::ptr_eq(&window.opens, &clock));
  assert!(Arc::ptr_eq(&window.closes, &clock));
}

#[test]
fn test_derived_factory_reuses_the_arguments_it_was_built_with() {
  // Constructor arguments are resolved once, when the factory is derived.
  let container = Container::new();

  let first = container.resolve::<Scheduler>().unwrap();
  let second = container.resolve::<Scheduler>().unwrap();

  assert!(!Arc::ptr_eq(&first, &second));
  assert!(Arc::ptr_eq(&first.clock, &second.clock));
  assert!(Arc::ptr_eq(&first.transport, &second.transport));
}

#[test]
fn test_explicit_registration_replaces_derived_factory() {
  let container = Container::new();
  let auto = container.resolve::<Clock>().unwrap();

  let explicit = Arc::new(Clock);
  container.instance(explicit.clone());
  let resolved = container.resolve::<Clock>().unwrap();

  assert!(!Arc::ptr_eq(&auto, &resolved));
  assert!(Arc::ptr_eq(&explicit, &resolved));
}
