use autowire_ioc::{resolve, Container, Reflect, TypeDefinition};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

impl Reflect for RequestTracker {
  fn reflect() -> TypeDefinition {
    TypeDefinition::constructible(Vec::new(), |_| Ok(RequestTracker::next()))
  }
}

impl RequestTracker {
  fn next() -> Self {
    RequestTracker {
      id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
    }
  }
}

// A thread-safe counter to generate unique IDs.
static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn main() {
  // --- Singleton Registration ---
  // This factory will only be called ONCE.
  let singletons = Container::new();
  singletons.singleton::<RequestTracker, _>(|_| {
    println!("Creating SINGLETON RequestTracker...");
    Ok(Arc::new(RequestTracker::next()))
  });

  // --- Plain Registration ---
  // This factory will be called EVERY time the service is resolved.
  let transients = Container::new();
  transients.register::<RequestTracker, _>(|_| {
    println!("Creating TRANSIENT RequestTracker...");
    Ok(Arc::new(RequestTracker::next()))
  });

  println!("--- Resolving Singletons ---");
  let s1 = resolve!(singletons, RequestTracker);
  let s2 = resolve!(singletons, RequestTracker);
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert_eq!(s1.id, 0);
  assert_eq!(s2.id, 0);
  assert!(
    Arc::ptr_eq(&s1, &s2),
    "Singleton instances should be identical"
  );
  println!("Singleton instances are the same pointer, as expected.\n");

  println!("--- Resolving Transients ---");
  let t1 = resolve!(transients, RequestTracker);
  let t2 = resolve!(transients, RequestTracker);
  println!("Transient 1 ID: {}, Transient 2 ID: {}", t1.id, t2.id);
  assert_eq!(t1.id, 1);
  assert_eq!(t2.id, 2);
  assert!(
    !Arc::ptr_eq(&t1, &t2),
    "Transient instances should be different"
  );
  println!("Transient instances are different pointers, as expected.");
}
