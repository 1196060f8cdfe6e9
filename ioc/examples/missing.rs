use autowire_ioc::{reflect, resolve, Container};
use std::panic;

trait PaymentGateway: Send + Sync {}
reflect!(trait PaymentGateway);

fn main() {
  let container = Container::new();

  // --- Using the panicking `resolve!` macro ---
  println!("Attempting to resolve an abstract type that was never registered...");

  let result = panic::catch_unwind(|| {
    // This line will panic!
    let _gateway = resolve!(Container::new(), trait PaymentGateway);
  });

  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Successfully caught the expected panic from resolve!.");

  // --- Using the fallible `resolve()` method ---
  println!("\nNow, attempting to resolve using the fallible `resolve()` method...");

  match container.resolve::<dyn PaymentGateway>() {
    Ok(_) => panic!("Should not have resolved the gateway!"),
    Err(err) => println!("Correctly received an error: {}", err),
  }
}
