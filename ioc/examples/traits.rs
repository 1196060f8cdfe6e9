use autowire_ioc::{reflect, resolve, Container, Parameter, Reflect, TypeDefinition};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// 1. Define the abstraction (the trait) and mark it as abstract.
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}
reflect!(trait Logger);

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction, and declare its
//    constructor so the container can build it without a registration.
struct ReportService {
  logger: Arc<dyn Logger>,
  title: String,
}

impl Reflect for ReportService {
  fn reflect() -> TypeDefinition {
    TypeDefinition::constructible(
      [
        Parameter::object::<dyn Logger>("logger"),
        Parameter::with_default("title", String::from("Quarterly report")),
      ],
      |args| {
        Ok(ReportService {
          logger: args.object(0)?,
          title: args.value(1)?,
        })
      },
    )
  }
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log(&format!("Starting {}.", self.title));
    // ... logic to generate report ...
    self.logger.log(&format!("Finished {}.", self.title));
  }
}

fn main() {
  // Run with RUST_LOG=autowire_ioc=debug to see auto-registration.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let container = Container::new();

  // --- Registration ---

  // The container never guesses which type implements `dyn Logger`.
  container.singleton::<dyn Logger, _>(|_| Ok(Arc::new(ConsoleLogger)));

  // `ReportService` is not registered: it is built from its definition.
  println!("Resolving the high-level service...");
  let report_service = resolve!(container, ReportService);

  println!("Using the service...");
  report_service.generate_report();
}
