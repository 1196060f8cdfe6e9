use autowire_ioc::{Container, Parameter, Reflect, TypeDefinition};
use std::sync::Arc;

struct DataSource {
  rows: Vec<String>,
}

struct Report {
  source: Arc<DataSource>,
}

impl Reflect for DataSource {
  fn reflect() -> TypeDefinition {
    // Needs its rows handed in; it cannot be auto-wired.
    TypeDefinition::constructible([Parameter::scalar::<Vec<String>>("rows")], |args| {
      Ok(DataSource {
        rows: args.value(0)?,
      })
    })
  }
}

impl Reflect for Report {
  fn reflect() -> TypeDefinition {
    TypeDefinition::constructible([Parameter::object::<DataSource>("source")], |args| {
      Ok(Report {
        source: args.object(0)?,
      })
    })
  }
}

// A function that runs against whatever container it is given, so it can be
// exercised with a controlled environment.
fn process_data(container: &Container) -> autowire_ioc::Result<String> {
  let report = container.resolve::<Report>()?;
  Ok(format!("Processed: {}", report.source.rows.join(",").to_uppercase()))
}

fn main() {
  println!("--- Running with a test container ---");
  let test_container = Container::new();
  test_container.instance(Arc::new(DataSource {
    rows: vec!["a".to_string(), "b".to_string()],
  }));

  let result = process_data(&test_container).expect("test data is registered");
  println!("Result: {}", result);
  assert_eq!(result, "Processed: A,B");

  // --- Verify Isolation ---
  // Nothing registered in `test_container` exists in a fresh container.
  let other = Container::new();
  match process_data(&other) {
    Ok(_) => panic!("Dependency should not have leaked into another container!"),
    Err(err) => println!("\nFresh container cannot build the report: {}", err),
  }
}
