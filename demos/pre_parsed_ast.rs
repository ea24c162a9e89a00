use calcparse_rs::{Evaluator, Expression, Registry};
use std::collections::HashMap;

fn main() {
    pretty_env_logger::init();

    let registry = Registry::with_defaults();
    let evaluator = Evaluator::new(&registry);

    // (price - cost) * sqrt(volume)
    let ast = Expression::binary(
        "*",
        Expression::binary("-", Expression::term("price"), Expression::term("cost")),
        Expression::function("sqrt", vec![Expression::term("volume")]),
    );
    println!("{}", ast);

    let context: HashMap<String, f64> = [
        ("price".to_string(), 120.0),
        ("cost".to_string(), 100.0),
        ("volume".to_string(), 16.0),
    ]
    .iter()
    .cloned()
    .collect();

    match evaluator.evaluate(&ast, &context) {
        Ok(result) => println!("Result: {}", result),
        Err(err) => println!("Error: {}", err),
    }
}
