use calcparse_macros::calc_fn;
use calcparse_rs::{free_variables, OperatorError, Parser};
use log::debug;
use std::collections::HashMap;

#[calc_fn]
fn hypot(a: f64, b: f64) -> Result<f64, OperatorError> {
    Ok(a.hypot(b))
}

fn average(args: &[f64]) -> Result<f64, OperatorError> {
    if args.is_empty() {
        return Err("need 1 or more args".into());
    }
    Ok(args.iter().sum::<f64>() / args.len() as f64)
}

fn main() {
    pretty_env_logger::init();

    let mut parser = Parser::new();
    parser.register_function("hypot", hypot);
    parser.register_function("average", average);

    let expr = "hypot(x, y) + average(2, 4, 9) * -z";
    let tree = match parser.parse(expr) {
        Ok(tree) => tree,
        Err(err) => {
            println!("Error: {}", err);
            return;
        }
    };
    debug!("tree: {tree:?}");
    println!("{expr}\n  => {tree}");
    println!("variables: {:?}", free_variables(tree));

    let context = HashMap::from([
        ("x".to_string(), 3.0),
        ("y".to_string(), 4.0),
        ("z".to_string(), 0.5),
    ]);

    match parser.evaluate(&context) {
        Ok(result) => println!("Result: {}", result),
        Err(err) => println!("Error: {}", err),
    }
}
