use calcparse_rs::{Evaluator, Parser};
use std::collections::HashMap;

fn main() {
    pretty_env_logger::init();

    let contexts = vec![
        HashMap::from([
            ("price".to_string(), 120.0),
            ("volume".to_string(), 3000.0),
        ]),
        HashMap::from([
            ("price".to_string(), 80.0),
            ("volume".to_string(), 6000.0),
        ]),
        HashMap::from([("price".to_string(), 80.0)]),
    ];

    let expression = "price * volume / 1000";

    let parser = Parser::new();
    let ast = parser
        .parse_expression(expression)
        .expect("Failed to parse");

    let evaluator = Evaluator::new(parser.registry());
    for (i, result) in evaluator.evaluate_batch(&ast, &contexts).iter().enumerate() {
        println!("Result {}: {:?}", i, result);
    }
}
