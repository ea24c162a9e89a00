pub mod ast;
pub mod error;
pub mod functions;

pub use ast::{free_variables, Evaluator, Expression, Parser, Registry, Tier};
pub use error::{Error, EvalError, OperatorError, ParseError};

use std::collections::HashMap;

/// Parses `expression` with the default registry and evaluates it against `bindings`.
pub fn evaluate_expression(
    expression: &str,
    bindings: &HashMap<String, f64>,
) -> Result<f64, Error> {
    let parser = Parser::new();
    let ast = parser.parse_expression(expression)?;
    Ok(ast.evaluate(bindings, parser.registry())?)
}
