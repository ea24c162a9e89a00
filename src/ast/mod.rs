use crate::error::{EvalError, OperatorKind};
use log::trace;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

mod evaluator;
mod parser;
mod registry;

pub use evaluator::*;
pub use parser::Parser;
pub use registry::*;

/// Parsed expression tree. Every node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A numeric literal, a variable name, or empty for zero.
    Term(String),
    Binary {
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        operator: String,
        operand: Box<Expression>,
    },
    Function {
        name: String,
        args: Vec<Expression>,
    },
}

/// Reads `payload` as a decimal literal: digits with at most one `.`. Words such as `inf`,
/// `nan` or exponent forms like `2e3` are not literals.
pub(crate) fn parse_literal(payload: &str) -> Option<f64> {
    let mut digits = 0;
    let mut dots = 0;
    for c in payload.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    payload.parse().ok()
}

impl Expression {
    /// The empty term, evaluating to zero.
    pub fn zero() -> Self {
        Expression::Term(String::new())
    }

    pub fn term(payload: impl Into<String>) -> Self {
        Expression::Term(payload.into())
    }

    pub fn binary(operator: impl Into<String>, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            operator: operator.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(operator: impl Into<String>, operand: Expression) -> Self {
        Expression::Unary {
            operator: operator.into(),
            operand: Box::new(operand),
        }
    }

    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Function {
            name: name.into(),
            args,
        }
    }

    /// Evaluates the tree. Children are evaluated left to right and the first failure
    /// is returned unchanged.
    pub fn evaluate(
        &self,
        bindings: &HashMap<String, f64>,
        registry: &Registry,
    ) -> Result<f64, EvalError> {
        match self {
            Expression::Term(payload) => {
                if payload.is_empty() {
                    return Ok(0.0);
                }
                if let Some(value) = parse_literal(payload) {
                    return Ok(value);
                }
                bindings
                    .get(payload)
                    .copied()
                    .ok_or_else(|| EvalError::UndefinedVariable {
                        name: payload.clone(),
                    })
            }

            Expression::Binary {
                operator,
                left,
                right,
            } => {
                let left_value = left.evaluate(bindings, registry)?;
                let right_value = right.evaluate(bindings, registry)?;
                let tier = registry.lookup_binary(operator).ok_or_else(|| {
                    EvalError::UnsupportedOperator {
                        kind: OperatorKind::Binary,
                        name: operator.clone(),
                    }
                })?;
                trace!("{left_value} {operator} {right_value}");
                registry.apply(tier, operator, &[left_value, right_value])
            }

            Expression::Unary { operator, operand } => {
                let value = operand.evaluate(bindings, registry)?;
                let tier = registry.lookup_unary(operator).ok_or_else(|| {
                    EvalError::UnsupportedOperator {
                        kind: OperatorKind::Unary,
                        name: operator.clone(),
                    }
                })?;
                trace!("{operator} {value}");
                registry.apply(tier, operator, &[value])
            }

            Expression::Function { name, args } => {
                let values = args
                    .iter()
                    .map(|arg| arg.evaluate(bindings, registry))
                    .collect::<Result<Vec<f64>, EvalError>>()?;
                if !registry.contains_function(name) {
                    return Err(EvalError::UnsupportedOperator {
                        kind: OperatorKind::Function,
                        name: name.clone(),
                    });
                }
                trace!("{name}{values:?}");
                registry.apply(Tier::Prefix, name, &values)
            }
        }
    }

    /// Fully parenthesized prefix form, e.g. `( + 1 a )` or `( foo ( 2,4,9 ) )`.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Adds every variable name in the tree to `vars`. Literals and empty terms are skipped.
    pub fn collect_variables(&self, vars: &mut BTreeSet<String>) {
        match self {
            Expression::Term(payload) => {
                if !payload.is_empty() && parse_literal(payload).is_none() {
                    vars.insert(payload.clone());
                }
            }
            Expression::Binary { left, right, .. } => {
                left.collect_variables(vars);
                right.collect_variables(vars);
            }
            Expression::Unary { operand, .. } => operand.collect_variables(vars),
            Expression::Function { args, .. } => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Term(payload) if payload.is_empty() => write!(f, "0"),
            Expression::Term(payload) => write!(f, "{payload}"),
            Expression::Binary {
                operator,
                left,
                right,
            } => write!(f, "( {operator} {left} {right} )"),
            Expression::Unary { operator, operand } => write!(f, "( {operator} {operand} )"),
            Expression::Function { name, args } => {
                let args = args
                    .iter()
                    .map(Expression::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "( {name} ( {args} ) )")
            }
        }
    }
}

/// Distinct variable names used in `expression`, sorted.
pub fn free_variables(expression: &Expression) -> Vec<String> {
    let mut vars = BTreeSet::new();
    expression.collect_variables(&mut vars);
    vars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn average_registry() -> Registry {
        let mut registry = Registry::with_defaults();
        registry.register("foo", |args| {
            if args.len() != 2 {
                return Err("need 2 args".into());
            }
            Ok(args[0] + args[1])
        });
        registry.register("average", |args| {
            if args.is_empty() {
                return Err("need 1 or more args".into());
            }
            Ok(args.iter().sum::<f64>() / args.len() as f64)
        });
        registry
    }

    #[test]
    fn test_term_evaluation() {
        let registry = Registry::with_defaults();
        let bindings = HashMap::from([("x".to_string(), 2.5)]);

        assert_eq!(Expression::zero().evaluate(&bindings, &registry), Ok(0.0));
        assert_eq!(Expression::term("12.5").evaluate(&bindings, &registry), Ok(12.5));
        assert_eq!(Expression::term("x").evaluate(&bindings, &registry), Ok(2.5));
        assert_eq!(
            Expression::term("y").evaluate(&bindings, &registry),
            Err(EvalError::UndefinedVariable {
                name: "y".to_string()
            })
        );
    }

    #[test]
    fn test_literal_detection() {
        assert_eq!(parse_literal("42"), Some(42.0));
        assert_eq!(parse_literal(".5"), Some(0.5));
        assert_eq!(parse_literal("3."), Some(3.0));
        assert_eq!(parse_literal("inf"), None);
        assert_eq!(parse_literal("NaN"), None);
        assert_eq!(parse_literal("2x"), None);
        assert_eq!(parse_literal(""), None);
        assert_eq!(parse_literal("."), None);
        assert_eq!(parse_literal("1.2.3"), None);
        assert_eq!(parse_literal("2e3"), None);
        assert_eq!(parse_literal("1E-2"), None);
    }

    #[test]
    fn test_exponent_form_is_a_variable() {
        let registry = Registry::with_defaults();
        let tree = Expression::term("2e3");
        assert_eq!(free_variables(&tree), vec!["2e3"]);
        assert_eq!(
            tree.evaluate(&HashMap::new(), &registry),
            Err(EvalError::UndefinedVariable {
                name: "2e3".to_string()
            })
        );
        let bindings = HashMap::from([("2e3".to_string(), 7.0)]);
        assert_eq!(tree.evaluate(&bindings, &registry), Ok(7.0));
    }

    #[test]
    fn test_hand_built_function_tree() {
        let registry = average_registry();
        let bindings = HashMap::new();
        let average = Expression::function(
            "average",
            vec![
                Expression::term("2"),
                Expression::term("4"),
                Expression::term("9"),
            ],
        );
        assert_eq!(average.evaluate(&bindings, &registry), Ok(5.0));

        let foo = Expression::function("foo", vec![average, Expression::term("100")]);
        assert_eq!(foo.evaluate(&bindings, &registry), Ok(105.0));

        let wrong_arity = Expression::function(
            "foo",
            vec![
                Expression::term("2"),
                Expression::term("4"),
                Expression::term("9"),
            ],
        );
        assert!(matches!(
            wrong_arity.evaluate(&bindings, &registry),
            Err(EvalError::Operator { .. })
        ));
    }

    #[test]
    fn test_first_failure_wins() {
        let registry = Registry::with_defaults();
        let tree = Expression::binary("+", Expression::term("a"), Expression::term("b"));
        assert_eq!(
            tree.evaluate(&HashMap::new(), &registry),
            Err(EvalError::UndefinedVariable {
                name: "a".to_string()
            })
        );
    }

    #[test]
    fn test_unsupported_operators() {
        let registry = Registry::with_defaults();
        let bindings = HashMap::new();

        let binary = Expression::binary("&", Expression::term("1"), Expression::term("2"));
        assert_eq!(
            binary.evaluate(&bindings, &registry),
            Err(EvalError::UnsupportedOperator {
                kind: OperatorKind::Binary,
                name: "&".to_string()
            })
        );

        let unary = Expression::unary("*", Expression::term("1"));
        assert_eq!(
            unary.evaluate(&bindings, &registry),
            Err(EvalError::UnsupportedOperator {
                kind: OperatorKind::Unary,
                name: "*".to_string()
            })
        );

        let function = Expression::function("nope", vec![]);
        assert_eq!(
            function.evaluate(&bindings, &registry),
            Err(EvalError::UnsupportedOperator {
                kind: OperatorKind::Function,
                name: "nope".to_string()
            })
        );
    }

    #[test]
    fn test_render() {
        let tree = Expression::binary(
            "^",
            Expression::term("2"),
            Expression::function(
                "sqrt",
                vec![Expression::binary(
                    "+",
                    Expression::term("14"),
                    Expression::term("2"),
                )],
            ),
        );
        assert_eq!(tree.render(), "( ^ 2 ( sqrt ( ( + 14 2 ) ) ) )");

        let foo = Expression::function(
            "foo",
            vec![
                Expression::term("2"),
                Expression::term("4"),
                Expression::term("9"),
            ],
        );
        assert_eq!(foo.render(), "( foo ( 2,4,9 ) )");
        assert_eq!(Expression::zero().render(), "0");
        assert_eq!(
            Expression::unary("-", Expression::term("4")).render(),
            "( - 4 )"
        );
    }

    #[test]
    fn test_collect_variables() {
        let tree = Expression::function(
            "foo",
            vec![
                Expression::binary("+", Expression::term("a"), Expression::term("b")),
                Expression::term("c"),
                Expression::term("a"),
                Expression::term("7"),
                Expression::zero(),
            ],
        );
        assert_eq!(free_variables(&tree), vec!["a", "b", "c"]);
        assert!(free_variables(&Expression::function("foo", vec![])).is_empty());
    }
}
