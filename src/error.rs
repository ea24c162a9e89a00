use std::fmt;
use thiserror::Error;

/// Failure raised by an individual operator or function implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperatorError {
    #[error("incorrect count of args for {operator}: need {expected}, but got {actual}")]
    ArgumentCount {
        operator: String,
        expected: usize,
        actual: usize,
    },

    #[error("incorrect divisor for {operator}")]
    ZeroDivisor { operator: String },

    #[error("{operator} argument is out of domain: {value}")]
    Domain { operator: String, value: f64 },

    #[error("{0}")]
    Custom(String),
}

impl From<String> for OperatorError {
    fn from(message: String) -> Self {
        OperatorError::Custom(message)
    }
}

impl From<&str> for OperatorError {
    fn from(message: &str) -> Self {
        OperatorError::Custom(message.to_string())
    }
}

/// Syntax errors. Parsing stops at the first one and returns no tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("incorrect parenthesis at {position} position")]
    UnbalancedParenthesis { position: usize },

    #[error("function '{name}' is not supported (at {position})")]
    UnknownFunction { name: String, position: usize },

    #[error("operator '{operator}' at {position} is missing an operand")]
    MissingOperand { operator: char, position: usize },

    #[error("unexpected characters after closing parenthesis at {position}")]
    TrailingCharacters { position: usize },

    #[error("unexpected '{character}' at {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("malformed expression: {0}")]
    Malformed(String),
}

/// Which registry lookup failed for an operator node.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OperatorKind {
    Unary,
    Binary,
    Function,
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorKind::Unary => write!(f, "unary operation"),
            OperatorKind::Binary => write!(f, "binary operation"),
            OperatorKind::Function => write!(f, "function"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("value '{name}' not found in bindings")]
    UndefinedVariable { name: String },

    #[error("not supported {kind}: '{name}'")]
    UnsupportedOperator { kind: OperatorKind, name: String },

    #[error("'{name}' failed: {source}")]
    Operator {
        name: String,
        #[source]
        source: OperatorError,
    },

    #[error("no expression has been parsed")]
    NoExpression,
}

/// Crate-level error for the one-shot helpers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
