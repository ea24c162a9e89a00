use crate::ast::{Expression, Registry, Tier};
use crate::error::{EvalError, OperatorError, ParseError};
use log::debug;
use std::collections::HashMap;
use std::fmt;

/// Expression parser holding an operator registry and the most recently parsed tree.
///
/// There is no separate lexer: the whitespace-free input is split recursively at the
/// last depth-0 operator of the lowest precedence tier, which yields left-associative
/// trees with conventional precedence.
#[derive(Debug, Clone)]
pub struct Parser {
    registry: Registry,
    expression: Option<Expression>,
}

impl Parser {
    /// A parser seeded with the default operators and functions.
    pub fn new() -> Self {
        Self::with_registry(Registry::with_defaults())
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            expression: None,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Registers a user function, replacing any function with the same name.
    pub fn register_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&[f64]) -> Result<f64, OperatorError> + Send + Sync + 'static,
    {
        self.registry.register(name, function);
    }

    /// The tree stored by the last successful [`Parser::parse`].
    pub fn expression(&self) -> Option<&Expression> {
        self.expression.as_ref()
    }

    /// Parses `input` and stores the tree as the current expression.
    ///
    /// A failed parse leaves the parser without a current expression.
    pub fn parse(&mut self, input: &str) -> Result<&Expression, ParseError> {
        self.expression = None;
        let expression = self.parse_expression(input)?;
        Ok(self.expression.insert(expression))
    }

    /// Parses `input` without touching the current expression.
    pub fn parse_expression(&self, input: &str) -> Result<Expression, ParseError> {
        debug!("Parsing expression: {}", input);
        check_parentheses(input)?;

        let chars: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
        let expression = self.parse_slice(&chars, 0)?;

        debug!("Parse result: {}", expression);
        Ok(expression)
    }

    /// Evaluates the current expression against `bindings`.
    pub fn evaluate(&self, bindings: &HashMap<String, f64>) -> Result<f64, EvalError> {
        self.expression
            .as_ref()
            .ok_or(EvalError::NoExpression)?
            .evaluate(bindings, &self.registry)
    }

    /// `offset` is the position of `chars[0]` in the whitespace-free input.
    fn parse_slice(&self, chars: &[char], offset: usize) -> Result<Expression, ParseError> {
        if chars.is_empty() {
            return Ok(Expression::zero());
        }

        if let Some(expression) = self.split_operator(chars, offset)? {
            return Ok(expression);
        }

        if let Some(expression) = self.parse_call(chars, offset)? {
            return Ok(expression);
        }

        if chars[0] == '(' {
            let close = matching_close(chars, 0)?;
            if close != chars.len() - 1 {
                return Err(ParseError::TrailingCharacters {
                    position: offset + close + 1,
                });
            }
            return self.parse_slice(&chars[1..close], offset + 1);
        }

        if let Some(i) = chars.iter().position(|&c| c == ',') {
            return Err(ParseError::UnexpectedCharacter {
                character: ',',
                position: offset + i,
            });
        }

        Ok(Expression::Term(chars.iter().collect()))
    }

    /// Finds the split point: the right-most depth-0 operator of the lowest tier present.
    fn split_operator(
        &self,
        chars: &[char],
        offset: usize,
    ) -> Result<Option<Expression>, ParseError> {
        for tier in Tier::SPLIT_ORDER {
            let mut depth = 0usize;

            for i in (0..chars.len()).rev() {
                let c = chars[i];
                match c {
                    ')' => {
                        depth += 1;
                        continue;
                    }
                    '(' => {
                        depth = depth.saturating_sub(1);
                        continue;
                    }
                    _ if depth > 0 => continue,
                    _ => {}
                }

                if !self.registry.is_symbol_in(tier, c) {
                    continue;
                }

                let position = offset + i;
                let right = &chars[i + 1..];
                if right.is_empty() {
                    return Err(ParseError::MissingOperand {
                        operator: c,
                        position,
                    });
                }

                let operator = c.to_string();

                if i == 0 {
                    if self.registry.lookup_unary(&operator).is_none() {
                        return Err(ParseError::MissingOperand {
                            operator: c,
                            position,
                        });
                    }
                    debug!("Unary '{}' at {}", operator, position);
                    let operand = self.parse_slice(right, position + 1)?;
                    return Ok(Some(Expression::unary(operator, operand)));
                }

                // A sign directly after another operator belongs to the right operand.
                if self.registry.is_binary_symbol(chars[i - 1]) {
                    continue;
                }

                debug!("Binary '{}' at {} ({:?})", operator, position, tier);
                let left = self.parse_slice(&chars[..i], offset)?;
                let right = self.parse_slice(right, position + 1)?;
                return Ok(Some(Expression::binary(operator, left, right)));
            }
        }

        Ok(None)
    }

    /// Parses `name(arg, ...)` when an identifier precedes the first parenthesis.
    fn parse_call(&self, chars: &[char], offset: usize) -> Result<Option<Expression>, ParseError> {
        let open = match chars.iter().position(|&c| c == '(') {
            Some(open) if open > 0 => open,
            _ => return Ok(None),
        };

        let name: String = chars[..open].iter().collect();
        if !self.registry.contains_function(&name) {
            return Err(ParseError::UnknownFunction {
                name,
                position: offset,
            });
        }

        let close = matching_close(chars, open)?;
        if close != chars.len() - 1 {
            return Err(ParseError::TrailingCharacters {
                position: offset + close + 1,
            });
        }

        let mut args = Vec::new();
        for (start, end) in split_arguments(chars, open + 1, close) {
            args.push(self.parse_slice(&chars[start..end], offset + start)?);
        }

        debug!("Function '{}' with {} args", name, args.len());
        Ok(Some(Expression::function(name, args)))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expression {
            Some(expression) => write!(f, "{expression}"),
            None => Ok(()),
        }
    }
}

/// Checks parenthesis pairing on the raw input. Positions are character indices.
fn check_parentheses(input: &str) -> Result<(), ParseError> {
    let mut depth = 0i64;
    let mut last = 0;

    for (position, c) in input.chars().enumerate() {
        last = position;
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(ParseError::UnbalancedParenthesis { position });
                }
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ParseError::UnbalancedParenthesis { position: last });
    }
    Ok(())
}

/// Index of the `)` closing the `(` at `open`.
fn matching_close(chars: &[char], open: usize) -> Result<usize, ParseError> {
    let mut depth = 0usize;
    for (i, &c) in chars.iter().enumerate().skip(open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(ParseError::Malformed(format!(
        "no closing parenthesis for '(' at {open}"
    )))
}

/// Ranges of the depth-0 comma-separated arguments in `chars[start..end]`.
fn split_arguments(chars: &[char], start: usize, end: usize) -> Vec<(usize, usize)> {
    if start == end {
        return Vec::new();
    }

    let mut ranges = Vec::new();
    let mut depth = 0usize;
    let mut arg_start = start;

    for (i, &c) in chars.iter().enumerate().take(end).skip(start) {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                ranges.push((arg_start, i));
                arg_start = i + 1;
            }
            _ => {}
        }
    }
    ranges.push((arg_start, end));
    ranges
}
