use crate::ast::{Expression, Registry};
use crate::error::EvalError;
use log::debug;
use rayon::prelude::*;
use std::collections::HashMap;

/// Evaluates `root` against `bindings`. Every call walks the whole tree.
pub fn evaluate_tree(
    root: &Expression,
    bindings: &HashMap<String, f64>,
    registry: &Registry,
) -> Result<f64, EvalError> {
    root.evaluate(bindings, registry)
}

/// Evaluates parsed trees against a borrowed registry.
///
/// Trees and registries are read-only during evaluation, so one evaluator can serve
/// many bindings at once.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    registry: &'a Registry,
}

impl<'a> Evaluator<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    pub fn evaluate(
        &self,
        ast: &Expression,
        bindings: &HashMap<String, f64>,
    ) -> Result<f64, EvalError> {
        evaluate_tree(ast, bindings, self.registry)
    }

    /// Evaluates `ast` once per binding map, in parallel.
    ///
    /// Results are returned in the order of `contexts`; one failure does not affect
    /// the other evaluations.
    pub fn evaluate_batch(
        &self,
        ast: &Expression,
        contexts: &[HashMap<String, f64>],
    ) -> Vec<Result<f64, EvalError>> {
        debug!("Evaluating {} against {} contexts", ast, contexts.len());
        contexts
            .par_iter()
            .map(|bindings| self.evaluate(ast, bindings))
            .collect()
    }
}
