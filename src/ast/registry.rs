use crate::error::{EvalError, OperatorError, OperatorKind};
use crate::functions::register_functions;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type Function = Arc<dyn Fn(&[f64]) -> Result<f64, OperatorError> + Send + Sync>;

/// Precedence tier of a registry entry. Lower tiers bind tighter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Unary operators and named functions.
    Prefix = 0,
    Multiplicative = 1,
    Additive = 2,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Prefix, Tier::Multiplicative, Tier::Additive];

    /// Binary tiers in the order the parser looks for split points.
    pub const SPLIT_ORDER: [Tier; 2] = [Tier::Additive, Tier::Multiplicative];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Named numeric functions grouped into precedence tiers.
///
/// The prefix tier is its own namespace, so a symbol such as `-` can be both a unary
/// operator (tier 0) and a binary one (tier 2). A binary symbol lives in at most one
/// binary tier.
#[derive(Clone)]
pub struct Registry {
    tiers: [HashMap<String, Function>; 3],
}

impl Registry {
    /// An empty registry: no operators, no functions.
    pub fn new() -> Self {
        Self {
            tiers: [HashMap::new(), HashMap::new(), HashMap::new()],
        }
    }

    /// A registry seeded with the default operators and `sqrt`/`abs`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        register_functions(&mut registry);
        registry
    }

    /// Registers a named function (tier 0), replacing any entry with the same name.
    pub fn register<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&[f64]) -> Result<f64, OperatorError> + Send + Sync + 'static,
    {
        self.insert(Tier::Prefix, name.to_string(), Arc::new(function));
    }

    /// Registers a single-character operator. `Tier::Prefix` makes it unary.
    pub fn register_operator<F>(&mut self, tier: Tier, symbol: char, function: F)
    where
        F: Fn(&[f64]) -> Result<f64, OperatorError> + Send + Sync + 'static,
    {
        self.insert(tier, symbol.to_string(), Arc::new(function));
    }

    fn insert(&mut self, tier: Tier, name: String, function: Function) {
        match tier {
            Tier::Multiplicative => {
                self.tiers[Tier::Additive.index()].remove(&name);
            }
            Tier::Additive => {
                self.tiers[Tier::Multiplicative.index()].remove(&name);
            }
            Tier::Prefix => {}
        }
        self.tiers[tier.index()].insert(name, function);
    }

    pub fn lookup_unary(&self, name: &str) -> Option<Tier> {
        self.tiers[Tier::Prefix.index()]
            .contains_key(name)
            .then_some(Tier::Prefix)
    }

    /// Tier 1 is searched before tier 2.
    pub fn lookup_binary(&self, name: &str) -> Option<Tier> {
        [Tier::Multiplicative, Tier::Additive]
            .into_iter()
            .find(|tier| self.tiers[tier.index()].contains_key(name))
    }

    pub fn contains_function(&self, name: &str) -> bool {
        self.tiers[Tier::Prefix.index()].contains_key(name)
    }

    /// Whether `symbol` is a binary operator of exactly this tier.
    pub fn is_symbol_in(&self, tier: Tier, symbol: char) -> bool {
        let mut buf = [0u8; 4];
        self.tiers[tier.index()].contains_key(symbol.encode_utf8(&mut buf) as &str)
    }

    /// Whether `symbol` is a binary operator of any tier.
    pub fn is_binary_symbol(&self, symbol: char) -> bool {
        self.is_symbol_in(Tier::Multiplicative, symbol) || self.is_symbol_in(Tier::Additive, symbol)
    }

    /// Invokes `name` from `tier` with the given arguments.
    pub fn apply(&self, tier: Tier, name: &str, args: &[f64]) -> Result<f64, EvalError> {
        let function = self.tiers[tier.index()].get(name).ok_or_else(|| {
            let kind = match tier {
                Tier::Prefix => OperatorKind::Function,
                Tier::Multiplicative | Tier::Additive => OperatorKind::Binary,
            };
            EvalError::UnsupportedOperator {
                kind,
                name: name.to_string(),
            }
        })?;

        function(args).map_err(|source| EvalError::Operator {
            name: name.to_string(),
            source,
        })
    }

    /// Sorted names registered in `tier`.
    pub fn names(&self, tier: Tier) -> Vec<&str> {
        let mut names: Vec<&str> = self.tiers[tier.index()].keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_struct("Registry");
        for tier in Tier::ALL {
            list.field(&format!("{tier:?}"), &self.names(tier));
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_seeds() {
        let registry = Registry::with_defaults();
        assert_eq!(registry.names(Tier::Prefix), vec!["+", "-", "abs", "sqrt"]);
        assert_eq!(registry.names(Tier::Multiplicative), vec!["%", "*", "/", "^"]);
        assert_eq!(registry.names(Tier::Additive), vec!["+", "-"]);
    }

    #[test]
    fn test_lookup_unary_and_binary() {
        let registry = Registry::with_defaults();
        assert_eq!(registry.lookup_unary("-"), Some(Tier::Prefix));
        assert_eq!(registry.lookup_unary("*"), None);
        assert_eq!(registry.lookup_binary("*"), Some(Tier::Multiplicative));
        assert_eq!(registry.lookup_binary("+"), Some(Tier::Additive));
        assert_eq!(registry.lookup_binary("sqrt"), None);
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = Registry::with_defaults();
        registry.register("sqrt", |_args| Ok(42.0));
        assert_eq!(registry.apply(Tier::Prefix, "sqrt", &[9.0]), Ok(42.0));
    }

    #[test]
    fn test_binary_symbol_moves_between_tiers() {
        let mut registry = Registry::with_defaults();
        registry.register_operator(Tier::Additive, '^', |args| Ok(args[0] + args[1]));
        assert_eq!(registry.lookup_binary("^"), Some(Tier::Additive));
        assert!(!registry.is_symbol_in(Tier::Multiplicative, '^'));
        assert!(registry.is_binary_symbol('^'));
    }

    #[test]
    fn test_apply_missing_operator() {
        let registry = Registry::new();
        assert_eq!(
            registry.apply(Tier::Additive, "+", &[1.0, 2.0]),
            Err(EvalError::UnsupportedOperator {
                kind: OperatorKind::Binary,
                name: "+".to_string(),
            })
        );
    }

    #[test]
    fn test_apply_wraps_operator_error() {
        let registry = Registry::with_defaults();
        let result = registry.apply(Tier::Multiplicative, "/", &[5.0, 0.0]);
        assert!(matches!(
            result,
            Err(EvalError::Operator { ref name, source: OperatorError::ZeroDivisor { .. } }) if name == "/"
        ));
    }
}
