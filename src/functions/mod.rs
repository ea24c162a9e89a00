pub mod basic;
pub mod math;

use crate::ast::Registry;

/// Seeds `registry` with the default operators and functions.
pub fn register_functions(registry: &mut Registry) {
    basic::register(registry);
}
