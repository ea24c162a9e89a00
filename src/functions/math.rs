use crate::ast::Registry;
use crate::error::OperatorError;
use calcparse_macros::calc_fn;

/// Extra functions not part of the default registry.
pub fn register(registry: &mut Registry) {
    registry.register("sin", sin);
    registry.register("cos", cos);
    registry.register("tan", tan);
    registry.register("exp", exp);
    registry.register("ln", ln);
    registry.register("log10", log10);
    registry.register("floor", floor);
    registry.register("ceil", ceil);
    registry.register("round", round);
    registry.register("min", min);
    registry.register("max", max);
    registry.register("avg", average);
}

#[calc_fn]
pub fn sin(x: f64) -> Result<f64, OperatorError> {
    Ok(x.sin())
}

#[calc_fn]
pub fn cos(x: f64) -> Result<f64, OperatorError> {
    Ok(x.cos())
}

#[calc_fn]
pub fn tan(x: f64) -> Result<f64, OperatorError> {
    Ok(x.tan())
}

#[calc_fn]
pub fn exp(x: f64) -> Result<f64, OperatorError> {
    Ok(x.exp())
}

#[calc_fn]
pub fn ln(x: f64) -> Result<f64, OperatorError> {
    if x <= 0.0 {
        return Err(OperatorError::Domain {
            operator: "ln".to_string(),
            value: x,
        });
    }
    Ok(x.ln())
}

#[calc_fn]
pub fn log10(x: f64) -> Result<f64, OperatorError> {
    if x <= 0.0 {
        return Err(OperatorError::Domain {
            operator: "log10".to_string(),
            value: x,
        });
    }
    Ok(x.log10())
}

#[calc_fn]
pub fn floor(x: f64) -> Result<f64, OperatorError> {
    Ok(x.floor())
}

#[calc_fn]
pub fn ceil(x: f64) -> Result<f64, OperatorError> {
    Ok(x.ceil())
}

#[calc_fn]
pub fn round(x: f64) -> Result<f64, OperatorError> {
    Ok(x.round())
}

fn non_empty<'a>(name: &str, args: &'a [f64]) -> Result<&'a [f64], OperatorError> {
    if args.is_empty() {
        return Err(OperatorError::Custom(format!("'{name}' needs 1 or more args")));
    }
    Ok(args)
}

pub fn min(args: &[f64]) -> Result<f64, OperatorError> {
    Ok(non_empty("min", args)?
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min))
}

pub fn max(args: &[f64]) -> Result<f64, OperatorError> {
    Ok(non_empty("max", args)?
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max))
}

pub fn average(args: &[f64]) -> Result<f64, OperatorError> {
    let args = non_empty("avg", args)?;
    Ok(args.iter().sum::<f64>() / args.len() as f64)
}
