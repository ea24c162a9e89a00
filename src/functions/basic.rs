use crate::ast::{Registry, Tier};
use crate::error::OperatorError;
use calcparse_macros::calc_fn;

pub fn register(registry: &mut Registry) {
    registry.register_operator(Tier::Prefix, '+', unary_sum);
    registry.register_operator(Tier::Prefix, '-', unary_sub);
    registry.register("sqrt", sqrt);
    registry.register("abs", abs);

    registry.register_operator(Tier::Multiplicative, '*', mult);
    registry.register_operator(Tier::Multiplicative, '/', div);
    registry.register_operator(Tier::Multiplicative, '%', div_remainder);
    registry.register_operator(Tier::Multiplicative, '^', pow);

    registry.register_operator(Tier::Additive, '+', sum);
    registry.register_operator(Tier::Additive, '-', sub);
}

#[calc_fn("unary sum operator")]
pub fn unary_sum(value: f64) -> Result<f64, OperatorError> {
    Ok(value)
}

#[calc_fn("unary subtract operator")]
pub fn unary_sub(value: f64) -> Result<f64, OperatorError> {
    Ok(-value)
}

#[calc_fn("'sqrt' function")]
pub fn sqrt(value: f64) -> Result<f64, OperatorError> {
    if value < 0.0 {
        return Err(OperatorError::Domain {
            operator: "'sqrt' function".to_string(),
            value,
        });
    }
    Ok(value.sqrt())
}

#[calc_fn("'abs' function")]
pub fn abs(value: f64) -> Result<f64, OperatorError> {
    Ok(value.abs())
}

#[calc_fn("multiplication operator")]
pub fn mult(a: f64, b: f64) -> Result<f64, OperatorError> {
    Ok(a * b)
}

#[calc_fn("division operator")]
pub fn div(a: f64, b: f64) -> Result<f64, OperatorError> {
    if b == 0.0 {
        return Err(OperatorError::ZeroDivisor {
            operator: "division operator".to_string(),
        });
    }
    Ok(a / b)
}

/// Remainder of both operands truncated toward zero, so `7.9 % 2.5` is `7 % 2`.
/// Stays in `f64`, which is exact for integral operands of any magnitude.
#[calc_fn("% operator")]
pub fn div_remainder(a: f64, b: f64) -> Result<f64, OperatorError> {
    let (a, b) = (a.trunc(), b.trunc());
    if b == 0.0 {
        return Err(OperatorError::ZeroDivisor {
            operator: "% operator".to_string(),
        });
    }
    Ok(a % b)
}

#[calc_fn("power operator")]
pub fn pow(base: f64, exponent: f64) -> Result<f64, OperatorError> {
    Ok(base.powf(exponent))
}

#[calc_fn("sum operator")]
pub fn sum(a: f64, b: f64) -> Result<f64, OperatorError> {
    Ok(a + b)
}

#[calc_fn("subtract operator")]
pub fn sub(a: f64, b: f64) -> Result<f64, OperatorError> {
    Ok(a - b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_is_checked() {
        assert_eq!(
            mult(&[1.0]),
            Err(OperatorError::ArgumentCount {
                operator: "multiplication operator".to_string(),
                expected: 2,
                actual: 1,
            })
        );
        assert!(sqrt(&[4.0, 9.0]).is_err());
        assert!(unary_sub(&[]).is_err());
        assert!(abs(&[]).is_err());
    }

    #[test]
    fn test_sqrt_domain() {
        assert_eq!(sqrt(&[16.0]), Ok(4.0));
        assert_eq!(
            sqrt(&[-1.0]),
            Err(OperatorError::Domain {
                operator: "'sqrt' function".to_string(),
                value: -1.0,
            })
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(div(&[9.0, 3.0]), Ok(3.0));
        assert!(div(&[5.0, 0.0]).is_err());
    }

    #[test]
    fn test_remainder_truncates_operands() {
        assert_eq!(div_remainder(&[7.9, 2.5]), Ok(1.0));
        assert_eq!(div_remainder(&[-7.0, 2.0]), Ok(-1.0));
        assert!(div_remainder(&[5.0, 0.0]).is_err());
        assert!(div_remainder(&[5.0, 0.5]).is_err());
    }

    #[test]
    fn test_remainder_outside_integer_range() {
        assert_eq!(div_remainder(&[1e20, 7.0]), Ok(2.0));
        assert_eq!(div_remainder(&[-1e20, 7.0]), Ok(-2.0));
        assert_eq!(div_remainder(&[i64::MIN as f64, -1.0]), Ok(0.0));
        assert_eq!(div_remainder(&[7.0, 1e20]), Ok(7.0));
    }

    #[test]
    fn test_remainder_propagates_nan() {
        assert!(div_remainder(&[f64::NAN, 3.0]).unwrap().is_nan());
        assert!(div_remainder(&[3.0, f64::NAN]).unwrap().is_nan());
        assert!(div_remainder(&[f64::INFINITY, 3.0]).unwrap().is_nan());
    }

    #[test]
    fn test_simple_operators() {
        assert_eq!(unary_sum(&[3.0]), Ok(3.0));
        assert_eq!(unary_sub(&[3.0]), Ok(-3.0));
        assert_eq!(abs(&[-2.5]), Ok(2.5));
        assert_eq!(pow(&[2.0, 10.0]), Ok(1024.0));
        assert_eq!(sum(&[2.0, 3.0]), Ok(5.0));
        assert_eq!(sub(&[2.0, 3.0]), Ok(-1.0));
    }
}
