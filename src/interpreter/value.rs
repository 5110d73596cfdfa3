use super::errors::{EnvResult, RuntimeErrorKind};
use crate::frontend::grammar::BinaryOperator;
use std::fmt;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum RuntimeVal {
    Number(f64),
    Boolean(bool),
    Null,
}

impl RuntimeVal {
    pub fn type_name(&self) -> &'static str {
        match self {
            RuntimeVal::Number(_) => "number",
            RuntimeVal::Boolean(_) => "boolean",
            RuntimeVal::Null => "null",
        }
    }

    /// Combines two operands. Only numbers take part in arithmetic.
    pub fn apply_binary_op(op: BinaryOperator, lhs: Self, rhs: Self) -> EnvResult<Self> {
        match op {
            BinaryOperator::Add => numerical_binop(op, lhs, rhs, |a, b| a + b),
            BinaryOperator::Subtract => numerical_binop(op, lhs, rhs, |a, b| a - b),
            BinaryOperator::Multiply => numerical_binop(op, lhs, rhs, |a, b| a * b),
            // A NaN divisor is rejected along with zero.
            BinaryOperator::Divide => match (lhs, rhs) {
                (RuntimeVal::Number(_), RuntimeVal::Number(b)) if b == 0.0 || b.is_nan() => {
                    Err(RuntimeErrorKind::DivisionByZero)
                }
                (lhs, rhs) => numerical_binop(op, lhs, rhs, |a, b| a / b),
            },
            // Sign of the result follows the dividend.
            BinaryOperator::Remainder => numerical_binop(op, lhs, rhs, |a, b| a % b),
        }
    }
}

fn numerical_binop<F>(
    op: BinaryOperator,
    lhs: RuntimeVal,
    rhs: RuntimeVal,
    func: F,
) -> EnvResult<RuntimeVal>
where
    F: Fn(f64, f64) -> f64,
{
    match (lhs, rhs) {
        (RuntimeVal::Number(a), RuntimeVal::Number(b)) => Ok(RuntimeVal::Number(func(a, b))),
        (a, b) => Err(RuntimeErrorKind::InvalidOperands(op, a, b)),
    }
}

impl fmt::Display for RuntimeVal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuntimeVal::Number(n) => write!(f, "{}", n),
            RuntimeVal::Boolean(b) => write!(f, "{}", b),
            RuntimeVal::Null => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(op: BinaryOperator, a: f64, b: f64) -> EnvResult<RuntimeVal> {
        RuntimeVal::apply_binary_op(op, RuntimeVal::Number(a), RuntimeVal::Number(b))
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(apply(BinaryOperator::Add, 1.0, 2.0), Ok(RuntimeVal::Number(3.0)));
        assert_eq!(apply(BinaryOperator::Subtract, 1.0, 2.0), Ok(RuntimeVal::Number(-1.0)));
        assert_eq!(apply(BinaryOperator::Multiply, 4.0, 2.5), Ok(RuntimeVal::Number(10.0)));
        assert_eq!(apply(BinaryOperator::Divide, 7.0, 2.0), Ok(RuntimeVal::Number(3.5)));
    }

    #[test]
    fn test_remainder_follows_dividend() {
        assert_eq!(apply(BinaryOperator::Remainder, 7.0, 3.0), Ok(RuntimeVal::Number(1.0)));
        assert_eq!(apply(BinaryOperator::Remainder, -7.0, 3.0), Ok(RuntimeVal::Number(-1.0)));
        assert_eq!(apply(BinaryOperator::Remainder, 7.0, -3.0), Ok(RuntimeVal::Number(1.0)));

        match apply(BinaryOperator::Remainder, 7.0, 0.0) {
            Ok(RuntimeVal::Number(n)) => assert!(n.is_nan()),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            apply(BinaryOperator::Divide, 1.0, 0.0),
            Err(RuntimeErrorKind::DivisionByZero)
        );
        assert_eq!(
            apply(BinaryOperator::Divide, 1.0, -0.0),
            Err(RuntimeErrorKind::DivisionByZero)
        );
        assert_eq!(
            apply(BinaryOperator::Divide, 1.0, f64::NAN),
            Err(RuntimeErrorKind::DivisionByZero)
        );
        assert_eq!(
            apply(BinaryOperator::Divide, f64::INFINITY, 2.0),
            Ok(RuntimeVal::Number(f64::INFINITY))
        );
    }

    #[test]
    fn test_mixed_operands() {
        let result = RuntimeVal::apply_binary_op(
            BinaryOperator::Add,
            RuntimeVal::Number(1.0),
            RuntimeVal::Boolean(true),
        );
        assert_eq!(
            result,
            Err(RuntimeErrorKind::InvalidOperands(
                BinaryOperator::Add,
                RuntimeVal::Number(1.0),
                RuntimeVal::Boolean(true)
            ))
        );

        let result = RuntimeVal::apply_binary_op(
            BinaryOperator::Divide,
            RuntimeVal::Null,
            RuntimeVal::Number(0.0),
        );
        assert!(matches!(result, Err(RuntimeErrorKind::InvalidOperands(..))));
    }

    #[test]
    fn test_display() {
        assert_eq!(RuntimeVal::Number(5.0).to_string(), "5");
        assert_eq!(RuntimeVal::Number(2.5).to_string(), "2.5");
        assert_eq!(RuntimeVal::Boolean(false).to_string(), "false");
        assert_eq!(RuntimeVal::Null.to_string(), "null");
    }
}
