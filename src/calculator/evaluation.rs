//! Binary operators and the evaluation of a single pending operation.

use super::error::CalcError;
use super::format::{Computed, finish_result};

/// One of the four binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Look up an operator by its button symbol.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '×' => Some(Self::Multiply),
            '÷' => Some(Self::Divide),
            _ => None,
        }
    }

    fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Add => left + right,
            Self::Subtract => left - right,
            Self::Multiply => left * right,
            Self::Divide => left / right,
        }
    }
}

/// Evaluate `previous operator current` and post-process the result.
pub fn perform_calculation(
    previous: f64,
    current: f64,
    operator: Operator,
) -> Result<Computed, CalcError> {
    for operand in [previous, current] {
        if !operand.is_finite() {
            return Err(CalcError::InvalidOperand(operand.to_string()));
        }
    }

    if operator == Operator::Divide && current == 0.0 {
        return Err(CalcError::DivisionByZero);
    }

    let value = operator.apply(previous, current);
    if !value.is_finite() {
        return Err(CalcError::Overflow);
    }

    finish_result(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(previous: f64, current: f64, operator: Operator) -> String {
        perform_calculation(previous, current, operator).unwrap().text
    }

    #[test]
    fn test_basic_operations() {
        assert_eq!(text(2.0, 3.0, Operator::Add), "5");
        assert_eq!(text(2.0, 3.0, Operator::Subtract), "-1");
        assert_eq!(text(2.0, 3.0, Operator::Multiply), "6");
        assert_eq!(text(3.0, 4.0, Operator::Divide), "0.75");
    }

    #[test]
    fn test_results_are_rounded() {
        assert_eq!(text(0.1, 0.2, Operator::Add), "0.3");
        assert_eq!(text(999_999_999.0, 1.0, Operator::Add), "1.000e+9");
        assert_eq!(text(10.0, 3.0, Operator::Divide), "3.333333");
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            perform_calculation(1.0, 0.0, Operator::Divide),
            Err(CalcError::DivisionByZero)
        );
        assert_eq!(
            perform_calculation(1.0, -0.0, Operator::Divide),
            Err(CalcError::DivisionByZero)
        );
        // Zero divided by something is fine.
        assert_eq!(text(0.0, 5.0, Operator::Divide), "0");
    }

    #[test]
    fn test_non_finite_operands_rejected() {
        assert!(matches!(
            perform_calculation(f64::NAN, 1.0, Operator::Add),
            Err(CalcError::InvalidOperand(_))
        ));
        assert!(matches!(
            perform_calculation(1.0, f64::INFINITY, Operator::Multiply),
            Err(CalcError::InvalidOperand(_))
        ));
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            perform_calculation(1e308, 10.0, Operator::Multiply),
            Err(CalcError::Overflow)
        );
        // Finite, but too large to round to 8 places.
        assert_eq!(
            perform_calculation(1e300, 10.0, Operator::Multiply),
            Err(CalcError::Overflow)
        );
        assert_eq!(
            perform_calculation(1e301, 1.0, Operator::Add),
            Err(CalcError::Overflow)
        );
    }

    #[test]
    fn test_symbols() {
        assert_eq!(Operator::from_symbol('+'), Some(Operator::Add));
        assert_eq!(Operator::from_symbol('-'), Some(Operator::Subtract));
        assert_eq!(Operator::from_symbol('×'), Some(Operator::Multiply));
        assert_eq!(Operator::from_symbol('÷'), Some(Operator::Divide));
        assert_eq!(Operator::from_symbol('*'), None);
    }
}
