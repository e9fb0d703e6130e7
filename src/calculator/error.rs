//! Failures raised while evaluating an operation.
//!
//! None of these leave the engine: each one switches the display into the
//! transient error state until a clear (manual or scheduled) resets it.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum CalcError {
    /// Division by zero, or the reciprocal of zero.
    #[error("division by zero")]
    DivisionByZero,

    /// An operand that does not parse as a finite number.
    #[error("invalid operand: {0:?}")]
    InvalidOperand(String),

    /// The arithmetic result is not finite.
    #[error("result out of range")]
    Overflow,
}
