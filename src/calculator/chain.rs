//! The pending left operand and operator.
//!
//! At most one operation is ever pending. A new operator forces the
//! pending one to evaluate against the operand entered since, left to
//! right, with no precedence.

use super::error::CalcError;
use super::evaluation::{Operator, perform_calculation};
use super::format::Computed;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingOperation {
    pub left: f64,
    pub operator: Operator,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperationChain {
    pending: Option<PendingOperation>,
}

impl OperationChain {
    pub fn pending(&self) -> Option<PendingOperation> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn reset(&mut self) {
        self.pending = None;
    }

    /// Accept a new operator with the operand entered since the last one.
    ///
    /// With nothing pending the operand becomes the left side. Otherwise the
    /// pending operation is evaluated first and its result becomes the left
    /// side. On failure the chain is left untouched.
    pub fn accept(&mut self, operand: f64, next: Operator) -> Result<Option<Computed>, CalcError> {
        let (left, computed) = match self.pending {
            None => (operand, None),
            Some(pending) => {
                let computed = perform_calculation(pending.left, operand, pending.operator)?;
                (computed.value, Some(computed))
            }
        };

        self.pending = Some(PendingOperation {
            left,
            operator: next,
        });
        Ok(computed)
    }

    /// Evaluate the pending operation against `operand` and clear it.
    ///
    /// Returns `None` when nothing is pending. On failure the pending
    /// operation is kept.
    pub fn complete(&mut self, operand: f64) -> Option<Result<Computed, CalcError>> {
        let pending = self.pending?;
        let result = perform_calculation(pending.left, operand, pending.operator);
        if result.is_ok() {
            self.pending = None;
        }
        Some(result)
    }
}
