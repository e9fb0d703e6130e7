//! The calculator state machine.
//!
//! One input event is applied at a time and always yields a complete
//! [`DisplayState`]. Failed computations never escape: they switch the
//! engine into the error state, which only a clear can leave.

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::chain::{OperationChain, PendingOperation};
use super::error::CalcError;
use super::evaluation::Operator;
use super::format::{Computed, display_text};
use super::memory::AnswerMemory;
use super::operand::OperandBuffer;

/// Display token shown while the error state is active.
pub const ERROR_TEXT: &str = "Error";
/// Display token shown while the last answer is queued as the next operand.
pub const ANS_TEXT: &str = "Ans";

/// Default cap on the length of a typed operand.
pub const DEFAULT_MAX_ENTRY_LEN: usize = 9;

/// A discrete input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Digit(u8),
    DecimalPoint,
    Operator(Operator),
    Equals,
    Clear,
    Delete,
    Percent,
    ToggleSign,
    Reciprocal,
    Square,
    Ans,
}

/// What the rendering side shows after each input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    pub text: String,
    pub is_error: bool,
    pub last_answer_text: String,
}

/// Identifies one entry into the error state.
///
/// A scheduled reset carries the ticket it was issued for, so a reset that
/// fires after the state was already cleared (and possibly errored again)
/// is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ErrorTicket(u64);

#[derive(Clone, Debug)]
pub struct CalculatorEngine {
    operand: OperandBuffer,
    chain: OperationChain,
    answer: AnswerMemory,
    waiting_for_operand: bool,
    using_ans: bool,
    error: Option<ErrorTicket>,
    tickets_issued: u64,
}

impl Default for CalculatorEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRY_LEN)
    }
}

impl CalculatorEngine {
    pub fn new(max_entry_len: usize) -> Self {
        Self {
            operand: OperandBuffer::new(max_entry_len),
            chain: OperationChain::default(),
            answer: AnswerMemory::default(),
            waiting_for_operand: false,
            using_ans: false,
            error: None,
            tickets_issued: 0,
        }
    }

    /// Apply one input event.
    pub fn submit(&mut self, input: Input) -> DisplayState {
        if self.error.is_some() && input != Input::Clear {
            debug!(?input, "ignoring input while error is displayed");
            return self.display();
        }

        debug!(?input, "calculator input");
        let outcome = self.transaction(|engine| match input {
            Input::Digit(digit) => engine.input_digit(digit),
            Input::DecimalPoint => engine.input_decimal_point(),
            Input::Operator(operator) => engine.input_operator(operator),
            Input::Equals => engine.calculate(),
            Input::Clear => {
                engine.clear();
                Ok(())
            }
            Input::Delete => {
                engine.operand.pop();
                Ok(())
            }
            Input::Percent => engine.apply_unary(|value| Ok(value / 100.0)),
            Input::ToggleSign => engine.toggle_sign(),
            Input::Reciprocal => engine.apply_unary(|value| {
                if value == 0.0 {
                    Err(CalcError::DivisionByZero)
                } else {
                    Ok(1.0 / value)
                }
            }),
            Input::Square => engine.apply_unary(|value| Ok(value * value)),
            Input::Ans => {
                engine.using_ans = true;
                engine.waiting_for_operand = false;
                Ok(())
            }
        });

        if let Err(err) = outcome {
            self.enter_error(err);
        }

        self.display()
    }

    pub fn submit_digit(&mut self, digit: u8) -> DisplayState {
        self.submit(Input::Digit(digit))
    }

    pub fn submit_decimal_point(&mut self) -> DisplayState {
        self.submit(Input::DecimalPoint)
    }

    pub fn submit_operator(&mut self, operator: Operator) -> DisplayState {
        self.submit(Input::Operator(operator))
    }

    pub fn submit_equals(&mut self) -> DisplayState {
        self.submit(Input::Equals)
    }

    pub fn submit_clear(&mut self) -> DisplayState {
        self.submit(Input::Clear)
    }

    pub fn submit_delete(&mut self) -> DisplayState {
        self.submit(Input::Delete)
    }

    pub fn submit_percent(&mut self) -> DisplayState {
        self.submit(Input::Percent)
    }

    pub fn submit_toggle_sign(&mut self) -> DisplayState {
        self.submit(Input::ToggleSign)
    }

    pub fn submit_reciprocal(&mut self) -> DisplayState {
        self.submit(Input::Reciprocal)
    }

    pub fn submit_square(&mut self) -> DisplayState {
        self.submit(Input::Square)
    }

    pub fn submit_ans(&mut self) -> DisplayState {
        self.submit(Input::Ans)
    }

    /// Scheduled recovery from the error state.
    ///
    /// Clears only if `ticket` still names the active error. Returns whether
    /// the clear was applied.
    pub fn auto_clear(&mut self, ticket: ErrorTicket) -> bool {
        if self.error != Some(ticket) {
            debug!(?ticket, "stale error reset ignored");
            return false;
        }
        self.clear();
        info!(?ticket, "error state cleared");
        true
    }

    /// The active error, if any.
    pub fn pending_error(&self) -> Option<ErrorTicket> {
        self.error
    }

    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }

    pub fn pending_operation(&self) -> Option<PendingOperation> {
        self.chain.pending()
    }

    pub fn display(&self) -> DisplayState {
        let text = if self.error.is_some() {
            ERROR_TEXT.to_string()
        } else if self.using_ans {
            ANS_TEXT.to_string()
        } else {
            display_text(self.operand.text())
        };

        DisplayState {
            text,
            is_error: self.error.is_some(),
            last_answer_text: self.answer.text().to_string(),
        }
    }

    /// Run `step`, rolling the operand and entry flags back if it fails.
    fn transaction(
        &mut self,
        step: impl FnOnce(&mut Self) -> Result<(), CalcError>,
    ) -> Result<(), CalcError> {
        let operand = self.operand.clone();
        let waiting_for_operand = self.waiting_for_operand;
        let using_ans = self.using_ans;

        let outcome = step(self);
        if outcome.is_err() {
            self.operand = operand;
            self.waiting_for_operand = waiting_for_operand;
            self.using_ans = using_ans;
        }
        outcome
    }

    fn input_digit(&mut self, digit: u8) -> Result<(), CalcError> {
        let Some(digit) = char::from_digit(u32::from(digit), 10) else {
            debug!(digit, "not a decimal digit");
            return Ok(());
        };

        if self.waiting_for_operand || self.using_ans {
            self.operand.start_with_digit(digit);
            self.waiting_for_operand = false;
            self.using_ans = false;
        } else if !self.operand.push_digit(digit) {
            trace!("entry length cap reached, digit dropped");
        }
        Ok(())
    }

    fn input_decimal_point(&mut self) -> Result<(), CalcError> {
        if self.waiting_for_operand || self.using_ans {
            self.operand.start_decimal();
            self.waiting_for_operand = false;
            self.using_ans = false;
        } else {
            self.operand.push_decimal_point();
        }
        Ok(())
    }

    fn input_operator(&mut self, operator: Operator) -> Result<(), CalcError> {
        let value = self.resolve_operand()?;
        if let Some(computed) = self.chain.accept(value, operator)? {
            self.operand.load(&computed);
        }
        self.waiting_for_operand = true;
        Ok(())
    }

    /// Equals. Only proceeds once a second operand has been started.
    fn calculate(&mut self) -> Result<(), CalcError> {
        if !self.chain.is_pending() || self.waiting_for_operand {
            return Ok(());
        }

        let value = self.resolve_operand()?;
        if let Some(result) = self.chain.complete(value) {
            let computed = result?;
            self.operand.load(&computed);
            self.answer.store(&computed);
            self.waiting_for_operand = true;
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.operand.reset();
        self.chain.reset();
        self.waiting_for_operand = false;
        self.using_ans = false;
        self.error = None;
    }

    fn toggle_sign(&mut self) -> Result<(), CalcError> {
        if self.using_ans {
            if self.answer.text() == "0" {
                return Ok(());
            }
            self.load_answer();
        }
        self.operand.toggle_sign();
        Ok(())
    }

    /// Replace the operand with `function(value)`, outside the pending chain.
    fn apply_unary(
        &mut self,
        function: impl FnOnce(f64) -> Result<f64, CalcError>,
    ) -> Result<(), CalcError> {
        let value = function(self.resolve_operand()?)?;
        if !value.is_finite() {
            return Err(CalcError::Overflow);
        }
        self.operand.load(&Computed::raw(value));
        Ok(())
    }

    /// The value of the operand, substituting the last answer if queued.
    fn resolve_operand(&mut self) -> Result<f64, CalcError> {
        if self.using_ans {
            self.load_answer();
        }
        self.operand.value()
    }

    fn load_answer(&mut self) {
        self.operand.load(self.answer.last());
        self.using_ans = false;
    }

    fn enter_error(&mut self, err: CalcError) {
        self.tickets_issued += 1;
        let ticket = ErrorTicket(self.tickets_issued);
        warn!(error = %err, ?ticket, "entering error state");
        self.error = Some(ticket);
    }
}
