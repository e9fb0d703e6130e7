//! Calculator core: the arithmetic state machine behind the display.
//!
//! This module provides:
//! - Operand entry as text with a length cap and single decimal point
//! - Chained, equals-immediate evaluation of `+ - × ÷`
//! - Unary functions, the last-answer slot and result formatting
//! - A transient error state with ticketed recovery
//! - Copying the display to the clipboard

mod chain;
mod clipboard;
mod engine;
mod error;
mod evaluation;
mod format;
mod memory;
mod number;
mod operand;

pub use chain::PendingOperation;
pub use clipboard::copy_to_clipboard;
pub use engine::{
    ANS_TEXT, CalculatorEngine, DEFAULT_MAX_ENTRY_LEN, DisplayState, ERROR_TEXT, ErrorTicket,
    Input,
};
pub use error::CalcError;
pub use evaluation::Operator;
