//! Key handling for the terminal front end.

mod keymap;

pub use keymap::{Command, key_to_input, parse_line};
