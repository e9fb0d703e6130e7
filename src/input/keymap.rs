//! Translation of keys and typed words into calculator commands.
//!
//! Key lookup is a pure table; the engine never sees raw keys.

use tracing::debug;

use crate::calculator::{Input, Operator};

/// Something the user asked for from the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Input(Input),
    /// Copy the displayed value to the clipboard.
    Copy,
    Quit,
}

/// Words for buttons that have no single key.
const WORDS: &[(&str, Command)] = &[
    ("neg", Command::Input(Input::ToggleSign)),
    ("inv", Command::Input(Input::Reciprocal)),
    ("sq", Command::Input(Input::Square)),
    ("ans", Command::Input(Input::Ans)),
    ("clear", Command::Input(Input::Clear)),
    ("del", Command::Input(Input::Delete)),
    ("copy", Command::Copy),
    ("quit", Command::Quit),
    ("exit", Command::Quit),
];

/// Map a keyboard key to an input.
///
/// `key` is a key name as a browser or terminal reports it: a single
/// character, or `Enter`, `Escape`, `Backspace`.
pub fn key_to_input(key: &str) -> Option<Input> {
    let input = match key {
        "Enter" | "=" => Input::Equals,
        "Escape" => Input::Clear,
        "Backspace" => Input::Delete,
        "." => Input::DecimalPoint,
        "%" => Input::Percent,
        _ => {
            let mut chars = key.chars();
            let key = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            // ASCII spellings of the × and ÷ buttons.
            let symbol = match key {
                '*' => '×',
                '/' => '÷',
                other => other,
            };
            match Operator::from_symbol(symbol) {
                Some(operator) => Input::Operator(operator),
                None => Input::Digit(key.to_digit(10)? as u8),
            }
        }
    };
    Some(input)
}

/// Split a typed line into commands.
///
/// Whitespace-separated words from the word table are matched first;
/// anything else is read one key per character. Unknown characters are
/// skipped.
pub fn parse_line(line: &str) -> Vec<Command> {
    let mut commands = Vec::new();

    for token in line.split_whitespace() {
        let lower = token.to_lowercase();
        if let Some((_, command)) = WORDS.iter().find(|(word, _)| *word == lower) {
            commands.push(*command);
            continue;
        }

        for key in token.chars() {
            let mut buf = [0u8; 4];
            match key_to_input(key.encode_utf8(&mut buf)) {
                Some(input) => commands.push(Command::Input(input)),
                None => debug!(?key, "unmapped key skipped"),
            }
        }
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_table() {
        assert_eq!(key_to_input("7"), Some(Input::Digit(7)));
        assert_eq!(key_to_input("+"), Some(Input::Operator(Operator::Add)));
        assert_eq!(key_to_input("-"), Some(Input::Operator(Operator::Subtract)));
        assert_eq!(key_to_input("*"), Some(Input::Operator(Operator::Multiply)));
        assert_eq!(key_to_input("/"), Some(Input::Operator(Operator::Divide)));
        assert_eq!(key_to_input("."), Some(Input::DecimalPoint));
        assert_eq!(key_to_input("Enter"), Some(Input::Equals));
        assert_eq!(key_to_input("="), Some(Input::Equals));
        assert_eq!(key_to_input("Escape"), Some(Input::Clear));
        assert_eq!(key_to_input("Backspace"), Some(Input::Delete));
        assert_eq!(key_to_input("%"), Some(Input::Percent));
    }

    #[test]
    fn test_display_symbols_accepted() {
        assert_eq!(key_to_input("×"), Some(Input::Operator(Operator::Multiply)));
        assert_eq!(key_to_input("÷"), Some(Input::Operator(Operator::Divide)));
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(key_to_input("a"), None);
        assert_eq!(key_to_input("12"), None);
        assert_eq!(key_to_input(""), None);
        assert_eq!(key_to_input("Tab"), None);
    }

    #[test]
    fn test_parse_line_keys() {
        assert_eq!(
            parse_line("2+3="),
            vec![
                Command::Input(Input::Digit(2)),
                Command::Input(Input::Operator(Operator::Add)),
                Command::Input(Input::Digit(3)),
                Command::Input(Input::Equals),
            ]
        );
    }

    #[test]
    fn test_parse_line_words() {
        assert_eq!(
            parse_line("4 inv  ans SQ copy quit"),
            vec![
                Command::Input(Input::Digit(4)),
                Command::Input(Input::Reciprocal),
                Command::Input(Input::Ans),
                Command::Input(Input::Square),
                Command::Copy,
                Command::Quit,
            ]
        );
    }

    #[test]
    fn test_parse_line_skips_unknown() {
        assert_eq!(
            parse_line("1x2"),
            vec![
                Command::Input(Input::Digit(1)),
                Command::Input(Input::Digit(2)),
            ]
        );
        assert!(parse_line("   ").is_empty());
    }
}
