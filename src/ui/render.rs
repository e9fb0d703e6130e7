//! Rendering of the display state.
//!
//! Renderers only print; they hold no calculator state.

use std::io::Write;

use anyhow::{Context, Result};

use crate::calculator::{DisplayState, ERROR_TEXT};

/// Width of the main display line.
const DISPLAY_COLUMNS: usize = 16;

/// Something that can show a [`DisplayState`].
pub trait Renderer {
    fn render(&mut self, state: &DisplayState) -> Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, state: &DisplayState) -> Result<()> {
        (**self).render(state)
    }
}

/// Human-readable output: the value right-aligned, last answer beside it.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, state: &DisplayState) -> Result<()> {
        let line = format_line(state);
        writeln!(self.out, "{}", line).context("Failed to write display")?;
        self.out.flush().context("Failed to flush display")
    }
}

/// One JSON object per line, for scripting.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, state: &DisplayState) -> Result<()> {
        serde_json::to_writer(&mut self.out, state).context("Failed to encode display")?;
        writeln!(self.out).context("Failed to write display")?;
        self.out.flush().context("Failed to flush display")
    }
}

fn format_line(state: &DisplayState) -> String {
    // The error token replaces the whole line.
    if state.is_error {
        return format!("{:>width$}", ERROR_TEXT, width = DISPLAY_COLUMNS);
    }
    format!(
        "{:>width$}    Ans: {}",
        state.text,
        state.last_answer_text,
        width = DISPLAY_COLUMNS
    )
}
