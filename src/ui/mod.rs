pub mod render;

pub use render::{JsonRenderer, Renderer, TerminalRenderer};
