//! A four-function calculator: an arithmetic state machine fed one input
//! event at a time, plus the terminal front end around it.

pub mod calculator;
pub mod config;
pub mod input;
pub mod logging;
pub mod session;
pub mod ui;
