use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use flume::Sender;
use tracing::{debug, info};

use darkcalc::calculator::{self, CalculatorEngine};
use darkcalc::config::Config;
use darkcalc::input::{Command, parse_line};
use darkcalc::logging;
use darkcalc::session::{Event, Session};
use darkcalc::ui::{JsonRenderer, Renderer, TerminalRenderer};

/// A four-function calculator for the terminal.
///
/// Type keys and press Enter: digits, `.`, `+ - * /`, `=`, `%`, plus the
/// words `neg`, `inv`, `sq`, `ans`, `del`, `clear`, `copy` and `quit`.
#[derive(Parser, Debug)]
#[command(name = "darkcalc", version, about)]
struct Cli {
    /// Feed these keys, print the final display and exit.
    #[arg(short, long, value_name = "KEYS")]
    keys: Option<String>,

    /// Print each display update as a JSON object.
    #[arg(long)]
    json: bool,

    /// Read configuration from this file instead of the default location.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Milliseconds the error display stays up before clearing itself.
    #[arg(long, value_name = "MS")]
    error_reset_ms: Option<u64>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(ms) = cli.error_reset_ms {
        config.error_reset_ms = ms;
    }

    let log_level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    logging::init(log_level);
    debug!(?config, "starting");

    let renderer: Box<dyn Renderer> = if cli.json {
        Box::new(JsonRenderer::new(io::stdout()))
    } else {
        Box::new(TerminalRenderer::new(io::stdout()))
    };
    let engine = CalculatorEngine::new(config.max_entry_len);

    match cli.keys {
        Some(keys) => run_keys(engine, renderer, &keys),
        None => run_interactive(engine, renderer, &config).await,
    }
}

/// One-shot mode: apply every key, then show where the calculator ended up.
fn run_keys(
    mut engine: CalculatorEngine,
    mut renderer: Box<dyn Renderer>,
    keys: &str,
) -> Result<()> {
    for command in parse_line(keys) {
        match command {
            Command::Input(input) => {
                engine.submit(input);
            }
            Command::Copy => {
                let state = engine.display();
                if !state.is_error {
                    calculator::copy_to_clipboard(&state.text)?;
                }
            }
            Command::Quit => break,
        }
    }
    renderer.render(&engine.display())
}

async fn run_interactive(
    engine: CalculatorEngine,
    renderer: Box<dyn Renderer>,
    config: &Config,
) -> Result<()> {
    let mut session = Session::new(engine, renderer, config.error_reset_delay());
    spawn_stdin_reader(session.sender())?;
    session.run().await?;
    info!("session ended");
    Ok(())
}

/// Read stdin lines on a plain thread and forward them as commands.
///
/// End of input is forwarded as `Quit`.
fn spawn_stdin_reader(tx: Sender<Event>) -> Result<()> {
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                for command in parse_line(&line) {
                    if tx.send(command.into()).is_err() {
                        return;
                    }
                }
            }
            let _ = tx.send(Command::Quit.into());
        })
        .context("Failed to start stdin reader")?;
    Ok(())
}
