//! Event loop driving one calculator session.
//!
//! Key commands and scheduled resets arrive over the same channel and are
//! handled one at a time, so the engine is never touched concurrently. The
//! only deferred work is the error reset timer, which is aborted whenever
//! the user clears manually.

use std::ops::ControlFlow;
use std::time::Duration;

use anyhow::Result;
use flume::{Receiver, Sender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::calculator::{CalculatorEngine, ErrorTicket, Input, copy_to_clipboard};
use crate::input::Command;
use crate::ui::Renderer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Command(Command),
    /// The error display delay for `ErrorTicket` has elapsed.
    AutoClear(ErrorTicket),
}

impl From<Command> for Event {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

struct ScheduledReset {
    ticket: ErrorTicket,
    handle: JoinHandle<()>,
}

pub struct Session<R: Renderer> {
    engine: CalculatorEngine,
    renderer: R,
    reset_delay: Duration,
    tx: Sender<Event>,
    rx: Receiver<Event>,
    scheduled_reset: Option<ScheduledReset>,
}

impl<R: Renderer> Session<R> {
    pub fn new(engine: CalculatorEngine, renderer: R, reset_delay: Duration) -> Self {
        let (tx, rx) = flume::unbounded();
        Self {
            engine,
            renderer,
            reset_delay,
            tx,
            rx,
            scheduled_reset: None,
        }
    }

    /// A handle for feeding events into the session.
    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    /// Render the initial state, then handle events until `Quit`.
    pub async fn run(&mut self) -> Result<()> {
        self.renderer.render(&self.engine.display())?;

        while let Ok(event) = self.rx.recv_async().await {
            if self.handle(event)?.is_break() {
                break;
            }
        }

        self.cancel_reset();
        Ok(())
    }

    /// Handle one event. Must be called from within a tokio runtime.
    pub fn handle(&mut self, event: Event) -> Result<ControlFlow<()>> {
        match event {
            Event::Command(Command::Input(input)) => {
                let state = self.engine.submit(input);
                if input == Input::Clear {
                    self.cancel_reset();
                }
                self.schedule_reset();
                self.renderer.render(&state)?;
            }
            Event::Command(Command::Copy) => self.copy_display(),
            Event::Command(Command::Quit) => return Ok(ControlFlow::Break(())),
            Event::AutoClear(ticket) => {
                if self
                    .scheduled_reset
                    .as_ref()
                    .is_some_and(|reset| reset.ticket == ticket)
                {
                    self.scheduled_reset = None;
                }
                if self.engine.auto_clear(ticket) {
                    self.renderer.render(&self.engine.display())?;
                }
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Start the reset timer for a newly entered error.
    fn schedule_reset(&mut self) {
        let Some(ticket) = self.engine.pending_error() else {
            return;
        };
        if self
            .scheduled_reset
            .as_ref()
            .is_some_and(|reset| reset.ticket == ticket)
        {
            return;
        }

        // A leftover timer can only belong to an older error.
        self.cancel_reset();

        let tx = self.tx.clone();
        let delay = self.reset_delay;
        debug!(?ticket, ?delay, "scheduling error reset");
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send_async(Event::AutoClear(ticket)).await;
        });
        self.scheduled_reset = Some(ScheduledReset { ticket, handle });
    }

    fn cancel_reset(&mut self) {
        if let Some(reset) = self.scheduled_reset.take() {
            debug!(ticket = ?reset.ticket, "cancelling error reset");
            reset.handle.abort();
        }
    }

    fn copy_display(&self) {
        let state = self.engine.display();
        if state.is_error {
            debug!("nothing to copy while error is displayed");
            return;
        }
        match copy_to_clipboard(&state.text) {
            Ok(()) => info!(text = %state.text, "copied to clipboard"),
            Err(err) => warn!("{:#}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{DisplayState, Operator};
    use tokio::time::{Instant, timeout};

    const DELAY: Duration = Duration::from_millis(1500);

    impl Renderer for Vec<DisplayState> {
        fn render(&mut self, state: &DisplayState) -> Result<()> {
            self.push(state.clone());
            Ok(())
        }
    }

    fn session() -> Session<Vec<DisplayState>> {
        Session::new(CalculatorEngine::default(), Vec::new(), DELAY)
    }

    impl Session<Vec<DisplayState>> {
        async fn next_event(&self) -> Option<Event> {
            self.rx.recv_async().await.ok()
        }
    }

    fn input(input: Input) -> Event {
        Event::Command(Command::Input(input))
    }

    fn divide_by_zero(session: &mut Session<Vec<DisplayState>>) {
        for event in [
            input(Input::Digit(1)),
            input(Input::Operator(Operator::Divide)),
            input(Input::Digit(0)),
            input(Input::Equals),
        ] {
            session.handle(event).unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_clears_after_delay() {
        let mut session = session();
        divide_by_zero(&mut session);
        assert!(session.engine.is_errored());
        let ticket = session.engine.pending_error().unwrap();

        let start = Instant::now();
        let event = timeout(DELAY * 2, session.next_event())
            .await
            .expect("reset should fire")
            .unwrap();
        assert_eq!(event, Event::AutoClear(ticket));
        assert!(start.elapsed() >= DELAY);

        session.handle(event).unwrap();
        let state = session.engine.display();
        assert!(!state.is_error);
        assert_eq!(state.text, "0");
        assert_eq!(session.renderer.last(), Some(&state));
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_clear_cancels_reset() {
        let mut session = session();
        divide_by_zero(&mut session);

        session.handle(input(Input::Clear)).unwrap();
        session.handle(input(Input::Digit(5))).unwrap();

        let pending = timeout(DELAY * 3, session.next_event()).await;
        assert!(pending.is_err(), "no reset should be queued");
        assert_eq!(session.engine.display().text, "5");
    }

    #[tokio::test(start_paused = true)]
    async fn test_inputs_ignored_until_reset() {
        let mut session = session();
        divide_by_zero(&mut session);
        session.handle(input(Input::Digit(7))).unwrap();
        assert_eq!(session.renderer.last().unwrap().text, "Error");

        let event = session.next_event().await.unwrap();
        session.handle(event).unwrap();
        session.handle(input(Input::Digit(7))).unwrap();
        assert_eq!(session.renderer.last().unwrap().text, "7");
    }

    #[tokio::test]
    async fn test_run_until_quit() {
        let mut session = session();
        let tx = session.sender();
        for event in [
            input(Input::Digit(2)),
            input(Input::Operator(Operator::Add)),
            input(Input::Digit(3)),
            input(Input::Equals),
            Event::Command(Command::Quit),
            input(Input::Digit(9)),
        ] {
            tx.send(event).unwrap();
        }

        session.run().await.unwrap();

        let texts: Vec<&str> = session.renderer.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["0", "2", "2", "3", "5"]);
        assert_eq!(session.engine.display().last_answer_text, "5");
    }
}
