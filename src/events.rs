//! Event types and the main event loop driver.
//!
//! [`EventHandler`] runs a background task that polls crossterm for key
//! presses and emits periodic [`Event::Tick`]s. Request tasks started from
//! `main.rs` report back through a clone of [`EventHandler::tx`].

use crate::handlers::{AsteroidsView, PictureView};
use crate::range::DateRange;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::error;

/// Events processed by the application event loop.
pub enum Event {
    /// Periodic tick used for the loading spinner.
    Tick,
    /// User key press from the terminal.
    Input(KeyEvent),
    /// The asteroid list request finished (possibly with an error message inside).
    AsteroidsLoaded(AsteroidsView),
    /// The picture request finished.
    PictureLoaded(PictureView),
    /// The export request finished.
    ExportFinished {
        /// Range the export was run for, after normalization.
        range: DateRange,
        /// Where the workbook was written, or the message to show.
        result: Result<PathBuf, String>,
    },
}

/// Multiplexes terminal input, ticks and request results into one stream.
pub struct EventHandler {
    /// Sender for posting events from request tasks.
    pub tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Creates the handler and spawns the input/tick task.
    ///
    /// The task polls crossterm with a timeout of `tick_rate_ms`. If the
    /// terminal stops answering it logs the error and exits; the main loop
    /// then only sees events from request tasks.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::spawn(async move {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::from_secs(0));
                match event::poll(timeout) {
                    Ok(true) => match event::read() {
                        // Only presses; Windows also reports releases.
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            event_tx.send(Event::Input(key)).ok();
                        }
                        Ok(_) => {}
                        Err(e) => {
                            error!("Terminal read failed: {}", e);
                            break;
                        }
                    },
                    Ok(false) => {}
                    Err(e) => {
                        error!("Terminal poll failed: {}", e);
                        break;
                    }
                }
                if last_tick.elapsed() >= tick_rate {
                    if event_tx.send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self { tx, rx }
    }

    /// Receives the next event, or `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
