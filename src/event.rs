use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Application events
#[derive(Debug, PartialEq, Eq)]
pub enum Event {
  /// A line typed on stdin
  Input(String),
  /// Periodic tick for polling finished fetches
  Tick,
  /// Stdin reached end of file
  Closed,
}

/// Event handler that produces events from stdin lines and a tick timer
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let lines = BufReader::new(tokio::io::stdin()).lines();
    Self::from_lines(lines, tick_rate)
  }

  fn from_lines<R>(mut lines: tokio::io::Lines<R>, tick_rate: Duration) -> Self
  where
    R: tokio::io::AsyncBufRead + Unpin + Send + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
      let mut ticker = tokio::time::interval(tick_rate);
      loop {
        let event = tokio::select! {
          line = lines.next_line() => match line {
            Ok(Some(line)) => Event::Input(line),
            Ok(None) | Err(_) => Event::Closed,
          },
          _ = ticker.tick() => Event::Tick,
        };

        let closed = event == Event::Closed;
        if tx.send(event).is_err() || closed {
          break;
        }
      }
    });

    Self { rx }
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
