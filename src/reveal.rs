//! Simulated token reveal for a reply that has already arrived in full. The
//! reveal is an explicit task tied to one displayed message: it can be
//! canceled, is restarted when the message changes, and aborts on drop so a
//! torn-down view never leaks a timer.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};

pub const DEFAULT_CHUNK_CHARS: usize = 3;
pub const DEFAULT_TICK: Duration = Duration::from_millis(20);

/// Growing char-safe prefixes of `text`, one per tick, ending with the full
/// text. The stream owns its timer; dropping it stops the reveal.
pub fn reveal_stream(text: String, chunk: usize, tick: Duration) -> impl Stream<Item = String> {
  async_stream::stream! {
    let chunk = chunk.max(1);
    let total = text.chars().count();
    let mut shown = 0;
    let mut interval = tokio::time::interval(tick);
    while shown < total {
      interval.tick().await;
      shown = (shown + chunk).min(total);
      yield text.chars().take(shown).collect::<String>();
    }
  }
}

pub struct RevealTask {
  visible: watch::Receiver<String>,
  handle: JoinHandle<()>,
}

impl RevealTask {
  pub fn start(text: impl Into<String>) -> Self {
    Self::with_pace(text, DEFAULT_CHUNK_CHARS, DEFAULT_TICK)
  }

  pub fn with_pace(text: impl Into<String>, chunk: usize, tick: Duration) -> Self {
    let text = text.into();
    let (tx, rx) = watch::channel(String::new());
    let handle = tokio::spawn(async move {
      let stream = reveal_stream(text, chunk, tick);
      tokio::pin!(stream);
      while let Some(prefix) = stream.next().await {
        if tx.send(prefix).is_err() {
          break;
        }
      }
    });
    Self { visible: rx, handle }
  }

  /// The currently revealed prefix.
  pub fn visible(&self) -> String {
    self.visible.borrow().clone()
  }

  /// Waits for the next reveal step. Returns false once the reveal has
  /// finished (or was canceled) and no further updates will arrive.
  pub async fn changed(&mut self) -> bool {
    self.visible.changed().await.is_ok()
  }

  pub fn is_done(&self) -> bool {
    self.handle.is_finished()
  }

  pub fn cancel(&self) {
    self.handle.abort();
  }

  /// Drops the running reveal and starts over with new text.
  pub fn restart(&mut self, text: impl Into<String>) {
    self.handle.abort();
    *self = Self::start(text);
  }
}

impl Drop for RevealTask {
  fn drop(&mut self) {
    self.handle.abort();
  }
}
