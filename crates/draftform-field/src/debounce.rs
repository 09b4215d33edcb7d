//! Timer-reset-on-event debounce over a change stream

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;

/// Debounced view of a broadcast change stream
///
/// `next` resolves with the most recent value once the stream has been
/// quiet for the full window. Every event inside the window resets the
/// timer. A lagged receiver skips to the newest events, which is exactly
/// the value a debounce would have kept anyway.
#[derive(Debug)]
pub struct Debounced<T> {
    rx: broadcast::Receiver<T>,
    window: Duration,
}

impl<T: Clone + Send + 'static> Debounced<T> {
    /// Wrap a receiver with a debounce window
    #[inline]
    #[must_use]
    pub fn new(rx: broadcast::Receiver<T>, window: Duration) -> Self {
        Self { rx, window }
    }

    /// Next debounced value, or `None` once the stream is closed and drained
    pub async fn next(&mut self) -> Option<T> {
        let mut latest = loop {
            match self.rx.recv().await {
                Ok(value) => break value,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        };

        loop {
            tokio::select! {
                res = self.rx.recv() => match res {
                    Ok(value) => latest = value,
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    // flush the pending value; the next call returns None
                    Err(broadcast::error::RecvError::Closed) => return Some(latest),
                },
                () = time::sleep(self.window) => return Some(latest),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WINDOW: Duration = Duration::from_millis(350);

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_last_value() {
        let (tx, rx) = broadcast::channel(16);
        let mut debounced = Debounced::new(rx, WINDOW);

        // poll concurrently so every send lands inside the open window
        let next = tokio::spawn(async move { debounced.next().await });
        for value in ["G", "Go", "Goo", "Good"] {
            tx.send(value.to_string()).unwrap();
            time::sleep(Duration::from_millis(50)).await;
        }

        assert_eq!(next.await.unwrap().as_deref(), Some("Good"));
    }

    #[tokio::test(start_paused = true)]
    async fn quiet_gaps_emit_separately() {
        let (tx, rx) = broadcast::channel(16);
        let mut debounced = Debounced::new(rx, WINDOW);

        tx.send("first".to_string()).unwrap();
        assert_eq!(debounced.next().await.as_deref(), Some("first"));

        tx.send("second".to_string()).unwrap();
        assert_eq!(debounced.next().await.as_deref(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn closed_stream_flushes_then_ends() {
        let (tx, rx) = broadcast::channel(16);
        let mut debounced = Debounced::new(rx, WINDOW);

        tx.send("pending".to_string()).unwrap();
        drop(tx);

        assert_eq!(debounced.next().await.as_deref(), Some("pending"));
        assert_eq!(debounced.next().await, None);
    }
}
