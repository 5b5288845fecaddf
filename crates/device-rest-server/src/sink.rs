use std::time::Duration;

use device_rest::command::AsyncValues;
use device_rest::error::{Error, ErrorKind, Result};

use tokio::sync::mpsc::{self, Receiver, Sender};

/// The receiving half of an [`AsyncValuesSink`].
pub type AsyncValuesReceiver = Receiver<AsyncValues>;

/// Creates an [`AsyncValuesSink`] backed by a bounded queue, along with
/// the receiver used by the hosting runtime to consume values.
///
/// # Panics
///
/// Panics if `capacity` is zero.
#[must_use]
pub fn channel(capacity: usize) -> (AsyncValuesSink, AsyncValuesReceiver) {
    let (sender, receiver) = mpsc::channel(capacity);
    (
        AsyncValuesSink {
            sender,
            timeout: None,
        },
        receiver,
    )
}

/// The sink where ingested [`AsyncValues`] are handed off.
///
/// A handoff waits until the queue has free capacity. Without a timeout, a
/// stalled consumer stalls every pending handoff.
#[derive(Debug, Clone)]
pub struct AsyncValuesSink {
    sender: Sender<AsyncValues>,
    timeout: Option<Duration>,
}

impl AsyncValuesSink {
    /// Sets the maximum time a handoff waits for free capacity.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Hands off [`AsyncValues`] to the consumer.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::SinkTimeout`] when the queue stays full longer than
    ///   the timeout
    /// - [`ErrorKind::Sink`] when the receiver has been dropped
    pub async fn send(&self, values: AsyncValues) -> Result<()> {
        let handoff = self.sender.send(values);

        let sent = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, handoff).await.map_err(|_| {
                Error::new(
                    ErrorKind::SinkTimeout,
                    format!("async values not accepted within {} ms", timeout.as_millis()),
                )
            })?,
            None => handoff.await,
        };

        sent.map_err(|_| Error::new(ErrorKind::Sink, "async values sink is closed"))
    }
}
