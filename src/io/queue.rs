//! Sample queue between the input reader and the transform loop.
//!
//! `Latest` is backed by a `watch` channel, so a slow consumer only ever sees
//! the newest sample. `Fifo` is a bounded `mpsc` channel and applies
//! backpressure to the reader instead of dropping.

use super::QueuePolicy;
use crate::common::AxisSample;
use tokio::sync::{mpsc, watch};

/// The receiving side has gone away
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("sample queue closed")]
pub struct QueueClosed;

/// Producer half of the sample queue
#[derive(Debug)]
pub enum SampleSender {
    Latest(watch::Sender<Option<AxisSample>>),
    Fifo(mpsc::Sender<AxisSample>),
}

/// Consumer half of the sample queue
#[derive(Debug)]
pub enum SampleReceiver {
    Latest(watch::Receiver<Option<AxisSample>>),
    Fifo(mpsc::Receiver<AxisSample>),
}

/// Create a sample queue. `capacity` only applies to [`QueuePolicy::Fifo`].
pub fn sample_queue(policy: QueuePolicy, capacity: usize) -> (SampleSender, SampleReceiver) {
    match policy {
        QueuePolicy::Latest => {
            let (tx, rx) = watch::channel(None);
            (SampleSender::Latest(tx), SampleReceiver::Latest(rx))
        }
        QueuePolicy::Fifo => {
            let (tx, rx) = mpsc::channel(capacity.max(1));
            (SampleSender::Fifo(tx), SampleReceiver::Fifo(rx))
        }
    }
}

impl SampleSender {
    /// Queue a sample. With `Latest` this replaces any sample not yet taken.
    pub async fn send(&self, sample: AxisSample) -> Result<(), QueueClosed> {
        match self {
            SampleSender::Latest(tx) => {
                if tx.is_closed() {
                    return Err(QueueClosed);
                }
                tx.send_replace(Some(sample));
                Ok(())
            }
            SampleSender::Fifo(tx) => tx.send(sample).await.map_err(|_| QueueClosed),
        }
    }

    /// Same as [`send`](Self::send) for callers outside the runtime.
    ///
    /// Must not be called from an async context.
    pub fn blocking_send(&self, sample: AxisSample) -> Result<(), QueueClosed> {
        match self {
            SampleSender::Latest(tx) => {
                if tx.is_closed() {
                    return Err(QueueClosed);
                }
                tx.send_replace(Some(sample));
                Ok(())
            }
            SampleSender::Fifo(tx) => tx.blocking_send(sample).map_err(|_| QueueClosed),
        }
    }
}

impl SampleReceiver {
    /// Wait for the next sample. Returns `None` once the sender is dropped and
    /// every queued sample has been taken.
    pub async fn recv(&mut self) -> Option<AxisSample> {
        match self {
            SampleReceiver::Latest(rx) => loop {
                rx.changed().await.ok()?;
                let latest = rx.borrow_and_update().clone();
                if let Some(sample) = latest {
                    return Some(sample);
                }
            },
            SampleReceiver::Fifo(rx) => rx.recv().await,
        }
    }
}
