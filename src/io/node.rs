//! The teleop node: reads samples, runs the transform, publishes commands.

use super::decode::decode_raw_line;
use super::publisher::CommandPublisher;
use super::queue::{SampleReceiver, SampleSender};
use crate::common::AxisSample;
use crate::control::teleop::JoyToTwist;
use crate::error::{Result, TeleopError};
use std::io::BufRead;
use std::thread::{self, JoinHandle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, trace, warn};

/// Counters kept by the transform loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStats {
    /// Samples turned into a published command
    pub published: u64,
    /// Samples rejected by the transform
    pub skipped: u64,
}

/// Counters kept by the input reader
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    pub lines: u64,
    pub samples: u64,
    pub undecodable: u64,
}

/// Joystick teleop node
pub struct TeleopNode<P> {
    transform: JoyToTwist,
    publisher: P,
    stats: NodeStats,
}

impl<P: CommandPublisher> TeleopNode<P> {
    pub fn new(transform: JoyToTwist, publisher: P) -> Self {
        TeleopNode {
            transform,
            publisher,
            stats: NodeStats::default(),
        }
    }

    /// Handle one incoming sample.
    ///
    /// A malformed sample is logged and skipped. Only a publish failure is
    /// returned as an error.
    pub fn joy_callback(&mut self, sample: &AxisSample) -> Result<()> {
        let cmd = match self.transform.compute_velocity(sample) {
            Ok(cmd) => cmd,
            Err(e @ TeleopError::MalformedSample { .. }) => {
                warn!("Skipping joystick sample: {}", e);
                self.stats.skipped += 1;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        trace!("linear={:.4}, angular={:.4}", cmd.linear, cmd.angular);
        self.publisher.publish(&cmd)?;
        self.stats.published += 1;
        Ok(())
    }

    /// Process samples until the queue closes or publishing fails
    pub async fn spin(&mut self, mut samples: SampleReceiver) -> Result<NodeStats> {
        while let Some(sample) = samples.recv().await {
            self.joy_callback(&sample)?;
        }

        info!(
            "Input closed after {} commands ({} samples skipped)",
            self.stats.published, self.stats.skipped
        );
        Ok(self.stats)
    }

    pub fn stats(&self) -> NodeStats {
        self.stats
    }

    pub fn into_publisher(self) -> P {
        self.publisher
    }
}

/// Decode one raw line, counting it. Undecodable lines are logged and skipped.
fn take_sample(stats: &mut ReaderStats, raw: &[u8]) -> Option<AxisSample> {
    stats.lines += 1;
    match decode_raw_line(stats.lines as usize, raw) {
        Ok(sample) => sample,
        Err(e) => {
            warn!("{}", e);
            stats.undecodable += 1;
            None
        }
    }
}

/// Read text samples and feed them into the queue.
///
/// Lines that do not decode, including lines that are not UTF-8, are logged
/// and skipped. Returns when the input ends or the consumer goes away.
pub async fn read_samples<R>(mut reader: R, queue: SampleSender) -> Result<ReaderStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = ReaderStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(TeleopError::Input)?;
        if n == 0 {
            break;
        }

        let Some(sample) = take_sample(&mut stats, &buf) else {
            continue;
        };
        if queue.send(sample).await.is_err() {
            debug!("Sample queue closed, stopping input reader");
            break;
        }
        stats.samples += 1;
    }

    Ok(stats)
}

/// Run the text reader on its own thread over a blocking reader such as stdin.
///
/// A read that never returns only holds up this thread, never the runtime.
/// The thread ends when the input ends or the queue is dropped and another
/// line arrives.
pub fn spawn_line_reader<R>(
    mut reader: R,
    queue: SampleSender,
) -> std::io::Result<JoinHandle<Result<ReaderStats>>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("joy-input".into())
        .spawn(move || -> Result<ReaderStats> {
            let mut stats = ReaderStats::default();
            let mut buf = Vec::new();

            loop {
                buf.clear();
                let n = reader
                    .read_until(b'\n', &mut buf)
                    .map_err(TeleopError::Input)?;
                if n == 0 {
                    break;
                }

                let Some(sample) = take_sample(&mut stats, &buf) else {
                    continue;
                };
                if queue.blocking_send(sample).is_err() {
                    debug!("Sample queue closed, stopping input thread");
                    break;
                }
                stats.samples += 1;
            }

            Ok(stats)
        })
}
