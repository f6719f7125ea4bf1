//! I/O adapter: moves joystick samples from an input channel through the
//! transform and publishes the resulting commands.
pub mod decode;
pub mod node;
pub mod publisher;
pub mod queue;

pub use decode::{decode_line, decode_raw_line};
pub use node::{read_samples, spawn_line_reader, NodeStats, ReaderStats, TeleopNode};
pub use publisher::{CommandPublisher, LinePublisher};
pub use queue::{sample_queue, SampleReceiver, SampleSender};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Buffering policy between the input reader and the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueuePolicy {
    /// Keep only the most recent sample; stale samples are dropped
    #[default]
    Latest,
    /// Keep every sample in a bounded queue
    Fifo,
}

/// What the output channel carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `<linear> <angular>`
    #[default]
    Twist,
    /// `<left_effort> <right_effort>` for a skid-steer drive
    Wheels,
}

impl FromStr for QueuePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(QueuePolicy::Latest),
            "fifo" => Ok(QueuePolicy::Fifo),
            other => Err(format!("unknown queue policy {other:?}, expected latest or fifo")),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "twist" => Ok(OutputFormat::Twist),
            "wheels" => Ok(OutputFormat::Wheels),
            other => Err(format!("unknown output format {other:?}, expected twist or wheels")),
        }
    }
}
