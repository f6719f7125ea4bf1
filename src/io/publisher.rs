//! Output side of the adapter

use super::OutputFormat;
use crate::common::VelocityCommand;
use crate::control::drive::{DriveGeometry, SkidSteerDrive};
use crate::error::{Result, TeleopError};
use std::io::Write;
use tokio::sync::mpsc;

/// Something that accepts velocity commands, one per processed sample
pub trait CommandPublisher {
    fn publish(&mut self, cmd: &VelocityCommand) -> Result<()>;
}

/// Writes one text line per command
#[derive(Debug)]
pub struct LinePublisher<W: Write> {
    writer: W,
    drive: Option<SkidSteerDrive>,
}

impl<W: Write> LinePublisher<W> {
    /// `<linear> <angular>` lines
    pub fn twist(writer: W) -> Self {
        LinePublisher {
            writer,
            drive: None,
        }
    }

    /// `<left_effort> <right_effort>` lines
    pub fn wheels(writer: W, drive: SkidSteerDrive) -> Self {
        LinePublisher {
            writer,
            drive: Some(drive),
        }
    }

    pub fn with_format(writer: W, format: OutputFormat, geometry: DriveGeometry) -> Result<Self> {
        match format {
            OutputFormat::Twist => Ok(Self::twist(writer)),
            OutputFormat::Wheels => Ok(Self::wheels(writer, SkidSteerDrive::new(geometry)?)),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// `-0.0` prints as `-0`; a stopped axis is written as `0`.
fn unsigned_zero(value: f64) -> f64 {
    value + 0.0
}

impl<W: Write> CommandPublisher for LinePublisher<W> {
    fn publish(&mut self, cmd: &VelocityCommand) -> Result<()> {
        match &self.drive {
            None => writeln!(
                self.writer,
                "{} {}",
                unsigned_zero(cmd.linear),
                unsigned_zero(cmd.angular)
            ),
            Some(drive) => {
                let efforts = drive.wheel_efforts(cmd);
                writeln!(
                    self.writer,
                    "{} {}",
                    unsigned_zero(efforts.left),
                    unsigned_zero(efforts.right)
                )
            }
        }
        .and_then(|_| self.writer.flush())
        .map_err(TeleopError::Publish)
    }
}

/// Forwards commands to an in-process consumer
impl CommandPublisher for mpsc::UnboundedSender<VelocityCommand> {
    fn publish(&mut self, cmd: &VelocityCommand) -> Result<()> {
        self.send(*cmd).map_err(|_| {
            TeleopError::Publish(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "command receiver dropped",
            ))
        })
    }
}
