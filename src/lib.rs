//! Joystick teleoperation for mobile robots.
//!
//! Turns joystick axis samples into velocity commands. The transform itself
//! lives in [`control::teleop`]; [`io`] wraps it into a node that reads samples
//! from a text stream and publishes commands.
pub mod common;
pub mod config;
pub mod control;
pub mod error;
pub mod io;

pub use common::{AxisSample, VelocityCommand};
pub use config::{TeleopConfig, TransformConfig};
pub use control::teleop::{compute, JoyToTwist};
pub use error::{Result, TeleopError};
