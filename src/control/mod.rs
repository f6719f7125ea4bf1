//! Control module: joystick transform and drive mapping
pub mod drive;
pub mod teleop;

pub use drive::{DriveGeometry, SkidSteerDrive, WheelEfforts, WheelSpeeds};
pub use teleop::{compute, speed_multiplier, trigger_intensity, JoyToTwist};
