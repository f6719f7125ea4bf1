//! Skid-steer drive mapping
//!
//! Converts a velocity command into wheel speeds and motor controller efforts
//! for a four wheel skid-steer platform where both wheels on a side receive
//! the same command.

use crate::common::VelocityCommand;
use crate::error::{Result, TeleopError};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Physical parameters of the drive train
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveGeometry {
    /// Distance between left and right wheels (m)
    pub track_width: f64,
    /// Wheel radius (m)
    pub wheel_radius: f64,
    /// Motor speed corresponding to full effort (rpm)
    pub max_rpm: f64,
    pub gear_ratio: f64,
    /// Effort value the motor controller accepts for full speed
    pub max_effort: f64,
}

impl Default for DriveGeometry {
    fn default() -> Self {
        DriveGeometry {
            track_width: 0.76,
            wheel_radius: 0.203,
            max_rpm: 3000.0,
            gear_ratio: 11.0,
            max_effort: 1000.0,
        }
    }
}

impl DriveGeometry {
    /// Check every parameter is finite and positive
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("track_width", self.track_width),
            ("wheel_radius", self.wheel_radius),
            ("max_rpm", self.max_rpm),
            ("gear_ratio", self.gear_ratio),
            ("max_effort", self.max_effort),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(TeleopError::InvalidDriveGeometry(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Wheel speeds in rpm
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelSpeeds {
    pub left_rpm: f64,
    pub right_rpm: f64,
}

/// Motor controller commands
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelEfforts {
    pub left: f64,
    pub right: f64,
}

/// A controller for skid-steer robots
#[derive(Debug, Clone, Copy)]
pub struct SkidSteerDrive {
    geometry: DriveGeometry,
}

impl SkidSteerDrive {
    /// Create a new drive mapping, rejecting invalid geometry
    pub fn new(geometry: DriveGeometry) -> Result<Self> {
        geometry.validate()?;
        Ok(SkidSteerDrive { geometry })
    }

    pub fn geometry(&self) -> &DriveGeometry {
        &self.geometry
    }

    /// Wheel speeds needed to follow the command
    pub fn wheel_speeds(&self, cmd: &VelocityCommand) -> WheelSpeeds {
        let g = &self.geometry;
        let circumference_x2 = 4.0 * PI * g.wheel_radius;

        // rev/s to rpm
        let left_rpm = (2.0 * cmd.linear + cmd.angular * g.track_width) / circumference_x2 * 60.0;
        let right_rpm = (2.0 * cmd.linear - cmd.angular * g.track_width) / circumference_x2 * 60.0;

        WheelSpeeds {
            left_rpm,
            right_rpm,
        }
    }

    /// Effort values for the motor controllers. Not clamped to `max_effort`.
    pub fn wheel_efforts(&self, cmd: &VelocityCommand) -> WheelEfforts {
        let speeds = self.wheel_speeds(cmd);
        WheelEfforts {
            left: self.rpm_to_effort(speeds.left_rpm),
            right: self.rpm_to_effort(speeds.right_rpm),
        }
    }

    fn rpm_to_effort(&self, rpm: f64) -> f64 {
        (rpm / self.geometry.max_rpm) * self.geometry.max_effort * self.geometry.gear_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive() -> SkidSteerDrive {
        SkidSteerDrive::new(DriveGeometry::default()).unwrap()
    }

    #[test]
    fn stop_gives_zero_wheel_speeds() {
        let speeds = drive().wheel_speeds(&VelocityCommand::stop());
        assert_eq!(speeds, WheelSpeeds::default());
        assert_eq!(drive().wheel_efforts(&VelocityCommand::stop()), WheelEfforts::default());
    }

    #[test]
    fn straight_line_drives_both_sides_equally() {
        let speeds = drive().wheel_speeds(&VelocityCommand::new(1.0, 0.0));
        assert_eq!(speeds.left_rpm, speeds.right_rpm);

        // 1 m/s on a 0.203 m wheel
        let expected = 60.0 / (2.0 * PI * 0.203);
        assert!((speeds.left_rpm - expected).abs() < 1e-9);
    }

    #[test]
    fn rotation_in_place_gives_opposite_wheel_speeds() {
        let speeds = drive().wheel_speeds(&VelocityCommand::new(0.0, 0.5));
        assert!(speeds.left_rpm > 0.0);
        assert_eq!(speeds.left_rpm, -speeds.right_rpm);

        let expected = 0.5 * 0.76 / (4.0 * PI * 0.203) * 60.0;
        assert!((speeds.left_rpm - expected).abs() < 1e-9);
    }

    #[test]
    fn effort_scales_rpm_by_gear_ratio() {
        let d = drive();
        let cmd = VelocityCommand::new(0.2, -0.05);
        let speeds = d.wheel_speeds(&cmd);
        let efforts = d.wheel_efforts(&cmd);
        assert!((efforts.left - speeds.left_rpm / 3000.0 * 1000.0 * 11.0).abs() < 1e-9);
        assert!((efforts.right - speeds.right_rpm / 3000.0 * 1000.0 * 11.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_geometry() {
        let geometry = DriveGeometry {
            track_width: 0.0,
            ..DriveGeometry::default()
        };
        assert!(matches!(
            SkidSteerDrive::new(geometry),
            Err(TeleopError::InvalidDriveGeometry(_))
        ));

        let geometry = DriveGeometry {
            max_rpm: f64::INFINITY,
            ..DriveGeometry::default()
        };
        assert!(SkidSteerDrive::new(geometry).is_err());
    }
}
