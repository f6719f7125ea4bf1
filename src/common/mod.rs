//! Common types shared between the teleop transform and its adapters

/// Axis index of the steering stick
pub const STEERING_AXIS: usize = 0;
/// Axis index of the throttle stick
pub const THROTTLE_AXIS: usize = 1;
/// Axis index of the trigger used as speed modulator
pub const TRIGGER_AXIS: usize = 2;

/// Minimum number of axes a sample must carry
pub const REQUIRED_AXES: usize = 3;

/// One synchronized reading of all joystick analog channels.
///
/// Values are expected in [-1, 1] but are stored as received. Length is
/// checked by the transform, not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisSample {
    axes: Vec<f64>,
}

impl AxisSample {
    /// Create a sample from raw axis readings
    pub fn new(axes: Vec<f64>) -> Self {
        AxisSample { axes }
    }

    /// Number of axes in the sample
    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Get a single axis value
    pub fn axis(&self, index: usize) -> Option<f64> {
        self.axes.get(index).copied()
    }

    pub fn axes(&self) -> &[f64] {
        &self.axes
    }
}

impl From<Vec<f64>> for AxisSample {
    fn from(axes: Vec<f64>) -> Self {
        AxisSample::new(axes)
    }
}

impl From<&[f64]> for AxisSample {
    fn from(axes: &[f64]) -> Self {
        AxisSample::new(axes.to_vec())
    }
}

/// Velocity command for the robot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VelocityCommand {
    /// Forward/backward speed, same units as the linear scale
    pub linear: f64,
    /// Turn rate, same units as the angular scale
    pub angular: f64,
}

impl VelocityCommand {
    pub fn new(linear: f64, angular: f64) -> Self {
        VelocityCommand { linear, angular }
    }

    /// A command that stops the platform
    pub fn stop() -> Self {
        VelocityCommand::default()
    }
}
