//! Joystick to velocity transform.
//!
//! The trigger axis modulates speed: at rest (+1) both outputs are limited to
//! a quarter of their scale, fully depressed (-1) they reach the full scale.
//! The throttle axis then drives the linear speed and the steering axis drives
//! the angular speed, whose sign convention is negated.
//!
//! Out of range axes are not clamped. Values beyond [-1, 1] extrapolate the
//! same formulas and may exceed the configured scales.

use crate::common::{
    AxisSample, VelocityCommand, REQUIRED_AXES, STEERING_AXIS, THROTTLE_AXIS, TRIGGER_AXIS,
};
use crate::config::TransformConfig;
use crate::error::{Result, TeleopError};

/// Normalized trigger intensity: 0 with the trigger at rest, 1 fully depressed
pub fn trigger_intensity(trigger: f64) -> f64 {
    1.0 - ((trigger + 1.0) / 2.0)
}

/// Interpolates between 25% and 100% of `scale` as `intensity` goes from 0 to 1
pub fn speed_multiplier(scale: f64, intensity: f64) -> f64 {
    scale / 4.0 + intensity * (scale * 3.0 / 4.0)
}

/// Map one joystick sample to a velocity command.
///
/// Fails with [`TeleopError::MalformedSample`] when the sample has fewer than
/// three axes. Missing axes are never defaulted.
pub fn compute(sample: &AxisSample, config: &TransformConfig) -> Result<VelocityCommand> {
    let axes = sample.axes();
    if axes.len() < REQUIRED_AXES {
        return Err(TeleopError::MalformedSample {
            expected: REQUIRED_AXES,
            found: axes.len(),
        });
    }

    let intensity = trigger_intensity(axes[TRIGGER_AXIS]);

    let linear = axes[THROTTLE_AXIS] * speed_multiplier(config.linear_scale, intensity);

    let angular_multiplier = -speed_multiplier(config.angular_scale, intensity);
    let invert = if config.invert_angular { -1.0 } else { 1.0 };
    let angular = (axes[STEERING_AXIS] * invert) * angular_multiplier;

    Ok(VelocityCommand { linear, angular })
}

/// Holds the transform parameters for the lifetime of the node
#[derive(Debug, Clone, Copy, Default)]
pub struct JoyToTwist {
    config: TransformConfig,
}

impl JoyToTwist {
    pub fn new(config: TransformConfig) -> Self {
        JoyToTwist { config }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Compute the velocity command for a sample
    pub fn compute_velocity(&self, sample: &AxisSample) -> Result<VelocityCommand> {
        compute(sample, &self.config)
    }
}
