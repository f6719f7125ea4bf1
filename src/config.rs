//! Startup configuration for the teleop node.
//!
//! Configuration is resolved once, before the first sample is processed, and
//! never changes afterwards. The file is TOML:
//!
//! ```toml
//! [transform]
//! linear_scale = 0.2
//! angular_scale = 0.05
//! invert_angular = false
//!
//! [io]
//! queue = "latest"
//! queue_capacity = 64
//! output = "twist"
//!
//! [drive]
//! track_width = 0.76
//! wheel_radius = 0.203
//!
//! [log]
//! level = "info"
//! ```
//!
//! The three transform scalars are resolved one by one: a scalar that is
//! missing or unusable falls back to its default, so the transform always
//! runs with a complete configuration.

use crate::control::drive::DriveGeometry;
use crate::error::{Result, TeleopError};
use crate::io::{OutputFormat, QueuePolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use toml::{Table, Value};
use tracing::{debug, warn};

pub const DEFAULT_LINEAR_SCALE: f64 = 0.2;
pub const DEFAULT_ANGULAR_SCALE: f64 = 0.05;
pub const DEFAULT_INVERT_ANGULAR: bool = false;

const LINEAR_SCALE_KEYS: [&str; 2] = ["linear_scale", "max_linear_vel"];
const ANGULAR_SCALE_KEYS: [&str; 2] = ["angular_scale", "max_angular_vel"];
const LEGACY_INVERT_KEY: &str = "invert_z";
const INVERT_ANGULAR_KEYS: [&str; 2] = ["invert_angular", LEGACY_INVERT_KEY];

/// Parameters of the joystick to velocity transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Maximum linear speed magnitude, reached at full trigger
    pub linear_scale: f64,
    /// Maximum angular speed magnitude, reached at full trigger
    pub angular_scale: f64,
    /// Flip the sign of the angular output
    pub invert_angular: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        TransformConfig {
            linear_scale: DEFAULT_LINEAR_SCALE,
            angular_scale: DEFAULT_ANGULAR_SCALE,
            invert_angular: DEFAULT_INVERT_ANGULAR,
        }
    }
}

impl TransformConfig {
    /// Resolve the transform parameters from a `[transform]` table.
    ///
    /// Each scalar is looked up under its name and under the legacy name
    /// (`max_linear_vel`, `max_angular_vel`, `invert_z`). Scales must be finite
    /// and positive. `invert_angular` must be a boolean, while the legacy
    /// `invert_z` also takes numbers and strings by truthiness.
    pub fn resolve(params: &Table) -> Self {
        TransformConfig {
            linear_scale: resolve_scale(params, &LINEAR_SCALE_KEYS, DEFAULT_LINEAR_SCALE),
            angular_scale: resolve_scale(params, &ANGULAR_SCALE_KEYS, DEFAULT_ANGULAR_SCALE),
            invert_angular: resolve_flag(params, &INVERT_ANGULAR_KEYS, DEFAULT_INVERT_ANGULAR),
        }
    }

    /// Apply command line overrides on top of the resolved values
    pub fn with_overrides(
        mut self,
        linear_scale: Option<f64>,
        angular_scale: Option<f64>,
        invert_angular: Option<bool>,
    ) -> Self {
        if let Some(linear_scale) = linear_scale {
            self.linear_scale = linear_scale;
        }
        if let Some(angular_scale) = angular_scale {
            self.angular_scale = angular_scale;
        }
        if let Some(invert_angular) = invert_angular {
            self.invert_angular = invert_angular;
        }
        self
    }
}

/// Returns the first key present in the table along with its value
fn lookup<'a>(params: &'a Table, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    keys.iter()
        .find_map(|key| params.get(*key).map(|value| (*key, value)))
}

fn resolve_scale(params: &Table, keys: &[&'static str], default: f64) -> f64 {
    let Some((key, value)) = lookup(params, keys) else {
        debug!("{} not set, using default {}", keys[0], default);
        return default;
    };

    let scale = match value {
        Value::Float(f) => Some(*f),
        Value::Integer(i) => Some(*i as f64),
        _ => None,
    };

    match scale {
        Some(scale) if scale.is_finite() && scale > 0.0 => scale,
        _ => {
            warn!(
                "{} = {} is not a positive number, falling back to default {}",
                key, value, default
            );
            default
        }
    }
}

fn resolve_flag(params: &Table, keys: &[&'static str], default: bool) -> bool {
    let Some((key, value)) = lookup(params, keys) else {
        debug!("{} not set, using default {}", keys[0], default);
        return default;
    };

    if let Value::Boolean(flag) = value {
        return *flag;
    }
    if key == LEGACY_INVERT_KEY {
        if let Some(flag) = legacy_truthiness(value) {
            debug!("{} = {} read as {}", key, value, flag);
            return flag;
        }
    }

    warn!(
        "{} = {} is not a boolean, falling back to default {}",
        key, value, default
    );
    default
}

/// Legacy flags were tested for truthiness: zero and empty strings are false.
fn legacy_truthiness(value: &Value) -> Option<bool> {
    match value {
        Value::Integer(i) => Some(*i != 0),
        Value::Float(f) => Some(*f != 0.0),
        Value::String(s) => Some(!s.is_empty()),
        _ => None,
    }
}

/// Adapter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// How samples are buffered between the reader and the transform
    pub queue: QueuePolicy,
    /// Capacity of the queue when `queue = "fifo"`
    pub queue_capacity: usize,
    /// What is written to the output channel
    pub output: OutputFormat,
}

impl Default for IoConfig {
    fn default() -> Self {
        IoConfig {
            queue: QueuePolicy::Latest,
            queue_capacity: 64,
            output: OutputFormat::Twist,
        }
    }
}

/// Log verbosity, lowercase in TOML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive usable with `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
}

/// Complete configuration of the teleop node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TeleopConfig {
    pub transform: TransformConfig,
    pub io: IoConfig,
    pub drive: DriveGeometry,
    pub log: LogConfig,
}

impl TeleopConfig {
    /// Load the configuration from a TOML file.
    ///
    /// A missing file is not an error: every value takes its default. A file
    /// that exists but cannot be read or parsed is.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Configuration file {} not found, using defaults",
                    path.display()
                );
                return Ok(TeleopConfig::default());
            }
            Err(source) => {
                return Err(TeleopError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::parse(&content, path)
    }

    /// Parse configuration text. `origin` is only used for error reporting.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        let parse_error = |source: toml::de::Error| TeleopError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        };

        let root = content.parse::<Table>().map_err(parse_error)?;

        let transform = match root.get("transform") {
            Some(Value::Table(params)) => TransformConfig::resolve(params),
            Some(other) => {
                warn!(
                    "[transform] should be a table, found {}; using defaults",
                    other.type_str()
                );
                TransformConfig::default()
            }
            None => TransformConfig::default(),
        };

        let config = TeleopConfig {
            transform,
            io: section(&root, "io").map_err(parse_error)?,
            drive: section(&root, "drive").map_err(parse_error)?,
            log: section(&root, "log").map_err(parse_error)?,
        };
        config.drive.validate()?;

        Ok(config)
    }
}

/// Deserialize an optional section, falling back to its defaults when absent
fn section<T>(root: &Table, name: &str) -> std::result::Result<T, toml::de::Error>
where
    T: serde::de::DeserializeOwned + Default,
{
    match root.get(name) {
        Some(value) => value.clone().try_into(),
        None => Ok(T::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(content: &str) -> Table {
        content.parse().unwrap()
    }

    #[test]
    fn empty_table_resolves_to_defaults() {
        let config = TransformConfig::resolve(&Table::new());
        assert_eq!(config, TransformConfig::default());
        assert_eq!(config.linear_scale, 0.2);
        assert_eq!(config.angular_scale, 0.05);
        assert!(!config.invert_angular);
    }

    #[test]
    fn resolves_each_scalar_independently() {
        let config = TransformConfig::resolve(&table(
            r#"
            linear_scale = 0.5
            invert_angular = "yes"
            "#,
        ));
        assert_eq!(config.linear_scale, 0.5);
        assert_eq!(config.angular_scale, DEFAULT_ANGULAR_SCALE);
        assert_eq!(config.invert_angular, DEFAULT_INVERT_ANGULAR);
    }

    #[test]
    fn accepts_legacy_parameter_names() {
        let config = TransformConfig::resolve(&table(
            r#"
            max_linear_vel = 1
            max_angular_vel = 0.3
            invert_z = true
            "#,
        ));
        assert_eq!(config.linear_scale, 1.0);
        assert_eq!(config.angular_scale, 0.3);
        assert!(config.invert_angular);
    }

    #[test]
    fn legacy_invert_flag_uses_truthiness() {
        let cases = [
            ("invert_z = 1", true),
            ("invert_z = -2", true),
            ("invert_z = 0.5", true),
            ("invert_z = \"true\"", true),
            ("invert_z = \"false\"", true),
            ("invert_z = 0", false),
            ("invert_z = 0.0", false),
            ("invert_z = \"\"", false),
        ];
        for (content, expected) in cases {
            let config = TransformConfig::resolve(&table(content));
            assert_eq!(config.invert_angular, expected, "{content}");
        }

        // Arrays have no truthiness here, so the default applies
        let config = TransformConfig::resolve(&table("invert_z = [1]"));
        assert_eq!(config.invert_angular, DEFAULT_INVERT_ANGULAR);
    }

    #[test]
    fn primary_invert_flag_must_be_boolean() {
        for content in ["invert_angular = 1", "invert_angular = \"true\""] {
            let config = TransformConfig::resolve(&table(content));
            assert_eq!(config.invert_angular, DEFAULT_INVERT_ANGULAR, "{content}");
        }
    }

    #[test]
    fn primary_name_wins_over_legacy_name() {
        let config = TransformConfig::resolve(&table(
            r#"
            linear_scale = 0.4
            max_linear_vel = 2.0
            "#,
        ));
        assert_eq!(config.linear_scale, 0.4);
    }

    #[test]
    fn non_positive_scales_fall_back() {
        let config = TransformConfig::resolve(&table(
            r#"
            linear_scale = -1.0
            angular_scale = 0.0
            "#,
        ));
        assert_eq!(config.linear_scale, DEFAULT_LINEAR_SCALE);
        assert_eq!(config.angular_scale, DEFAULT_ANGULAR_SCALE);

        let config = TransformConfig::resolve(&table("linear_scale = nan"));
        assert_eq!(config.linear_scale, DEFAULT_LINEAR_SCALE);
    }

    #[test]
    fn overrides_replace_only_given_values() {
        let config = TransformConfig::default().with_overrides(Some(1.0), None, Some(true));
        assert_eq!(config.linear_scale, 1.0);
        assert_eq!(config.angular_scale, DEFAULT_ANGULAR_SCALE);
        assert!(config.invert_angular);
    }

    #[test]
    fn parses_full_file() {
        let config = TeleopConfig::parse(
            r#"
            [transform]
            angular_scale = 0.1

            [io]
            queue = "fifo"
            queue_capacity = 8
            output = "wheels"

            [drive]
            track_width = 0.5

            [log]
            level = "debug"
            "#,
            Path::new("test.toml"),
        )
        .unwrap();

        assert_eq!(config.transform.angular_scale, 0.1);
        assert_eq!(config.io.queue, QueuePolicy::Fifo);
        assert_eq!(config.io.queue_capacity, 8);
        assert_eq!(config.io.output, OutputFormat::Wheels);
        assert_eq!(config.drive.track_width, 0.5);
        assert_eq!(config.drive.wheel_radius, DriveGeometry::default().wheel_radius);
        assert_eq!(config.log.level, LogLevel::Debug);
    }

    #[test]
    fn rejects_invalid_toml() {
        let err = TeleopConfig::parse("[transform\nlinear_scale = ", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, TeleopError::ConfigParse { .. }));
    }

    #[test]
    fn rejects_unknown_queue_policy() {
        let err = TeleopConfig::parse("[io]\nqueue = \"lifo\"", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, TeleopError::ConfigParse { .. }));
    }

    #[test]
    fn rejects_invalid_drive_geometry() {
        let err = TeleopConfig::parse("[drive]\nwheel_radius = 0.0", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, TeleopError::InvalidDriveGeometry(_)));
    }
}
