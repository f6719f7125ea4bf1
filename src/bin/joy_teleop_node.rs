use anyhow::{Context, Result};
use clap::Parser;
use joy_teleop::config::{LogLevel, TeleopConfig};
use joy_teleop::control::JoyToTwist;
use joy_teleop::io::{
    sample_queue, spawn_line_reader, LinePublisher, OutputFormat, QueuePolicy, TeleopNode,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

/// Reads joystick samples on stdin and writes velocity commands on stdout
#[derive(Parser, Debug)]
#[command(name = "joy_teleop_node", version, about)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "config/joy_teleop.toml")]
    config: PathBuf,

    /// Maximum linear speed at full trigger
    #[arg(long, value_parser = positive_f64)]
    linear_scale: Option<f64>,

    /// Maximum angular speed at full trigger
    #[arg(long, value_parser = positive_f64)]
    angular_scale: Option<f64>,

    /// Flip the sign of the angular output
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    invert_angular: Option<bool>,

    /// Sample buffering: latest or fifo
    #[arg(long)]
    queue: Option<QueuePolicy>,

    /// Output lines: twist or wheels
    #[arg(long)]
    output: Option<OutputFormat>,

    /// Log level, ignored when RUST_LOG is set
    #[arg(long)]
    log_level: Option<LogLevel>,
}

fn positive_f64(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} is not a positive number"))
    }
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Logs go to stderr, stdout carries the commands
fn setup_logging() -> FilterHandle {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    handle
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_handle = setup_logging();

    info!("Initializing joy teleop node...");

    let mut config = TeleopConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    config.transform = config.transform.with_overrides(
        args.linear_scale,
        args.angular_scale,
        args.invert_angular,
    );
    if let Some(queue) = args.queue {
        config.io.queue = queue;
    }
    if let Some(output) = args.output {
        config.io.output = output;
    }
    if let Some(level) = args.log_level {
        config.log.level = level;
    }

    if std::env::var_os("RUST_LOG").is_none() {
        log_handle.reload(EnvFilter::new(config.log.level.as_directive()))?;
    }

    info!(
        "Using linear_scale: {} and angular_scale: {}",
        config.transform.linear_scale, config.transform.angular_scale
    );
    if config.transform.invert_angular {
        info!("Angular axis inverted");
    }
    info!(
        "Queue: {:?}, output: {:?}",
        config.io.queue, config.io.output
    );

    let publisher = LinePublisher::with_format(std::io::stdout(), config.io.output, config.drive)?;
    let mut node = TeleopNode::new(JoyToTwist::new(config.transform), publisher);

    let (samples_tx, samples_rx) = sample_queue(config.io.queue, config.io.queue_capacity);
    let reader = spawn_line_reader(std::io::BufReader::new(std::io::stdin()), samples_tx)
        .context("starting input thread")?;

    info!("Joy teleop node initialized. Waiting for samples...");

    tokio::select! {
        result = node.spin(samples_rx) => {
            if let Err(e) = result {
                error!("{}", e);
                return Err(e.into());
            }
            // The queue only closes once the input thread has dropped its sender.
            let input = reader
                .join()
                .map_err(|_| anyhow::anyhow!("input thread panicked"))??;
            info!(
                "Read {} lines, {} samples, {} undecodable",
                input.lines, input.samples, input.undecodable
            );
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
        }
    }

    Ok(())
}
