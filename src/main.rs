//! Stick GW - virtual joystick gateway
//!
//! Opens the joystick window on the main thread and publishes the stick's
//! velocity from a tokio worker until the window closes or Ctrl-C arrives.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use stick_gw::config::{AppConfig, PublisherKind};
use stick_gw::joystick::JoystickHandle;
use stick_gw::publish::{self, PublishLoop};
use stick_gw::ui;

/// Stick GW - drag the on-screen stick to publish velocity commands
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "joystick.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Also write daily-rotated log files into this directory
    #[arg(long, env = "STICK_GW_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Emit console logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Override the configured publisher
    #[arg(long, value_enum)]
    publisher: Option<PublisherArg>,

    /// Override the UDP destination (host:port)
    #[arg(long)]
    udp_target: Option<String>,

    /// Validate the configuration and exit
    #[arg(long)]
    check_config: bool,

    /// Print the default configuration as YAML and exit
    #[arg(long)]
    print_default_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PublisherArg {
    Console,
    Json,
    Udp,
}

impl From<PublisherArg> for PublisherKind {
    fn from(arg: PublisherArg) -> Self {
        match arg {
            PublisherArg::Console => PublisherKind::Console,
            PublisherArg::Json => PublisherKind::Json,
            PublisherArg::Udp => PublisherKind::Udp,
        }
    }
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if args.print_default_config {
        print!("{}", AppConfig::default().to_yaml()?);
        return Ok(());
    }

    // Held until exit so buffered file logs are flushed
    let _log_guard = init_logging(&args.log_level, args.log_dir.as_deref(), args.json_logs)?;

    info!("Starting Stick GW...");
    info!("Configuration file: {}", args.config);

    // The window owns the main thread; async work runs on this runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("stick-gw-worker")
        .build()
        .context("Failed to build tokio runtime")?;

    let mut config = runtime.block_on(AppConfig::load(&args.config))?;
    if let Some(kind) = args.publisher {
        config.publisher.kind = kind.into();
    }
    if let Some(target) = args.udp_target {
        config.publisher.udp_target = Some(target);
    }

    let control = config.validate().context("Invalid configuration")?;
    let joystick = JoystickHandle::new(control);

    if args.check_config {
        let control = joystick.config();
        println!("Configuration OK");
        println!("  frame:        {0}x{0} px", control.frame_size());
        println!("  travel limit: {} px", control.travel_limit());
        println!("  output scale: {:.4} per px", joystick.scaler().factor());
        println!(
            "  publisher:    {:?} → {} @ {} Hz",
            config.publisher.kind, config.publisher.topic, config.publisher.rate_hz
        );
        return Ok(());
    }

    let publisher = runtime.block_on(publish::from_config(&config.publisher))?;
    info!("Publisher ready: {}", publisher.name());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let publish_loop = PublishLoop::new(
        joystick.clone(),
        publisher,
        config.publisher.topic.clone(),
        config.publisher.rate_hz,
    );
    let publish_task = runtime.spawn(publish_loop.run(shutdown_rx.clone()));

    let ctrl_c_tx = shutdown_tx.clone();
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            let _ = ctrl_c_tx.send(true);
        }
    });

    eprintln!("press esc to close when joystick window is selected");

    let window_result = ui::run_window(joystick, shutdown_rx);

    info!("shutting down");
    let _ = shutdown_tx.send(true);

    match runtime.block_on(async { tokio::time::timeout(Duration::from_secs(1), publish_task).await }) {
        Ok(Ok(stats)) => info!(
            "Published {} of {} ticks ({} failed)",
            stats.delivered, stats.ticks, stats.failed
        ),
        Ok(Err(e)) => warn!("Publish task panicked: {}", e),
        Err(_) => warn!("Publish task did not stop in time, abandoning it"),
    }
    runtime.shutdown_timeout(Duration::from_millis(200));

    window_result?;
    info!("Stick GW shutdown complete");
    Ok(())
}

fn init_logging(level: &str, log_dir: Option<&Path>, json: bool) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // stderr keeps stdout free for the JSON lines publisher
    let console = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let (file, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "stick-gw.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .with(filter)
        .init();

    Ok(guard)
}
