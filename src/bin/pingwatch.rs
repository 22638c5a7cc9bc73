//! pingwatch - keeps pinging a set of hosts and shows their status live.
//!
//! Usage:
//!   pingwatch -H 10.0.0.1 10.0.0.2           # full-screen dashboard
//!   pingwatch -H 10.0.0.1 -n router          # with display names
//!   pingwatch -f hosts.txt -m live           # hot-reloaded host file
//!   pingwatch -f hosts.txt -m detailed -T    # append-only table with timestamps

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::{ArgGroup, Parser};
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use pingwatch::collector::PingProber;
use pingwatch::engine::StopFlag;
use pingwatch::render::{DisplayMode, RenderOptions, build_renderer};
use pingwatch::source::HostSetSource;
use pingwatch::supervisor::{MonitorConfig, Supervisor};

/// Live terminal dashboard for host reachability.
#[derive(Parser)]
#[command(name = "pingwatch", about = "Live terminal dashboard for host reachability", version)]
#[command(group(ArgGroup::new("source").required(true).args(["file", "hosts"])))]
struct Args {
    /// File with one host per line; `name:host` assigns a display name.
    /// Changes are picked up while running.
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Hosts to monitor.
    #[arg(short = 'H', long, value_name = "HOST", num_args = 1..)]
    hosts: Vec<String>,

    /// Display names for --hosts, in the same order.
    #[arg(short, long, value_name = "NAME", num_args = 1.., requires = "hosts")]
    names: Vec<String>,

    /// Refresh interval in seconds.
    #[arg(short, long, value_name = "SECS", default_value = "1.0", value_parser = parse_seconds)]
    interval: Duration,

    /// Probe timeout in seconds.
    #[arg(short, long, value_name = "SECS", default_value = "1.0", value_parser = parse_seconds)]
    timeout: Duration,

    /// Pings per host per cycle.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,

    /// Display mode.
    #[arg(short, long, value_enum, default_value_t = DisplayMode::Interactive)]
    mode: DisplayMode,

    /// Prefix line output with the time of the snapshot.
    #[arg(short = 'T', long)]
    timestamp: bool,

    /// Disable colored status labels.
    #[arg(long)]
    no_color: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,

    /// Write logs to this file. Without it the live and interactive modes
    /// do not log at all.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Parses a positive number of seconds, fractions allowed.
fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid number '{}': {}", s, e))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("'{}' must be greater than zero", s));
    }
    let duration =
        Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid duration '{}': {}", s, e))?;
    if duration.is_zero() {
        return Err(format!("'{}' is shorter than one nanosecond", s));
    }
    Ok(duration)
}

/// Initializes the tracing subscriber with the appropriate log level.
///
/// Logs go to `log_file` when given, otherwise to stderr unless the display
/// mode redraws in place.
fn init_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
    mode: DisplayMode,
) -> io::Result<()> {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("pingwatch={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None if mode.redraws_in_place() => {}
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

fn build_source(args: &Args) -> Result<HostSetSource, pingwatch::source::ConfigError> {
    match &args.file {
        Some(path) => {
            let mut source = HostSetSource::from_file(path.clone());
            source.load()?;
            Ok(source)
        }
        None => HostSetSource::from_list(&args.hosts, &args.names),
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let source = build_source(&args)?;
    info!("pingwatch {} starting", env!("CARGO_PKG_VERSION"));

    let config = MonitorConfig {
        interval: args.interval,
        timeout: args.timeout,
        count: args.count,
        mode: args.mode,
        render: RenderOptions {
            show_timestamp: args.timestamp,
            color: !args.no_color && io::stdout().is_terminal(),
        },
    };
    let supervisor = Supervisor::new(config, StopFlag::new());

    // Setup graceful shutdown
    let stop = supervisor.stop_flag();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        stop.stop();
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    let mut renderer = build_renderer(args.mode, supervisor.config().render);
    let summary = supervisor.run(source, Arc::new(PingProber::new()), renderer.as_mut())?;
    drop(renderer);

    if !summary.poller_joined {
        warn!("Exiting with a probe still running");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose, args.quiet, args.log_file.as_deref(), args.mode) {
        eprintln!("Error: cannot open log file: {}", e);
        return ExitCode::from(1);
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}
