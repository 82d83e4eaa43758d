use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use imu_filter_core::config::AppConfig;
use imu_filter_core::filters::ScalarKalmanFilter;
use imu_filter_core::imu::{ImuLog, SyntheticImu};
use imu_filter_core::pipeline::FilterPipeline;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "imu_filter_cli",
    about = "Filter recorded IMU sessions with Butterworth high-pass and Kalman smoothing"
)]
struct Cli {
    /// JSON configuration file (defaults are used for missing fields)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// High-pass (and optionally smooth) every sensor of a recorder log
    Filter {
        #[arg(long)]
        input: PathBuf,
        /// Destination for the filtered log; without it the log goes to stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Destination for the JSON report (printed to stdout when --output is set)
        #[arg(long)]
        report: Option<PathBuf>,
        /// Apply per-axis Kalman smoothing after the high-pass stage
        #[arg(long)]
        smooth: bool,
        /// Skip the high-pass stage
        #[arg(long)]
        no_high_pass: bool,
        #[arg(long)]
        order: Option<usize>,
        #[arg(long)]
        cutoff_factor: Option<f64>,
    },
    /// Summarise the sensors found in a recorder log
    Inspect {
        #[arg(long)]
        input: PathBuf,
    },
    /// Run the scalar Kalman filter over comma-separated values
    Smooth {
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<f64>,
    },
    /// Write a deterministic synthetic recorder log
    Synth {
        #[arg(long, default_value_t = 5.0)]
        duration: f64,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    imu_filter_core::init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::try_load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Filter {
            input,
            output,
            report,
            smooth,
            no_high_pass,
            order,
            cutoff_factor,
        } => {
            let mut config = config;
            config.pipeline.smooth |= smooth;
            config.high_pass.enabled &= !no_high_pass;
            if let Some(order) = order {
                config.high_pass.order = order;
            }
            if let Some(cutoff_factor) = cutoff_factor {
                config.high_pass.cutoff_factor = cutoff_factor;
            }
            run_filter(&config, &input, output, report)
        }
        Commands::Inspect { input } => run_inspect(&input),
        Commands::Smooth { values } => run_smooth(&config, &values),
        Commands::Synth {
            duration,
            seed,
            output,
        } => run_synth(duration, seed, output),
    }
}

fn read_log(path: &Path) -> Result<ImuLog> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    ImuLog::parse(BufReader::new(file)).with_context(|| format!("parsing {}", path.display()))
}

fn write_log(log: &ImuLog, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
            log.write_to(BufWriter::new(file))
                .with_context(|| format!("writing {}", path.display()))?;
        }
        None => log.write_to(io::stdout().lock())?,
    }
    Ok(())
}

fn run_filter(
    config: &AppConfig,
    input: &Path,
    output: Option<PathBuf>,
    report_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let pipeline = FilterPipeline::from_config(config).context("invalid filter configuration")?;
    let log = read_log(input)?;
    let report = pipeline
        .run(&log)
        .with_context(|| format!("filtering {}", input.display()))?;

    let print_report = output.is_some() && report_path.is_none();
    write_log(&report.filtered, output)?;

    let json = serde_json::to_string_pretty(&report)?;
    if let Some(path) = report_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else if print_report {
        println!("{json}");
    }

    Ok(ExitCode::from(0))
}

fn run_inspect(input: &Path) -> Result<ExitCode> {
    let log = read_log(input)?;
    let streams = log.streams()?;

    let payload = InspectPayload {
        record_count: log.records.len(),
        video_start_ns: log.video_start().map(|m| m.timestamp_ns),
        imu_camera_latency_ns: log.video_start().map(|m| m.latency_ns),
        sensors: streams
            .iter()
            .map(|s| SensorPayload {
                sensor: &s.sensor,
                sample_count: s.len(),
                dimension: s.dimension().unwrap_or(0),
                avg_sample_interval_s: s.avg_sample_interval(),
                sample_rate_hz: s.sample_rate(),
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(ExitCode::from(0))
}

fn run_smooth(config: &AppConfig, values: &[f64]) -> Result<ExitCode> {
    if values.is_empty() {
        bail!("--values requires at least one number");
    }
    let mut kalman =
        ScalarKalmanFilter::from_config(&config.kalman).context("invalid kalman configuration")?;
    let estimates = kalman.filter_sequence(values);

    let payload = SmoothPayload {
        estimates: &estimates,
        final_error_covariance: kalman.error_covariance(),
    };
    println!("{}", serde_json::to_string(&payload)?);
    Ok(ExitCode::from(0))
}

fn run_synth(duration: f64, seed: Option<u64>, output: Option<PathBuf>) -> Result<ExitCode> {
    if !(duration.is_finite() && duration > 0.0) {
        bail!("--duration must be a positive number of seconds (got {duration})");
    }
    let mut spec = SyntheticImu::phone(duration);
    if let Some(seed) = seed {
        spec = spec.with_seed(seed);
    }
    write_log(&spec.generate(), output)?;
    Ok(ExitCode::from(0))
}

#[derive(Serialize)]
struct InspectPayload<'a> {
    record_count: usize,
    video_start_ns: Option<i64>,
    imu_camera_latency_ns: Option<i64>,
    sensors: Vec<SensorPayload<'a>>,
}

#[derive(Serialize)]
struct SensorPayload<'a> {
    sensor: &'a str,
    sample_count: usize,
    dimension: usize,
    avg_sample_interval_s: f64,
    sample_rate_hz: f64,
}

#[derive(Serialize)]
struct SmoothPayload<'a> {
    estimates: &'a [f64],
    final_error_covariance: f64,
}
