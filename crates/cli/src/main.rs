use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use pixelcare_core::perception::infrastructure::jsonl_landmark_reader::JsonlLandmarkReader;
use pixelcare_core::perception::infrastructure::landmark_action_unit_detector::LandmarkActionUnitDetector;
use pixelcare_core::pipeline::collect_vitals_use_case::CollectVitalsUseCase;
use pixelcare_core::pipeline::infrastructure::sequential_session_runner::SequentialSessionRunner;
use pixelcare_core::pipeline::infrastructure::threaded_session_runner::ThreadedSessionRunner;
use pixelcare_core::pipeline::session_logger::LogSessionLogger;
use pixelcare_core::pipeline::session_runner::SessionRunner;
use pixelcare_core::report::domain::session_report::SessionReport;
use pixelcare_core::report::infrastructure::text_summary;
use pixelcare_core::session::domain::session::Session;
use pixelcare_core::session::domain::session_config::SessionConfig;
use pixelcare_core::shared::constants::{
    DEFAULT_BEHAVIORAL_INTERVAL, DEFAULT_DURATION_SECONDS, DEFAULT_FPS, DEFAULT_VITAL_INTERVAL,
};

/// Vital signs and behavior report from a recorded landmark session.
#[derive(Parser)]
#[command(name = "pixelcare")]
struct Cli {
    /// Recorded session, one JSON landmark frame per line.
    input: PathBuf,

    /// Write the JSON report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Session length in seconds.
    #[arg(long, default_value_t = DEFAULT_DURATION_SECONDS)]
    duration: u32,

    /// Frame rate the recording was captured at.
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Frames between posture, gaze, head pose, movement and emotion samples.
    #[arg(long, default_value_t = DEFAULT_BEHAVIORAL_INTERVAL)]
    behavioral_interval: usize,

    /// Frames between heart rate, breathing and blink samples.
    #[arg(long, default_value_t = DEFAULT_VITAL_INTERVAL)]
    vital_interval: usize,

    /// Capture on a worker thread.
    #[arg(long)]
    threaded: bool,

    /// Derive facial action units from the face mesh.
    #[arg(long)]
    action_units: bool,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            duration_seconds: self.duration,
            fps: self.fps,
            behavioral_interval: self.behavioral_interval,
            vital_interval: self.vital_interval,
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let report = collect(&cli)?;
    log::info!("\n{}", text_summary::render(&report));

    let json = report.to_pretty_json()?;
    match &cli.output {
        Some(path) => write_report(path, &json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn collect(cli: &Cli) -> Result<SessionReport, Box<dyn std::error::Error>> {
    let mut session = Session::new(cli.session_config())?;
    if cli.action_units {
        session = session.with_action_unit_detector(Box::new(LandmarkActionUnitDetector::default()));
    }
    let reader = JsonlLandmarkReader::new(&cli.input).with_fps(f64::from(cli.fps));
    let runner: Box<dyn SessionRunner> = if cli.threaded {
        Box::new(ThreadedSessionRunner::new())
    } else {
        Box::new(SequentialSessionRunner)
    };

    let mut use_case = CollectVitalsUseCase::new(Box::new(reader), session, runner, None, None);
    let mut logger = LogSessionLogger::new(cli.fps as usize);
    Ok(use_case.execute(&mut logger)?)
}

fn write_report(path: &Path, json: &str) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(path, json)
        .map_err(|e| format!("Failed to write report to {}: {e}", path.display()))?;
    log::info!("Report written to {}", path.display());
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if let Some(parent) = cli.output.as_deref().and_then(Path::parent) {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(format!("Output directory not found: {}", parent.display()).into());
        }
    }
    cli.session_config().validate()?;
    Ok(())
}
