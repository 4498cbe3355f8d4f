use aat_tracker::config::Config;
use aat_tracker::scenario::{parser::parse_duration, Replay, ReplayOptions, Scenario};
use aat_tracker::web;
use clap::{Parser, Subcommand};
use std::fs;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "aat-tracker")]
#[command(about = "Antenna tracker for GPS-reporting targets")]
struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file
    Validate { scenario: String },
    /// Replay a scenario on a simulated clock and print actuator changes as JSON lines
    Replay {
        scenario: String,
        /// Tracker loop period
        #[arg(long, default_value = "10ms")]
        tick: String,
        /// Time to keep running after the last fix
        #[arg(long, default_value = "5s")]
        tail: String,
        /// Tracker uptime when the scenario starts
        #[arg(long, default_value = "0s")]
        clock_offset: String,
    },
    /// Run the tracker in real time and serve its HTTP API
    Serve {
        /// Scenario to feed while serving
        #[arg(long)]
        scenario: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Config error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Commands::Validate { scenario } => validate(&scenario),
        Commands::Replay {
            scenario,
            tick,
            tail,
            clock_offset,
        } => replay(&config, &scenario, &tick, &tail, &clock_offset),
        Commands::Serve { scenario } => serve(config, scenario.as_deref()),
    }
}

fn load_scenario(path: &str) -> Option<Scenario> {
    let yaml = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return None;
        }
    };

    match Scenario::from_str(&yaml) {
        Ok(s) => Some(s),
        Err(e) => {
            eprintln!("Parse error: {}", e);
            None
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let Some(scenario) = load_scenario(path) else {
        return ExitCode::FAILURE;
    };

    println!(
        "Scenario is valid ({} steps over {}ms, start {})",
        scenario.steps.len(),
        scenario.duration_ms(),
        scenario.start
    );
    for (i, step) in scenario.steps.iter().enumerate() {
        let time_str = match &step.time {
            Some(t) => format!("{:?}", t),
            None => "with previous".to_string(),
        };
        println!(
            "  {}: T+{}ms ({}) {:.7},{:.7} {}m {} sats",
            i + 1,
            step.offset_ms,
            time_str,
            step.fix.lat,
            step.fix.lon,
            step.fix.alt,
            step.fix.sats
        );
    }
    ExitCode::SUCCESS
}

fn millis(name: &str, value: &str) -> Option<u64> {
    match parse_duration(value) {
        Ok(d) => Some(d.num_milliseconds().max(0) as u64),
        Err(e) => {
            eprintln!("Invalid --{}: {}", name, e);
            None
        }
    }
}

fn replay(config: &Config, path: &str, tick: &str, tail: &str, clock_offset: &str) -> ExitCode {
    let Some(scenario) = load_scenario(path) else {
        return ExitCode::FAILURE;
    };
    let (Some(tick_ms), Some(tail_ms), Some(clock_offset_ms)) = (
        millis("tick", tick),
        millis("tail", tail),
        millis("clock-offset", clock_offset),
    ) else {
        return ExitCode::FAILURE;
    };

    let options = ReplayOptions {
        tick_ms,
        tail_ms,
        clock_offset_ms,
    };
    let report = Replay::new(config.tracker, options).run(&scenario);

    for frame in &report.frames {
        match serde_json::to_string(frame) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                eprintln!("Serialization error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let status = &report.final_status;
    log::info!(
        "Final: az {}deg (projected {}) el {}deg dist {}m -> {}us / {}us",
        status.target.azimuth_deg,
        status.projected_azimuth_deg,
        status.target.elevation_deg,
        status.target.distance_m,
        status.azimuth_us,
        status.elevation_us
    );
    if report.home.is_none() {
        log::warn!("Home was never set; no fix reached {} satellites", config.tracker.min_satellites);
    }
    ExitCode::SUCCESS
}

fn serve(config: Config, scenario_path: Option<&str>) -> ExitCode {
    let scenario = match scenario_path {
        Some(path) => match load_scenario(path) {
            Some(s) => Some(s),
            None => return ExitCode::FAILURE,
        },
        None => None,
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(web::run_server(config, scenario)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
