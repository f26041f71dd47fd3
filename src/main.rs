use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use sun_polarizer::geometry::DEFAULT_ORTHONORMAL_TOLERANCE;
use sun_polarizer::{
    compute_filter_angle, AttitudeMatrix, Config, FilterCommand, GeographicAngle, Gmt, Timestamp,
};

#[derive(Parser)]
#[command(name = "sun-polarizer")]
#[command(about = "Polarizing filter angle for a sun-tracking camera")]
struct Cli {
    /// Output format for computed angles
    #[arg(long, value_enum, global = true, default_value_t = Format::Text)]
    format: Format,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the angle for an explicit time, site and IMU matrix
    #[command(allow_negative_numbers = true)]
    Angle {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        lat_deg: f64,
        lat_min: f64,
        lon_deg: f64,
        lon_min: f64,
        /// Attitude matrix, row-major
        #[arg(num_args = 9, required = true)]
        imu: Vec<f64>,
    },
    /// Compute the angle for the current time using a config file
    #[command(allow_negative_numbers = true)]
    Now {
        #[arg(long, default_value = "polarizer.yaml")]
        config: String,
        /// Look ahead, e.g. "1.5s" or "200ms"
        #[arg(long, value_parser = humantime::parse_duration)]
        lead: Option<Duration>,
        /// Attitude matrix, row-major; defaults to the configured one
        #[arg(long, num_args = 9)]
        attitude: Option<Vec<f64>>,
    },
    /// Validate a config file
    ValidateConfig { path: String },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Angle {
            year,
            month,
            day,
            hour,
            minute,
            second,
            lat_deg,
            lat_min,
            lon_deg,
            lon_min,
            imu,
        } => {
            let timestamp = match Gmt::new(hour, minute, second)
                .and_then(|gmt| Timestamp::from_calendar(year, month, day, gmt))
            {
                Ok(ts) => ts,
                Err(e) => {
                    eprintln!("Invalid time: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            let attitude = match parse_attitude(&imu, DEFAULT_ORTHONORMAL_TOLERANCE) {
                Ok(a) => a,
                Err(msg) => {
                    eprintln!("{}", msg);
                    return ExitCode::FAILURE;
                }
            };
            let latitude = GeographicAngle::new(lat_deg, lat_min);
            let longitude = GeographicAngle::new(lon_deg, lon_min);
            match compute_filter_angle(&timestamp, latitude, longitude, &attitude) {
                Ok(command) => print_command(&command, cli.format),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Now {
            config,
            lead,
            attitude,
        } => now(&config, lead, attitude.as_deref(), cli.format),
        Commands::ValidateConfig { path } => validate(&path),
    }
}

fn now(path: &str, lead: Option<Duration>, attitude: Option<&[f64]>, format: Format) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let pipeline = match config.pipeline() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let attitude = match attitude {
        Some(values) => parse_attitude(values, config.attitude_tolerance),
        None => config.static_attitude().map_err(|e| e.to_string()),
    };
    let attitude = match attitude {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::FAILURE;
        }
    };

    let mut at = chrono::Utc::now();
    if let Some(lead) = lead {
        match chrono::Duration::from_std(lead) {
            Ok(d) => at += d,
            Err(e) => {
                eprintln!("Invalid lead: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    let result = Timestamp::from_datetime(&at).and_then(|ts| pipeline.compute(&ts, &attitude));
    match result {
        Ok(command) => print_command(&command, format),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match config.validate() {
        Ok(()) => {
            let site = config.site.name.as_deref().unwrap_or("unnamed site");
            println!("Config is valid ({})", site);
            println!(
                "  latitude {:.4}, longitude {:.4}",
                config.site.latitude.decimal_degrees(),
                config.site.longitude.decimal_degrees()
            );
            println!(
                "  epoch scale {}, earth rotation {}",
                config.ephemeris.epoch_scale, config.ephemeris.earth_rotation
            );
            if config.servo.is_some() {
                println!("  servo map configured");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn parse_attitude(values: &[f64], tolerance: f64) -> Result<AttitudeMatrix, String> {
    let rows = match values {
        [a, b, c, d, e, f, g, h, i] => [[*a, *b, *c], [*d, *e, *f], [*g, *h, *i]],
        _ => return Err(format!("Expected 9 attitude values, got {}", values.len())),
    };
    AttitudeMatrix::from_rows(rows, tolerance).map_err(|e| format!("Invalid attitude: {}", e))
}

fn print_command(command: &FilterCommand, format: Format) -> ExitCode {
    for warning in &command.warnings {
        eprintln!("Warning: {}", warning);
    }
    match format {
        Format::Text => {
            println!("{:.4}", command.angle.degrees());
            if let Some(code) = command.servo_code {
                println!("servo {:.4}", code);
            }
        }
        Format::Json => match serde_json::to_string_pretty(command) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error encoding output: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}
