use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rocketfile::config::Config;
use rocketfile::motors::MotorIndex;
use rocketfile::tree_render::render_tree;
use rocketfile::warnings::{SealedWarnings, WarningSet};
use rocketfile::{document, Format, ImportOutcome};
use rocketfile_core::models::Motor;

#[derive(Parser)]
#[command(name = "rktf")]
#[command(about = "Translate RASAero and Rocksim rocket designs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a design file and print its component tree
    Import {
        file: PathBuf,

        /// Source format; guessed from the extension when omitted
        #[arg(short, long)]
        format: Option<Format>,

        /// Print the tree and warnings as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert a design file to the other format
    Convert {
        file: PathBuf,

        /// Source format; guessed from the extension when omitted
        #[arg(short, long)]
        format: Option<Format>,

        /// Target format
        #[arg(long)]
        to: Format,

        /// Output file (defaults to the input name with the target extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage the motor database
    Motors {
        #[command(subcommand)]
        command: MotorCommands,
    },
}

#[derive(Subcommand)]
enum MotorCommands {
    /// Load motors from a JSON array of motor records
    Load { file: PathBuf },
    /// List every motor in the database
    List,
    /// Resolve a design-file motor descriptor such as "A8-3  (Estes)"
    Find { descriptor: String },
}

/// Initialize tracing on stderr so stdout carries only command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "rocketfile=info".into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let config = Config::from_env();

    match cli.command {
        Commands::Import { file, format, json } => {
            let outcome = import_file(&config, &file, format)?;
            if json {
                let body = serde_json::json!({
                    "rocket": outcome.rocket.to_tree(),
                    "warnings": outcome.warnings,
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                print!("{}", render_tree(&outcome.rocket));
                print_warnings(&outcome.warnings);
            }
        }
        Commands::Convert {
            file,
            format,
            to,
            output,
        } => {
            let imported = import_file(&config, &file, format)?;
            print_warnings(&imported.warnings);

            let exported = document::export(to, &imported.rocket)?;
            let output = output.unwrap_or_else(|| file.with_extension(to.extension()));
            std::fs::write(&output, &exported.xml)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            print_warnings(&exported.warnings);
            println!("Wrote {} design to {}", to.as_str(), output.display());
        }
        Commands::Motors { command } => {
            let db = config.open_motor_database()?;
            match command {
                MotorCommands::Load { file } => {
                    let reader = BufReader::new(
                        File::open(&file)
                            .with_context(|| format!("Failed to open {}", file.display()))?,
                    );
                    let motors: Vec<Motor> = serde_json::from_reader(reader)
                        .with_context(|| format!("Failed to parse motors from {}", file.display()))?;
                    let count = db.insert_motors(&motors)?;
                    println!("Loaded {} motors into {}", count, config.motor_db_path()?.display());
                }
                MotorCommands::List => {
                    for motor in db.all_motors()? {
                        println!(
                            "{:<24} {:<12} {:>5.1} mm",
                            motor.manufacturer,
                            motor.designation,
                            motor.diameter * 1000.0
                        );
                    }
                }
                MotorCommands::Find { descriptor } => {
                    let index = MotorIndex::new(db);
                    let mut warnings = WarningSet::new();
                    match index.resolve(&descriptor, &mut warnings) {
                        Some(mount) => {
                            let delay = mount
                                .ejection_delay
                                .map(|d| format!(", delay {} s", d))
                                .unwrap_or_default();
                            println!(
                                "{} {} ({}){}",
                                mount.motor.manufacturer,
                                mount.motor.designation,
                                mount.motor.digest,
                                delay
                            );
                        }
                        None => println!("No motor found for '{}'", descriptor),
                    }
                    print_warnings(&warnings.seal());
                }
            }
        }
    }

    Ok(())
}

fn import_file(config: &Config, file: &Path, format: Option<Format>) -> anyhow::Result<ImportOutcome> {
    let format = config.format_for(file, format)?;
    let motors = match config.open_motor_database() {
        Ok(db) => MotorIndex::new(db),
        Err(e) => {
            tracing::warn!("Importing without motors: {:#}", e);
            MotorIndex::empty()
        }
    };
    let reader = BufReader::new(
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?,
    );
    document::import(format, reader, &motors)
        .with_context(|| format!("Failed to import {}", file.display()))
}

fn print_warnings(warnings: &SealedWarnings) {
    if warnings.is_empty() {
        return;
    }
    println!("Warnings:");
    for warning in warnings {
        println!("  - {}", warning);
    }
}
