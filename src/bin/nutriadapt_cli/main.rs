// ABOUTME: nutriadapt CLI - command-line tool for adaptation checks and nutrient reconciliation
// ABOUTME: Manages calorie profiles and samples, runs weekly checks, applies and explains events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors
//!
//! Usage:
//! ```bash
//! # Create the database schema
//! nutriadapt-cli init-db
//!
//! # Set a user's daily calorie target
//! nutriadapt-cli profile set 6f1c... --calories 1800
//!
//! # Import weigh-ins and intake totals
//! nutriadapt-cli import 6f1c... history.json
//!
//! # Run the weekly check and apply any detected adaptation
//! nutriadapt-cli check 6f1c... --apply
//!
//! # Explain an event in a coach persona's voice
//! nutriadapt-cli explain 9a2b... --persona supportive
//!
//! # Reconcile an AI estimate against the built-in dataset
//! nutriadapt-cli reconcile --name banana --calories 110 --reference builtin
//! ```

mod commands;
mod helpers;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use nutriadapt::config::{DatabaseUrl, ServerConfig};
use nutriadapt::errors::{AppError, AppResult};
use nutriadapt::logging::LoggingConfig;
use nutriadapt::services::AdaptationService;
use tracing::info;
use uuid::Uuid;

use commands::reconcile::ReferenceChoice;

type Result<T> = AppResult<T>;

#[derive(Parser)]
#[command(
    name = "nutriadapt-cli",
    about = "Adaptive nutrition estimation CLI",
    long_about = "Detects metabolic adaptation from weigh-ins and intake, recalibrates calorie targets, and reconciles AI nutrient estimates against reference data."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override (sqlite:path or sqlite::memory:)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Create or migrate the database schema
    InitDb,

    /// Calorie target profile commands
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Import weigh-ins and intake totals from a JSON file
    Import {
        /// User to import for
        user_id: Uuid,
        /// File with `weights` and `intakes` arrays
        file: PathBuf,
    },

    /// Run the weekly adaptation check for one user
    Check {
        /// User to check
        user_id: Uuid,
        /// Apply the detected event to the profile target
        #[arg(long)]
        apply: bool,
    },

    /// Run the weekly adaptation check for every profile
    CheckAll,

    /// Apply a recorded adaptation event (no-op if already applied)
    Apply {
        /// Event to apply
        event_id: Uuid,
    },

    /// List a user's adaptation events
    Events {
        /// User whose events to list
        user_id: Uuid,
    },

    /// Explain an adaptation event
    Explain {
        /// Event to explain
        event_id: Uuid,
        /// plain, supportive, analytical, or drill_sergeant
        #[arg(long, default_value = "plain")]
        persona: String,
    },

    /// Reconcile an AI nutrient estimate with reference data
    Reconcile {
        /// Food name
        #[arg(long)]
        name: String,
        /// Estimated kcal for the serving
        #[arg(long)]
        calories: f64,
        /// Estimated protein (g)
        #[arg(long, default_value_t = 0.0)]
        protein: f64,
        /// Estimated carbohydrates (g)
        #[arg(long, default_value_t = 0.0)]
        carbs: f64,
        /// Estimated fat (g)
        #[arg(long, default_value_t = 0.0)]
        fat: f64,
        /// Estimated fiber (g)
        #[arg(long, default_value_t = 0.0)]
        fiber: f64,
        /// Confidence of the estimate in [0, 1]
        #[arg(long, default_value_t = 0.5)]
        confidence: f64,
        /// Serving size in grams
        #[arg(long)]
        portion: Option<f64>,
        /// Reference source
        #[arg(long, value_enum, default_value_t = ReferenceArg::Usda)]
        reference: ReferenceArg,
        /// JSON dataset file (required with --reference dataset)
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum ProfileCommand {
    /// Set the daily calorie target
    Set {
        /// User to update
        user_id: Uuid,
        /// Daily calorie target (kcal)
        #[arg(long)]
        calories: i32,
    },

    /// Show a profile
    Show {
        /// User to show
        user_id: Uuid,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReferenceArg {
    /// USDA `FoodData` Central API
    Usda,
    /// Offline JSON dataset (--dataset)
    Dataset,
    /// Built-in common foods
    Builtin,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging.init()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(url) = &cli.database_url {
        config.database_url = DatabaseUrl::parse_url(url)?;
    }
    info!("nutriadapt CLI");

    match cli.command {
        Command::Reconcile {
            name,
            calories,
            protein,
            carbs,
            fat,
            fiber,
            confidence,
            portion,
            reference,
            dataset,
        } => {
            let choice = match (reference, dataset) {
                (ReferenceArg::Dataset, Some(path)) => ReferenceChoice::Dataset(path),
                (ReferenceArg::Dataset, None) => {
                    return Err(AppError::missing_field("--dataset"));
                }
                (ReferenceArg::Builtin, _) => ReferenceChoice::Builtin,
                (ReferenceArg::Usda, _) => ReferenceChoice::Usda,
            };
            let request = commands::reconcile::request_from_args(
                name,
                calories,
                [protein, carbs, fat, fiber],
                confidence,
                portion,
            );
            commands::reconcile::run(&config, choice, request).await?;
        }
        command => run_database_command(&config, command).await?,
    }

    Ok(())
}

async fn run_database_command(config: &ServerConfig, command: Command) -> Result<()> {
    let database = helpers::connect(&config.database_url).await?;
    let service = AdaptationService::new(database.clone(), config.intelligence.metabolic.clone())?;

    match command {
        Command::InitDb => {
            helpers::output::print_json(&serde_json::json!({
                "database": config.database_url.to_connection_string(),
                "status": "ready",
            }))?;
        }
        Command::Profile { action } => match action {
            ProfileCommand::Set { user_id, calories } => {
                commands::profile::set(&database, user_id, calories).await?;
            }
            ProfileCommand::Show { user_id } => {
                commands::profile::show(&database, user_id).await?;
            }
        },
        Command::Import { user_id, file } => {
            commands::samples::import(&database, user_id, &file).await?;
        }
        Command::Check { user_id, apply } => {
            commands::adaptation::check(&service, user_id, apply).await?;
        }
        Command::CheckAll => commands::adaptation::check_all(&service).await?,
        Command::Apply { event_id } => commands::adaptation::apply(&service, event_id).await?,
        Command::Events { user_id } => commands::adaptation::events(&database, user_id).await?,
        Command::Explain { event_id, persona } => {
            commands::adaptation::explain(&database, event_id, &persona).await?;
        }
        Command::Reconcile { .. } => {}
    }

    Ok(())
}
