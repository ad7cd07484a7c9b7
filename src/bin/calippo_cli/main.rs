// ABOUTME: Calippo CLI - developer tool driving the local data layer against a file-backed store
// ABOUTME: Handles accounts, friends, meal scans, history, progression, and preferences
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Create an account and claim a handle
//! calippo-cli account signup --email a@x.com
//! calippo-cli account handle ninja1
//!
//! # Analyse a meal photo (needs GEMINI_API_KEY)
//! calippo-cli meal scan --image lunch.jpg
//!
//! # Record a meal without the analysis service
//! calippo-cli meal record --food "Greek yogurt" --calories 150 --protein 15 --carbs 8 --fat 4
//!
//! # Friends
//! calippo-cli friends request snack_king
//! calippo-cli friends accept ninja1
//!
//! # Progress
//! calippo-cli stats
//! ```

mod commands;

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use calippo::config::{AppConfig, StorageBackend};
use calippo::context::AppContext;
use calippo::logging::{LogFormat, LoggingConfig};
use calippo::models::{FriendResponse, NutritionRecord};
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "calippo-cli",
    about = "Calippo local data layer CLI",
    long_about = "Developer tool for exercising Calippo accounts, friends, meal scans and progression against a local store."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Data directory override
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Account and session commands
    Account {
        #[command(subcommand)]
        action: AccountCommand,
    },

    /// Friend graph commands
    Friends {
        #[command(subcommand)]
        action: FriendsCommand,
    },

    /// Meal scanning and history commands
    Meal {
        #[command(subcommand)]
        action: MealCommand,
    },

    /// Show streak, level, evolution progress and badges
    Stats,

    /// Show or set the daily calorie goal
    Goal {
        /// New goal in kcal
        calories: Option<u32>,
    },

    /// Toggle between light and dark theme
    Theme,
}

#[derive(Subcommand)]
enum AccountCommand {
    /// Create an account and sign in
    Signup {
        /// Account email
        #[arg(long)]
        email: String,
    },
    /// Sign in to an existing account
    Login {
        /// Account email
        #[arg(long)]
        email: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Claim a handle for the signed-in account
    Handle {
        /// Desired handle (3-20 chars of a-z, 0-9, _)
        handle: String,
    },
    /// Set the display name used by search
    Name {
        /// Display name; omit to clear
        name: Option<String>,
    },
    /// Search other accounts by handle or display name
    Search {
        /// Search text
        query: String,
    },
}

#[derive(Subcommand)]
enum FriendsCommand {
    /// List friends
    List,
    /// List incoming and outgoing requests
    Requests,
    /// Send a friend request
    Request {
        /// Handle of the other account
        handle: String,
    },
    /// Accept an incoming request
    Accept {
        /// Handle of the requester
        handle: String,
    },
    /// Reject an incoming request
    Reject {
        /// Handle of the requester
        handle: String,
    },
    /// Remove a friend
    Remove {
        /// Handle of the friend
        handle: String,
    },
}

#[derive(Subcommand)]
enum MealCommand {
    /// Analyse a meal photo and record it
    Scan {
        /// JPEG file to analyse
        #[arg(long)]
        image: PathBuf,
    },
    /// Record a meal with known values
    Record {
        /// Food name
        #[arg(long)]
        food: String,
        /// Calories
        #[arg(long)]
        calories: f64,
        /// Protein grams
        #[arg(long)]
        protein: f64,
        /// Carbohydrate grams
        #[arg(long)]
        carbs: f64,
        /// Fat grams
        #[arg(long)]
        fat: f64,
        /// Health score
        #[arg(long, default_value = "50")]
        health_score: f64,
    },
    /// List recorded meals, most recent first
    History {
        /// Maximum number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show today's totals against the goal
    Today,
    /// Compare macros of several entries
    Compare {
        /// Entry identifiers
        ids: Vec<String>,
    },
    /// Delete one entry
    Delete {
        /// Entry identifier
        id: String,
    },
    /// Delete every entry
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    logging.format = LogFormat::Compact;
    if cli.verbose {
        logging.level = "debug".into();
    } else if env::var("RUST_LOG").is_err() {
        logging.level = "warn".into();
    }
    logging.init()?;

    let mut config = AppConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.backend = StorageBackend::File;
        config.storage.data_dir = data_dir;
    }
    debug!("{}", config.summary());

    let ctx = AppContext::from_config(&config).await?;

    match cli.command {
        Command::Account { action } => match action {
            AccountCommand::Signup { email } => commands::account::signup(&ctx, &email).await?,
            AccountCommand::Login { email } => commands::account::login(&ctx, &email).await?,
            AccountCommand::Logout => commands::account::logout(&ctx).await?,
            AccountCommand::Whoami => commands::account::whoami(&ctx).await?,
            AccountCommand::Handle { handle } => {
                commands::account::claim_handle(&ctx, &handle).await?;
            }
            AccountCommand::Name { name } => {
                commands::account::display_name(&ctx, name.as_deref()).await?;
            }
            AccountCommand::Search { query } => commands::account::search(&ctx, &query).await?,
        },
        Command::Friends { action } => match action {
            FriendsCommand::List => commands::social::list(&ctx).await?,
            FriendsCommand::Requests => commands::social::requests(&ctx).await?,
            FriendsCommand::Request { handle } => commands::social::request(&ctx, &handle).await?,
            FriendsCommand::Accept { handle } => {
                commands::social::respond(&ctx, &handle, FriendResponse::Accept).await?;
            }
            FriendsCommand::Reject { handle } => {
                commands::social::respond(&ctx, &handle, FriendResponse::Reject).await?;
            }
            FriendsCommand::Remove { handle } => commands::social::remove(&ctx, &handle).await?,
        },
        Command::Meal { action } => match action {
            MealCommand::Scan { image } => commands::meals::scan(&ctx, &image).await?,
            MealCommand::Record {
                food,
                calories,
                protein,
                carbs,
                fat,
                health_score,
            } => {
                let record = NutritionRecord {
                    food_name: food,
                    calories,
                    protein,
                    carbs,
                    fat,
                    description: "Recorded manually".to_owned(),
                    health_score,
                };
                commands::meals::record(&ctx, record).await?;
            }
            MealCommand::History { limit } => commands::meals::history(&ctx, limit).await?,
            MealCommand::Today => commands::meals::today(&ctx).await?,
            MealCommand::Compare { ids } => commands::meals::compare(&ctx, &ids).await?,
            MealCommand::Delete { id } => commands::meals::delete(&ctx, &id).await?,
            MealCommand::Clear => commands::meals::clear(&ctx).await?,
        },
        Command::Stats => commands::meals::stats(&ctx).await?,
        Command::Goal { calories } => commands::meals::goal(&ctx, calories).await?,
        Command::Theme => {
            let theme = ctx.preferences.toggle_theme().await?;
            println!("Theme: {theme}");
        }
    }

    Ok(())
}
