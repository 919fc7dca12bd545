use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use giveaway_picker::config::{Config, LoggingConfig};
use giveaway_picker::models::SortMode;
use giveaway_picker::parser::InputFormat;

mod commands;

use commands::{fetch, pick, FetchParams, PickParams};

#[derive(Parser)]
#[command(
    name = "giveaway-picker",
    version,
    about = "Instagram comment picker: filter eligible comments and draw giveaway winners",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); defaults to PICKER_LOG_FORMAT or text
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate comments from a file and draw winners
    Pick {
        /// Input file (text, Graph API JSON, export JSON or saved HTML page)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format; detected from the extension when omitted
        #[arg(short, long)]
        format: Option<InputFormat>,

        /// TOML config file; environment variables are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of winners
        #[arg(short = 'n', long)]
        winners: Option<usize>,

        /// Candidate order (random, oldest, newest, mentions, length, likes)
        #[arg(short, long)]
        sort: Option<SortMode>,

        /// Allow one user to win more than once
        #[arg(long, default_value = "false")]
        allow_duplicates: bool,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Write the export document to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write every comment with its validity to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Post link recorded in the export
        #[arg(long)]
        url: Option<String>,

        /// Print the winner list in copyable form
        #[arg(long, default_value = "false")]
        copy: bool,
    },

    /// Download a post's comments from the Instagram Graph API
    Fetch {
        /// Instagram post, reel or tv link
        #[arg(short, long, conflicts_with = "media_id", required_unless_present = "media_id")]
        url: Option<String>,

        /// Graph API media id
        #[arg(short, long)]
        media_id: Option<String>,

        /// TOML config file; environment variables are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Drop replies from the saved records
        #[arg(long, default_value = "false")]
        no_replies: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = Config::from_env().map(|c| c.logging).unwrap_or_default();
    if let Some(format) = &cli.log_format {
        logging.format = format.clone();
    }
    setup_tracing(&logging, cli.verbose)?;

    tracing::debug!("giveaway-picker starting");

    match cli.command {
        Commands::Pick {
            input,
            format,
            config,
            winners,
            sort,
            allow_duplicates,
            seed,
            output,
            csv,
            url,
            copy,
        } => {
            tracing::info!(
                input = %input.display(),
                format = ?format,
                winners = ?winners,
                sort = ?sort,
                allow_duplicates = %allow_duplicates,
                seeded = seed.is_some(),
                "Starting pick command"
            );
            pick(PickParams {
                input,
                format,
                config,
                winners,
                sort,
                allow_duplicates,
                seed,
                output,
                csv,
                source_url: url,
                copy,
            })
            .await?;
        }

        Commands::Fetch {
            url,
            media_id,
            config,
            output,
            no_replies,
        } => {
            tracing::info!(
                url = ?url,
                media_id = ?media_id,
                output = ?output,
                "Starting fetch command"
            );
            fetch(FetchParams {
                url,
                media_id,
                config,
                output,
                no_replies,
            })
            .await?;
        }
    }

    tracing::debug!("giveaway-picker completed successfully");
    Ok(())
}

fn setup_tracing(logging: &LoggingConfig, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("giveaway_picker=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!("giveaway_picker={},warn", logging.level))
        })
    };

    match logging.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        "text" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        other => anyhow::bail!("Unknown log format: {other} (expected text or json)"),
    }

    Ok(())
}
