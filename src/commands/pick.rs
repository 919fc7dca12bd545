use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

use giveaway_picker::config::Config;
use giveaway_picker::export::{clipboard_text, export, ExportContext};
use giveaway_picker::models::SortMode;
use giveaway_picker::parser::{ingest, InputFormat};
use giveaway_picker::picker::{DrawSession, Validator};
use giveaway_picker::utils::truncate_text;

/// Inputs of the `pick` command
#[derive(Debug, Clone)]
pub struct PickParams {
    pub input: PathBuf,
    pub format: Option<InputFormat>,
    pub config: Option<PathBuf>,
    pub winners: Option<usize>,
    pub sort: Option<SortMode>,
    pub allow_duplicates: bool,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub source_url: Option<String>,
    pub copy: bool,
}

pub async fn pick(params: PickParams) -> Result<()> {
    let mut config = Config::load(params.config.as_deref())?;
    if let Some(winners) = params.winners {
        config.picker.winners = winners;
    }
    if let Some(sort) = params.sort {
        config.picker.sort_mode = sort;
    }
    if params.allow_duplicates {
        config.picker.allow_duplicate_users = true;
    }
    config.validate()?;

    let content = tokio::fs::read_to_string(&params.input)
        .await
        .with_context(|| format!("Failed to read input file: {}", params.input.display()))?;
    let format = params
        .format
        .unwrap_or_else(|| InputFormat::from_path(&params.input));

    let comments = ingest(&content, format, &config.collector)
        .with_context(|| format!("Failed to ingest {} input", format.as_str()))?;

    let picker = &config.picker;
    let report = Validator::new(&picker.validation, &picker.rules).validate_all(&comments);

    println!("Giveaway draw from: {}", params.input.display());
    println!("================================");
    println!("  Comments: {}", comments.len());
    println!("  Valid:    {}", report.valid_count());
    println!("  Invalid:  {}", report.invalid_count());
    for warning in report.warnings() {
        println!("  Warning:  {}", warning.message());
    }

    let valid = report.valid_comments(&comments);
    let options = picker.draw_options();
    let mut rng = match params.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut session = DrawSession::new();
    let winners = session
        .draw_now(&valid, options, &mut rng)
        .context("Draw failed")?
        .to_vec();

    println!("\nWinners ({}):\n", options.sort_mode.label());
    for winner in &winners {
        println!(
            "{}. @{} - {}",
            winner.position,
            winner.username,
            truncate_text(&winner.text, 80)
        );
    }

    if params.output.is_some() || params.csv.is_some() {
        let document = export(
            &picker.validation,
            &picker.rules,
            &comments,
            &report,
            &winners,
            &ExportContext {
                draw: options,
                source_url: params.source_url.clone(),
            },
        );
        if let Some(output) = &params.output {
            document
                .write_to(output)
                .with_context(|| format!("Failed to write export: {}", output.display()))?;
            println!("\nExported results to {}", output.display());
        }
        if let Some(csv) = &params.csv {
            document
                .write_csv_to(csv)
                .with_context(|| format!("Failed to write CSV: {}", csv.display()))?;
            println!("Exported comments to {}", csv.display());
        }
    }

    if params.copy {
        println!("\n{}", clipboard_text(&winners));
    }

    Ok(())
}
