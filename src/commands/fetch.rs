use anyhow::{Context, Result};
use std::path::PathBuf;

use giveaway_picker::collector::{collect, parse_post_url, GraphClient, MediaTarget};
use giveaway_picker::config::Config;

/// Inputs of the `fetch` command
#[derive(Debug, Clone)]
pub struct FetchParams {
    pub url: Option<String>,
    pub media_id: Option<String>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub no_replies: bool,
}

/// Download a post's raw comment records as JSON
///
/// Records are saved unconverted so `pick` can apply its own collector
/// settings when reading them back. Status goes to stderr so stdout stays
/// valid JSON.
pub async fn fetch(params: FetchParams) -> Result<()> {
    let mut config = Config::load(params.config.as_deref())?;
    if params.no_replies {
        config.collector.include_replies = false;
    }
    config.validate()?;

    let client = GraphClient::new(&config.graph)?;

    let target = match (&params.media_id, &params.url) {
        (Some(media_id), _) => MediaTarget::new(media_id.as_str()),
        (None, Some(url)) => {
            let post = parse_post_url(url)?;
            eprintln!("Resolving post {} ...", post.shortcode);
            client.resolve_media(&post).await?
        }
        (None, None) => anyhow::bail!("Either --url or --media-id is required"),
    };

    let mut records = client
        .fetch_raw_comments(&target, 0)
        .await
        .with_context(|| format!("Failed to fetch comments for media {}", target.media_id))?;
    if !config.collector.include_replies {
        for record in &mut records {
            record.replies = None;
        }
    }

    let comments = collect(&records, &config.collector);
    eprintln!(
        "Fetched {} comment records ({} comments after collection settings)",
        records.len(),
        comments.len()
    );

    let json = serde_json::to_string_pretty(&records)?;
    match &params.output {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Saved to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
