//! Instagram Graph API client
//!
//! Pages through a media object's comments edge with:
//! - Rate limiting with governor
//! - Retry with exponential backoff for transient failures
//! - `{"error": {"message": ...}}` bodies surfaced as [`FetchError::Api`]
//!
//! A post link is resolved to a media id the way the Graph API requires:
//! the token's Facebook pages, their linked Instagram business account, then
//! that account's recent media matched by permalink.

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;

use super::api::{collect, ApiErrorBody, CommentsPage, RawComment};
use super::url::PostUrl;
use crate::config::{CollectorConfig, GraphConfig};
use crate::models::Comment;
use crate::utils::error::FetchError;
use crate::utils::retry::{with_retry_if, RetryConfig};

/// Fields requested for each comment
pub const COMMENT_FIELDS: &str =
    "id,text,username,timestamp,like_count,replies{id,text,username,timestamp}";

/// Comments per page
pub const PAGE_LIMIT: u32 = 100;

/// Recent media scanned when resolving a post link
const MEDIA_SCAN_LIMIT: u32 = 50;

/// Upper bound on followed `paging.next` links
const MAX_PAGES: usize = 200;

/// The media object to read comments from, with the token to read them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTarget {
    pub media_id: String,
    /// Page token found while resolving; the client token is used otherwise
    pub access_token: Option<String>,
}

impl MediaTarget {
    pub fn new(media_id: impl Into<String>) -> Self {
        Self {
            media_id: media_id.into(),
            access_token: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct DataList<T> {
    #[serde(default)]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct FacebookPage {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageAccount {
    #[serde(default)]
    instagram_business_account: Option<IdOnly>,
}

#[derive(Debug, Deserialize)]
struct IdOnly {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MediaItem {
    id: String,
    #[serde(default)]
    permalink: Option<String>,
}

/// Graph API client with rate limiting and retries
pub struct GraphClient {
    client: Client,

    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// e.g. `https://graph.facebook.com`
    base_url: String,

    /// e.g. `v19.0`
    api_version: String,

    access_token: String,

    retry: RetryConfig,
}

impl GraphClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::MissingToken` without an access token, or
    /// `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &GraphConfig) -> Result<Self, FetchError> {
        let access_token = config
            .access_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or(FetchError::MissingToken)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .gzip(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        let per_second = config.rate_limit.ceil().max(1.0) as u32;
        let rate = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            access_token,
            retry: RetryConfig::new(config.max_retries),
        })
    }

    /// Point the client at another host (mock servers in tests)
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.api_version, path)
    }

    /// GET a JSON document, rate limited and retried
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        with_retry_if(
            &self.retry,
            move || async move {
                self.rate_limiter.until_ready().await;
                self.get_once(url, query).await
            },
            FetchError::is_recoverable,
        )
        .await
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        tracing::debug!(url = %url, "Graph API request");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| if e.is_timeout() { FetchError::Timeout } else { FetchError::Http(e) })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status, &body))
    }

    /// Fetch one page of a media object's comments
    pub async fn fetch_page(&self, target: &MediaTarget) -> Result<CommentsPage, FetchError> {
        let url = self.endpoint(&format!("{}/comments", target.media_id));
        let token = target.access_token.as_deref().unwrap_or(&self.access_token);
        let query = [
            ("fields", COMMENT_FIELDS.to_string()),
            ("limit", PAGE_LIMIT.to_string()),
            ("access_token", token.to_string()),
        ];
        self.get_json(&url, &query).await
    }

    /// Fetch every comment record, following `paging.next`
    ///
    /// Paging stops early once `stop_after` records are held (0 = never).
    pub async fn fetch_raw_comments(
        &self,
        target: &MediaTarget,
        stop_after: usize,
    ) -> Result<Vec<RawComment>, FetchError> {
        let mut page = self.fetch_page(target).await?;
        let mut records = Vec::new();
        let mut pages = 1;

        loop {
            let next = page.next_page().map(str::to_string);
            records.append(&mut page.data);

            tracing::debug!(page = pages, total = records.len(), "Fetched comments page");

            let Some(next) = next else { break };
            if stop_after > 0 && records.len() >= stop_after {
                break;
            }
            if pages >= MAX_PAGES {
                tracing::warn!(pages, "Reached maximum page limit");
                break;
            }

            page = self.get_json(&next, &[]).await?;
            pages += 1;
        }

        tracing::info!(
            media_id = %target.media_id,
            pages,
            records = records.len(),
            "Fetched all comments"
        );

        Ok(records)
    }

    /// Fetch and convert a media object's comments
    pub async fn fetch_comments(
        &self,
        target: &MediaTarget,
        options: &CollectorConfig,
    ) -> Result<Vec<Comment>, FetchError> {
        // spam filtering can shrink the list, so the cap only bounds paging without it
        let stop_after = if options.filter_spam { 0 } else { options.max_comments };
        let records = self.fetch_raw_comments(target, stop_after).await?;
        Ok(collect(&records, options))
    }

    /// Resolve a post link to a media id in the token's business account
    pub async fn resolve_media(&self, post: &PostUrl) -> Result<MediaTarget, FetchError> {
        let token_query = [("access_token", self.access_token.clone())];
        let pages: DataList<FacebookPage> =
            self.get_json(&self.endpoint("me/accounts"), &token_query).await?;
        if pages.data.is_empty() {
            return Err(FetchError::NotFound(
                "no Facebook pages for this access token (pages_show_list permission required)"
                    .to_string(),
            ));
        }

        let mut account = None;
        for page in &pages.data {
            let query = [
                ("fields", "instagram_business_account".to_string()),
                ("access_token", self.access_token.clone()),
            ];
            match self.get_json::<PageAccount>(&self.endpoint(&page.id), &query).await {
                Ok(PageAccount {
                    instagram_business_account: Some(ig),
                }) => {
                    account = Some((ig.id, page.access_token.clone()));
                    break;
                }
                Ok(_) => tracing::debug!(page = %page.name, "No Instagram account for page"),
                Err(e) => tracing::debug!(page = %page.name, error = %e, "Page lookup failed"),
            }
        }

        let (account_id, page_token) = account.ok_or_else(|| {
            FetchError::NotFound("no Instagram business account linked to any page".to_string())
        })?;

        let token = page_token.clone().unwrap_or_else(|| self.access_token.clone());
        let query = [
            ("fields", "id,permalink,timestamp".to_string()),
            ("limit", MEDIA_SCAN_LIMIT.to_string()),
            ("access_token", token),
        ];
        let media: DataList<MediaItem> = self
            .get_json(&self.endpoint(&format!("{account_id}/media")), &query)
            .await?;

        let item = media
            .data
            .into_iter()
            .find(|m| {
                m.id == post.shortcode
                    || m.permalink
                        .as_deref()
                        .is_some_and(|p| p.contains(&post.shortcode))
            })
            .ok_or_else(|| {
                FetchError::NotFound(format!(
                    "post {} is not among the business account's recent media",
                    post.shortcode
                ))
            })?;

        tracing::info!(shortcode = %post.shortcode, media_id = %item.id, "Resolved post to media id");

        Ok(MediaTarget {
            media_id: item.id,
            access_token: page_token,
        })
    }
}

/// Map a non-success response to an error
///
/// 429 and 5xx stay retryable; an API error body wins otherwise.
fn error_for_status(status: StatusCode, body: &str) -> FetchError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return FetchError::RateLimit;
    }
    if status.is_server_error() {
        return FetchError::ServerError(status.as_u16());
    }
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) if !err.error.message.is_empty() => FetchError::Api(err.error.message),
        _ => FetchError::ServerError(status.as_u16()),
    }
}
