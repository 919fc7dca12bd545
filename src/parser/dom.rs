//! Comment scraper for rendered Instagram post pages
//!
//! This is the page-side adapter: it sweeps the comment selectors, drops UI
//! chrome, infers the author from nearby profile links and emits the same
//! [`Comment`] records the text and API adapters produce.

use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::models::{Comment, CommentSource};
use crate::parser::sanitize::clean_comment_content;
use crate::parser::selectors::{is_ui_chrome, CommentPageSelectors, NON_PROFILE_PATHS};

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._]{1,30}$").unwrap());

static USERNAME_STRIP_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w.-]").unwrap());

/// How many ancestor levels are searched for the author link
const USERNAME_SEARCH_DEPTH: usize = 6;

const MIN_TEXT_CHARS: usize = 3;
const MIN_USERNAME_CHARS: usize = 2;

/// Scraper for comment text on a rendered post page
pub struct CommentScraper {
    selectors: CommentPageSelectors,
}

impl CommentScraper {
    #[must_use]
    pub fn new() -> Self {
        Self {
            selectors: CommentPageSelectors::new(),
        }
    }

    /// Scrape every visible comment from page HTML
    ///
    /// Results keep document order and are unique per case-insensitive
    /// (username, text) pair.
    pub fn scrape(&self, html: &str) -> Vec<Comment> {
        let document = Html::parse_document(html);
        let mut seen_nodes = HashSet::new();
        let mut seen_pairs = HashSet::new();
        let mut comments = Vec::new();
        let mut visited = 0usize;

        for selector in self.selectors.comment_text {
            for element in document.select(selector) {
                if !seen_nodes.insert(element.id()) {
                    continue;
                }
                visited += 1;

                let text = clean_comment_content(&element.text().collect::<String>());
                if text.chars().count() < MIN_TEXT_CHARS || is_ui_chrome(&text) {
                    continue;
                }

                let author = self.find_author(element);
                let username = match &author {
                    Some((name, _)) => name.clone(),
                    None => format!("user_{visited}"),
                };

                if username.chars().count() < MIN_USERNAME_CHARS
                    || text.eq_ignore_ascii_case(&username)
                {
                    continue;
                }

                let key = (username.to_lowercase(), text.to_lowercase());
                if !seen_pairs.insert(key) {
                    continue;
                }

                let mut comment = Comment::new(&username, &text, CommentSource::Dom);
                if let Some((_, container)) = author {
                    comment = comment
                        .with_verified(self.is_verified(container))
                        .with_timestamp(self.find_timestamp(container))
                        .with_profile_link();
                }
                comments.push(comment);
            }
        }

        tracing::debug!(
            elements = visited,
            comments = comments.len(),
            "Scraped comments from page"
        );
        comments
    }

    /// Find the author handle near a comment element
    ///
    /// Returns the handle together with the closest ancestor holding the
    /// author link; that ancestor is the comment's container and scopes the
    /// badge and timestamp lookups.
    fn find_author<'a>(&self, element: ElementRef<'a>) -> Option<(String, ElementRef<'a>)> {
        for ancestor in element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .take(USERNAME_SEARCH_DEPTH)
        {
            for selector in self.selectors.profile_link {
                for link in ancestor.select(selector) {
                    if let Some(name) = link
                        .value()
                        .attr("href")
                        .and_then(username_from_href)
                    {
                        return Some((name, ancestor));
                    }

                    let link_text = clean_comment_content(&link.text().collect::<String>());
                    if looks_like_username(&link_text) {
                        return Some((clean_scraped_username(&link_text), ancestor));
                    }
                }
            }
        }
        None
    }

    fn is_verified(&self, container: ElementRef<'_>) -> bool {
        self.selectors
            .verified_badge
            .iter()
            .any(|selector| container.select(selector).next().is_some())
    }

    fn find_timestamp(&self, container: ElementRef<'_>) -> Option<DateTime<Utc>> {
        container
            .select(self.selectors.timestamp)
            .next()
            .and_then(|time| time.value().attr("datetime"))
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl Default for CommentScraper {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a username from a profile link, rejecting post/explore/etc. links
pub fn username_from_href(href: &str) -> Option<String> {
    if NON_PROFILE_PATHS.iter().any(|p| href.contains(p)) {
        return None;
    }

    let candidate = href
        .split(['?', '#'])
        .next()
        .unwrap_or("")
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("");

    USERNAME_REGEX
        .is_match(candidate)
        .then(|| candidate.to_string())
}

/// Whether a piece of text is shaped like a handle
pub fn looks_like_username(text: &str) -> bool {
    USERNAME_REGEX.is_match(&text.replace('@', ""))
}

fn clean_scraped_username(raw: &str) -> String {
    USERNAME_STRIP_REGEX
        .replace_all(&raw.replace('@', ""), "")
        .to_string()
}
