//! Instagram post URL parsing
//!
//! Accepts post (`/p/`), reel (`/reel/`) and IGTV (`/tv/`) links, with or
//! without scheme, `www.`/`m.` subdomains, a leading username segment, query
//! strings and fragments.

use url::Url;

use crate::utils::error::FetchError;

/// Path segments that introduce a post shortcode
const POST_KINDS: &[&str] = &["p", "reel", "tv"];

/// A parsed Instagram post link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUrl {
    /// `p`, `reel` or `tv`
    pub kind: String,
    /// Shortcode, e.g. `C1a2B3c4D5e`
    pub shortcode: String,
    /// Account name when the link carries one (`instagram.com/<user>/p/<code>`)
    pub username: Option<String>,
}

impl PostUrl {
    /// Canonical permalink for the post
    pub fn permalink(&self) -> String {
        format!("https://www.instagram.com/{}/{}/", self.kind, self.shortcode)
    }
}

/// Parse an Instagram post, reel or tv link
///
/// # Examples
///
/// ```
/// use giveaway_picker::collector::url::parse_post_url;
///
/// let post = parse_post_url("https://www.instagram.com/p/C1a2B3c4D5e/?igsh=abc").unwrap();
/// assert_eq!(post.shortcode, "C1a2B3c4D5e");
/// assert_eq!(post.kind, "p");
/// ```
pub fn parse_post_url(raw: &str) -> Result<PostUrl, FetchError> {
    let trimmed = raw.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let invalid = || FetchError::InvalidUrl(trimmed.to_string());
    let url = Url::parse(&with_scheme).map_err(|_| invalid())?;

    let host = url.host_str().ok_or_else(invalid)?.to_lowercase();
    if host != "instagram.com" && !host.ends_with(".instagram.com") {
        return Err(invalid());
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let kind_index = segments
        .iter()
        .position(|seg| POST_KINDS.contains(seg))
        .ok_or_else(invalid)?;
    let shortcode = segments.get(kind_index + 1).ok_or_else(invalid)?;
    if !is_shortcode(shortcode) {
        return Err(invalid());
    }

    let username = match kind_index {
        0 => None,
        1 => Some(segments[0].to_string()),
        _ => return Err(invalid()),
    };

    Ok(PostUrl {
        kind: segments[kind_index].to_string(),
        shortcode: shortcode.to_string(),
        username,
    })
}

/// Shortcode of a post link, if the link is one
pub fn extract_post_id(raw: &str) -> Option<String> {
    parse_post_url(raw).ok().map(|post| post.shortcode)
}

pub fn is_valid_instagram_url(raw: &str) -> bool {
    parse_post_url(raw).is_ok()
}

fn is_shortcode(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
