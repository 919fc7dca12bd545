//! CSS selectors and skip patterns for rendered Instagram post pages
//!
//! Instagram ships several layouts at once, so comment text is swept with a
//! list of selectors and UI chrome ("Like", "Reply", "3h", ...) is filtered
//! out afterwards by pattern.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::Selector;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    static ref COMMENT_TEXT: Vec<Selector> = vec![
        parse_selector!("article div[role=\"button\"] span"),
        parse_selector!("article ul li div span"),
        parse_selector!("[data-testid=\"comment\"] span"),
        parse_selector!("article section div div span"),
        parse_selector!("div[data-testid=\"comment\"] span"),
    ];

    static ref PROFILE_LINK: Vec<Selector> = vec![
        parse_selector!("a[href*=\"/\"][role=\"link\"]"),
        parse_selector!("a[href*=\"/\"]"),
        parse_selector!("span[dir=\"auto\"] a"),
    ];

    static ref VERIFIED_BADGE: Vec<Selector> = vec![
        parse_selector!("[aria-label*=\"Verified\"]"),
        parse_selector!("[title*=\"Verified\"]"),
        parse_selector!("svg[aria-label*=\"Verified\"]"),
        parse_selector!(".verified-badge"),
    ];

    static ref TIMESTAMP: Selector = parse_selector!("time[datetime]");

    static ref SKIP_PATTERNS: Vec<Regex> = [
        r"(?i)^(Like|Reply|View replies|Translate|Show more|Hide|Load more|See translation)$",
        r"^\d+[smhdw]$",
        r"^•$",
        r"^@\w+$",
        r"(?i)^(liked by|and \d+ others|View all \d+ comments)$",
        r"^\d+$",
        r"(?i)^(Follow|Following|Verified)$",
        r"(?i)^(ago|hours?|days?|weeks?|months?)$",
        r"(?i)^(View profile|Message|Call)$",
        r"(?i)^\d+ (likes?|replies)$",
        r"^[\W\s]*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid skip pattern"))
    .collect();
}

/// Path fragments that mark a link as something other than a profile
pub const NON_PROFILE_PATHS: &[&str] = &[
    "/p/",
    "/reel/",
    "/tv/",
    "/explore/",
    "/accounts/",
    "/direct/",
    "/stories/",
    "/live/",
    "/shop/",
    "facebook.com",
    "twitter.com",
    "youtube.com",
];

/// Selectors used by the comment scraper
pub struct CommentPageSelectors {
    pub comment_text: &'static [Selector],
    pub profile_link: &'static [Selector],
    pub verified_badge: &'static [Selector],
    pub timestamp: &'static Selector,
}

impl CommentPageSelectors {
    pub fn new() -> Self {
        Self {
            comment_text: &COMMENT_TEXT,
            profile_link: &PROFILE_LINK,
            verified_badge: &VERIFIED_BADGE,
            timestamp: &TIMESTAMP,
        }
    }
}

impl Default for CommentPageSelectors {
    fn default() -> Self {
        Self::new()
    }
}

/// True when a text node is UI chrome rather than a comment
pub fn is_ui_chrome(text: &str) -> bool {
    SKIP_PATTERNS.iter().any(|pattern| pattern.is_match(text))
}
