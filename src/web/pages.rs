//! Server-rendered pages.

use askama::Template;
use chrono::{DateTime, SecondsFormat, Utc};

/// Name shown in the `Server` header and in page footers.
pub const SERVER_NAME: &str = "short-link";

/// Footer shared by the full-page templates.
#[derive(Debug, Clone)]
pub struct Footer {
    pub show_server_name: bool,
    pub server_name: &'static str,
    pub generated_at: String,
    /// Empty when the mapping has never been fetched.
    pub last_update: String,
    /// Icon URL for the page head; empty when none is configured.
    pub favicon: String,
}

impl Footer {
    pub fn new(show_server_name: bool, last_update: Option<DateTime<Utc>>) -> Self {
        Self {
            show_server_name,
            server_name: SERVER_NAME,
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            last_update: last_update
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default(),
            favicon: String::new(),
        }
    }

    pub fn with_favicon(mut self, favicon: Option<&str>) -> Self {
        self.favicon = favicon.unwrap_or_default().to_string();
        self
    }
}

/// Renders `templates/not_found.html`.
#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundPage<'a> {
    pub redirect_name: &'a str,
    pub footer: Footer,
}

/// Renders `templates/redirect_info.html` for `/<key>+` requests.
#[derive(Template)]
#[template(path = "redirect_info.html")]
pub struct RedirectInfoPage<'a> {
    pub redirect_name: &'a str,
    pub target: &'a str,
    pub footer: Footer,
}

/// Small body sent along with a redirect for clients that do not follow
/// `Location`.
#[derive(Template)]
#[template(path = "redirect.html")]
pub struct RedirectPage<'a> {
    pub target: &'a str,
}

/// Display form of a key: always with a leading slash.
pub fn display_name(key: &str) -> String {
    if key.starts_with('/') {
        key.to_string()
    } else {
        format!("/{key}")
    }
}
