//! Response builders for the redirect surface.
//!
//! Every response gets the default headers (`Server` when enabled);
//! redirects and HTML pages additionally get `Cache-Control`.

use askama::Template;
use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::config::Config;
use crate::utils::etag::redirect_etag;
use crate::web::pages::{RedirectPage, SERVER_NAME};

/// Methods served by the redirect handler.
pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Header switches for the redirect surface.
#[derive(Debug, Clone)]
pub struct ResponseOptions {
    /// Full `Cache-Control` value, e.g. `public, max-age=600`.
    pub cache_control: String,
    pub show_server_header: bool,
    pub enable_etag: bool,
    pub enable_redirect_body: bool,
    /// Icon URL linked from HTML pages.
    pub favicon: Option<String>,
}

impl Default for ResponseOptions {
    fn default() -> Self {
        Self {
            cache_control: "public, max-age=600".to_string(),
            show_server_header: true,
            enable_etag: true,
            enable_redirect_body: true,
            favicon: None,
        }
    }
}

impl ResponseOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cache_control: config.cache_control_header(),
            show_server_header: config.show_server_header,
            enable_etag: config.enable_etag,
            enable_redirect_body: config.enable_redirect_body,
            favicon: config.favicon.clone(),
        }
    }

    /// The configured icon when it lives on another host.
    ///
    /// Only such icons are served for `/favicon.*`; a local path would
    /// redirect back into the redirect surface.
    pub fn remote_favicon(&self) -> Option<&str> {
        self.favicon.as_deref().filter(|icon| icon.contains("//"))
    }

    /// Adds the headers every response carries.
    pub fn apply_default_headers(&self, headers: &mut HeaderMap) {
        if self.show_server_header {
            headers.insert(header::SERVER, HeaderValue::from_static(SERVER_NAME));
        }
    }

    /// Adds the default headers plus `Cache-Control`.
    pub fn apply_cache_headers(&self, headers: &mut HeaderMap) {
        self.apply_default_headers(headers);
        match HeaderValue::from_str(&self.cache_control) {
            Ok(value) => {
                headers.insert(header::CACHE_CONTROL, value);
            }
            Err(e) => error!(error = %e, "Invalid Cache-Control header value"),
        }
    }

    fn apply_etag(&self, headers: &mut HeaderMap, etag: Option<String>) {
        if !self.enable_etag {
            return;
        }
        if let Some(value) = etag.and_then(|tag| HeaderValue::try_from(tag).ok()) {
            headers.insert(header::ETAG, value);
        }
    }

    /// Builds a cacheable HTML response.
    ///
    /// A failed render yields an empty body with the requested status.
    pub fn html(
        &self,
        status: StatusCode,
        page: &impl Template,
        etag: Option<String>,
        no_body: bool,
    ) -> Response {
        let body = match page.render() {
            Ok(html) => html,
            Err(e) => {
                error!(error = %e, "Could not render template");
                String::new()
            }
        };

        let mut response = if no_body {
            status.into_response()
        } else {
            (status, body).into_response()
        };

        let headers = response.headers_mut();
        self.apply_cache_headers(headers);
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
        self.apply_etag(headers, etag);

        response
    }

    /// Builds a `307 Temporary Redirect` to `target`.
    ///
    /// `key` is the resolved mapping key, used for the ETag.
    pub fn redirect(&self, key: &str, target: &str, no_body: bool) -> Response {
        let Ok(location) = HeaderValue::try_from(target) else {
            error!(key, destination = target, "Redirect target is not a valid header value");
            return self.bare(StatusCode::INTERNAL_SERVER_ERROR);
        };

        let with_body = self.enable_redirect_body && !no_body;
        let body = if with_body {
            RedirectPage { target }.render().unwrap_or_else(|e| {
                error!(error = %e, "Could not render redirect body");
                String::new()
            })
        } else {
            String::new()
        };

        let mut response = (StatusCode::TEMPORARY_REDIRECT, Body::from(body)).into_response();
        let headers = response.headers_mut();
        self.apply_cache_headers(headers);
        headers.insert(header::LOCATION, location);
        if with_body {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
        }
        self.apply_etag(headers, Some(redirect_etag(key, target, "redirect")));

        response
    }

    /// Status-only response with the default headers.
    pub fn bare(&self, status: StatusCode) -> Response {
        let mut response = status.into_response();
        self.apply_default_headers(response.headers_mut());
        response
    }

    /// Status-only response listing the allowed methods.
    pub fn allow(&self, status: StatusCode) -> Response {
        let mut response = self.bare(status);
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
        response
    }
}
