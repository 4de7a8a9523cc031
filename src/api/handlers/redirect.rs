//! Handler for redirect, info and not-found responses.

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::Response,
};
use percent_encoding::percent_decode_str;
use tracing::debug;

use crate::metrics;
use crate::state::AppState;
use crate::utils::etag::redirect_etag;
use crate::utils::host::request_host;
use crate::web::pages::{Footer, NotFoundPage, RedirectInfoPage, display_name};

/// Resolves any path not claimed by another route.
///
/// # Endpoint
///
/// `GET|HEAD|OPTIONS /{*path}` (router fallback)
///
/// # Request Flow
///
/// 1. `OPTIONS` → 200 with `Allow`; other non-GET/HEAD methods → 405
/// 2. Decode the path and strip the port from the host
/// 3. `favicon.*` with a remote icon configured → 307 to the icon
/// 4. Resolve against the live mapping
/// 5. Not found → 404 page (bare 404 for `favicon.*`)
/// 6. Info request (`/<key>+`) → 200 info page
/// 7. Otherwise → 307 Temporary Redirect
///
/// HEAD responses carry the same headers as GET but no body.
pub async fn redirect_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let responses = &state.responses;

    if method == Method::OPTIONS {
        return responses.allow(StatusCode::OK);
    }
    if method != Method::GET && method != Method::HEAD {
        return responses.allow(StatusCode::METHOD_NOT_ALLOWED);
    }

    let path = percent_decode_str(uri.path()).decode_utf8_lossy();
    let host = request_host(&headers, &uri);
    let pr = state.resolver.resolve(&path, &host, &method);

    if pr.normalized_key.starts_with("favicon.")
        && let Some(icon) = responses.remote_favicon()
    {
        debug!(path = %pr.original_path, destination = icon, "Redirecting to favicon");
        return responses.redirect("favicon", icon, pr.no_body);
    }

    let Some(target) = pr.target.as_deref() else {
        debug!(path = %pr.original_path, key = %pr.normalized_key, "Redirect not found");
        metrics::redirects::not_found();

        if pr.normalized_key.starts_with("favicon.") {
            return responses.bare(StatusCode::NOT_FOUND);
        }

        let page = NotFoundPage {
            redirect_name: &display_name(&pr.normalized_key),
            footer: footer(&state),
        };
        return responses.html(StatusCode::NOT_FOUND, &page, None, pr.no_body);
    };

    if pr.info_request {
        debug!(key = %pr.normalized_key, destination = target, "Serving redirect info");
        metrics::redirects::info();

        let page = RedirectInfoPage {
            redirect_name: &display_name(&pr.normalized_key),
            target,
            footer: footer(&state),
        };
        let etag = redirect_etag(&pr.normalized_key, target, "info");
        return responses.html(StatusCode::OK, &page, Some(etag), pr.no_body);
    }

    debug!(key = %pr.normalized_key, destination = target, "Redirecting");
    metrics::redirects::found();

    responses.redirect(&pr.normalized_key, target, pr.no_body)
}

fn footer(state: &AppState) -> Footer {
    Footer::new(
        state.responses.show_server_header,
        state.source().last_update(),
    )
    .with_favicon(state.responses.favicon.as_deref())
}
