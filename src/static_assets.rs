//! Landing page compiled into the binary (`embed-frontend` feature).
//!
//! Only the page and its script are served. Any other path is a 404; there is
//! no client-side routing to fall back to.

use axum::http::{HeaderValue, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use mime_guess::MimeGuess;
use rust_embed::RustEmbed;
use tracing::warn;

#[derive(RustEmbed)]
#[folder = "static"]
struct LandingPage;

/// Request path to embedded file
const LANDING_FILES: &[(&str, &str)] = &[
    ("/", "index.html"),
    ("/index.html", "index.html"),
    ("/js/app.js", "js/app.js"),
];

fn landing_file(path: &str) -> Option<&'static str> {
    LANDING_FILES
        .iter()
        .find(|(route, _)| *route == path)
        .map(|(_, file)| *file)
}

fn content_type_for(file: &str) -> HeaderValue {
    let mime: MimeGuess = mime_guess::from_path(file);
    let value = mime.first_or_octet_stream().to_string();
    HeaderValue::from_str(&value)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"))
}

pub async fn serve_landing_page(uri: Uri) -> Response {
    let Some(file) = landing_file(uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match LandingPage::get(file) {
        Some(asset) => (
            [(header::CONTENT_TYPE, content_type_for(file))],
            asset.data.into_owned(),
        )
            .into_response(),
        None => {
            warn!(file, "Landing page file missing from the build");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
