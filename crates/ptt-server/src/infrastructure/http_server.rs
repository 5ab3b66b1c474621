//! Static page server.
//!
//! Serves the browser PTT page on its own port, separate from the control
//! channel.  The three assets are compiled into the binary, so the server
//! has no working-directory requirements and no state.
//!
//! | Route          | Response                                          |
//! |----------------|---------------------------------------------------|
//! | `GET /`        | `302` to `/index.html?ws_port=<control port>`     |
//! | `/index.html`  | page markup                                       |
//! | `/app.js`      | client script (reconnect logic, button handling)  |
//! | `/style.css`   | stylesheet                                        |
//! | anything else  | `404`                                             |

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tracing::info;

const INDEX_HTML: &str = include_str!("../../web/index.html");
const APP_JS: &str = include_str!("../../web/app.js");
const STYLE_CSS: &str = include_str!("../../web/style.css");

/// Port the page should open its control channel on.
#[derive(Clone, Copy)]
struct ControlPort(u16);

/// Builds the static asset router.
pub fn router(ws_port: u16) -> Router {
    Router::new()
        .route("/", get(root_redirect))
        .route("/index.html", get(index))
        .route("/app.js", get(app_js))
        .route("/style.css", get(style_css))
        .fallback(not_found)
        .with_state(ControlPort(ws_port))
}

/// Binds the static asset listener.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot be bound.
pub async fn bind_http_listener(addr: std::net::SocketAddr) -> anyhow::Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {addr}"))
}

/// Serves the static assets until `running` is set to `false`.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve_static_assets(
    listener: TcpListener,
    ws_port: u16,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let local = listener
        .local_addr()
        .context("failed to read HTTP listener address")?;
    info!("static page server listening on http://{local}");

    axum::serve(listener, router(ws_port))
        .with_graceful_shutdown(wait_for_stop(running))
        .await
        .context("static page server failed")?;

    info!("static page server stopped");
    Ok(())
}

async fn wait_for_stop(running: Arc<AtomicBool>) {
    while running.load(Ordering::Relaxed) {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}

async fn root_redirect(State(ControlPort(ws_port)): State<ControlPort>) -> Response {
    let location = format!("/index.html?ws_port={ws_port}");
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        APP_JS,
    )
}

async fn style_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
