use crate::{
    api::handlers::{health, login, logout, profile, root},
    auth::{AuthGate, SessionStore},
    pages::Pages,
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Extension, Router,
};
use std::{sync::Arc, time::Duration};
use tokio::{net::TcpListener, signal, time::interval};
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{debug, info, info_span, Span};
use ulid::Ulid;

pub(crate) mod handlers;

const REAPER_PERIOD: Duration = Duration::from_secs(60);

/// Build the application router.
///
/// The gate and page templates are shared with every handler as extensions.
pub fn router(gate: Arc<AuthGate>, pages: Arc<Pages>) -> Router {
    Router::new()
        .route("/", get(root::root))
        .route("/login", get(login::login_page).post(login::login))
        .route("/logout", post(logout::logout))
        .route("/profile", get(profile::profile))
        .route("/health", get(health::health).options(health::health))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(gate))
                .layer(Extension(pages)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, gate: Arc<AuthGate>, pages: Arc<Pages>) -> Result<()> {
    if gate.config().session_ttl_seconds() > 0 {
        spawn_session_reaper(Arc::clone(gate.sessions()), REAPER_PERIOD);
    }

    let app = router(gate, pages);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {err}");
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

/// Periodically drop expired sessions so abandoned ones do not accumulate.
pub fn spawn_session_reaper(sessions: Arc<dyn SessionStore>, period: Duration) {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        loop {
            ticker.tick().await;
            let purged = sessions.purge_expired();
            if purged > 0 {
                debug!(purged, "purged expired sessions");
            }
        }
    });
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
