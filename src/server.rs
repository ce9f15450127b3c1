use axum::http::HeaderValue;
use axum::middleware;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::correlation::correlation_middleware;
use crate::db::create_pool;
use crate::handlers;
use crate::services::upstream::UpstreamClient;
use crate::state::AppState;

/// Build the application state and Axum router from a [`Config`].
///
/// Opens the database (applying migrations), creates the budgeting-service
/// client, and assembles the middleware stack.
pub fn build_app(config: Config) -> Result<(AppState, Router), Box<dyn std::error::Error>> {
    let db = create_pool(&config.database_path)?;
    let upstream = UpstreamClient::new(&config.upstream_base_url, config.upstream_timeout)?;
    tracing::info!(
        upstream = %config.upstream_base_url,
        timeout_secs = config.upstream_timeout.as_secs(),
        "Configured category/budget service"
    );

    let cors = cors_layer(&config.cors_origins);

    let state = AppState {
        db,
        config: Arc::new(config),
        upstream,
    };

    let app = Router::new()
        .merge(handlers::routes())
        .layer(middleware::from_fn(correlation_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    Ok((state, app))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// `*` cannot be combined with credentials, so a wildcard entry mirrors the
/// caller's origin instead.
fn allowed_origins(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|origin| origin == "*") {
        return AllowOrigin::mirror_request();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(origins)
}

/// Bind the router to `host:port` and spawn the server as a tokio task.
///
/// Returns the actual port the server bound to (useful when `port` is 0 for
/// OS-assigned ports) and a [`JoinHandle`] for the server task.
pub async fn serve(
    app: Router,
    host: &str,
    port: u16,
) -> Result<(u16, JoinHandle<()>), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_port, handle))
}
