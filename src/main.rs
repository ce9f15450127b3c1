use spend_analytics::config::Config;
use spend_analytics::server::{build_app, serve};
use spend_analytics::VERSION;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spend_analytics=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!("Starting analytics service v{} on {}", VERSION, config.address());

    let host = config.host.clone();
    let port = config.port;
    let (_, app) = build_app(config).expect("Failed to build application");

    let (port, handle) = serve(app, &host, port)
        .await
        .expect("Failed to bind address");
    tracing::info!("Listening on http://{}:{}", host, port);

    handle.await.expect("Server task panicked");
}
