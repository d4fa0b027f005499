use spendview::config::Config;
use spendview::server::{build_app, serve};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spendview=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        version = spendview::VERSION,
        reports_url = %config.reports_url,
        "Starting spendview on {}",
        config.address()
    );

    let (_state, app) = build_app(config.clone()).expect("Failed to build application");

    let (port, handle) = serve(app, &config.host, config.port)
        .await
        .expect("Failed to bind address");

    tracing::info!("Listening on http://{}:{}", config.host, port);

    handle.await.expect("Server task failed");
}
