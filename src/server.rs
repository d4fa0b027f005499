use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::AppResult;
use crate::handlers;
use crate::state::AppState;

/// Largest report body accepted by the chart endpoints.
const MAX_REPORT_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Build the application state and Axum router from a [`Config`].
pub fn build_app(config: Config) -> AppResult<(AppState, Router)> {
    let state = AppState::new(config)?;

    let app = Router::new()
        .merge(handlers::routes())
        .layer(DefaultBodyLimit::max(MAX_REPORT_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    Ok((state, app))
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
        axum::serve(listener, app).await.expect("Server error");
    });

    Ok((actual_port, handle))
}
