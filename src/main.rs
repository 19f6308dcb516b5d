use dotenvy::dotenv;
use rollbook::logging::init_tracing;
use rollbook::metrics::{init_metrics, metrics_router};
use rollbook::router::init_router;
use rollbook::state::init_app_state;
use rollbook_config::ServerConfig;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let server_config = ServerConfig::from_env();
    let address = server_config.bind_address();

    let metrics_handle = match init_metrics() {
        Ok(handle) => handle,
        Err(e) => {
            warn!(error = %e, "Prometheus recorder not installed; continuing without metrics");
            None
        }
    };

    let state = match init_app_state(server_config).await {
        Ok(state) => state,
        Err(e) => {
            error!(error = ?e, "Failed to initialize application state");
            std::process::exit(1);
        }
    };

    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_router(handle));
    }

    let listener = tokio::net::TcpListener::bind(address.as_str()).await.unwrap();
    info!("🚀 Server running on http://{}", address);
    info!("📚 Swagger UI available at http://{}/swagger-ui", address);
    info!("📖 Scalar UI available at http://{}/scalar", address);
    axum::serve(listener, app).await.unwrap();
}
