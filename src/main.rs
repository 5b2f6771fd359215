//! Bettim Admin - console server and browser entry point.
//!
//! The server binary serves the Dioxus app (SSR + hydration) and the `/api`
//! proxy to the Bettim admin API on one port. The wasm build only launches the app.

#[cfg(feature = "server")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use bettim_admin::adapters::{BettimClient, FormRelay};
    use bettim_admin::api::{self, AppState};
    use bettim_admin::app::{self, App};
    use bettim_admin::config;
    use bettim_admin::docs::DocumentLibrary;
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tower::ServiceBuilder;
    use tower_http::{compression::CompressionLayer, trace::TraceLayer};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "bettim_admin=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting Bettim Admin v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = config::load_config()?;
    tracing::info!(?config, "Configuration loaded");

    let backend = BettimClient::new(&config)?;
    tracing::info!(base = %config.api_base_url, version = %config.api_version, "Bettim API client initialized");

    let relay = FormRelay::new(config.contact_relay_url.clone(), config.request_timeout());
    if !relay.is_configured() {
        tracing::warn!("No contact relay configured, contact submissions will be rejected");
    }
    let documents = DocumentLibrary::new(config.docs_dir.clone());
    let state = AppState::new(Arc::new(backend), relay, documents);

    // Server-side rendering calls the proxy over loopback
    app::api::set_server_origin(format!("http://127.0.0.1:{}", config.port));

    let router = api::router(state)
        .merge(axum::Router::new().serve_dioxus_application(ServeConfig::new(), App))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(not(feature = "server"))]
fn main() {
    dioxus::launch(bettim_admin::app::App);
}
