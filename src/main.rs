//! shipquote server binary.

use anyhow::Context;
use shipquote::api::rest::{AppState, EnabledOperations, create_router};
use shipquote::application::services::{AggregationConfig, QuoteAggregationEngine};
use shipquote::config::AppConfig;
use shipquote::domain::services::PricingResolver;
use shipquote::infrastructure::fixtures;
use shipquote::infrastructure::persistence::in_memory::{
    InMemoryPricingRuleRepository, InMemoryProviderRepository, InMemoryUserRepository,
};
use shipquote::infrastructure::providers::{HttpClient, HttpProviderFactory};
use shipquote::telemetry;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    telemetry::init(&config.log);

    let providers = Arc::new(InMemoryProviderRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let rules = Arc::new(InMemoryPricingRuleRepository::new());

    if config.fixtures.enabled {
        let summary = fixtures::seed(
            providers.as_ref(),
            users.as_ref(),
            rules.as_ref(),
            &config.fixtures.endpoints,
        )
        .await
        .context("seeding fixtures")?;
        info!(
            providers = summary.providers,
            users = summary.users,
            rules = summary.rules,
            "Fixtures loaded"
        );
    }

    let timeout_ms = config.quoting.provider_timeout_ms;
    let client = HttpClient::new(timeout_ms).context("building HTTP client")?;
    let pricing = PricingResolver::new(rules).with_default_markup(config.quoting.default_markup);
    let engine = QuoteAggregationEngine::new(
        providers.clone(),
        Arc::new(HttpProviderFactory::new(client)),
        pricing,
    )
    .with_config(AggregationConfig::default().with_per_provider_timeout(timeout_ms));

    let state = Arc::new(AppState {
        engine,
        providers,
        users,
        provider_operations: EnabledOperations::only(config.api.provider_operations.iter().copied()),
    });
    let router = create_router(state);

    let address = config.server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(address = %listener.local_addr()?, "Server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
