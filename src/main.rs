use anyhow::Context;
use clap::Parser;
use company_research::{
    AppState,
    api::routes::create_router,
    utils::config::{AppConfig, LogFormat},
};
use std::path::{Path, PathBuf};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Company research server
#[derive(Parser, Debug)]
#[command(name = "company-research-server")]
#[command(version, about = "Web research and ESG analysis for companies", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "RESEARCH_CONFIG", default_value = "research.toml")]
    config: PathBuf,

    /// Address to bind, overrides the configuration
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overrides the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match config.server.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init(),
    }
}

fn load_config(path: &Path, cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::from_sources(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;

    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config, &cli)?;

    init_tracing(&config);

    if cli.config.exists() {
        tracing::info!("Loaded configuration from {}", cli.config.display());
    } else {
        tracing::info!("No configuration file at {}, using defaults", cli.config.display());
    }
    config.warn_unconfigured();

    tracing::info!(
        "Search: {} (max {} results, {} concurrent, {}s timeout)",
        config.search.provider.name(),
        config.search.max_results,
        config.search.max_concurrent,
        config.search.timeout_secs
    );
    tracing::info!(
        "LLM: {} ({})",
        config.llm.provider.name(),
        config.llm.model
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let body_limit = config.server.body_limit_bytes;
    let state = AppState::from_config(config).context("failed to initialise clients")?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router().with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .map_response(|res: axum::http::Response<_>| res.map(axum::body::Body::new))
            .layer(RequestBodyLimitLayer::new(body_limit)),
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("Company research server listening on http://{}", addr);
    #[cfg(feature = "swagger-ui")]
    tracing::info!("API docs at http://{}/swagger-ui/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
