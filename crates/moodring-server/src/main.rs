//! Moodring
//!
//! Feedback sentiment analysis service: a lexicon scorer that is always
//! available and an optional pretrained transformer, behind one HTTP API.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use moodring_classifiers::{PretrainedConfig, SentimentEngine};
use moodring_core::Backend;
use moodring_server::cli::{AnalyzeArgs, Cli, Commands, ServeArgs};
use moodring_server::routes::AnalyzeResponse;
use moodring_server::{run_server, AppState, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Analyze(args) => {
            init_tracing(args.verbose, false);
            tokio::task::spawn_blocking(move || analyze(args)).await?
        }
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    init_tracing(args.verbose, args.log_json);

    info!("Starting Moodring");

    // Load configuration
    let config = ServerConfig::load(&args.config, &args)?;
    let addr = config.socket_addr()?;
    info!("Configuration loaded successfully");
    info!("Default backend: {}", config.default_backend);
    info!("History capacity: {}", config.history.capacity);
    info!(
        "Pretrained backend: {}",
        if config.pretrained.enabled { "enabled" } else { "disabled" }
    );

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    // Model loading may download weights; keep it off the async workers
    let pretrained = config.pretrained.clone();
    let engine =
        tokio::task::spawn_blocking(move || SentimentEngine::initialize(&pretrained)).await??;
    info!("Sentiment engine ready: {:?}", engine);

    let state = AppState::new(config, engine, Some(metrics_handle));
    run_server(state, addr).await
}

/// Analyze each text once and print one JSON line per result
fn analyze(args: AnalyzeArgs) -> Result<()> {
    let backend = Backend::from_name(&args.backend);
    let pretrained = match (&args.model_path, backend) {
        (Some(path), _) => PretrainedConfig::from_local(path),
        (None, Backend::Pretrained) => PretrainedConfig {
            enabled: true,
            ..Default::default()
        },
        (None, Backend::Lexicon) => PretrainedConfig::default(),
    };
    let engine = SentimentEngine::initialize(&pretrained)?;

    for text in &args.texts {
        let result = engine.analyze(text, backend);
        let response = AnalyzeResponse::new(text.clone(), result, Utc::now());
        println!("{}", serde_json::to_string(&response)?);
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("moodring=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("moodring=info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "moodring_requests_total",
        "Total number of requests by endpoint"
    );
    metrics::describe_counter!(
        "moodring_analyses_total",
        "Total number of analyses by sentiment and backend"
    );
    metrics::describe_counter!(
        "moodring_backend_fallbacks_total",
        "Pretrained requests served by the lexicon scorer, by reason"
    );
    metrics::describe_histogram!(
        "moodring_analysis_latency_us",
        metrics::Unit::Microseconds,
        "Analysis latency in microseconds"
    );
    metrics::describe_counter!("moodring_errors_total", "Total number of errors by kind");

    info!("Metrics exporter initialized");
    Ok(handle)
}
