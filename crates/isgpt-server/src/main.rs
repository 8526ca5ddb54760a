//! isgpt Server
//!
//! Loads the GPT-2 model once and serves AI text detection over HTTP.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};

use isgpt_detector::load_detector;
use isgpt_server::{create_router, AppState, Overrides, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "isgpt-server")]
#[command(about = "isgpt AI text detection server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "isgpt.yaml")]
    config: PathBuf,

    /// Listen address
    #[arg(short = 'l', long, env = "HOST")]
    host: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "PORT")]
    port: Option<u16>,

    /// Path to the ONNX model
    #[arg(long, env = "MODEL_PATH")]
    model_path: Option<PathBuf>,

    /// Path to tokenizer.json
    #[arg(long, env = "TOKENIZER_PATH")]
    tokenizer_path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting isgpt server");

    let config = ServerConfig::load(&cli.config, &cli.overrides())?;
    info!(
        model = ?config.model.model,
        tokenizer = ?config.model.tokenizer,
        max_length = config.detector.max_length,
        stride = config.detector.stride,
        "Configuration loaded"
    );

    let metrics_handle = init_metrics()?;

    // Loading and session creation are blocking; keep them off the runtime.
    info!("Loading GPT-2 model...");
    let model_config = config.model.clone();
    let detector_config = config.detector.clone();
    let detector =
        tokio::task::spawn_blocking(move || load_detector(&model_config, detector_config)).await??;
    info!("Model loaded successfully");

    let state = AppState::new(detector).with_metrics(metrics_handle);
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("isgpt server listening on http://{}", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("isgpt=debug")
    } else {
        // Directive targets match by prefix: `isgpt` covers every isgpt_* crate.
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("isgpt=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!("isgpt_requests_total", "Total number of inference requests");
    metrics::describe_counter!("isgpt_errors_total", "Total number of failed requests by type");
    metrics::describe_counter!(
        "isgpt_soft_failures_total",
        "Requests answered with a status instead of scores"
    );
    metrics::describe_counter!(
        "isgpt_sentence_failures_total",
        "Sentences skipped because scoring them failed"
    );
    metrics::describe_histogram!(
        "isgpt_inference_latency_us",
        metrics::Unit::Microseconds,
        "Detection latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
