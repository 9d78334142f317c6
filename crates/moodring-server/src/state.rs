use crate::config::ServerConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use moodring_classifiers::SentimentEngine;
use moodring_history::HistoryLedger;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Sentiment engine, immutable after startup
    pub engine: Arc<SentimentEngine>,

    /// Bounded analysis history
    pub history: Arc<HistoryLedger>,

    /// Service configuration
    pub config: Arc<ServerConfig>,

    /// Prometheus handle for rendering `/metrics`; absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        engine: SentimentEngine,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            history: Arc::new(HistoryLedger::new(config.history.capacity)),
            config: Arc::new(config),
            metrics,
        }
    }

    /// Render Prometheus metrics, or an empty body without a recorder
    pub fn render_metrics(&self) -> String {
        self.metrics
            .as_ref()
            .map(PrometheusHandle::render)
            .unwrap_or_default()
    }
}
