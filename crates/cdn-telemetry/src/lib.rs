use serde::{Deserialize, Serialize};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Invalidator Telemetry Configuration
#[derive(Default, Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct TelemetryConfig {
    /// Service name.
    pub name: String,
    /// Service log level.
    pub log_level: Option<String>,
    /// Service json log output.
    pub json_log: bool,
    /// Hierarchical log tracing.
    pub tree_trace: bool,
}

impl TelemetryConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            log_level: None,
            json_log: false,
            tree_trace: false,
        }
    }

    pub fn with_log_level(mut self, log_level: &str) -> Self {
        self.log_level = Some(log_level.to_owned());
        self
    }

    pub fn with_json_log(mut self, json_log: bool) -> Self {
        self.json_log = json_log;
        self
    }

    pub fn with_tree_trace(mut self, tree_trace: bool) -> Self {
        self.tree_trace = tree_trace;
        self
    }

    /// `RUST_LOG` wins over the configured level.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                self.log_level
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            )
        })
    }

    pub fn init(self) -> anyhow::Result<()> {
        let env_filter = self.env_filter();

        let mut tracing_layers = vec![];

        #[cfg(feature = "tracing-tree")]
        if self.tree_trace {
            let hierarchical_layer = tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true);
            tracing_layers.push(hierarchical_layer.boxed());
        }

        if self.json_log {
            // CloudWatch stamps every line already.
            let json_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_ansi(false)
                .without_time()
                .with_target(false);
            tracing_layers.push(json_layer.boxed());
        } else if !self.tree_trace {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_level(true);
            tracing_layers.push(fmt_layer.boxed());
        }

        Registry::default()
            .with(tracing_layers)
            .with(env_filter)
            .with(ErrorLayer::default())
            .try_init()?;

        tracing::debug!(service = %self.name, "telemetry initialized");
        Ok(())
    }
}
