//! Structured logging setup.
//!
//! `RUST_LOG` wins over the configured filter. JSON output is meant for log
//! shipping; the default is compact text for terminals.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Fallback filter directive, e.g. "info" or "api=debug,info"
    pub filter: String,
    pub json: bool,
    /// Also log span open/close
    pub span_events: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            json: false,
            span_events: false,
        }
    }
}

impl TracingConfig {
    /// Defaults overlaid with `RUST_LOG` and `LOG_JSON`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(filter) = std::env::var("RUST_LOG") {
            config.filter = filter;
        }
        if let Ok(json) = std::env::var("LOG_JSON") {
            config.json = matches!(json.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        config
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.filter))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let spans = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        if self.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_events(spans)
                .with_file(true)
                .with_line_number(true)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .compact()
                .with_span_events(spans)
                .boxed()
        }
    }
}

/// Installs the global subscriber. Returns false if one was already set,
/// which happens when several tests share a process.
pub fn init_tracing(config: &TracingConfig) -> bool {
    let installed = tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(config.env_filter())
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(filter = %config.filter, json = config.json, "Tracing initialized");
    }
    installed
}

pub fn init_tracing_from_env() -> bool {
    init_tracing(&TracingConfig::from_env())
}
