//! Dependency health for the ledger.
//!
//! Readiness follows the interaction store alone. A catalog outage only
//! degrades the service: reads keep working and writes fail with a
//! retryable error.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Whether traffic should still be routed here.
    pub fn is_serving(&self) -> bool {
        !matches!(self, Self::Unhealthy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }
}

#[derive(Debug, Default, Clone)]
struct ProbeState {
    healthy: bool,
    failure: Option<String>,
    checked_at: Option<DateTime<Utc>>,
}

/// Last known state of one dependency. Starts unhealthy until probed.
#[derive(Debug)]
pub struct ComponentHealth {
    name: &'static str,
    state: RwLock<ProbeState>,
}

impl ComponentHealth {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: RwLock::new(ProbeState::default()),
        }
    }

    pub fn set_healthy(&self) {
        self.update(true, None);
    }

    pub fn set_unhealthy(&self, failure: impl Into<String>) {
        self.update(false, Some(failure.into()));
    }

    /// Records a probe outcome; `failure` is kept only when `ok` is false.
    pub fn record_probe(&self, ok: bool, failure: impl Into<String>) {
        if ok {
            self.set_healthy();
        } else {
            self.set_unhealthy(failure);
        }
    }

    fn update(&self, healthy: bool, failure: Option<String>) {
        *self.state.write() = ProbeState {
            healthy,
            failure,
            checked_at: Some(Utc::now()),
        };
    }

    pub fn is_healthy(&self) -> bool {
        self.state.read().healthy
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Failure reason from the last unhealthy probe.
    pub fn message(&self) -> Option<String> {
        self.state.read().failure.clone()
    }

    pub fn checked_at(&self) -> Option<DateTime<Utc>> {
        self.state.read().checked_at
    }

    fn report(&self) -> ComponentHealthReport {
        let state = self.state.read().clone();
        ComponentHealthReport {
            name: self.name.to_string(),
            healthy: state.healthy,
            message: state.failure,
            checked_at: state.checked_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub components: Vec<ComponentHealthReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealthReport {
    pub name: String,
    pub healthy: bool,
    pub message: Option<String>,
    pub checked_at: Option<DateTime<Utc>>,
}

pub struct HealthRegistry {
    pub store: ComponentHealth,
    pub catalog: ComponentHealth,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self {
            store: ComponentHealth::new("store"),
            catalog: ComponentHealth::new("catalog"),
        }
    }

    pub fn status(&self) -> HealthStatus {
        if !self.store.is_healthy() {
            HealthStatus::Unhealthy
        } else if !self.catalog.is_healthy() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }

    pub fn report(&self) -> HealthReport {
        HealthReport {
            status: self.status(),
            components: vec![self.store.report(), self.catalog.report()],
        }
    }

    /// Ready to take traffic once the store answers.
    pub fn is_ready(&self) -> bool {
        self.store.is_healthy()
    }

    /// The process is up if it can answer at all.
    pub fn is_alive(&self) -> bool {
        true
    }
}

impl Default for HealthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static HEALTH: std::sync::LazyLock<HealthRegistry> = std::sync::LazyLock::new(HealthRegistry::new);

/// Process-wide health registry.
pub fn health() -> &'static HealthRegistry {
    &HEALTH
}
