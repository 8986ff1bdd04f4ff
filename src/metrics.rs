// src/metrics.rs
//! Prometheus exposition for request counters.
//!
//! Counters are recorded unconditionally; without an installed recorder the
//! `metrics` macros do nothing, which is what tests rely on.

use std::sync::OnceLock;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder once per process.
    pub fn init() -> Result<Self> {
        if let Some(h) = HANDLE.get() {
            return Ok(Self { handle: h.clone() });
        }
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        let handle = HANDLE.get_or_init(|| handle).clone();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// Outcome label shared by both services' counters.
pub(crate) fn outcome<T, E>(res: &std::result::Result<T, E>) -> &'static str {
    if res.is_ok() {
        "ok"
    } else {
        "error"
    }
}
