// src/logging.rs
//! Tracing setup shared by both binaries.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogFormat, LogSection};

/// Install the global subscriber. `RUST_LOG` wins over the configured directive.
/// A second call (tests, or two services in one process) is a no-op.
pub fn init_tracing(cfg: &LogSection) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.default_directive.as_str()));

    let registry = tracing_subscriber::registry().with(filter);
    let res = match cfg.format {
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_does_not_panic() {
        let cfg = LogSection::default();
        init_tracing(&cfg);
        init_tracing(&LogSection {
            format: LogFormat::Json,
            ..cfg
        });
    }
}
