//! Safety Score Service — binary entrypoint.
//! `GET /` health, `POST /calculate` scoring.

use anyhow::Result;
use tourist_safety_services::{logging, metrics::Metrics, score_router, server, ServicesConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let cfg = ServicesConfig::load()?;
    logging::init_tracing(&cfg.log);

    let mut router = score_router();
    if cfg.metrics.enabled {
        router = router.merge(Metrics::init()?.router());
    }

    server::serve(router, &cfg.score.bind_addr(), "safety-score").await
}
