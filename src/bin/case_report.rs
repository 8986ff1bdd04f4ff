//! Case Report Service — binary entrypoint.
//! `GET /` health, `POST /report` PDF generation into the configured output dir.

use anyhow::Result;
use tourist_safety_services::{
    logging, metrics::Metrics, report_router, server, ReportState, ServicesConfig,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cfg = ServicesConfig::load()?;
    logging::init_tracing(&cfg.log);
    info!(output_dir = %cfg.report.output_dir.display(), "case reports will be written here");

    let mut router = report_router(ReportState::new(cfg.report.output_dir.clone()));
    if cfg.metrics.enabled {
        router = router.merge(Metrics::init()?.router());
    }

    server::serve(router, &cfg.report.bind_addr(), "case-report").await
}
