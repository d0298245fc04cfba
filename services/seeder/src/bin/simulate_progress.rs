//! services/seeder/src/bin/simulate_progress.rs
//!
//! Marks random lessons complete for the numbered test students.

use rand::rngs::StdRng;
use rand::SeedableRng;
use seeder_lib::{
    adapters::HttpLmsAdapter, cancel_on_ctrl_c, config::Config, driver::run_progress,
    error::SeederError, init_tracing,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), SeederError> {
    let config = Config::from_env()?;
    init_tracing(config.log_level);
    info!("Simulating student progress against {}", config.base_url);

    let api = HttpLmsAdapter::new(&config.base_url, config.request_timeout)?;
    let cancel = cancel_on_ctrl_c();
    let mut rng = StdRng::from_entropy();

    let report = run_progress(&api, &mut rng, &config, &cancel).await;

    info!(
        "{} students processed, {} skipped, {} courses visited, {}/{} lessons marked complete",
        report.students_processed,
        report.students_skipped,
        report.courses_visited,
        report.lessons_marked,
        report.lessons_seen
    );
    Ok(())
}
