//! services/seeder/src/bin/bulk_quizzes.rs
//!
//! Creates test quizzes for the courses in `BULK_COURSE_IDS` and simulates
//! attempts by the users in `BULK_USER_IDS`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use seeder_lib::{
    adapters::HttpLmsAdapter, cancel_on_ctrl_c, config::Config, driver::run_bulk_quizzes,
    error::SeederError, init_tracing,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), SeederError> {
    let config = Config::from_env()?;
    init_tracing(config.log_level);

    let api = HttpLmsAdapter::new(&config.base_url, config.request_timeout)?;
    let cancel = cancel_on_ctrl_c();
    let mut rng = StdRng::from_entropy();

    let summary = run_bulk_quizzes(&api, &mut rng, &config, &cancel)
        .await
        .map_err(|e| {
            error!("Bulk quiz run aborted: {}", e);
            e
        })?;

    if summary.cancelled {
        warn!("Bulk quiz run stopped");
    }
    info!(
        "{} quizzes created ({} failed), {} attempts, {} answers submitted ({} failed)",
        summary.quizzes_created,
        summary.quizzes_failed,
        summary.attempts.attempts,
        summary.attempts.submissions,
        summary.attempts.failed_submissions
    );
    Ok(())
}
