//! services/seeder/src/bin/seed.rs
//!
//! Full seed: admin, students, workshop courses with lessons and linked
//! quizzes, then simulated quiz attempts.

use rand::rngs::StdRng;
use rand::SeedableRng;
use seeder_lib::{
    adapters::HttpLmsAdapter, cancel_on_ctrl_c, config::Config, driver::run_full_seed,
    error::SeederError, init_tracing,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), SeederError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    init_tracing(config.log_level);
    info!("Full seed against {}", config.base_url);

    // --- 2. Build the Adapter ---
    let api = HttpLmsAdapter::new(&config.base_url, config.request_timeout)?;
    let cancel = cancel_on_ctrl_c();
    // Send-compatible RNG
    let mut rng = StdRng::from_entropy();

    // --- 3. Run ---
    let summary = run_full_seed(&api, &mut rng, &config, &cancel)
        .await
        .map_err(|e| {
            error!("Seed aborted: {}", e);
            e
        })?;

    if summary.cancelled {
        warn!("Seed stopped");
    }
    info!(
        "Database populated: {} courses created ({} failed), {} lessons, {} quizzes linked, {} answers submitted",
        summary.courses_created,
        summary.courses_failed,
        summary.lessons_created,
        summary.quizzes_linked,
        summary.attempts.submissions
    );
    Ok(())
}
