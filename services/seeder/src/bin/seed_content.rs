//! services/seeder/src/bin/seed_content.rs
//!
//! Seeds school-subject courses and lessons, enrolling existing test users.

use rand::rngs::StdRng;
use rand::SeedableRng;
use seeder_lib::{
    adapters::HttpLmsAdapter, cancel_on_ctrl_c, config::Config, driver::run_content_seed,
    error::SeederError, init_tracing,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), SeederError> {
    let config = Config::from_env()?;
    init_tracing(config.log_level);
    info!("Seeding content and enrollments against {}", config.base_url);

    let api = HttpLmsAdapter::new(&config.base_url, config.request_timeout)?;
    let cancel = cancel_on_ctrl_c();
    let mut rng = StdRng::from_entropy();

    let summary = run_content_seed(&api, &mut rng, &config, &cancel)
        .await
        .map_err(|e| {
            error!("Content seed aborted: {}", e);
            e
        })?;

    if summary.cancelled {
        warn!("Content seed stopped");
    }
    info!(
        "Courses created and test users enrolled: {} courses ({} failed), {} lessons",
        summary.courses_created, summary.courses_failed, summary.lessons_created
    );
    Ok(())
}
