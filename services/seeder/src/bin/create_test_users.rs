//! services/seeder/src/bin/create_test_users.rs
//!
//! Registers `TEST_USER_COUNT` users named `test_{n}@test.com`.

use seeder_lib::{
    adapters::HttpLmsAdapter, config::Config, driver::run_create_test_users, error::SeederError,
    init_tracing,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), SeederError> {
    let config = Config::from_env()?;
    init_tracing(config.log_level);
    info!("Target: {}/auth/register", config.base_url);

    let api = HttpLmsAdapter::new(&config.base_url, config.request_timeout)?;

    tokio::select! {
        outcome = run_create_test_users(&api, &config) => {
            let created = outcome.value().map_or(0, Vec::len);
            info!("{} of {} users created", created, config.test_user_count);
        }
        _ = tokio::signal::ctrl_c() => warn!("Stopped"),
    }
    Ok(())
}
