//! services/seeder/src/bin/update_role.rs
//!
//! Sets `TARGET_USER_ID`'s role to `NEW_ROLE` and reads the user back.

use seeder_lib::{
    adapters::HttpLmsAdapter, config::Config, driver::run_update_role, error::SeederError,
    init_tracing,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), SeederError> {
    let config = Config::from_env()?;
    init_tracing(config.log_level);

    let api = HttpLmsAdapter::new(&config.base_url, config.request_timeout)?;

    tokio::select! {
        result = run_update_role(&api, &config) => {
            let change = result.map_err(|e| {
                error!("Role update failed: {}", e);
                e
            })?;
            info!(
                "{} ({}): {} -> {}",
                change.after.name.as_deref().unwrap_or("N/A"),
                change.after.email.as_deref().unwrap_or("N/A"),
                change.before.role.map_or("N/A", |r| r.as_str()),
                change.after.role.map_or("N/A", |r| r.as_str())
            );
        }
        _ = tokio::signal::ctrl_c() => warn!("Operation cancelled"),
    }
    Ok(())
}
