//! services/seeder/src/bin/list_users.rs
//!
//! Prints every user as detail blocks, as a table and as role statistics.
//! Writes an export file when `USERS_EXPORT_PATH` is set.

use seeder_lib::{
    adapters::HttpLmsAdapter,
    config::Config,
    driver::run_list_users,
    error::SeederError,
    init_tracing,
    report::{export_users, render_details, render_role_stats, render_table},
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), SeederError> {
    let config = Config::from_env()?;
    init_tracing(config.log_level);

    let api = HttpLmsAdapter::new(&config.base_url, config.request_timeout)?;

    let users = tokio::select! {
        result = run_list_users(&api, &config) => result.map_err(|e| {
            error!("Failed to retrieve users list: {}", e);
            e
        })?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Operation cancelled");
            return Ok(());
        }
    };

    println!("{}", render_details(&users));
    println!("{}", render_table(&users));
    println!("{}", render_role_stats(&users));

    if let Some(path) = &config.users_export_path {
        export_users(&users, path)?;
        info!("Users list saved to {}", path.display());
    }

    info!("Successfully retrieved {} user(s)", users.len());
    Ok(())
}
