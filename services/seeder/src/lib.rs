pub mod adapters;
pub mod config;
pub mod driver;
pub mod error;
pub mod report;

use tokio_util::sync::CancellationToken;
use tracing::{warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber at `level`.
pub fn init_tracing(level: Level) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Returns a token that is cancelled on the first Ctrl-C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current step");
            trigger.cancel();
        }
    });
    cancel
}
