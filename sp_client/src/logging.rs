//! Structured logging setup for the client.
//!
//! The library logs through the `log` facade; tracing-subscriber picks those
//! records up alongside the client's own `tracing` events.

use stellar_poker::{ActionOutcome, DispatchError};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels come from `RUST_LOG`; the default keeps HTTP internals quiet.
/// Output goes to stderr so it does not interleave with the table view.
///
/// # Example
///
/// ```no_run
/// use sp_client::logging;
///
/// logging::init();
/// tracing::info!("Client starting");
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::debug!("Structured logging initialized");
}

/// Record the result of a dispatched command with structured fields.
///
/// # Example
///
/// ```
/// use sp_client::logging::log_action_outcome;
/// use stellar_poker::DispatchError;
///
/// log_action_outcome(3, "fold", Err(&DispatchError::Busy));
/// ```
pub fn log_action_outcome(
    table_id: u32,
    command: &str,
    outcome: Result<&ActionOutcome, &DispatchError>,
) {
    match outcome {
        Ok(outcome) => tracing::info!(
            table_id = table_id,
            command = command,
            outcome = ?outcome,
            "Action completed"
        ),
        Err(e) if e.is_precondition() => tracing::debug!(
            table_id = table_id,
            command = command,
            error = %e,
            "Action rejected locally"
        ),
        Err(e) => tracing::warn!(
            table_id = table_id,
            command = command,
            error = %e,
            "Action failed"
        ),
    }
}
