//! Process-wide log output.
//!
//! Components emit `tracing` events and never hold a logger themselves. The
//! subscriber installed here is the only global piece; tests can swap in
//! their own with `tracing::subscriber::with_default`.
use tracing_subscriber::EnvFilter;

/// Install a text subscriber writing to stdout.
///
/// The level comes from `RUST_LOG`; when it is unset or unparseable the level
/// is `info`.
///
/// # Errors
///
/// Fails when a global subscriber is already set.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .try_init()
}
