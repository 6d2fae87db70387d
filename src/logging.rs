use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SITESTYLES_LOG";
const DEFAULT_FILTER: &str = "info";

/// Installs the global fmt subscriber. Safe to call more than once.
///
/// The filter comes from `SITESTYLES_LOG`, then `RUST_LOG`, then `info`.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
