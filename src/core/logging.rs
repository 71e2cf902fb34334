//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable, e.g. `RUST_LOG=rktri_ocean=debug`
/// to see per-frame timings.
///
/// # Example
/// ```
/// rktri_ocean::core::logging::init();
/// log::info!("Ocean baking started");
/// ```
pub fn init() {
    // Hosts may have installed a logger already
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .format_timestamp_millis()
    .try_init();
}
