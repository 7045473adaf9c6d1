//! Logging bootstrap.

/// Initialize env_logger once; later calls are no-ops.
pub fn init() {
    let _ = env_logger::builder().format_timestamp_millis().try_init();
}
