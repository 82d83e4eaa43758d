//! Logging setup shared by the CLI and the Android library entry point.
//!
//! Library code logs through `tracing` and `log` macros; this module only
//! installs a subscriber. Safe to call more than once.

use once_cell::sync::OnceCell;

/// Environment variable holding the tracing filter directive
pub const LOG_ENV: &str = "IMU_FILTER_LOG";

static LOGGING: OnceCell<()> = OnceCell::new();

/// Install the platform subscriber once
#[cfg(target_os = "android")]
pub fn init_logging() {
    use tracing_subscriber::prelude::*;

    LOGGING.get_or_init(|| {
        let layer = match tracing_android::layer("ImuFilterCore") {
            Ok(layer) => layer,
            Err(err) => {
                eprintln!("[Logging] tracing-android layer unavailable: {}", err);
                return;
            }
        };
        let _ = tracing_subscriber::registry().with(layer).try_init();
        log::info!("[Logging] Android tracing layer installed");
    });
}

/// Install the platform subscriber once
#[cfg(not(target_os = "android"))]
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    LOGGING.get_or_init(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
