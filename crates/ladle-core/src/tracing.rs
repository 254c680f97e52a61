use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured stdout tracing. Call once at service startup.
///
/// Emits JSON lines. Filtering honors `RUST_LOG` and falls back to `info`
/// when the variable is unset, so a bare container still logs requests.
///
/// Safe to call multiple times — subsequent calls are silently ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .try_init();
}
