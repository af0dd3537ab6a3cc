use tracing_subscriber::EnvFilter;

/// Initialise logging. Defaults to `info` for this crate; override via the
/// `RUST_LOG` environment variable.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("snapstudio=info,tower_http=info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
