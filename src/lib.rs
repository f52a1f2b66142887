pub mod fetch;
pub mod output;
pub mod pages;
pub mod parser;
pub mod pipeline;
pub mod settings;

/// Route `tracing` output to stderr, honouring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
