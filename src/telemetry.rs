//! Tracing initialisation for the binary.

use std::path::Path;
use tracing_subscriber::EnvFilter;

pub const DEBUG_LOG_PATH: &str = "/tmp/crowdseq-debug.log";

/// Install the global subscriber.
///
/// With `debug`, everything at `debug` and above goes to [`DEBUG_LOG_PATH`]
/// without colours. Otherwise logs go to stderr, filtered by `RUST_LOG`
/// (default `info`).
pub fn init(debug: bool) -> anyhow::Result<()> {
    if debug {
        init_file(Path::new(DEBUG_LOG_PATH))?;
        tracing::info!("crowdseq debug log started, tail -f {DEBUG_LOG_PATH}");
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter("info"))
            .init();
    }
    Ok(())
}

fn init_file(path: &Path) -> anyhow::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(env_filter("debug"))
        .init();
    Ok(())
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(default))
}
