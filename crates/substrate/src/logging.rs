//! Structured logging setup, grounded on
//! `cortex-observability::tracing_setup`'s span-per-operation convention:
//! `substrate.memory`, `substrate.concepts`, `substrate.prompts`,
//! `substrate.scheduler`, `substrate.embedding`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

/// Install a JSON-formatted subscriber writing to `data_dir/logs`, honoring
/// `RUST_LOG` (defaulting to `info`). The returned guard must be held for
/// the process lifetime — dropping it stops the non-blocking writer.
pub fn init(data_dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(data_dir)?;
    let file_appender = tracing_appender::rolling::daily(data_dir, "substrate.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // try_init rather than init: a second `Substrate::open` in the same
    // process (tests, multi-instance hosts) must not panic on an
    // already-installed global subscriber.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .json()
        .try_init();

    Ok(guard)
}

pub mod spans {
    pub const MEMORY: &str = "substrate.memory";
    pub const CONCEPTS: &str = "substrate.concepts";
    pub const PROMPTS: &str = "substrate.prompts";
    pub const SCHEDULER: &str = "substrate.scheduler";
    pub const EMBEDDING: &str = "substrate.embedding";
}
