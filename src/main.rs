use anyhow::{Context, Result};
use std::io::{self, IsTerminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hbnb_console::{Console, ConsoleSettings, FileStorage, VERSION};

fn main() -> Result<()> {
    let settings = ConsoleSettings::load().context("failed to load console settings")?;
    init_logging(&settings.log_level);
    info!(version = VERSION, "hbnb console starting");

    // 1. Storage: reload whatever a previous session saved
    let mut storage = FileStorage::new(settings.file_path.clone());
    let loaded = storage
        .reload()
        .with_context(|| format!("failed to reload {}", settings.file_path.display()))?;
    info!(path = %settings.file_path.display(), objects = loaded, "storage ready");

    // 2. Console: prompt only when a person is typing
    let stdin = io::stdin();
    let prompt = stdin.is_terminal().then_some(settings.prompt.as_str());

    let mut console = Console::new(storage);
    console
        .run(stdin.lock(), io::stdout().lock(), prompt)
        .context("console I/O failed")?;

    Ok(())
}

/// Logs go to stderr so they never mix with command output
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
