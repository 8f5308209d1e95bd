use anyhow::{Context, Result};
use drill::config::Config;
use env_logger::{Env, Target};
use std::fs::OpenOptions;

/// Send log records to the configured file; RUST_LOG overrides the level
pub fn init(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("Failed to open log file: {}", config.log_path.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .try_init()?;

    Ok(())
}
