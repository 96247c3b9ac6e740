use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use autohop::config::{load_config, validate_config, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref()).context("failed to load configuration")?;
    validate_config(&config).context("invalid configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting autohop v{}", env!("CARGO_PKG_VERSION"));

    run(config).await
}

#[cfg(not(windows))]
async fn run(_config: Config) -> Result<()> {
    anyhow::bail!("autohop only supports Windows targets");
}

#[cfg(windows)]
async fn run(config: Config) -> Result<()> {
    use autohop::hop::{PollConfig, PollLoop};
    use autohop::input::KeyState;
    use autohop::memory::SafeMemoryAccess;
    use autohop::process::attach;

    let attached = attach(&config.target.process_name, &config.target.module_name)
        .with_context(|| format!("failed to attach to {}", config.target.process_name))?;
    let poll_config = PollConfig::resolve(&config, attached.module.base_address)?;

    let access = SafeMemoryAccess::new(&attached.handle);
    let input = KeyState::new(i32::from(config.control.key));
    let poll = PollLoop::new(access, input, poll_config);

    info!("autohop ready. Hold the control key to engage, Ctrl+C to exit.");
    let stats = poll
        .run_until_signal(tokio::signal::ctrl_c())
        .await
        .context("failed to listen for Ctrl+C")?;

    info!(ticks = stats.ticks, "Shutting down autohop");
    Ok(())
}
