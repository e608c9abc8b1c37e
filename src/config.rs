//! Command-line and environment configuration, read once at startup.
//!
use clap::Parser;
use std::path::PathBuf;

/// Employee API used when neither `--base-url` nor `EMPLOYEE_API_BASE` is set.
pub const DEFAULT_BASE_URL: &str =
    "https://ooxs5x5f8f.execute-api.ap-south-1.amazonaws.com/employeeapi";

#[derive(Parser, Debug, Clone)]
#[command(name = "employee-tui", version, about = "Browse and edit employee records over a REST API")]
pub struct Config {
    /// Origin and path prefix of the employee API.
    #[arg(long, env = "EMPLOYEE_API_BASE", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Theme file (`key = #RRGGBB` lines).
    #[arg(long, env = "EMPLOYEE_TUI_THEME")]
    pub theme: Option<PathBuf>,

    /// Keybinding overrides (`Action = Key` lines).
    #[arg(long, env = "EMPLOYEE_TUI_KEYMAP")]
    pub keymap: Option<PathBuf>,

    /// Write logs to this file. Nothing is logged without it.
    #[arg(long, env = "EMPLOYEE_TUI_LOG")]
    pub log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Load the employee table right after start.
    #[arg(long)]
    pub autoload: bool,
}

/// Route `tracing` output to `config.log_file`, if one is configured.
///
/// The terminal belongs to the UI, so there is no stderr fallback.
pub fn init_logging(config: &Config) -> crate::Result<()> {
    use crate::error::Context;
    use tracing_subscriber::EnvFilter;

    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| crate::error::simple_error(format!("install log subscriber: {e}")))?;
    Ok(())
}
