use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Used when `RUST_LOG` is unset
pub const FILE_DEFAULT_FILTER: &str = "info";
pub const STDERR_DEFAULT_FILTER: &str = "warn";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to a daily rolling file. The terminal belongs to the chat screen, so
/// nothing may be written to stderr while it is up.
///
/// Keep the returned guard alive for the life of the program or buffered
/// lines are lost.
pub fn init_file(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "smartpick.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter(FILE_DEFAULT_FILTER))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()?;

    Ok(guard)
}

/// Like [`init_file`], but a missing or unwritable log directory only costs
/// the log. The reason is printed before the chat screen takes the terminal.
pub fn init_file_or_warn(log_dir: Result<PathBuf>) -> Option<WorkerGuard> {
    match log_dir.and_then(|dir| init_file(&dir)) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: file logging disabled: {e:#}");
            None
        }
    }
}

/// Log warnings and above to stderr, for the non-interactive commands.
pub fn init_stderr() -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(STDERR_DEFAULT_FILTER))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_default_levels() {
        assert_eq!(
            EnvFilter::new(FILE_DEFAULT_FILTER).max_level_hint(),
            Some(LevelFilter::INFO)
        );
        assert_eq!(
            EnvFilter::new(STDERR_DEFAULT_FILTER).max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }

    #[test]
    fn test_unknown_log_dir_is_not_fatal() {
        let guard = init_file_or_warn(Err(anyhow!("Could not determine data directory")));
        assert!(guard.is_none());
    }

    #[test]
    fn test_unwritable_log_dir_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("logs");
        std::fs::write(&blocker, "not a directory").unwrap();

        let guard = init_file_or_warn(Ok(blocker.join("smartpick")));
        assert!(guard.is_none());
    }
}
