use flexi_logger::{Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle};

/// Starts logging to `logs/` and the console. `RUST_LOG` overrides
/// `base_level`. Logging stops when the returned handle is dropped.
pub fn setup_logging(base_level: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(base_level)?
        .log_to_file(FileSpec::default().directory("logs"))
        .duplicate_to_stderr(Duplicate::Warn)
        .duplicate_to_stdout(Duplicate::All)
        .rotate(
            flexi_logger::Criterion::Size(1024 * 1024), //1MB
            flexi_logger::Naming::Timestamps,
            flexi_logger::Cleanup::KeepLogFiles(5),
        )
        .start()
}
