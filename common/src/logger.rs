use std::fs::OpenOptions;
use std::path::Path;

use redox_log::{OutputBuilder, RedoxLogger};

/// Default level for the terminal. Operator-facing output is printed, not logged.
pub fn output_level() -> log::LevelFilter {
    log::LevelFilter::Warn
}

pub fn file_level() -> log::LevelFilter {
    log::LevelFilter::Info
}

/// Configures logging for one tool: stderr, and optionally a file appended to across runs.
pub fn setup_logging(
    name: &str,
    output_level: log::LevelFilter,
    log_file: Option<&Path>,
    file_level: log::LevelFilter,
) {
    let mut logger = RedoxLogger::new().with_output(
        OutputBuilder::stderr()
            .with_filter(output_level) // limit global output to important info
            .with_ansi_escape_codes()
            .flush_on_newline(true)
            .build(),
    );

    if let Some(path) = log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                logger = logger.with_output(
                    OutputBuilder::with_endpoint(file)
                        .with_filter(file_level)
                        .flush_on_newline(true)
                        .build(),
                )
            }
            Err(error) => eprintln!("{name}: failed to open {}: {}", path.display(), error),
        }
    }

    logger.enable().expect("failed to set default logger");
}
