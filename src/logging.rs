use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

use crate::error::{CliqueError, Result};

/** log level for a verbosity count (-v flags) */
pub fn level_filter(verbosity:u64, quiet:bool) -> LevelFilter {
    if quiet { return LevelFilter::OFF; }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/**
installs the global subscriber: compact logs on stderr and, if log_file is
given, full logs (with thread ids, to follow the workers) in that file.
*/
pub fn setup_logging(verbosity:u64, quiet:bool, log_file:Option<&Path>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    let subscriber = tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(stderr_layer);
    match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| CliqueError::io(path, e))?;
            let file_layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_thread_ids(true)
                .with_thread_names(true);
            subscriber.with(file_layer).init();
        },
        None => subscriber.init(),
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::OFF);
    }

    #[test]
    fn test_invalid_log_file() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be opened as a log file
        let res = setup_logging(0, false, Some(dir.path()));
        assert!(matches!(res, Err(CliqueError::Io { .. })));
    }
}
