use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::{Level, LevelFilter, Metadata, Record};

use crate::error::RetagError;

/// Splits the log stream: informational lines go to stdout as-is, warnings
/// and errors are appended to a log file with a timestamp and level. The
/// whole thing is registered through the indicatif bridge so lines printed
/// mid-run do not tear the progress bar.
struct SplitLogger {
    file: Mutex<File>,
}

impl log::Log for SplitLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if record.level() <= Level::Warn {
            let mut file = match self.file.lock() {
                Ok(file) => file,
                Err(poisoned) => poisoned.into_inner(),
            };
            let _ = writeln!(
                file,
                "{} {} {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            );
        } else {
            println!("{}", record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

pub fn init(log_path: &Path, multi: MultiProgress) -> Result<(), RetagError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|source| RetagError::LogFile {
            path: log_path.to_path_buf(),
            source,
        })?;
    let logger = SplitLogger {
        file: Mutex::new(file),
    };
    LogWrapper::new(multi, logger).try_init()?;
    log::set_max_level(LevelFilter::Info);
    Ok(())
}
