use crate::shared::constants;
use lazy_static::lazy_static;
use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

struct LoggerPaths {
    error_path: PathBuf,
    debug_path: PathBuf,
}

lazy_static! {
    static ref LOGGER: Mutex<Option<LoggerPaths>> = Mutex::new(None);
}

fn paths() -> MutexGuard<'static, Option<LoggerPaths>> {
    match LOGGER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn append_line(path: &Path, line: &str) {
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{}", line);
    }
}

fn start_log(path: &Path, banner: &str) {
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
    {
        let _ = writeln!(file, "=== {} Started: {} ===", banner, chrono::Local::now());
    }
}

/// Starts `error.log` and `debug.log` in the working directory and installs a
/// panic hook that records crashes in `error.log`.
pub fn init() {
    init_in(&std::env::current_dir().unwrap_or_default());
}

pub fn init_in(dir: &Path) {
    let error_path = dir.join(constants::ERROR_LOG_FILE);
    let debug_path = dir.join(constants::DEBUG_LOG_FILE);

    start_log(&error_path, "Error Log");
    start_log(&debug_path, "Debug Log");

    let crash_log = error_path.clone();
    *paths() = Some(LoggerPaths {
        error_path,
        debug_path,
    });

    panic::set_hook(Box::new(move |info| {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        append_line(
            &crash_log,
            &format!("[{}][PANIC] {}\n{}", timestamp, info, Backtrace::capture()),
        );
        eprintln!("{}\nSee {} for details.", info, crash_log.display());
    }));
}

/// No-op until [`init`] has run.
pub fn log(level: &str, msg: &str) {
    if let Some(logger_paths) = paths().as_ref() {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        let line = format!("[{}][{}] {}", timestamp, level, msg);
        append_line(&logger_paths.debug_path, &line);

        if level == "ERROR" {
            append_line(&logger_paths.error_path, &line);
        }
    }
}

pub fn info(msg: &str) {
    log("INFO", msg);
}

pub fn error(msg: &str) {
    log("ERROR", msg);
}

pub fn debug(msg: &str) {
    log("DEBUG", msg);
}
