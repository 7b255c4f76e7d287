use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

// Conditional logging macros - only active in debug builds

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{}};
}

const APP_DIR: &str = "hits-and-blows";
const LOG_FILE_NAME: &str = "hits-and-blows.log";

/// `<cache dir>/hits-and-blows/hits-and-blows.log`, if the platform has a cache dir.
#[must_use]
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_DIR).join(LOG_FILE_NAME))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Routes the `log` facade to a file so output never mixes with the game screen.
///
/// `RUST_LOG` overrides the default `info` filter. When no file can be opened,
/// logs go to stderr and only warnings are shown. Returns the file in use.
pub fn init_logging(log_path: Option<PathBuf>) -> Option<PathBuf> {
    let path = log_path.or_else(default_log_path);
    let file = path.as_deref().and_then(|p| match open_log_file(p) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Cannot open log file '{}': {e}", p.display());
            None
        }
    });

    let default_filter = if file.is_some() { "info" } else { "warn" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] {}: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    let in_use = match file {
        Some(file) => {
            builder.target(Target::Pipe(Box::new(file)));
            path
        }
        None => {
            builder.target(Target::Stderr);
            None
        }
    };

    if builder.try_init().is_err() {
        debug_log!("init_logging() - logger already installed");
    }
    in_use
}
