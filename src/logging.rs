use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::platform::paths;
use crate::settings::Settings;

const MAX_LOG_BYTES: u64 = 1_048_576;
const KEPT_GENERATIONS: usize = 5;

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs go to this file instead of stderr.
    pub log_file: Option<PathBuf>,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_file: None,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            level: settings.log_level.clone(),
            ..Self::default()
        }
    }

    /// Routes output to `{data_dir}/logs/lintpad.log`.
    pub fn with_file_in(mut self, data_dir: &Path) -> Self {
        self.log_file = Some(paths::log_dir(data_dir).join("lintpad.log"));
        self
    }
}

/// Installs the global `tracing` subscriber.
///
/// Calling this again after a subscriber is installed is a no-op.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = match &config.log_file {
        Some(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            rotate_if_needed(path);
            let file = RotatingFile::open(path, MAX_LOG_BYTES)?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        }
        None => None,
    };

    let stderr_layer = config.log_file.is_none().then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(config.with_ansi)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}

/// Append-only log file that rotates itself once the next write would take
/// it past `max_bytes`.
struct RotatingFile {
    path: PathBuf,
    file: File,
    len: u64,
    max_bytes: u64,
}

impl RotatingFile {
    fn open(path: &Path, max_bytes: u64) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            file,
            len,
            max_bytes,
        })
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        shift_generations(&self.path);
        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        self.len = self.file.metadata()?.len();
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // A single record larger than the limit still lands in a fresh file.
        if self.len > 0 && self.len + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let written = self.file.write(buf)?;
        self.len += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Shifts `x.log` -> `x.1.log` -> ... once `x.log` grows past 1MB, keeping
/// the last five generations.
fn rotate_if_needed(path: &Path) {
    let Ok(metadata) = fs::metadata(path) else {
        return;
    };
    if metadata.len() > MAX_LOG_BYTES {
        shift_generations(path);
    }
}

fn shift_generations(path: &Path) {
    for i in (1..KEPT_GENERATIONS).rev() {
        let _ = fs::rename(generation(path, i), generation(path, i + 1));
    }
    let _ = fs::rename(path, generation(path, 1));
}

fn generation(path: &Path, index: usize) -> PathBuf {
    path.with_extension(format!("{}.log", index))
}
