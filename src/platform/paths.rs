use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "LINTPAD_DATA_DIR";

/// Resolves the directory holding persisted configuration and presets.
///
/// Priority:
/// 1. LINTPAD_DATA_DIR environment variable
/// 2. {platform data dir}/lintpad (e.g. ~/.local/share/lintpad)
/// 3. ~/.lintpad, or ./.lintpad when no home directory is known
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }

    dirs::data_dir()
        .map(|dir| dir.join("lintpad"))
        .or_else(|| dirs::home_dir().map(|home| home.join(".lintpad")))
        .unwrap_or_else(|| PathBuf::from(".lintpad"))
}

/// Directory for log files, under the data directory.
pub fn log_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_dir_nests_under_data_dir() {
        let data = PathBuf::from("/tmp/lintpad-data");
        assert_eq!(log_dir(&data), PathBuf::from("/tmp/lintpad-data/logs"));
    }

    #[test]
    fn data_dir_is_never_empty() {
        assert!(!resolve_data_dir().as_os_str().is_empty());
    }
}
