//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    /// Adapter with no sections; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_sections() {
        let content = r#"
[storage]
path = /var/lib/quantis/tickers.db

[screener]
refresh_interval_ms = 500
window_capacity = 120

[market]
source = synthetic
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("storage", "path"),
            Some("/var/lib/quantis/tickers.db".to_string())
        );
        assert_eq!(adapter.get_int("screener", "refresh_interval_ms", 0), 500);
        assert_eq!(adapter.get_int("screener", "window_capacity", 0), 120);
        assert_eq!(
            adapter.get_string("market", "source"),
            Some("synthetic".to_string())
        );
    }

    #[test]
    fn empty_adapter_returns_defaults() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("storage", "path"), None);
        assert_eq!(adapter.get_int("screener", "window_capacity", 60), 60);
        assert!(adapter.get_bool("screener", "color", true));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[storage]\npath = q.db\n").unwrap();
        assert_eq!(adapter.get_string("storage", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "path"), None);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[screener]\nwindow_capacity = lots\n").unwrap();
        assert_eq!(adapter.get_int("screener", "window_capacity", 60), 60);
    }

    #[test]
    fn get_bool_accepts_common_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[screener]\na = true\nb = yes\nc = 1\nd = false\ne = no\nf = 0\ng = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("screener", "a", false));
        assert!(adapter.get_bool("screener", "b", false));
        assert!(adapter.get_bool("screener", "c", false));
        assert!(!adapter.get_bool("screener", "d", true));
        assert!(!adapter.get_bool("screener", "e", true));
        assert!(!adapter.get_bool("screener", "f", true));
        assert!(adapter.get_bool("screener", "g", true));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[export]\npath = /tmp/snapshot.csv\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("export", "path"),
            Some("/tmp/snapshot.csv".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/quantis.ini");
        assert!(result.is_err());
    }
}
