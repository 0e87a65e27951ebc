// Properties-file configuration for the fixed-model server variant
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

pub const MODEL_NAME_KEY: &str = "MODEL_NAME";
pub const SERVER_URL_KEY: &str = "SERVER_URL";
pub const RUN_MODEL_ENDPOINT_SQL_KEY: &str = "RUN_MODEL_ENDPOINT_SQL";

/// Flat `key = value` configuration, read once at startup and immutable
/// afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    fn parse(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (number, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::Malformed {
                path: origin.to_string(),
                line: number + 1,
            })?;
            values.insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Missing required keys are fatal at startup, not lazily.
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "MODEL_NAME = demo\nSERVER_URL = 0.0.0.0:5000\nRUN_MODEL_ENDPOINT_SQL = run-model-sql\n";

    #[test]
    fn parses_required_keys_with_trimmed_values() {
        let config = Config::parse(SAMPLE, "test").unwrap();
        assert_eq!(config.len(), 3);
        assert_eq!(config.require(MODEL_NAME_KEY).unwrap(), "demo");
        assert_eq!(config.require(SERVER_URL_KEY).unwrap(), "0.0.0.0:5000");
        assert_eq!(
            config.require(RUN_MODEL_ENDPOINT_SQL_KEY).unwrap(),
            "run-model-sql"
        );
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let config = Config::parse("# a comment\n\n! another\nKEY = value\n", "test").unwrap();
        assert_eq!(config.len(), 1);
        assert_eq!(config.get("KEY"), Some("value"));
    }

    #[test]
    fn value_may_contain_equals_sign() {
        let config = Config::parse("QUERY = a=b\n", "test").unwrap();
        assert_eq!(config.get("QUERY"), Some("a=b"));
    }

    #[test]
    fn rejects_line_without_separator() {
        let err = Config::parse("MODEL_NAME demo\n", "test").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { line: 1, .. }));
    }

    #[test]
    fn missing_required_key_is_an_error() {
        let config = Config::parse("MODEL_NAME = demo\n", "test").unwrap();
        let err = config.require(SERVER_URL_KEY).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(key) if key == SERVER_URL_KEY));
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.require(MODEL_NAME_KEY).unwrap(), "demo");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::from_file(Path::new("/nonexistent/nl2sql.properties")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
