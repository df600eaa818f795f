//! Bot configuration, flattened into the key-value store at startup.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

const CONFIG_FILE: &str = "noye.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub nickname: String,
    pub username: String,
    pub server: String,
    pub channels: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nickname: "noye".to_string(),
            username: "noye".to_string(),
            server: "localhost:6667".to_string(),
            channels: vec!["#noye".to_string()],
        }
    }
}

impl Config {
    /// Reads `noye.json` from the working directory, falling back to the
    /// defaults when the file is absent or unparsable.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    fn load_from(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable config, using defaults");
                Self::default()
            }
        }
    }

    /// Flattens every field to a string, ready to copy into the store.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("nickname".to_string(), self.nickname.clone()),
            ("username".to_string(), self.username.clone()),
            ("server".to_string(), self.server.clone()),
            ("channels".to_string(), self.channels.join(",")),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn map_flattens_every_field() {
        let config = Config::default();
        let map = config.to_map();
        assert_eq!(map.get("nickname").map(String::as_str), Some("noye"));
        assert_eq!(map.get("username").map(String::as_str), Some("noye"));
        assert_eq!(
            map.get("server").map(String::as_str),
            Some("localhost:6667")
        );
        assert_eq!(map.get("channels").map(String::as_str), Some("#noye"));
    }

    #[test]
    fn missing_or_broken_files_fall_back_to_defaults() {
        let missing = Config::load_from(Path::new("does-not-exist.json"));
        assert_eq!(missing.nickname, "noye");

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{ not json").expect("write");
        let broken = Config::load_from(file.path());
        assert_eq!(broken.nickname, "noye");
    }

    #[test]
    fn partial_files_keep_defaults_for_the_rest() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"nickname": "other"}}"#).expect("write");
        let config = Config::load_from(file.path());
        assert_eq!(config.nickname, "other");
        assert_eq!(config.server, "localhost:6667");
    }
}
