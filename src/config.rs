use crate::keyboard::StatePaths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_KEYS: [&str; 3] = ["binds_file", "default_binds_file", "output_file"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub binds_file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_binds_file: Option<PathBuf>,
    pub output_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|dir| dir.join("keybind"))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::in_dir(&data_dir)
    }
}

impl Config {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            binds_file: dir.join("binds.json"),
            default_binds_file: None,
            output_file: dir.join("output.txt"),
        }
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&get_config_file_path()?)
    }

    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::load() {
            Ok(config) => Ok(config),
            Err(ConfigError::ConfigNotFound) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::ConfigNotFound);
        }

        let content = fs::read_to_string(config_path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&get_config_file_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content = toml::to_string(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(config_path, content)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "binds_file" => Ok(self.binds_file.display().to_string()),
            "default_binds_file" => Ok(self
                .default_binds_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()),
            "output_file" => Ok(self.output_file.display().to_string()),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    // An empty value clears default_binds_file.
    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        match key {
            "binds_file" => self.binds_file = PathBuf::from(value),
            "default_binds_file" => {
                self.default_binds_file = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "output_file" => self.output_file = PathBuf::from(value),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn state_paths(&self) -> StatePaths {
        StatePaths {
            binds_file: self.binds_file.clone(),
            default_binds_file: self.default_binds_file.clone(),
        }
    }

    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        for path in [&self.binds_file, &self.output_file] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteError(e.to_string()))?;
            }
        }
        Ok(())
    }
}

fn get_config_file_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?;

    Ok(config_dir.join("keybind").join("config.toml"))
}

#[derive(Debug)]
pub enum ConfigError {
    ConfigNotFound,
    ConfigDirNotFound,
    UnknownKey(String),
    ReadError(String),
    WriteError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound => {
                write!(f, "Configuration not found. Run 'keybind config set <key> <value>' to create one.")
            }
            ConfigError::ConfigDirNotFound => {
                write!(f, "Could not find config directory")
            }
            ConfigError::UnknownKey(key) => {
                write!(f, "Unknown configuration key '{}'. Supported keys: {}", key, CONFIG_KEYS.join(", "))
            }
            ConfigError::ReadError(msg) => {
                write!(f, "Failed to read config file: {}", msg)
            }
            ConfigError::WriteError(msg) => {
                write!(f, "Failed to write config file: {}", msg)
            }
            ConfigError::ParseError(msg) => {
                write!(f, "Failed to parse config file: {}", msg)
            }
            ConfigError::SerializeError(msg) => {
                write!(f, "Failed to serialize config: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::in_dir(dir.path());
        config.default_binds_file = Some(dir.path().join("defaults.json"));

        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_default_binds_file_is_optional() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "binds_file = \"/tmp/b.json\"\noutput_file = \"/tmp/o.txt\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.binds_file, PathBuf::from("/tmp/b.json"));
        assert_eq!(config.default_binds_file, None);
    }

    #[test]
    fn test_missing_and_malformed_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        assert!(matches!(Config::load_from(&path), Err(ConfigError::ConfigNotFound)));

        fs::write(&path, "binds_file = [").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_get_and_set() {
        let mut config = Config::in_dir(Path::new("/data"));

        config.set("output_file", "/logs/out.txt".to_string()).unwrap();
        config.set("default_binds_file", "/etc/defaults.json".to_string()).unwrap();
        assert_eq!(config.get("output_file").unwrap(), "/logs/out.txt");
        assert_eq!(config.get("default_binds_file").unwrap(), "/etc/defaults.json");

        config.set("default_binds_file", String::new()).unwrap();
        assert_eq!(config.default_binds_file, None);

        assert!(matches!(config.set("colour", "red".to_string()), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(config.get("colour"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn test_state_paths() {
        let config = Config::in_dir(Path::new("/data"));
        let paths = config.state_paths();

        assert_eq!(paths.binds_file, PathBuf::from("/data/binds.json"));
        assert_eq!(paths.default_binds_file, None);
    }
}
