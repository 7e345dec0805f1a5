pub mod directories;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::Endpoint;
use crate::domain::BoundingBox;

pub use directories::{AttributeField, Directory, DirectoryConfig, NameFallback};

const USER_AGENT: &str = concat!("poi-harvest/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("config file not found: {0:?}")]
    NotFound(PathBuf),
}

/// Optional overrides read from a TOML file
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    #[serde(default)]
    pub overpass: Option<OverpassConfig>,
}

fn default_overpass_urls() -> Vec<String> {
    vec![
        "https://overpass.kumi.systems/api/interpreter".to_string(),
        "https://overpass-api.de/api/interpreter".to_string(),
        "https://maps.mail.ru/osm/tools/overpass/api/interpreter".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_server_timeout_secs() -> u32 {
    25
}

fn default_pause_ms() -> u64 {
    2000
}

fn default_insecure_tls() -> bool {
    true
}

fn default_user_agent() -> String {
    USER_AGENT.to_string()
}

/// Overpass access policy shared by every category of a run
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OverpassConfig {
    /// Mirrors in priority order
    #[serde(default = "default_overpass_urls")]
    pub urls: Vec<String>,
    /// Client-side bound on one request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// `[timeout:N]` sent inside the query
    #[serde(default = "default_server_timeout_secs")]
    pub server_timeout_secs: u32,
    /// Pause between the end of one category query and the start of the next
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
    /// Skip certificate validation. Some public mirrors serve broken chains.
    #[serde(default = "default_insecure_tls")]
    pub insecure_tls: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            urls: default_overpass_urls(),
            timeout_secs: default_timeout_secs(),
            server_timeout_secs: default_server_timeout_secs(),
            pause_ms: default_pause_ms(),
            insecure_tls: default_insecure_tls(),
            user_agent: default_user_agent(),
        }
    }
}

impl OverpassConfig {
    pub fn endpoints(&self) -> Vec<Endpoint> {
        Endpoint::ranked(&self.urls)
    }

    /// Apply command-line overrides on top of the file or default values.
    /// `secure` only ever turns certificate validation on.
    pub fn with_overrides(mut self, pause_ms: Option<u64>, secure: bool) -> Self {
        if let Some(pause_ms) = pause_ms {
            self.pause_ms = pause_ms;
        }
        if secure {
            self.insecure_tls = false;
        }
        self
    }
}

impl FileConfig {
    /// Read an explicitly named config file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// First parseable config file from the usual locations
    pub fn load() -> Option<Self> {
        Self::load_from(&get_config_paths())
    }

    fn load_from(paths: &[PathBuf]) -> Option<Self> {
        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::from_path(path) {
                Ok(config) => return Some(config),
                Err(e) => log::warn!("Skipping config file: {}", e),
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("poi-harvest.toml"));
    paths.push(PathBuf::from(".poi-harvest.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("poi-harvest").join("config.toml"));
        paths.push(config_dir.join("poi-harvest.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".poi-harvest.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_overpass_defaults() {
        let config = OverpassConfig::default();
        assert_eq!(config.urls.len(), 3);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.pause_ms, 2000);
        assert!(config.insecure_tls);

        let endpoints = config.endpoints();
        assert_eq!(endpoints[0].priority, 0);
        assert_eq!(endpoints[2].url, config.urls[2]);
    }

    #[test]
    fn test_cli_overrides() {
        let config = OverpassConfig::default().with_overrides(None, true);
        assert!(!config.insecure_tls);
        assert_eq!(config.pause_ms, 2000);

        let config = OverpassConfig::default().with_overrides(Some(250), false);
        assert!(config.insecure_tls);
        assert_eq!(config.pause_ms, 250);

        // Without --secure a file that already validates certificates keeps doing so
        let from_file = OverpassConfig {
            insecure_tls: false,
            ..Default::default()
        };
        assert!(!from_file.with_overrides(None, false).insecure_tls);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [overpass]
            urls = ["https://example.org/api/interpreter"]
            insecure_tls = false
            "#,
        )
        .unwrap();

        let overpass = config.overpass.unwrap();
        assert_eq!(overpass.urls, vec!["https://example.org/api/interpreter"]);
        assert!(!overpass.insecure_tls);
        assert_eq!(overpass.timeout_secs, 30);
        assert!(config.bbox.is_none());
    }

    #[test]
    fn test_from_path_reads_bbox() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[bbox]\nnorth = 45.80\nsouth = 45.70\neast = 4.90\nwest = 4.78"
        )
        .unwrap();

        let config = FileConfig::from_path(file.path()).unwrap();
        let bbox = config.bbox.unwrap();
        assert_eq!(bbox.north(), 45.80);
        assert_eq!(bbox.west(), 4.78);
    }

    #[test]
    fn test_from_path_errors() {
        let missing = FileConfig::from_path(Path::new("/definitely/not/here.toml"));
        assert!(matches!(missing, Err(ConfigError::NotFound(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[bbox]\nnorth = 1.0\nsouth = 2.0\neast = 1.0\nwest = 0.0").unwrap();
        let inverted = FileConfig::from_path(file.path());
        assert!(matches!(inverted, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&broken, "this is = = not toml").unwrap();
        std::fs::write(&good, "[overpass]\npause_ms = 10").unwrap();

        let config = FileConfig::load_from(&[dir.path().join("absent.toml"), broken, good]).unwrap();
        assert_eq!(config.overpass.unwrap().pause_ms, 10);
    }
}
