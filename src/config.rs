use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Default ipify geolocation endpoint
pub const DEFAULT_BASE_URL: &str = "https://geo.ipify.org/api/v2/country,city";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAP_ZOOM: u8 = 13;

#[derive(Debug, Clone, Serialize)]
pub struct IpgeoConfig {
    /// API key for the geolocation service
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Lookup endpoint
    pub base_url: String,

    /// Per-request timeout in seconds (default: 10)
    pub timeout_secs: u64,

    /// Zoom level used for map links (default: 13)
    pub map_zoom: u8,
}

const EMPTY_CONFIG: &str = r#"### ipgeo configuration file

### API key for the ipify geolocation API (or set IPGEO_API_KEY)
# api_key = "at_..."

### lookup endpoint
# base_url = "https://geo.ipify.org/api/v2/country,city"

### request timeout (in seconds)
# timeout_secs = 10

### zoom level for map links (0-19)
# map_zoom = 13
"#;

impl Default for IpgeoConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            map_zoom: DEFAULT_MAP_ZOOM,
        }
    }
}

impl IpgeoConfig {
    /// Function to create and initialize a new configuration
    ///
    /// Reads the given file (or `$HOME/.ipgeo/ipgeo.toml`), writing a commented
    /// template when it does not exist yet, then applies `IPGEO_*` environment
    /// variables on top.
    pub fn new(path: &Option<String>) -> Result<IpgeoConfig> {
        let mut builder = Config::builder();

        let file_path = match path {
            Some(p) => p.clone(),
            None => {
                let dir = Self::config_dir()?;
                std::fs::create_dir_all(dir.as_str())
                    .map_err(|e| anyhow!("Unable to create ipgeo directory: {}", e))?;
                format!("{}/ipgeo.toml", dir)
            }
        };

        if Path::new(file_path.as_str()).exists() {
            builder = builder.add_source(
                config::File::with_name(file_path.as_str()).format(config::FileFormat::Toml),
            );
        } else {
            std::fs::write(file_path.as_str(), EMPTY_CONFIG).map_err(|e| {
                anyhow!("Unable to create config file {}: {}", file_path.as_str(), e)
            })?;
        }

        // E.g., `IPGEO_API_KEY=at_xxx ./ipgeo lookup 8.8.8.8` sets the API key
        builder = builder.add_source(config::Environment::with_prefix("IPGEO"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config)
    }

    fn from_map(config: &HashMap<String, String>) -> Result<IpgeoConfig> {
        let defaults = IpgeoConfig::default();

        let api_key = config
            .get("api_key")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let base_url = match config.get("base_url").map(|u| u.trim()) {
            Some(u) if u.starts_with("http://") || u.starts_with("https://") => {
                u.trim_end_matches('?').to_string()
            }
            Some(u) if !u.is_empty() => {
                return Err(anyhow!("base_url must be an http(s) URL, got '{}'", u))
            }
            _ => defaults.base_url,
        };

        let timeout_secs = config
            .get("timeout_secs")
            .and_then(|s| s.parse().ok())
            .filter(|s| *s > 0)
            .unwrap_or(defaults.timeout_secs);

        let map_zoom = config
            .get("map_zoom")
            .and_then(|s| s.parse::<u8>().ok())
            .map(|z| z.min(19))
            .unwrap_or(defaults.map_zoom);

        Ok(IpgeoConfig {
            api_key,
            base_url,
            timeout_secs,
            map_zoom,
        })
    }

    /// Request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key with all but the first four characters hidden
    pub fn masked_api_key(&self) -> String {
        match &self.api_key {
            Some(key) => {
                let visible: String = key.chars().take(4).collect();
                format!("{}****", visible)
            }
            None => "(not set)".to_string(),
        }
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        [
            format!("Config File:   {}", Self::config_file_path()),
            format!("API Key:       {}", self.masked_api_key()),
            format!("Base URL:      {}", self.base_url),
            format!("Timeout:       {} seconds", self.timeout_secs),
            format!("Map Zoom:      {}", self.map_zoom),
        ]
        .join("\n")
    }

    fn config_dir() -> Result<String> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
            .to_owned();
        Ok(format!("{}/.ipgeo", home_dir))
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.ipgeo/ipgeo.toml", home_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = IpgeoConfig::from_map(&HashMap::new()).unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.map_zoom, 13);
    }

    #[test]
    fn test_from_map() {
        let config = IpgeoConfig::from_map(&map(&[
            ("api_key", " at_secret "),
            ("base_url", "http://localhost:8080/geo?"),
            ("timeout_secs", "3"),
            ("map_zoom", "42"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("at_secret"));
        assert_eq!(config.base_url, "http://localhost:8080/geo");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.map_zoom, 19);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = IpgeoConfig::from_map(&map(&[
            ("api_key", ""),
            ("timeout_secs", "0"),
            ("map_zoom", "far"),
        ]))
        .unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.map_zoom, 13);

        assert!(IpgeoConfig::from_map(&map(&[("base_url", "ftp://example.com")])).is_err());
    }

    #[test]
    fn test_masked_api_key() {
        let config = IpgeoConfig {
            api_key: Some("at_1234567890".to_string()),
            ..Default::default()
        };
        assert_eq!(config.masked_api_key(), "at_1****");
        assert!(!config.summary().contains("567890"));
        assert_eq!(IpgeoConfig::default().masked_api_key(), "(not set)");
    }

    #[test]
    fn test_read_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ipgeo.toml");
        let contents = "base_url = \"https://example.com/api\"\ntimeout_secs = 4\n";
        std::fs::write(&path, contents).unwrap();

        let config = IpgeoConfig::new(&Some(path.to_string_lossy().to_string())).unwrap();
        assert_eq!(config.base_url, "https://example.com/api");
        assert_eq!(config.timeout_secs, 4);
    }

    #[test]
    fn test_missing_config_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.toml");

        let config = IpgeoConfig::new(&Some(path.to_string_lossy().to_string())).unwrap();
        assert!(path.exists());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("### ipgeo configuration file"));
    }
}
