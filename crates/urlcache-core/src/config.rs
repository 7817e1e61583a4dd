use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/urlcache/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlcacheConfig {
    /// Address the HTTP surface binds to.
    pub listen_addr: String,
    /// Directory the worker stores artifacts under and the server serves `/cache/` from.
    pub cache_root: PathBuf,
    /// Executable invoked with the validated URL as its single argument.
    pub worker_path: PathBuf,
    /// Seconds the worker may run before it is killed.
    pub worker_timeout_secs: u64,
    /// Show the worker's combined output on result pages. Off by default:
    /// the transcript can leak server paths, so it is an operator opt-in.
    #[serde(default)]
    pub expose_worker_output: bool,
}

impl Default for UrlcacheConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            cache_root: PathBuf::from("/var/www/html/cache"),
            worker_path: PathBuf::from("/usr/local/libexec/urlcache-fetch"),
            worker_timeout_secs: 60,
            expose_worker_output: false,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("urlcache")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<UrlcacheConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = UrlcacheConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: UrlcacheConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = UrlcacheConfig::default();
        assert_eq!(cfg.listen_addr, "127.0.0.1:8080");
        assert_eq!(cfg.cache_root, PathBuf::from("/var/www/html/cache"));
        assert_eq!(cfg.worker_timeout_secs, 60);
        assert!(!cfg.expose_worker_output);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = UrlcacheConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: UrlcacheConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.listen_addr, cfg.listen_addr);
        assert_eq!(parsed.cache_root, cfg.cache_root);
        assert_eq!(parsed.worker_path, cfg.worker_path);
        assert_eq!(parsed.worker_timeout_secs, cfg.worker_timeout_secs);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            listen_addr = "0.0.0.0:9000"
            cache_root = "/srv/cache"
            worker_path = "/opt/fetch.sh"
            worker_timeout_secs = 15
        "#;
        let cfg: UrlcacheConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.listen_addr, "0.0.0.0:9000");
        assert_eq!(cfg.cache_root, PathBuf::from("/srv/cache"));
        assert_eq!(cfg.worker_path, PathBuf::from("/opt/fetch.sh"));
        assert_eq!(cfg.worker_timeout_secs, 15);
        assert!(!cfg.expose_worker_output);
    }

    #[test]
    fn config_toml_expose_flag() {
        let toml = r#"
            listen_addr = "127.0.0.1:8080"
            cache_root = "/srv/cache"
            worker_path = "/opt/fetch.sh"
            worker_timeout_secs = 60
            expose_worker_output = true
        "#;
        let cfg: UrlcacheConfig = toml::from_str(toml).unwrap();
        assert!(cfg.expose_worker_output);
    }
}
