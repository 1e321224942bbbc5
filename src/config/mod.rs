pub mod schema;

pub use schema::{
    Config, GatewayConfig, LoggingConfig, StorageBackend, StorageConfig, UploadConfig,
    DEFAULT_ALLOWED_EXTENSIONS,
};

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// `~/.calex/config.toml`, if a home directory can be resolved.
pub fn default_config_path() -> Option<PathBuf> {
    directories::UserDirs::new().map(|dirs| dirs.home_dir().join(".calex").join("config.toml"))
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).to_string())
}

impl Config {
    /// Load from `path` (or the default location), then apply `CALEX_*`
    /// environment overrides. A missing file yields the defaults; a file that
    /// exists but does not parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(expand_path(p)),
            None => default_config_path(),
        };

        let mut config = match path.as_deref() {
            Some(p) if p.exists() => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config {}", p.display()))?;
                let parsed: Config = toml::from_str(&raw)
                    .with_context(|| format!("Failed to parse config {}", p.display()))?;
                parsed
            }
            _ => Config::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Apply `CALEX_HOST`, `CALEX_PORT`, `CALEX_DATA_DIR` and
    /// `CALEX_STORAGE_BACKEND` from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("CALEX_HOST").filter(|v| !v.trim().is_empty()) {
            self.gateway.host = host.trim().to_string();
        }
        if let Some(port) = lookup("CALEX_PORT") {
            self.gateway.port = port
                .trim()
                .parse()
                .with_context(|| format!("CALEX_PORT is not a port number: {port}"))?;
        }
        if let Some(dir) = lookup("CALEX_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            self.storage.data_dir = PathBuf::from(dir.trim());
        }
        if let Some(backend) = lookup("CALEX_STORAGE_BACKEND") {
            self.storage.backend = backend.parse().map_err(anyhow::Error::msg)?;
        }
        Ok(())
    }

    /// Expand `~` in paths and lowercase the extension allow-list.
    pub fn normalize(&mut self) {
        self.storage.data_dir = expand_path(&self.storage.data_dir);
        if let Some(file) = self.logging.file.take() {
            self.logging.file = Some(expand_path(&file));
        }
        for ext in &mut self.uploads.allowed_extensions {
            *ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        }
        self.uploads.allowed_extensions.retain(|ext| !ext.is_empty());
    }

    pub fn validate(&self) -> Result<()> {
        if self.gateway.port == 0 {
            bail!("gateway.port must be non-zero");
        }
        if self.gateway.max_upload_bytes == 0 {
            bail!("gateway.max_upload_bytes must be non-zero");
        }
        if self.uploads.allowed_extensions.is_empty() {
            bail!("uploads.allowed_extensions must list at least one extension");
        }
        if self.storage.data_dir.as_os_str().is_empty() {
            bail!("storage.data_dir must not be empty");
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
