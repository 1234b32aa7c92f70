use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub crm: CrmConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    #[serde(default = "default_uploads_dir")]
    pub dir: String,
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: usize,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: default_uploads_dir(),
            max_size_mb: default_max_size_mb(),
        }
    }
}

impl UploadsConfig {
    pub fn max_bytes(&self) -> usize {
        self.max_size_mb * 1024 * 1024
    }
}

/// Адреса CRM: кандидаты проверяются по порядку, `fallback` используется,
/// если ни один не ответил
#[derive(Debug, Deserialize, Clone)]
pub struct CrmConfig {
    #[serde(default)]
    pub candidates: Vec<String>,
    #[serde(default = "default_crm_url")]
    pub fallback: String,
    #[serde(default = "default_crm_timeout")]
    pub timeout_secs: u64,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            candidates: vec![default_crm_url()],
            fallback: default_crm_url(),
            timeout_secs: default_crm_timeout(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_uploads_dir() -> String {
    "uploads".into()
}

fn default_max_size_mb() -> usize {
    20
}

fn default_crm_url() -> String {
    "https://crm.pamyat-online.ru/api".into()
}

fn default_crm_timeout() -> u64 {
    5
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/app.db"

[server]
port = 3000

[uploads]
dir = "uploads"
max_size_mb = 20

[crm]
candidates = ["https://crm.pamyat-online.ru/api"]
fallback = "https://crm.pamyat-online.ru/api"
timeout_secs = 5
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    default_config()
}

pub fn default_config() -> anyhow::Result<Config> {
    Ok(toml::from_str(DEFAULT_CONFIG)?)
}

/// Resolve a configured path: absolute paths as is, relative ones next to
/// the executable, falling back to the current directory
fn resolve_path(raw: &str) -> PathBuf {
    let path = Path::new(raw);

    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    PathBuf::from(raw)
}

/// Get the database file path from configuration
pub fn get_database_path(config: &Config) -> PathBuf {
    resolve_path(&config.database.path)
}

/// Get the uploads directory from configuration
pub fn get_uploads_path(config: &Config) -> PathBuf {
    resolve_path(&config.uploads.dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = default_config().unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.uploads.max_bytes(), 20 * 1024 * 1024);
        assert_eq!(config.crm.candidates.len(), 1);
        assert_eq!(config.crm.timeout_secs, 5);
    }

    #[test]
    fn test_sections_are_optional() {
        let config: Config = toml::from_str("[database]\npath = \"/tmp/x.db\"\n").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.uploads.dir, "uploads");
        assert_eq!(config.crm.fallback, default_crm_url());
        assert_eq!(get_database_path(&config), PathBuf::from("/tmp/x.db"));
    }
}
