use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::auth::Credentials;

pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_ROW_LIMIT: usize = 100;
pub const DEFAULT_WINDOW_DAYS: u32 = 7;
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;

/// Contents of `hrdesk.toml`. Every field is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HrConfig {
    pub database: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub session_ttl_minutes: Option<i64>,
    pub row_limit: Option<usize>,
    pub window_days: Option<u32>,
    pub seed_demo: Option<bool>,
}

/// Config with defaults filled in
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database: PathBuf,
    pub port: u16,
    pub credentials: Credentials,
    pub session_ttl: chrono::Duration,
    pub row_limit: usize,
    pub window_days: u32,
    pub seed_demo: bool,
}

impl Settings {
    pub fn resolve(config: Option<&HrConfig>) -> Self {
        let config = config.cloned().unwrap_or_default();
        let defaults = Credentials::default();
        Self {
            database: config
                .database
                .map(PathBuf::from)
                .unwrap_or_else(default_database_path),
            port: config.port.unwrap_or(DEFAULT_PORT),
            credentials: Credentials::new(
                config.username.unwrap_or(defaults.username),
                config.password.unwrap_or(defaults.password),
            ),
            session_ttl: chrono::Duration::minutes(
                config
                    .session_ttl_minutes
                    .filter(|m| *m > 0)
                    .unwrap_or(DEFAULT_SESSION_TTL_MINUTES),
            ),
            row_limit: config.row_limit.unwrap_or(DEFAULT_ROW_LIMIT),
            window_days: config.window_days.unwrap_or(DEFAULT_WINDOW_DAYS),
            seed_demo: config.seed_demo.unwrap_or(true),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(None)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("hrdesk.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("hrdesk.db")
}

/// Template written by `hrdesk config`
pub fn default_config() -> HrConfig {
    HrConfig {
        database: Some(default_database_path().display().to_string()),
        port: Some(DEFAULT_PORT),
        username: Some(Credentials::default().username),
        password: Some(Credentials::default().password),
        session_ttl_minutes: Some(DEFAULT_SESSION_TTL_MINUTES),
        row_limit: Some(DEFAULT_ROW_LIMIT),
        window_days: Some(DEFAULT_WINDOW_DAYS),
        seed_demo: Some(true),
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<HrConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: HrConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &HrConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.credentials, Credentials::default());
        assert_eq!(settings.session_ttl, chrono::Duration::minutes(60));
        assert!(settings.seed_demo);
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hrdesk.toml");
        let mut config = default_config();
        config.port = Some(9000);
        config.session_ttl_minutes = Some(-5);
        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        let settings = Settings::resolve(Some(&loaded));
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.session_ttl, chrono::Duration::minutes(DEFAULT_SESSION_TTL_MINUTES));
    }

    #[test]
    fn test_partial_config() {
        let config: HrConfig = toml::from_str("database = \"data/hr.db\"\nseed_demo = false\n").unwrap();
        let settings = Settings::resolve(Some(&config));
        assert_eq!(settings.database, PathBuf::from("data/hr.db"));
        assert!(!settings.seed_demo);
        assert_eq!(settings.row_limit, DEFAULT_ROW_LIMIT);
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).unwrap().is_none());
    }

    #[test]
    fn test_ensure_db_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("hr.db");
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().exists());
    }
}
