use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::info;

use taskdesk_domain::DomainError;
use taskdesk_infrastructure::http::Session;

/// Environment variable that takes precedence over the stored session token
pub const TOKEN_ENV: &str = "TASKDESK_TOKEN";

const APP_DIR_NAME: &str = "taskdesk";
const CONFIG_FILE: &str = "config.json";
const SESSION_FILE: &str = "session.json";

/// Log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 1,
    Warn = 2,
    #[default]
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            5 => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(DomainError::InvalidInput(format!("Unknown log level: {}", other))),
        }
    }
}

/// Persistent configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub log_level: LogLevel,
}

/// File-backed settings and sign-in session
pub struct ConfigService {
    log_level: Arc<AtomicU8>,
    config_dir: PathBuf,
}

impl ConfigService {
    /// Use the platform config directory (`~/.config/taskdesk` on Linux).
    pub fn new() -> Result<Self> {
        let base = dirs::config_dir().context("Failed to get config dir")?;
        Self::with_dir(base.join(APP_DIR_NAME))
    }

    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();
        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config dir {:?}", config_dir))?;

        let service = Self {
            log_level: Arc::new(AtomicU8::new(LogLevel::Info as u8)),
            config_dir,
        };

        let config = service.load_config();
        service
            .log_level
            .store(config.log_level as u8, Ordering::Relaxed);

        Ok(service)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn log_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }

    fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    fn session_path(&self) -> PathBuf {
        self.config_dir.join(SESSION_FILE)
    }

    /// Stored config, or defaults when the file is missing or unreadable.
    pub fn load_config(&self) -> AppConfig {
        let path = self.config_path();
        if !path.exists() {
            return AppConfig::default();
        }

        match std::fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(serde_json::from_str::<AppConfig>(&content)?))
        {
            Ok(config) => config,
            Err(e) => {
                log::warn!("[config] ignoring unreadable {:?}: {}", path, e);
                AppConfig::default()
            }
        }
    }

    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(self.config_path(), content)
            .with_context(|| format!("Failed to write {:?}", self.config_path()))?;

        self.log_level
            .store(config.log_level as u8, Ordering::Relaxed);
        Ok(())
    }

    pub fn get_log_level(&self) -> LogLevel {
        LogLevel::from_u8(self.log_level.load(Ordering::Relaxed))
    }

    /// Takes effect on the next start.
    pub fn set_log_level(&self, level: LogLevel) -> Result<()> {
        info!("Changing log level to: {}", level.as_str());
        let config = AppConfig {
            log_level: level,
            ..self.load_config()
        };
        self.save_config(&config)
    }

    pub fn set_api_base_url(&self, api_base_url: Option<String>) -> Result<()> {
        let config = AppConfig {
            api_base_url,
            ..self.load_config()
        };
        self.save_config(&config)
    }

    pub fn save_session(&self, session: &Session) -> Result<()> {
        let path = self.session_path();
        let content = serde_json::to_string_pretty(session)?;
        write_private(&path, content.as_bytes())
            .with_context(|| format!("Failed to write {:?}", path))?;

        info!("Session saved to: {:?}", path);
        Ok(())
    }

    pub fn load_session(&self) -> Result<Option<Session>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let session = serde_json::from_str::<Session>(&content)
            .with_context(|| format!("Corrupt session file {:?}", path))?;
        Ok(Some(session))
    }

    /// Returns `true` when a stored session was removed.
    pub fn clear_session(&self) -> Result<bool> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(false);
        }

        std::fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
        info!("Session cleared: {:?}", path);
        Ok(true)
    }

    /// Bearer token to use: `TASKDESK_TOKEN` first, then the stored session.
    pub fn resolve_token(&self) -> Result<Option<String>> {
        self.resolve_token_from(std::env::var(TOKEN_ENV).ok())
    }

    /// [`ConfigService::resolve_token`] with the environment value supplied.
    pub fn resolve_token_from(&self, from_env: Option<String>) -> Result<Option<String>> {
        Ok(pick_token(from_env, self.load_session()?))
    }
}

fn pick_token(from_env: Option<String>, stored: Option<Session>) -> Option<String> {
    from_env
        .filter(|t| !t.trim().is_empty())
        .or_else(|| stored.map(|s| s.token))
        .filter(|t| !t.is_empty())
}

/// Session files are created owner-only; an existing file is tightened
/// before it is overwritten.
#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    if path.exists() {
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdesk_infrastructure::http::UserProfile;

    fn session(token: &str) -> Session {
        Session {
            token: token.to_string(),
            user: UserProfile {
                name: Some("Asha".to_string()),
                ..UserProfile::default()
            },
        }
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::from_u8(1), LogLevel::Error);
        assert_eq!(LogLevel::from_u8(3), LogLevel::Info);
        assert_eq!(LogLevel::from_u8(5), LogLevel::Trace);
        assert_eq!(LogLevel::from_u8(99), LogLevel::Info);
    }

    #[test]
    fn test_log_level_string() {
        assert_eq!(LogLevel::Error.as_str(), "error");
        assert_eq!(LogLevel::Info.as_str(), "info");
        assert_eq!(LogLevel::Trace.as_str(), "trace");
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!(matches!(
            "loud".parse::<LogLevel>(),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::with_dir(dir.path()).unwrap();

        assert_eq!(service.load_config(), AppConfig::default());
        assert_eq!(service.get_log_level(), LogLevel::Info);
        assert_eq!(service.log_dir(), dir.path().join("logs"));
    }

    #[test]
    fn test_config_round_trips_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::with_dir(dir.path()).unwrap();

        service.set_log_level(LogLevel::Debug).unwrap();
        service
            .set_api_base_url(Some("http://localhost:4000/api".to_string()))
            .unwrap();

        let reopened = ConfigService::with_dir(dir.path()).unwrap();
        assert_eq!(reopened.get_log_level(), LogLevel::Debug);
        assert_eq!(
            reopened.load_config().api_base_url.as_deref(),
            Some("http://localhost:4000/api")
        );
    }

    #[test]
    fn test_corrupt_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();

        let service = ConfigService::with_dir(dir.path()).unwrap();
        assert_eq!(service.load_config(), AppConfig::default());
    }

    #[test]
    fn test_session_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::with_dir(dir.path()).unwrap();

        assert_eq!(service.load_session().unwrap(), None);

        service.save_session(&session("jwt-1")).unwrap();
        let loaded = service.load_session().unwrap().unwrap();
        assert_eq!(loaded.token, "jwt-1");
        assert_eq!(loaded.user.name.as_deref(), Some("Asha"));

        assert!(service.clear_session().unwrap());
        assert!(!service.clear_session().unwrap());
        assert_eq!(service.load_session().unwrap(), None);
    }

    #[test]
    fn test_env_token_takes_precedence() {
        assert_eq!(
            pick_token(Some("from-env".to_string()), Some(session("stored"))),
            Some("from-env".to_string())
        );
        assert_eq!(
            pick_token(Some("  ".to_string()), Some(session("stored"))),
            Some("stored".to_string())
        );
        assert_eq!(pick_token(None, Some(session(""))), None);
        assert_eq!(pick_token(None, None), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let config = ConfigService::with_dir(dir.path()).unwrap();
        let path = dir.path().join(SESSION_FILE);

        config.save_session(&session("first")).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        config.save_session(&session("second")).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(config.load_session().unwrap().unwrap().token, "second");
    }

    #[test]
    fn test_resolve_token_from_injected_env() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigService::with_dir(dir.path()).unwrap();

        assert_eq!(config.resolve_token_from(None).unwrap(), None);

        config.save_session(&session("stored")).unwrap();
        assert_eq!(config.resolve_token_from(None).unwrap().as_deref(), Some("stored"));
        assert_eq!(
            config
                .resolve_token_from(Some("from-env".to_string()))
                .unwrap()
                .as_deref(),
            Some("from-env")
        );
    }
}
