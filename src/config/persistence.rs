//! Config file load/save and CLI-over-file resolution.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::app::cli::Args;
use crate::config::types::{AuthMode, ConnectionParams, ConnectionSettings, ToolConfig};

/// Default config location: config.json next to the executable.
fn default_config_path() -> Result<PathBuf> {
    let exe_dir = std::env::current_exe()?
        .parent()
        .ok_or_else(|| anyhow!("Cannot determine executable directory"))?
        .to_path_buf();
    Ok(exe_dir.join("config.json"))
}

/// Load the config file. An explicitly named file must exist; a missing
/// default file yields defaults. Also returns the path the config came from.
///
/// Runs before the tracing subscriber exists (the file may set the log level),
/// so the caller reports the source once logging is up.
pub async fn load_config(path: Option<&str>) -> Result<(ToolConfig, Option<PathBuf>)> {
    let (config_path, explicit) = match path {
        Some(p) => (PathBuf::from(p), true),
        None => (default_config_path()?, false),
    };

    if config_path.exists() {
        let content = tokio::fs::read_to_string(&config_path)
            .await
            .with_context(|| format!("Failed to read config: {:?}", config_path))?;
        let config: ToolConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON: {:?}", config_path))?;
        Ok((config, Some(config_path)))
    } else if explicit {
        Err(anyhow!("Config file not found: {:?}", config_path))
    } else {
        Ok((ToolConfig::default(), None))
    }
}

pub async fn save_config(config: &ToolConfig, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write config: {:?}", path))?;
    info!("Configuration saved to: {:?}", path);
    Ok(())
}

/// Merge command-line flags over the config file: flag > file > default.
pub fn merge_connection(args: &Args, file: &ConnectionSettings) -> Result<ConnectionSettings> {
    let auth = match args.auth.as_deref() {
        Some(mode) => mode.parse::<AuthMode>()?,
        None => file.auth,
    };

    Ok(ConnectionSettings {
        ip: args.ip.clone().or_else(|| file.ip.clone()),
        user: args.user.clone().or_else(|| file.user.clone()),
        passwd: args.passwd.clone().or_else(|| file.passwd.clone()),
        auth,
        cafile: args.cafile.clone().or_else(|| file.cafile.clone()),
        timeout: args.timeout.unwrap_or(file.timeout),
    })
}

/// Turn merged settings into connection params, requiring ip/user/passwd.
pub fn resolve_connection(settings: &ConnectionSettings) -> Result<ConnectionParams> {
    let required = |value: &Option<String>, name: &str| -> Result<String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Missing '{}': pass --{} or set connection.{} in the config file", name, name, name))
    };

    if settings.timeout == 0 {
        return Err(anyhow!("Invalid timeout 0: must be at least 1 second"));
    }

    Ok(ConnectionParams {
        ip: required(&settings.ip, "ip")?,
        user: required(&settings.user, "user")?,
        passwd: settings
            .passwd
            .clone()
            .ok_or_else(|| anyhow!("Missing 'passwd': pass --passwd or set connection.passwd in the config file"))?,
        auth: settings.auth,
        cafile: settings.cafile.clone().filter(|c| !c.trim().is_empty()),
        timeout: settings.timeout,
    })
}

/// Log level priority: --log-level, LOG_LEVEL env, config file, then "warn".
pub fn resolve_log_level(args: &Args, env_level: Option<String>, config: &ToolConfig) -> String {
    args.log_level
        .clone()
        .or(env_level)
        .or_else(|| config.logging.log_level.clone())
        .unwrap_or_else(|| "warn".to_string())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_settings() -> ConnectionSettings {
        ConnectionSettings {
            ip: Some("10.0.0.5".to_string()),
            user: Some("USERID".to_string()),
            passwd: Some("from-file".to_string()),
            auth: AuthMode::Basic,
            cafile: Some("/etc/bmc-ca.pem".to_string()),
            timeout: 60,
        }
    }

    #[test]
    fn cli_flags_override_file_values() {
        let args = Args {
            passwd: Some("from-cli".to_string()),
            auth: Some("session".to_string()),
            timeout: Some(5),
            ..Args::default()
        };

        let merged = merge_connection(&args, &file_settings()).unwrap();
        let params = resolve_connection(&merged).unwrap();

        assert_eq!(params.ip, "10.0.0.5");
        assert_eq!(params.passwd, "from-cli");
        assert_eq!(params.auth, AuthMode::Session);
        assert_eq!(params.cafile.as_deref(), Some("/etc/bmc-ca.pem"));
        assert_eq!(params.timeout, 5);
    }

    #[test]
    fn missing_ip_is_reported_by_name() {
        let args = Args { user: Some("u".to_string()), passwd: Some("p".to_string()), ..Args::default() };
        let merged = merge_connection(&args, &ConnectionSettings::default()).unwrap();

        let err = resolve_connection(&merged).unwrap_err();
        assert!(err.to_string().contains("'ip'"));
    }

    #[test]
    fn invalid_auth_flag_is_rejected() {
        let args = Args { auth: Some("kerberos".to_string()), ..Args::default() };
        assert!(merge_connection(&args, &ConnectionSettings::default()).is_err());
    }

    #[test]
    fn log_level_priority_is_flag_then_env_then_file() {
        let mut config = ToolConfig::default();
        config.logging.log_level = Some("ERROR".to_string());

        let flag = Args { log_level: Some("DEBUG".to_string()), ..Args::default() };
        assert_eq!(resolve_log_level(&flag, Some("info".to_string()), &config), "debug");
        assert_eq!(resolve_log_level(&Args::default(), Some("INFO".to_string()), &config), "info");
        assert_eq!(resolve_log_level(&Args::default(), None, &config), "error");
        assert_eq!(resolve_log_level(&Args::default(), None, &ToolConfig::default()), "warn");
    }

    #[tokio::test]
    async fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ToolConfig::default();
        config.connection = file_settings();
        save_config(&config, &path).await.unwrap();

        let (loaded, source) = load_config(path.to_str()).await.unwrap();
        assert_eq!(source.as_deref(), Some(path.as_path()));
        assert_eq!(loaded.connection.ip.as_deref(), Some("10.0.0.5"));
        assert_eq!(loaded.connection.auth, AuthMode::Basic);
        assert_eq!(loaded.connection.timeout, 60);
    }

    #[tokio::test]
    async fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(load_config(path.to_str()).await.is_err());
    }
}
