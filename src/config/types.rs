//! Config file structs and defaults.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub connection: ConnectionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    pub ip: Option<String>,
    pub user: Option<String>,
    pub passwd: Option<String>,
    pub auth: AuthMode,
    pub cafile: Option<String>,
    pub timeout: u64, // seconds, per request
}

pub fn default_timeout() -> u64 { 30 }

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            ip: None,
            user: None,
            passwd: None,
            auth: AuthMode::default(),
            cafile: None,
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub log_level: Option<String>,
}

/// How the client authenticates against the BMC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// POST to the SessionService and send X-Auth-Token afterwards
    #[default]
    Session,
    /// HTTP Basic credentials on every request
    Basic,
}

impl FromStr for AuthMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "session" => Ok(AuthMode::Session),
            "basic" => Ok(AuthMode::Basic),
            other => Err(anyhow::anyhow!("Invalid auth mode '{}'. Valid modes: session, basic", other)),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Session => write!(f, "session"),
            AuthMode::Basic => write!(f, "basic"),
        }
    }
}

/// Fully resolved connection parameters, ready to build a client from.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub ip: String,
    pub user: String,
    pub passwd: String,
    pub auth: AuthMode,
    pub cafile: Option<String>,
    pub timeout: u64,
}

// Keep the password out of debug logs
impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("ip", &self.ip)
            .field("user", &self.user)
            .field("passwd", &"********")
            .field("auth", &self.auth)
            .field("cafile", &self.cafile)
            .field("timeout", &self.timeout)
            .finish()
    }
}
