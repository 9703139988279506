//! Console configuration (environment variables).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::permission_source::RoleTableError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {var} '{value}': {source}")]
    InvalidBindAddr {
        var: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("invalid {var} '{value}': {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("cannot read role permissions file {path}: {source}")]
    RolePermissionsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed role permissions file {path}: {source}")]
    RolePermissionsParse {
        path: PathBuf,
        #[source]
        source: RoleTableError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Where unauthenticated view requests are redirected.
    pub login_path: String,
    /// Upper bound on the initial permission fetch of a session.
    pub session_load_timeout: Duration,
    /// Backend base URL; when set, permissions come from `{url}/auth/permissions`.
    pub backend_url: Option<String>,
    /// JSON `{ role: [tokens] }` file for the static permission source.
    pub role_permissions_path: Option<PathBuf>,
    /// Mark the session cookie `Secure`. Only disable for plain-HTTP setups.
    pub secure_cookie: bool,
}

impl ConsoleConfig {
    pub const DEV_JWT_SECRET: &'static str = "dev-secret";

    const BIND: &'static str = "COMPLAINTDESK_BIND";
    const JWT_SECRET: &'static str = "JWT_SECRET";
    const LOGIN_PATH: &'static str = "COMPLAINTDESK_LOGIN_PATH";
    const LOAD_TIMEOUT_MS: &'static str = "COMPLAINTDESK_SESSION_LOAD_TIMEOUT_MS";
    const BACKEND_URL: &'static str = "COMPLAINTDESK_BACKEND_URL";
    const ROLE_PERMISSIONS: &'static str = "COMPLAINTDESK_ROLE_PERMISSIONS";
    const SECURE_COOKIE: &'static str = "COMPLAINTDESK_SECURE_COOKIE";

    const MAX_LOAD_TIMEOUT: Duration = Duration::from_secs(600);
    const RESERVED_PATHS: &'static [&'static str] = &["/health", "/session", "/session/explain", "/nav"];

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unset or blank values take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let bind_addr = match get(Self::BIND) {
            Some(value) => value.parse().map_err(|source| ConfigError::InvalidBindAddr {
                var: Self::BIND,
                value,
                source,
            })?,
            None => defaults.bind_addr,
        };

        let login_path = get(Self::LOGIN_PATH).unwrap_or(defaults.login_path);
        if !login_path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                var: Self::LOGIN_PATH,
                value: login_path,
                reason: "must be an absolute path",
            });
        }
        if Self::RESERVED_PATHS.contains(&login_path.as_str()) || login_path.starts_with("/views/") {
            return Err(ConfigError::InvalidValue {
                var: Self::LOGIN_PATH,
                value: login_path,
                reason: "collides with a console route",
            });
        }

        let session_load_timeout = match get(Self::LOAD_TIMEOUT_MS) {
            Some(value) => {
                let ms: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    var: Self::LOAD_TIMEOUT_MS,
                    value: value.clone(),
                    reason: "expected milliseconds",
                })?;
                let timeout = Duration::from_millis(ms);
                if timeout.is_zero() || timeout > Self::MAX_LOAD_TIMEOUT {
                    return Err(ConfigError::InvalidValue {
                        var: Self::LOAD_TIMEOUT_MS,
                        value,
                        reason: "must be between 1 and 600000",
                    });
                }
                timeout
            }
            None => defaults.session_load_timeout,
        };

        let secure_cookie = match get(Self::SECURE_COOKIE) {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: Self::SECURE_COOKIE,
                        value,
                        reason: "expected true or false",
                    });
                }
            },
            None => defaults.secure_cookie,
        };

        Ok(Self {
            bind_addr,
            jwt_secret: get(Self::JWT_SECRET).unwrap_or(defaults.jwt_secret),
            login_path,
            session_load_timeout,
            backend_url: get(Self::BACKEND_URL).map(|u| u.trim_end_matches('/').to_string()),
            role_permissions_path: get(Self::ROLE_PERMISSIONS).map(PathBuf::from),
            secure_cookie,
        })
    }

    /// The load timeout as a `chrono` duration, for comparing against session timestamps.
    pub fn session_load_timeout_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_load_timeout).unwrap_or(chrono::Duration::MAX)
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: Self::DEV_JWT_SECRET.to_string(),
            login_path: "/login".to_string(),
            session_load_timeout: Duration::from_millis(5_000),
            backend_url: None,
            role_permissions_path: None,
            secure_cookie: true,
        }
    }
}
