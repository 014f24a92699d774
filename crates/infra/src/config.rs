//! Runtime configuration from environment variables.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

use munadmin_auth::{PasswordHasher, RoutePolicy};

use crate::access::{SessionMode, SessionSettings};

const DEV_JWT_SECRET: &str = "dev-secret";
const DEFAULT_ADMIN_LOGIN: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_SESSION_TTL_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            var,
            reason: reason.into(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub session: SessionSettings,
    pub route_policy: RoutePolicy,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub bcrypt_cost: u32,
    pub admin_login: String,
    pub admin_password: String,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("session", &self.session)
            .field("route_policy", &self.route_policy)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("admin_login", &self.admin_login)
            .field("admin_password", &"<redacted>")
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            session: SessionSettings::default(),
            route_policy: RoutePolicy::default(),
            database_url: None,
            bcrypt_cost: PasswordHasher::MIN_COST,
            admin_login: DEFAULT_ADMIN_LOGIN.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut cfg = AppConfig::default();

        if let Some(addr) = get("BIND_ADDR") {
            cfg.bind_addr = addr
                .parse()
                .map_err(|e| ConfigError::invalid("BIND_ADDR", format!("{e}")))?;
        }

        match get("JWT_SECRET") {
            Some(secret) => cfg.jwt_secret = secret,
            None => tracing::warn!("JWT_SECRET not set; using an insecure development secret"),
        }

        if let Some(ttl) = get("SESSION_TTL_SECS") {
            let secs: i64 = ttl
                .parse()
                .map_err(|e| ConfigError::invalid("SESSION_TTL_SECS", format!("{e}")))?;
            if secs <= 0 {
                return Err(ConfigError::invalid("SESSION_TTL_SECS", "must be positive"));
            }
            cfg.session.ttl = Duration::seconds(secs);
        } else {
            cfg.session.ttl = Duration::seconds(DEFAULT_SESSION_TTL_SECS);
        }

        if let Some(mode) = get("SESSION_MODE") {
            cfg.session.mode = match mode.trim().to_ascii_lowercase().as_str() {
                "snapshot" => SessionMode::Snapshot,
                "live" => SessionMode::Live,
                other => {
                    return Err(ConfigError::invalid(
                        "SESSION_MODE",
                        format!("expected 'snapshot' or 'live', got '{other}'"),
                    ));
                }
            };
        }

        if let Some(policy) = get("UNLISTED_ROUTES") {
            cfg.route_policy = match policy.trim().to_ascii_lowercase().as_str() {
                "allow" => RoutePolicy::AllowUnlisted,
                "deny" => RoutePolicy::DenyUnlisted,
                other => {
                    return Err(ConfigError::invalid(
                        "UNLISTED_ROUTES",
                        format!("expected 'allow' or 'deny', got '{other}'"),
                    ));
                }
            };
        }

        cfg.database_url = get("DATABASE_URL");

        if let Some(cost) = get("BCRYPT_COST") {
            let cost: u32 = cost
                .parse()
                .map_err(|e| ConfigError::invalid("BCRYPT_COST", format!("{e}")))?;
            cfg.bcrypt_cost = PasswordHasher::new(cost).cost();
        }

        if let Some(login) = get("ADMIN_LOGIN") {
            cfg.admin_login = login.trim().to_string();
        }
        match get("ADMIN_PASSWORD") {
            Some(password) => cfg.admin_password = password,
            None => tracing::warn!("ADMIN_PASSWORD not set; bootstrap administrator uses the default password"),
        }

        Ok(cfg)
    }

    pub fn hasher(&self) -> PasswordHasher {
        PasswordHasher::new(self.bcrypt_cost)
    }
}
