use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

use crate::database::store::UnauthenticatedAccess;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Header carrying the bearer token. Compared case-insensitively.
    pub token_header: String,
    /// Expected scheme prefix inside the header value.
    pub token_scheme: String,
    pub jwt_secret: String,
    pub leeway_seconds: u64,
    pub jwt_expiry_hours: u64,
    /// Paths that bypass authentication entirely, matched by exact path.
    pub exempt_paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
    /// Storage behavior when no authenticated requester is available.
    pub unauthenticated_access: UnauthenticatedAccess,
    pub enable_rate_limiting: bool,
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs = v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_IDLE_TIMEOUT_SECS") {
            self.database.idle_timeout_secs = v.parse().unwrap_or(self.database.idle_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_MAX_LIFETIME_SECS") {
            self.database.max_lifetime_secs = v.parse().unwrap_or(self.database.max_lifetime_secs);
        }

        // Auth overrides
        if let Ok(v) = env::var("AUTH_TOKEN_HEADER") {
            self.auth.token_header = v;
        }
        if let Ok(v) = env::var("AUTH_TOKEN_SCHEME") {
            self.auth.token_scheme = v;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.auth.jwt_secret = v;
        }
        if let Ok(v) = env::var("AUTH_LEEWAY_SECONDS") {
            self.auth.leeway_seconds = v.parse().unwrap_or(self.auth.leeway_seconds);
        }
        if let Ok(v) = env::var("AUTH_JWT_EXPIRY_HOURS") {
            self.auth.jwt_expiry_hours = v.parse().unwrap_or(self.auth.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("AUTH_EXEMPT_PATHS") {
            self.auth.exempt_paths = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_UNAUTHENTICATED_ACCESS") {
            self.security.unauthenticated_access = match v.to_ascii_lowercase().as_str() {
                "unfiltered" => UnauthenticatedAccess::Unfiltered,
                _ => UnauthenticatedAccess::Reject,
            };
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_RATE_LIMITING") {
            self.security.enable_rate_limiting = v.parse().unwrap_or(self.security.enable_rate_limiting);
        }
        if let Ok(v) = env::var("SECURITY_RATE_LIMIT_REQUESTS") {
            self.security.rate_limit_requests = v.parse().unwrap_or(self.security.rate_limit_requests);
        }
        if let Ok(v) = env::var("SECURITY_RATE_LIMIT_WINDOW_SECS") {
            self.security.rate_limit_window_secs = v.parse().unwrap_or(self.security.rate_limit_window_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                acquire_timeout_secs: 30,
                idle_timeout_secs: 300,
                max_lifetime_secs: 1800,
            },
            auth: AuthConfig {
                token_header: "Authorization".to_string(),
                token_scheme: "Bearer".to_string(),
                jwt_secret: "secret".to_string(),
                leeway_seconds: 30,
                jwt_expiry_hours: 24 * 7, // 1 week
                exempt_paths: vec!["/health".to_string(), "/signin".to_string()],
            },
            security: SecurityConfig {
                cors_origins: vec!["*".to_string()],
                unauthenticated_access: UnauthenticatedAccess::Reject,
                enable_rate_limiting: false,
                rate_limit_requests: 1000,
                rate_limit_window_secs: 60,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                acquire_timeout_secs: 10,
                idle_timeout_secs: 300,
                max_lifetime_secs: 1800,
            },
            auth: AuthConfig {
                token_header: "Authorization".to_string(),
                token_scheme: "Bearer".to_string(),
                // Must be supplied through JWT_SECRET
                jwt_secret: String::new(),
                leeway_seconds: 30,
                jwt_expiry_hours: 24,
                exempt_paths: vec!["/health".to_string(), "/signin".to_string()],
            },
            security: SecurityConfig {
                cors_origins: vec!["https://staging.example.com".to_string()],
                unauthenticated_access: UnauthenticatedAccess::Reject,
                enable_rate_limiting: true,
                rate_limit_requests: 100,
                rate_limit_window_secs: 60,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                acquire_timeout_secs: 5,
                idle_timeout_secs: 300,
                max_lifetime_secs: 1800,
            },
            auth: AuthConfig {
                token_header: "Authorization".to_string(),
                token_scheme: "Bearer".to_string(),
                // Must be supplied through JWT_SECRET
                jwt_secret: String::new(),
                leeway_seconds: 30,
                jwt_expiry_hours: 4,
                exempt_paths: vec!["/health".to_string(), "/signin".to_string()],
            },
            security: SecurityConfig {
                cors_origins: vec!["https://app.example.com".to_string()],
                unauthenticated_access: UnauthenticatedAccess::Reject,
                enable_rate_limiting: true,
                rate_limit_requests: 60,
                rate_limit_window_secs: 60,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
