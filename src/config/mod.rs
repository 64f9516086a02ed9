use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Upper bound on the Auth Gate's external verification call.
    pub verify_timeout_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment defaults first, specific env vars override.
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("ATTEND_API_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }

        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("AUTH_VERIFY_TIMEOUT_MS") {
            self.security.verify_timeout_ms = v.parse().unwrap_or(self.security.verify_timeout_ms);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: "dev-only-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                verify_timeout_ms: 5_000,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(), // must come from JWT_SECRET
                jwt_expiry_hours: 24,
                verify_timeout_ms: 2_000,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(), // must come from JWT_SECRET
                jwt_expiry_hours: 4,
                verify_timeout_ms: 2_000,
            },
        }
    }

    pub fn verify_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.security.verify_timeout_ms)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 3000);
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.security.verify_timeout_ms, 5_000);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.jwt_expiry_hours, 4);
    }
}
