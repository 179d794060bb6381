// Typed configuration, loaded once from the environment at startup.

use std::env;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn is_development(&self) -> bool {
        self.environment != "production"
    }
}

#[derive(Debug, Clone)]
pub struct MicrosoftConfig {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct CanvasConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Application configuration assembled from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub microsoft: MicrosoftConfig,
    pub jwt: JwtConfig,
    pub canvas: CanvasConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let ttl_hours = env::var("JWT_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(24);

        Self {
            server: ServerConfig {
                port,
                environment: env_or("APP_ENV", "development"),
                cors_origins,
            },
            microsoft: MicrosoftConfig {
                client_id: env_or("MICROSOFT_CLIENT_ID", ""),
                client_secret: env_or("MICROSOFT_CLIENT_SECRET", ""),
                tenant_id: env_or("MICROSOFT_TENANT_ID", "common"),
                redirect_uri: env_or("MICROSOFT_REDIRECT_URI", ""),
            },
            jwt: JwtConfig {
                secret: env_or("JWT_SECRET", "replace_with_strong_secret"),
                ttl_hours,
            },
            canvas: CanvasConfig {
                base_url: env_or("CANVAS_BASE_URL", "https://canvas.iastate.edu"),
                api_key: env_or("CANVAS_API_KEY", ""),
            },
        }
    }
}
