use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Secret used when `JWT_SECRET_KEY` is not set. Only suitable for local development.
pub const DEV_JWT_SECRET: &str = "your-secret-key-change-in-production";

const DEFAULT_CORS_PORTS: [u16; 6] = [3000, 3001, 5173, 5174, 8080, 8081];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// Base URL of the category/budget service, without a trailing slash.
    pub upstream_base_url: String,
    pub upstream_timeout: Duration,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET_KEY") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET_KEY is not set, falling back to the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        Self {
            host: env::var("ANALYTICS_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8003),
            database_path: env::var("ANALYTICS_DATABASE_URL")
                .map(|v| {
                    PathBuf::from(
                        v.strip_prefix("sqlite://")
                            .or_else(|| v.strip_prefix("sqlite:"))
                            .unwrap_or(&v),
                    )
                })
                .unwrap_or_else(|_| PathBuf::from("data/analytics.db")),
            upstream_base_url: normalize_base_url(
                &env::var("CATEGORY_BUDGET_URL")
                    .unwrap_or_else(|_| "http://localhost:8002".into()),
            ),
            upstream_timeout: Duration::from_secs(
                env::var("UPSTREAM_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8),
            ),
            jwt_secret,
            cors_origins: env::var("CORS_ORIGINS")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| parse_origins(&v))
                .unwrap_or_else(default_cors_origins),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

pub fn default_cors_origins() -> Vec<String> {
    ["localhost", "127.0.0.1"]
        .iter()
        .flat_map(|host| {
            DEFAULT_CORS_PORTS
                .iter()
                .map(move |port| format!("http://{}:{}", host, port))
        })
        .collect()
}
