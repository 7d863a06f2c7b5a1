use std::path::PathBuf;
use std::str::FromStr;

use axum::http::HeaderValue;
use portico_core::media::{SourceLimits, DEFAULT_MAX_SOURCE_BYTES, DEFAULT_MAX_SOURCE_DIMENSION};

/// Runtime settings, read once at start-up.
///
/// | Env var | Default |
/// |---|---|
/// | `HOST` | `0.0.0.0` |
/// | `PORT` | `3000` |
/// | `CORS_ORIGINS` | `http://localhost:5173` (comma-separated) |
/// | `REQUEST_TIMEOUT_SECS` | `30` |
/// | `MEDIA_ROOT` | `media` |
/// | `MAX_UPLOAD_BYTES` | `20971520` |
/// | `MAX_SOURCE_DIMENSION` | `10000` |
///
/// `DATABASE_URL` has no default and is read by the binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Root directory of the local blob store.
    pub media_root: PathBuf,
    /// Cap on a request body, and so on any single upload.
    pub max_upload_bytes: usize,
    /// Largest decoded width or height accepted before normalization.
    pub max_source_dimension: u32,
}

impl ServerConfig {
    /// Panics on a value that does not parse; a misconfigured server should
    /// not start.
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins: parse_origins(&env_or(
                "CORS_ORIGINS",
                "http://localhost:5173".to_string(),
            ))
            .unwrap_or_else(|bad| panic!("CORS_ORIGINS has an invalid origin '{bad}'")),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            media_root: env_or("MEDIA_ROOT", PathBuf::from("media")),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_SOURCE_BYTES),
            max_source_dimension: env_or("MAX_SOURCE_DIMENSION", DEFAULT_MAX_SOURCE_DIMENSION),
        }
    }

    /// Bounds applied to every image before it is decoded.
    pub fn source_limits(&self) -> SourceLimits {
        SourceLimits {
            max_bytes: self.max_upload_bytes,
            max_dimension: self.max_source_dimension,
        }
    }
}

fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

/// Split a comma-separated origin list. `Err` carries the first entry that
/// is not a valid header value.
fn parse_origins(raw: &str) -> Result<Vec<String>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| match HeaderValue::from_str(origin) {
            Ok(_) => Ok(origin.to_string()),
            Err(_) => Err(origin.to_string()),
        })
        .collect()
}
