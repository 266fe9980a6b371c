use std::{env, time::Duration};

use url::Url;

use super::env::{
    ApiConfig, AppConfig, ClassifierConfig, ClassifierKind, ConfigError, DirectoryConfig,
    LoggingConfig,
};

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/";

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = parse_base_url(
            get("API_BASE_URL")
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE_URL),
        )?;
        let request_timeout = match get("REQUEST_TIMEOUT_MS") {
            Some(raw) => Some(Duration::from_millis(parse_u64("REQUEST_TIMEOUT_MS", &raw)?)),
            None => None,
        };

        let kind = match get("CLASSIFIER").map(|v| v.trim().to_ascii_lowercase()) {
            None => ClassifierKind::Mock,
            Some(value) => match value.as_str() {
                "mock" | "random" => ClassifierKind::Mock,
                "remote" => ClassifierKind::Remote,
                other => {
                    return Err(ConfigError::Invalid {
                        key: "CLASSIFIER",
                        value: other.to_string(),
                    })
                }
            },
        };
        let mock_latency = match get("MOCK_LATENCY_MS") {
            Some(raw) => Duration::from_millis(parse_u64("MOCK_LATENCY_MS", &raw)?),
            None => Duration::from_millis(1_500),
        };

        let directories = DirectoryConfig {
            logs_dir: get("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
            export_dir: get("EXPORT_DIR").unwrap_or_else(|| "exports".to_string()),
            export_filename: get("EXPORT_FILENAME").unwrap_or_else(|| "history.csv".to_string()),
        };

        let logging = LoggingConfig {
            level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        Ok(Self {
            api: ApiConfig {
                base_url,
                request_timeout,
            },
            classifier: ClassifierConfig { kind, mock_latency },
            directories,
            logging,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::Invalid {
        key: "API_BASE_URL",
        value: raw.to_string(),
    };
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&normalized).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(url)
}

fn parse_u64(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}
