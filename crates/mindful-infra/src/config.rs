//! Configuration loading for Mindful.
//!
//! Reads an optional `config.toml` into [`ServerConfig`], then layers
//! environment variables on top. CLI flags are applied last by the binary.
//! A missing or malformed file falls back to defaults.
//!
//! Loading runs before the tracing subscriber exists, so problems are
//! returned as warning strings for the caller to log once tracing is up.

use std::path::{Path, PathBuf};

use mindful_types::config::{CorsConfig, LogFormat, ServerConfig};

/// Name of the config file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `MINDFUL_DATA_DIR` environment variable
/// 2. Platform data directory (e.g. `~/.local/share/mindful` on Linux)
/// 3. `./.mindful`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MINDFUL_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(data) = dirs::data_dir() {
        return data.join("mindful");
    }

    PathBuf::from(".mindful")
}

/// Load configuration from `path`, with any warnings raised on the way.
///
/// - If the file does not exist, returns [`ServerConfig::default()`] and no
///   warning.
/// - If the file exists but fails to read or parse, returns the default and
///   one warning.
pub async fn load_server_config(path: &Path) -> (ServerConfig, Vec<String>) {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return (ServerConfig::default(), Vec::new());
        }
        Err(err) => {
            let warning = format!("Failed to read {}: {err}, using defaults", path.display());
            return (ServerConfig::default(), vec![warning]);
        }
    };

    match toml::from_str::<ServerConfig>(&content) {
        Ok(config) => (config, Vec::new()),
        Err(err) => {
            let warning = format!("Failed to parse {}: {err}, using defaults", path.display());
            (ServerConfig::default(), vec![warning])
        }
    }
}

/// Overlay environment variables onto `config`.
///
/// `lookup` is `std::env::var` in production; tests pass a map. Blank
/// values are ignored. Unparsable numeric or enum values are ignored and
/// reported in the returned warnings.
pub fn apply_env<F>(config: &mut ServerConfig, lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut warnings = Vec::new();
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(host) = get("HOST") {
        config.server.host = host;
    }
    if let Some(port) = get("PORT") {
        match port.trim().parse() {
            Ok(port) => config.server.port = port,
            Err(err) => warnings.push(format!("Ignoring PORT={port}: {err}")),
        }
    }

    if let Some(url) = get("DATABASE_URL") {
        config.database.url = Some(url);
    }
    if let Some(name) = get("DB_NAME") {
        config.database.name = name;
    }

    if let Some(origins) = get("CORS_ORIGINS") {
        config.cors = CorsConfig::from_list(&origins);
    }

    if let Some(base_url) = get("LLM_BASE_URL") {
        config.llm.base_url = base_url;
    }
    if let Some(model) = get("LLM_MODEL") {
        config.llm.model = model;
    }

    if let Some(format) = get("MINDFUL_LOG_FORMAT") {
        match format.parse::<LogFormat>() {
            Ok(format) => config.logging.format = format,
            Err(err) => warnings.push(format!("Ignoring MINDFUL_LOG_FORMAT: {err}")),
        }
    }
    if let Some(otel) = get("MINDFUL_OTEL") {
        config.logging.otel = matches!(otel.trim().to_lowercase().as_str(), "1" | "true" | "yes");
    }

    warnings
}

/// Database URL to open: the configured one, or `{data_dir}/{name}.db`.
pub fn database_url(config: &ServerConfig, data_dir: &Path) -> String {
    match &config.database.url {
        Some(url) => url.clone(),
        None => crate::sqlite::pool::database_url_for(data_dir, &config.database.name),
    }
}
