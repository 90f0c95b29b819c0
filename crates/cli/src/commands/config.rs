use serde_json::json;

use stocky_core::config::{AppConfig, LoadOptions};

const REDACTED: &str = "***redacted***";

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("configuration issue: {error}"),
    };

    let payload = json!({
        "database": {
            "url": config.database.url,
            "max_connections": config.database.max_connections,
            "timeout_secs": config.database.timeout_secs,
        },
        "llm": {
            "api_key": config.llm.api_key.as_ref().map(|_| REDACTED),
            "base_url": config.llm.base_url,
            "model": config.llm.model,
            "timeout_secs": config.llm.timeout_secs,
        },
        "agent": {
            "max_iterations": config.agent.max_iterations,
        },
        "logging": {
            "level": config.logging.level,
            "format": config.logging.format,
        },
    });

    serde_json::to_string_pretty(&payload)
        .unwrap_or_else(|_| r#"{"status":"serialization_error"}"#.to_string())
}
