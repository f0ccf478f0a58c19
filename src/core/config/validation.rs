use serde_json::{Map, Value};

use super::ConfigError;

pub fn validate_config(config: &Value) -> Result<(), ConfigError> {
    let root = config
        .as_object()
        .ok_or_else(|| config_type_error("root", "object"))?;

    if let Some(server) = expect_optional_object(root, "server")? {
        validate_optional_string_field(server, "server.host", "host")?;
        validate_u64_field(server, "server.port", "port", 0, 65_535)?;
        validate_string_array_field(
            server,
            "server.cors_allowed_origins",
            "cors_allowed_origins",
        )?;
    }

    if let Some(retrieval) = expect_optional_object(root, "retrieval")? {
        validate_enum_field(
            retrieval,
            "retrieval.mode",
            "mode",
            &["keyword", "embedding"],
        )?;
        validate_u64_field(retrieval, "retrieval.top_k", "top_k", 1, 50)?;
        validate_optional_string_field(
            retrieval,
            "retrieval.knowledge_base_path",
            "knowledge_base_path",
        )?;
    }

    if let Some(embedding) = expect_optional_object(root, "embedding")? {
        validate_optional_string_field(embedding, "embedding.base_url", "base_url")?;
        validate_optional_string_field(embedding, "embedding.model", "model")?;
        validate_optional_string_field(embedding, "embedding.api_key", "api_key")?;
    }

    if let Some(weather) = expect_optional_object(root, "weather")? {
        validate_enum_field(
            weather,
            "weather.provider",
            "provider",
            &["openweathermap", "simulated"],
        )?;
        validate_optional_string_field(weather, "weather.base_url", "base_url")?;
        validate_optional_string_field(weather, "weather.api_key", "api_key")?;
        validate_optional_string_field(weather, "weather.country", "country")?;
        validate_optional_string_field(weather, "weather.default_city", "default_city")?;
    }

    if let Some(http) = expect_optional_object(root, "http")? {
        validate_u64_field(http, "http.timeout_secs", "timeout_secs", 1, 300)?;
        validate_u64_field(http, "http.retry_backoff_ms", "retry_backoff_ms", 0, 60_000)?;
    }

    if let Some(chat) = expect_optional_object(root, "chat")? {
        validate_u64_field(
            chat,
            "chat.max_message_chars",
            "max_message_chars",
            1,
            100_000,
        )?;
    }

    Ok(())
}

fn expect_optional_object<'a>(
    root: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, ConfigError> {
    match root.get(key) {
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(config_type_error(key, "object")),
    }
}

fn validate_u64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: u64,
    max: u64,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(number) = value.as_u64() else {
        return Err(config_type_error(path, "integer"));
    };
    if number < min || number > max {
        return Err(ConfigError::Invalid {
            path: path.to_string(),
            reason: format!("must be between {} and {}", min, max),
        });
    }
    Ok(())
}

fn validate_enum_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    allowed: &[&str],
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(text) = value.as_str() else {
        return Err(config_type_error(path, "string"));
    };
    if !allowed.contains(&text) {
        return Err(ConfigError::Invalid {
            path: path.to_string(),
            reason: format!("expected one of {}", allowed.join(", ")),
        });
    }
    Ok(())
}

fn validate_optional_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    if value.is_null() || value.as_str().is_some() {
        return Ok(());
    }
    Err(config_type_error(path, "string"))
}

fn validate_string_array_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(items) = value.as_array() else {
        return Err(config_type_error(path, "array of strings"));
    };
    for (index, item) in items.iter().enumerate() {
        let Some(text) = item.as_str() else {
            return Err(config_type_error(&format!("{}[{}]", path, index), "string"));
        };
        if text.trim().is_empty() {
            return Err(ConfigError::Invalid {
                path: format!("{}[{}]", path, index),
                reason: "value cannot be empty".to_string(),
            });
        }
    }
    Ok(())
}

fn config_type_error(path: &str, expected: &str) -> ConfigError {
    ConfigError::Invalid {
        path: path.to_string(),
        reason: format!("expected {}", expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_a_complete_config() {
        let config = json!({
            "server": { "host": "0.0.0.0", "port": 5000, "cors_allowed_origins": ["http://localhost:5173"] },
            "retrieval": { "mode": "embedding", "top_k": 2, "knowledge_base_path": "kb.json" },
            "embedding": { "model": "text-embedding-3-small", "api_key": null },
            "weather": { "provider": "simulated", "default_city": "Delhi" },
            "http": { "timeout_secs": 10, "retry_backoff_ms": 250 },
            "chat": { "max_message_chars": 2000 }
        });
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_unknown_retrieval_mode() {
        let config = json!({ "retrieval": { "mode": "fuzzy" } });
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("retrieval.mode"));
    }

    #[test]
    fn rejects_out_of_range_top_k() {
        let config = json!({ "retrieval": { "top_k": 0 } });
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_non_object_sections() {
        let config = json!({ "weather": "simulated" });
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("expected object"));
    }
}
