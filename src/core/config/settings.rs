//! Typed view over the merged YAML configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    Keyword,
    Embedding,
}

impl RetrievalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalMode::Keyword => "keyword",
            RetrievalMode::Embedding => "embedding",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSource {
    #[serde(rename = "openweathermap")]
    OpenWeatherMap,
    Simulated,
}

impl WeatherSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherSource::OpenWeatherMap => "openweathermap",
            WeatherSource::Simulated => "simulated",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub retrieval: RetrievalSettings,
    pub embedding: EmbeddingSettings,
    pub weather: WeatherSettings,
    pub http: HttpSettings,
    pub chat: ChatSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub mode: RetrievalMode,
    /// Defaults to 3 for keyword retrieval and 2 for embedding retrieval.
    pub top_k: Option<usize>,
    pub knowledge_base_path: Option<String>,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            mode: RetrievalMode::Keyword,
            top_k: None,
            knowledge_base_path: None,
        }
    }
}

impl RetrievalSettings {
    pub fn effective_top_k(&self) -> usize {
        self.top_k.unwrap_or(match self.mode {
            RetrievalMode::Keyword => 3,
            RetrievalMode::Embedding => 2,
        })
    }

    pub fn effective_knowledge_base_path(&self) -> &str {
        match &self.knowledge_base_path {
            Some(path) => path,
            None => match self.mode {
                RetrievalMode::Keyword => "knowledge_base_local.json",
                RetrievalMode::Embedding => "knowledge_base_embeddings.json",
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "text-embedding-3-small".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    pub provider: WeatherSource,
    pub base_url: String,
    pub api_key: Option<String>,
    pub country: String,
    pub default_city: String,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            provider: WeatherSource::OpenWeatherMap,
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            api_key: None,
            country: "IN".to_string(),
            default_city: "Delhi".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub retry_backoff_ms: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            retry_backoff_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub max_message_chars: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            max_message_chars: 2000,
        }
    }
}

impl Settings {
    /// Environment variables win over file values; blank values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(port) = lookup("PORT").and_then(|value| value.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.embedding.api_key = Some(key);
        }
        if let Some(key) = lookup("OPENWEATHER_API_KEY") {
            self.weather.api_key = Some(key);
        }
    }
}
