use crate::domain::error::DomainError;
use crate::domain::values::prompt::PromptStyle;
use crate::domain::values::retrieval_strategy::RetrievalStrategy;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Astra,
    Sqlite,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Astra => write!(f, "astra"),
            StoreBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "astra" => Ok(StoreBackend::Astra),
            "sqlite" => Ok(StoreBackend::Sqlite),
            _ => Err(format!("Unknown store backend: {s}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AstraConfig {
    pub endpoint: String,
    pub token: String,
    pub keyspace: String,
}

/// Process-wide settings, read once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub store: StoreBackend,
    pub astra: Option<AstraConfig>,
    pub collection: String,
    pub db_path: String,
    pub retrieval: RetrievalStrategy,
    pub prompt_style: PromptStyle,
    pub top_k: usize,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub chat_model: String,
    pub completion_model: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub bind: String,
    pub port: u16,
}

impl Config {
    /// Load from the process environment, after merging a `.env` file if present.
    pub fn from_env() -> Result<Self, DomainError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let openai_api_key = get("OPENAI_API_KEY")
            .ok_or_else(|| DomainError::Config("OPENAI_API_KEY is not set".into()))?;

        let astra_endpoint = get("ASTRA_ENDPOINT");
        let store = match get("DOCRAG_STORE") {
            Some(s) => s.parse().map_err(DomainError::Config)?,
            None if astra_endpoint.is_some() => StoreBackend::Astra,
            None => StoreBackend::Sqlite,
        };

        let astra = match store {
            StoreBackend::Astra => Some(AstraConfig {
                endpoint: astra_endpoint
                    .ok_or_else(|| DomainError::Config("ASTRA_ENDPOINT is not set".into()))?,
                token: get("ASTRA_DB_APPLICATION_TOKEN")
                    .ok_or_else(|| DomainError::Config("ASTRA_DB_APPLICATION_TOKEN is not set".into()))?,
                keyspace: or("ASTRA_NAMESPACE", "default_keyspace"),
            }),
            StoreBackend::Sqlite => None,
        };

        let top_k: usize = parse(&get, "DOCRAG_TOP_K", 5)?;
        let embedding_dimension: usize = parse(&get, "DOCRAG_EMBEDDING_DIMENSION", 1536)?;
        if embedding_dimension == 0 {
            return Err(DomainError::Config("DOCRAG_EMBEDDING_DIMENSION must be positive".into()));
        }

        Ok(Self {
            openai_api_key,
            openai_base_url: or("OPENAI_BASE_URL", "https://api.openai.com"),
            store,
            astra,
            collection: or("DOCRAG_COLLECTION", "co_pilot_guidance_data"),
            db_path: or("DOCRAG_DB", "./docrag.db"),
            retrieval: parse(&get, "DOCRAG_RETRIEVAL", RetrievalStrategy::default())?,
            prompt_style: parse(&get, "DOCRAG_PROMPT_STYLE", PromptStyle::default())?,
            top_k,
            embedding_model: or("DOCRAG_EMBEDDING_MODEL", "text-embedding-ada-002"),
            embedding_dimension,
            chat_model: or("DOCRAG_CHAT_MODEL", "gpt-3.5-turbo"),
            completion_model: or("DOCRAG_COMPLETION_MODEL", "gpt-3.5-turbo-instruct"),
            request_timeout: Duration::from_secs(parse(&get, "DOCRAG_TIMEOUT_SECS", 30)?),
            max_retries: parse(&get, "DOCRAG_MAX_RETRIES", 2)?,
            bind: or("DOCRAG_BIND", "0.0.0.0"),
            port: parse(&get, "PORT", 8080)?,
        })
    }
}

fn parse<T, G>(get: &G, key: &str, default: T) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| DomainError::Config(format!("{key}={raw}: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, DomainError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(config.store, StoreBackend::Sqlite);
        assert!(config.astra.is_none());
        assert_eq!(config.collection, "co_pilot_guidance_data");
        assert_eq!(config.retrieval, RetrievalStrategy::Delegated);
        assert_eq!(config.prompt_style, PromptStyle::Chat);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.embedding_dimension, 1536);
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_astra_selected_by_endpoint() {
        let config = load(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("ASTRA_ENDPOINT", "https://db.example.com"),
            ("ASTRA_DB_APPLICATION_TOKEN", "AstraCS:abc"),
            ("ASTRA_NAMESPACE", "esg"),
        ])
        .unwrap();
        assert_eq!(config.store, StoreBackend::Astra);
        let astra = config.astra.unwrap();
        assert_eq!(astra.keyspace, "esg");
        assert_eq!(astra.token, "AstraCS:abc");
    }

    #[test]
    fn test_astra_requires_token() {
        let err = load(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("DOCRAG_STORE", "astra"),
            ("ASTRA_ENDPOINT", "https://db.example.com"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("ASTRA_DB_APPLICATION_TOKEN"));
    }

    #[test]
    fn test_missing_api_key() {
        assert!(matches!(load(&[]), Err(DomainError::Config(_))));
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let config = load(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("DOCRAG_RETRIEVAL", "local"),
            ("DOCRAG_PROMPT_STYLE", "instruction"),
            ("DOCRAG_TOP_K", "2"),
            ("PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(config.retrieval, RetrievalStrategy::Local);
        assert_eq!(config.prompt_style, PromptStyle::Instruction);
        assert_eq!(config.top_k, 2);
        assert_eq!(config.port, 9000);

        let err = load(&[("OPENAI_API_KEY", "sk-test"), ("DOCRAG_TOP_K", "many")]).unwrap_err();
        assert!(err.to_string().contains("DOCRAG_TOP_K"));
        assert!(load(&[("OPENAI_API_KEY", "k"), ("DOCRAG_EMBEDDING_DIMENSION", "0")]).is_err());
    }
}
