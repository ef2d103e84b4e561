use std::path::PathBuf;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub api_base: String,
    pub chat_model: String,
    pub temperature: f32,
    pub embedding_model: String,
    pub embedding_dimension: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitterConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalConfig {
    pub k: usize,
    pub fetch_k: usize,
    pub lambda: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub max_sessions: usize,
    pub idle_ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai: OpenAiConfig,
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub port: u16,
    pub splitter: SplitterConfig,
    pub retrieval: RetrievalConfig,
    pub memory_window: usize,
    pub sessions: SessionConfig,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k: 3,
            fetch_k: 5,
            lambda: 0.5,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 1000,
            idle_ttl_minutes: 24 * 60,
        }
    }
}

impl AppConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let openai = OpenAiConfig {
            api_key,
            api_base: get("OPENAI_API_BASE")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
                .trim_end_matches('/')
                .to_string(),
            chat_model: get("CHAT_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            temperature: parse_or(&get, "CHAT_TEMPERATURE", 0.0)?,
            embedding_model: get("EMBEDDING_MODEL")
                .unwrap_or_else(|| "text-embedding-ada-002".to_string()),
            embedding_dimension: parse_or(&get, "EMBEDDING_DIMENSION", 1536)?,
        };

        let defaults = SplitterConfig::default();
        let splitter = SplitterConfig {
            chunk_size: parse_or(&get, "CHUNK_SIZE", defaults.chunk_size)?,
            chunk_overlap: parse_or(&get, "CHUNK_OVERLAP", defaults.chunk_overlap)?,
        };

        let defaults = RetrievalConfig::default();
        let retrieval = RetrievalConfig {
            k: parse_or(&get, "RETRIEVAL_K", defaults.k)?,
            fetch_k: parse_or(&get, "RETRIEVAL_FETCH_K", defaults.fetch_k)?,
            lambda: parse_or(&get, "MMR_LAMBDA", defaults.lambda)?,
        };

        let defaults = SessionConfig::default();
        let sessions = SessionConfig {
            max_sessions: parse_or(&get, "MAX_SESSIONS", defaults.max_sessions)?,
            idle_ttl_minutes: parse_or(&get, "SESSION_IDLE_TTL_MINUTES", defaults.idle_ttl_minutes)?,
        };

        let config = Self {
            openai,
            database_url,
            upload_dir: PathBuf::from(get("UPLOAD_DIR").unwrap_or_else(|| "./uploads".to_string())),
            port: parse_or(&get, "PORT", 3000)?,
            splitter,
            retrieval,
            memory_window: parse_or(&get, "MEMORY_WINDOW", 5)?,
            sessions,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.splitter.chunk_size == 0 {
            return Err(ConfigError::Invalid("CHUNK_SIZE must be positive".to_string()));
        }
        if self.splitter.chunk_overlap >= self.splitter.chunk_size {
            return Err(ConfigError::Invalid(
                "CHUNK_OVERLAP must be smaller than CHUNK_SIZE".to_string(),
            ));
        }
        if self.retrieval.k == 0 {
            return Err(ConfigError::Invalid("RETRIEVAL_K must be at least 1".to_string()));
        }
        if self.retrieval.fetch_k < self.retrieval.k {
            return Err(ConfigError::Invalid(
                "RETRIEVAL_FETCH_K must not be smaller than RETRIEVAL_K".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.retrieval.lambda) {
            return Err(ConfigError::Invalid(
                "MMR_LAMBDA must be between 0 and 1".to_string(),
            ));
        }
        if self.sessions.max_sessions == 0 {
            return Err(ConfigError::Invalid("MAX_SESSIONS must be positive".to_string()));
        }
        if self.sessions.idle_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "SESSION_IDLE_TTL_MINUTES must be positive".to_string(),
            ));
        }
        if self.openai.embedding_dimension == 0 {
            return Err(ConfigError::Invalid(
                "EMBEDDING_DIMENSION must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
            key,
            value: raw,
        }),
        None => Ok(default),
    }
}
