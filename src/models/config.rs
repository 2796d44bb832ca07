use serde::Deserialize;

/// Configuration options for the catalog server.
///
/// Loaded from an optional `config.yaml` with environment variables taking
/// precedence (e.g. `API_KEY`, `PORT`, `DATABASE_PATH`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Static API key required on mutating calls.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// When set, internal fault details are hidden from clients.
    #[serde(default)]
    pub hardened: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_path() -> String {
    "database.db".to_string()
}

fn default_upload_path() -> String {
    "uploads/products".to_string()
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_api_key() -> String {
    "your-secret-key-12345".to_string()
}

impl ServerConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()
    }
}
