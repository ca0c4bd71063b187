use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Load environment variables from .env files
///
/// Priority order (highest to lowest):
/// 1. Environment variables already set
/// 2. Current directory .env
/// 3. ~/.tunegraph/.env
///
/// dotenvy never overwrites a variable that is already set, so loading the
/// nearer file first gives it precedence.
pub fn load_dotenv() -> Result<()> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(format!("current directory ({})", path.display()));
        debug!("Loaded .env from current directory: {}", path.display());
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(_) => {
                    loaded_from.push(format!("~/.tunegraph/.env ({})", env_file.display()));
                    debug!("Loaded .env from ~/.tunegraph: {}", env_file.display());
                }
                Err(e) => {
                    debug!("Failed to load ~/.tunegraph/.env: {}", e);
                }
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.tunegraph)");
    } else {
        info!("Loaded environment from: {}", loaded_from.join(", "));
    }

    Ok(())
}

/// Get the tunegraph config directory path (~/.tunegraph)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tunegraph"))
}

// ============================================================================
// TOML Configuration
// ============================================================================

/// tunegraph TOML configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TunegraphConfig {
    #[serde(default)]
    pub neo4j: Neo4jConfig,
}

/// Connection settings for the Neo4j store
#[derive(Clone, Serialize, Deserialize)]
pub struct Neo4jConfig {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Database name; the server default when unset
    #[serde(default)]
    pub database: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: String::new(),
            database: None,
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

impl fmt::Debug for Neo4jConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neo4jConfig")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("fetch_size", &self.fetch_size)
            .finish()
    }
}

// Default value functions for serde
fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> usize {
    10
}

fn default_fetch_size() -> usize {
    200
}

impl TunegraphConfig {
    /// Load config from TOML files and the environment
    ///
    /// Priority order (highest to lowest):
    /// 1. NEO4J_* environment variables
    /// 2. ./tunegraph.toml (project-specific)
    /// 3. ~/.tunegraph/config.toml (user defaults)
    /// 4. Built-in defaults
    pub fn load() -> Self {
        let mut config = TunegraphConfig::default();

        if let Some(global_config_path) = config_dir().map(|d| d.join("config.toml")) {
            if let Some(global_config) = Self::read_lenient(&global_config_path) {
                config = global_config;
            }
        }

        if let Some(local_config) = Self::read_lenient(Path::new("tunegraph.toml")) {
            config = local_config;
        }

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load an explicit config file; unlike `load`, a bad file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::load_from_with(path, |key| std::env::var(key).ok())
    }

    /// `load_from` with an explicit environment lookup
    pub fn load_from_with<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: TunegraphConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        debug!("Loaded config from {}", path.display());

        config.apply_env(lookup);
        Ok(config)
    }

    fn read_lenient(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<TunegraphConfig>(&contents) {
                Ok(config) => {
                    debug!("Loaded config from {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                debug!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Override connection settings from NEO4J_URI, NEO4J_USER,
    /// NEO4J_PASSWORD and NEO4J_DATABASE.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup("NEO4J_URI") {
            self.neo4j.uri = uri;
        }
        if let Some(user) = lookup("NEO4J_USER") {
            self.neo4j.user = user;
        }
        if let Some(password) = lookup("NEO4J_PASSWORD") {
            self.neo4j.password = password;
        }
        if let Some(database) = lookup("NEO4J_DATABASE") {
            self.neo4j.database = Some(database).filter(|db| !db.is_empty());
        }
    }
}
