//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable
//! overrides. The file path defaults to `config.yaml` but can be specified
//! via the `-f` flag or the `POKEDEX_CONFIG` environment variable.
//!
//! Sources are merged in order (later overrides earlier):
//!
//! 1. **YAML config file** - base configuration
//! 2. **Environment variables** - `POKEDEX_`-prefixed variables; nested
//!    values use double underscores (`POKEDEX_DATABASE__TYPE=mongodb`)
//! 3. **MONGODB_URL** - special case: switches the database to the MongoDB
//!    backend with that connection string
//!
//! ```yaml
//! host: 0.0.0.0
//! port: 3000
//! database:
//!   type: mongodb
//!   url: mongodb://localhost:27017
//!   database: pokedex
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};

/// Simple CLI args - just for specifying the config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "POKEDEX_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// All fields have defaults, so the service starts with no config file at
/// all (binding localhost with the in-memory store).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Document store configuration - in-memory or external MongoDB
    pub database: DatabaseConfig,
    /// Allowed CORS origins; "*" for any
    pub cors_allowed_origins: Vec<String>,
    /// Enable OTLP span export (configured via standard OTEL_* environment variables)
    pub enable_otel_export: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database: DatabaseConfig::default(),
            cors_allowed_origins: vec!["*".to_string()],
            enable_otel_export: false,
        }
    }
}

/// Document store backend selection.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatabaseConfig {
    /// Embedded in-memory store. Ephemeral: all data is lost on shutdown.
    #[default]
    Memory,
    /// External MongoDB instance
    Mongodb {
        /// Connection string, e.g. "mongodb://localhost:27017"
        url: String,
        /// Database name holding the pokemon collection
        #[serde(default = "default_database_name")]
        database: String,
    },
}

fn default_database_name() -> String {
    "pokedex".to_string()
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        // MONGODB_URL switches the backend wholesale, preserving a
        // YAML-configured database name if one was set
        if let Ok(url) = std::env::var("MONGODB_URL") {
            let database = match config.database {
                DatabaseConfig::Mongodb { database, .. } => database,
                DatabaseConfig::Memory => default_database_name(),
            };
            config.database = DatabaseConfig::Mongodb { url, database };
        }

        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("POKEDEX_").split("__"))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_load_without_a_config_file() {
        Jail::expect_with(|_jail| {
            let args = Args {
                config: "does-not-exist.yaml".to_string(),
                validate: false,
            };
            let config = Config::load(&args)?;

            assert_eq!(config.bind_address(), "127.0.0.1:3000");
            assert!(matches!(config.database, DatabaseConfig::Memory));
            Ok(())
        });
    }

    #[test]
    fn yaml_file_configures_the_mongodb_backend() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
port: 8080
database:
  type: mongodb
  url: mongodb://db.internal:27017
"#,
            )?;

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };
            let config = Config::load(&args)?;

            assert_eq!(config.port, 8080);
            match config.database {
                DatabaseConfig::Mongodb { url, database } => {
                    assert_eq!(url, "mongodb://db.internal:27017");
                    assert_eq!(database, "pokedex"); // default
                }
                other => panic!("expected mongodb backend, got {other:?}"),
            }
            Ok(())
        });
    }

    #[test]
    fn env_vars_override_yaml_values() {
        Jail::expect_with(|jail| {
            jail.create_file("test.yaml", "port: 8080\n")?;
            jail.set_env("POKEDEX_PORT", "9090");
            jail.set_env("POKEDEX_HOST", "0.0.0.0");

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };
            let config = Config::load(&args)?;

            assert_eq!(config.bind_address(), "0.0.0.0:9090");
            Ok(())
        });
    }

    #[test]
    fn mongodb_url_env_switches_the_backend() {
        Jail::expect_with(|jail| {
            jail.set_env("MONGODB_URL", "mongodb://elsewhere:27017");

            let args = Args {
                config: "does-not-exist.yaml".to_string(),
                validate: false,
            };
            let config = Config::load(&args)?;

            match config.database {
                DatabaseConfig::Mongodb { url, database } => {
                    assert_eq!(url, "mongodb://elsewhere:27017");
                    assert_eq!(database, "pokedex");
                }
                other => panic!("expected mongodb backend, got {other:?}"),
            }
            Ok(())
        });
    }
}
