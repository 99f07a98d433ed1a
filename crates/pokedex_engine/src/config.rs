/* 📖 # Why is every config key optional?

The service must start with nothing but a seed file in the working directory.
`pokedex.toml` only overrides what differs from the defaults, and a missing
file means "all defaults". Container platforms pass the listen port through
the `PORT` environment variable, which wins over the file.
*/

use serde::Deserialize;
use tracing::{debug, info};

use pokedex_base::pal::http::HttpServerConfig;
use pokedex_base::{FilePath, PalHandle, PokedexError, PokedexResult, ResultExt};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "pokedex.toml";

/// Environment variable overriding `port`.
pub const PORT_ENV: &str = "PORT";

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Interface to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Base URL announced on `/`; derived from the port when unset.
    pub public_url: Option<String>,
    /// Directory served under `/assets`.
    pub assets_dir: String,
    /// JSON array of records used to seed the store.
    pub data_file: String,
    /// Write every mutation back to `data_file`.
    pub persist: bool,
    /// Request worker threads.
    pub worker_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            public_url: None,
            assets_dir: "assets".to_string(),
            data_file: "pokedex.json".to_string(),
            persist: false,
            worker_threads: 4,
        }
    }
}

impl Config {
    /// Base URL of the service, without a trailing slash.
    pub fn public_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.port),
        }
    }

    pub fn assets_dir(&self) -> FilePath {
        FilePath::from(self.assets_dir.as_str())
    }

    pub fn data_file(&self) -> FilePath {
        FilePath::from(self.data_file.as_str())
    }

    pub fn http_server_config(&self) -> HttpServerConfig {
        HttpServerConfig::new(self.host.clone())
            .with_port(self.port)
            .with_worker_threads(self.worker_threads)
    }

    /// Apply a raw `PORT` value, if one is set.
    pub fn with_port_override(mut self, raw: Option<&str>) -> PokedexResult<Self> {
        if let Some(raw) = raw {
            self.port = raw.trim().parse().map_err(|_| {
                Box::new(PokedexError::message(format!(
                    "{} must be a port number, got '{}'",
                    PORT_ENV, raw
                )))
            })?;
            debug!(port = self.port, "port overridden from environment");
        }
        Ok(self)
    }
}

/// Load the configuration file (defaults if it does not exist) and apply the
/// `PORT` override.
pub fn load_config(pal: &PalHandle, path: &FilePath) -> PokedexResult<Config> {
    let config = read_config_file(pal, path)?;
    let port = std::env::var(PORT_ENV).ok();
    let config = config.with_port_override(port.as_deref())?;
    info!(
        host = %config.host,
        port = config.port,
        persist = config.persist,
        "configuration loaded"
    );
    Ok(config)
}

fn read_config_file(pal: &PalHandle, path: &FilePath) -> PokedexResult<Config> {
    if !pal.file_exists(path)? {
        debug!(path = %path, "no configuration file, using defaults");
        return Ok(Config::default());
    }
    let text = pal
        .read_file_to_string(path)
        .with_context(|| format!("reading {}", path))?;
    toml::from_str(&text).map_err(|e| {
        Box::new(PokedexError::message(format!(
            "Failed to parse {}: {}",
            path, e
        )))
    })
}
