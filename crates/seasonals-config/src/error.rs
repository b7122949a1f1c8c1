use std::path::PathBuf;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Home directory not found
    #[error("could not determine home directory")]
    NoHomeDirectory,

    /// The config endpoint could not be reached
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The config endpoint answered with a non-success status
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The config payload is not the expected JSON shape
    #[error("malformed config payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// Failed to read a local file
    #[error("failed to read {0:?}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    /// Failed to write a local file
    #[error("failed to write {0:?}: {1}")]
    Write(PathBuf, #[source] std::io::Error),

    /// Failed to parse a local TOML file
    #[error("failed to parse {0:?}: {1}")]
    Toml(PathBuf, #[source] toml::de::Error),

    /// Failed to serialize a local TOML file
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
