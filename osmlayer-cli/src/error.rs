//! CLI error types.

use std::fmt;

use osmlayer::config::ConfigError;
use osmlayer::logging::LoggingError;
use osmlayer::osm::OsmError;
use osmlayer::overpass::FetchError;

/// Errors that end a CLI command.
#[derive(Debug)]
pub enum CliError {
    /// Configuration problem not tied to the file.
    Config(String),

    /// Reading or writing the configuration file failed.
    ConfigFile(ConfigError),

    /// An OSM document could not be parsed.
    Parse(OsmError),

    /// An Overpass client could not be created.
    Http(FetchError),

    /// Logging could not be set up.
    Logging(LoggingError),

    /// Failed to create the Tokio runtime.
    RuntimeCreation(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Parse(e) => write!(f, "Failed to parse document: {}", e),
            CliError::Http(e) => write!(f, "Failed to set up HTTP client: {}", e),
            CliError::Logging(e) => write!(f, "Failed to set up logging: {}", e),
            CliError::RuntimeCreation(msg) => {
                write!(f, "Failed to create Tokio runtime: {}", msg)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Parse(e) => Some(e),
            CliError::Http(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Config(_) | CliError::RuntimeCreation(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<OsmError> for CliError {
    fn from(e: OsmError) -> Self {
        CliError::Parse(e)
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Http(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}
