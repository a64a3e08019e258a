use std::path::PathBuf;
use thiserror::Error;

/// Possible errors when talking to the qBittorrent Web API
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// No host was given to the `ClientBuilder`
    #[error("No Web UI host specified")]
    MissingHost,
    /// The configured host and port do not form a valid base URL
    #[error("Cannot build a Web UI URL from host `{0}` and port {1}")]
    InvalidHost(String, u16),
    /// An API endpoint could not be joined onto the base URL
    #[error("Invalid API endpoint `{0}`: {1}")]
    InvalidEndpoint(&'static str, url::ParseError),
    /// The Web UI rejected the login
    #[error("Login failed: {0}")]
    LoginFailed(String),
    /// The Web UI answered with a non-success status code
    #[error("Request to `{endpoint}` failed with status {status}")]
    Api {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },
    /// Reqwest network error
    #[error("Network error while talking to the Web UI: {0}")]
    ReqwestError(#[from] reqwest::Error),
    /// A header value could not be built from the base URL or user agent
    #[error("Header could not be parsed.")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

/// Errors while loading the configuration file.
///
/// Each variant renders its own operator-facing message, so the binary can
/// print it verbatim before exiting.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file does not exist
    #[error("Cannot load {}, check that the file exists and the name is correct", .0.display())]
    NotFound(PathBuf),
    /// Any other I/O failure while reading the file
    #[error("Cannot load {}, unexpected error: {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),
    /// The file is neither valid UTF-8 nor valid GBK
    #[error("Cannot decode {}, the file must be UTF-8 or GBK encoded", .0.display())]
    Encoding(PathBuf),
    /// The TOML could not be parsed into a configuration
    #[error("Error loading {}, check that the file content is well-formed: {}", .0.display(), .1)]
    Decode(PathBuf, toml::de::Error),
    /// Well-formed TOML with values out of range
    #[error("Invalid value in {}: {}", .0.display(), .1)]
    Invalid(PathBuf, String),
}

/// The result type used by the client and limiter
pub type Result<T> = std::result::Result<T, ErrorKind>;
