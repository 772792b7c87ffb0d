//! Error types for `twin-seed-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Rejected command-line or configuration input. Raised before any network
  /// call is made.
  #[error("invalid arguments: {0}")]
  Validation(String),

  #[error("malformed fixture: {0}")]
  Fixture(String),

  /// A request that still failed at the transport level after all retries.
  #[error("{method} {url} failed: {source}")]
  Transport {
    method: &'static str,
    url:    String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  /// The HTTP client itself could not be set up.
  #[error("http client error: {0}")]
  Client(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
