//! Core types for the twin-seed test-data uploader.
//!
//! Holds the fixture model, every JSON payload sent to the registry, the
//! submodel servers and the connectors, and the [`transport::Transport`] seam
//! the uploader talks through. This crate does no I/O of its own.

// Native `async fn` in traits; the uploader drives everything from a single
// task so the `Send` advisory does not apply.
#![allow(async_fn_in_trait)]

pub mod asset_id;
pub mod error;
pub mod fixture;
pub mod notification;
pub mod payload;
pub mod shell;
pub mod transport;

pub use error::{Error, Result};

/// Mint a fresh `urn:uuid:` identifier.
pub fn new_urn() -> String {
  uuid::Uuid::new_v4().urn().to_string()
}
