//! The HTTP seam between the uploader and the network.
//!
//! Implemented by `twin-seed-http` for real runs and by in-memory fakes in
//! tests. Transport failures are expected to be retried below this trait;
//! anything surfacing as `Err` is final.

use serde::Serialize;
use serde_json::Value;

use crate::Result;

/// Which credentials a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
  /// Registry and submodel server calls: content type only.
  Public,
  /// Connector management calls: adds the API key header.
  Connector,
}

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
  pub status: u16,
  pub body:   String,
}

impl HttpResponse {
  pub fn new(status: u16, body: impl Into<String>) -> Self {
    Self { status, body: body.into() }
  }

  /// Anything above 205 counts as a failed creation step.
  pub fn is_failure(&self) -> bool {
    self.status > 205
  }

  pub fn json(&self) -> Option<Value> {
    serde_json::from_str(&self.body).ok()
  }

  /// The `@id` echoed back by a connector after a successful create.
  pub fn created_id(&self) -> Option<String> {
    self
      .json()
      .and_then(|v| v.get("@id").and_then(Value::as_str).map(str::to_string))
  }
}

pub trait Transport {
  async fn get(&self, url: &str, audience: Audience) -> Result<HttpResponse>;

  async fn post_json<B>(
    &self,
    url: &str,
    audience: Audience,
    body: &B,
  ) -> Result<HttpResponse>
  where
    B: Serialize + ?Sized;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn failure_threshold_is_205() {
    assert!(!HttpResponse::new(200, "").is_failure());
    assert!(!HttpResponse::new(205, "").is_failure());
    assert!(HttpResponse::new(206, "").is_failure());
    assert!(HttpResponse::new(409, "").is_failure());
  }

  #[test]
  fn created_id_reads_json_ld_id() {
    assert_eq!(HttpResponse::new(200, r#"{"@id":"p-1"}"#).created_id().as_deref(), Some("p-1"));
    assert_eq!(HttpResponse::new(200, "not json").created_id(), None);
  }
}
