//! Async HTTP client shared by every outbound call of a run.

use reqwest::{
  Client, Method,
  header::{CONTENT_TYPE, HeaderValue},
};
use serde::Serialize;
use twin_seed_core::{
  Error, Result,
  transport::{Audience, HttpResponse, Transport},
};

use crate::RetryPolicy;

const API_KEY_HEADER: &str = "X-Api-Key";

/// One client for the registry, the submodel servers and the connectors.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpTransport {
  client:  Client,
  api_key: String,
  retry:   RetryPolicy,
}

impl HttpTransport {
  pub fn new(api_key: impl Into<String>, retry: RetryPolicy) -> Result<Self> {
    let client = Client::builder()
      .build()
      .map_err(|e| Error::Client(Box::new(e)))?;
    Ok(Self {
      client,
      api_key: api_key.into(),
      retry,
    })
  }

  async fn send(
    &self,
    method: Method,
    url: &str,
    audience: Audience,
    body: Option<Vec<u8>>,
  ) -> Result<HttpResponse> {
    let mut attempt = 0;
    loop {
      let mut req = self
        .client
        .request(method.clone(), url)
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
      if audience == Audience::Connector {
        req = req.header(API_KEY_HEADER, &self.api_key);
      }
      if let Some(bytes) = &body {
        req = req.body(bytes.clone());
      }

      match req.send().await {
        Ok(resp) => {
          let status = resp.status().as_u16();
          let body = resp.text().await.map_err(|e| transport_error(&method, url, e))?;
          return Ok(HttpResponse { status, body });
        }
        Err(e) if (e.is_connect() || e.is_timeout()) && attempt < self.retry.retries => {
          let delay = self.retry.delay(attempt);
          attempt += 1;
          tracing::debug!("{method} {url} failed ({e}); retry {attempt} in {delay:?}");
          tokio::time::sleep(delay).await;
        }
        Err(e) => return Err(transport_error(&method, url, e)),
      }
    }
  }
}

fn transport_error(method: &Method, url: &str, source: reqwest::Error) -> Error {
  Error::Transport {
    method: if *method == Method::GET { "GET" } else { "POST" },
    url:    url.to_string(),
    source: Box::new(source),
  }
}

impl Transport for HttpTransport {
  /// `GET <url>`
  async fn get(&self, url: &str, audience: Audience) -> Result<HttpResponse> {
    self.send(Method::GET, url, audience, None).await
  }

  /// `POST <url>` with a JSON body.
  async fn post_json<B>(
    &self,
    url: &str,
    audience: Audience,
    body: &B,
  ) -> Result<HttpResponse>
  where
    B: Serialize + ?Sized,
  {
    let bytes = serde_json::to_vec(body)?;
    self.send(Method::POST, url, audience, Some(bytes)).await
  }
}
