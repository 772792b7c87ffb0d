//! In-memory transport that records every call and answers from canned rules.

use std::cell::RefCell;

use serde::Serialize;
use serde_json::Value;
use twin_seed_core::{
  Result,
  transport::{Audience, HttpResponse, Transport},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
  Get,
  Post,
}

#[derive(Debug, Clone)]
pub(crate) struct Call {
  pub method:   Method,
  pub url:      String,
  pub audience: Audience,
  pub body:     Option<Value>,
}

struct Rule {
  method:   Method,
  fragment: String,
  response: HttpResponse,
}

/// Unmatched GETs answer 404; unmatched POSTs answer 200 with `{}`.
#[derive(Default)]
pub(crate) struct FakeTransport {
  rules: Vec<Rule>,
  calls: RefCell<Vec<Call>>,
}

impl FakeTransport {
  pub fn new() -> Self {
    Self::default()
  }

  /// Answer calls whose URL contains `fragment`. Earlier rules win.
  pub fn respond(mut self, method: Method, fragment: &str, status: u16, body: &str) -> Self {
    self.rules.push(Rule {
      method,
      fragment: fragment.to_string(),
      response: HttpResponse::new(status, body),
    });
    self
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.borrow().clone()
  }

  pub fn posts_to(&self, fragment: &str) -> Vec<Call> {
    self
      .calls()
      .into_iter()
      .filter(|c| c.method == Method::Post && c.url.contains(fragment))
      .collect()
  }

  pub fn clear(&self) {
    self.calls.borrow_mut().clear();
  }

  fn answer(&self, call: Call) -> HttpResponse {
    let response = self
      .rules
      .iter()
      .find(|r| r.method == call.method && call.url.contains(&r.fragment))
      .map(|r| r.response.clone())
      .unwrap_or_else(|| match call.method {
        Method::Get => HttpResponse::new(404, ""),
        Method::Post => HttpResponse::new(200, "{}"),
      });
    self.calls.borrow_mut().push(call);
    response
  }
}

impl Transport for FakeTransport {
  async fn get(&self, url: &str, audience: Audience) -> Result<HttpResponse> {
    Ok(self.answer(Call {
      method: Method::Get,
      url: url.to_string(),
      audience,
      body: None,
    }))
  }

  async fn post_json<B>(&self, url: &str, audience: Audience, body: &B) -> Result<HttpResponse>
  where
    B: Serialize + ?Sized,
  {
    let body = serde_json::to_value(body)?;
    Ok(self.answer(Call {
      method: Method::Post,
      url: url.to_string(),
      audience,
      body: Some(body),
    }))
  }
}
