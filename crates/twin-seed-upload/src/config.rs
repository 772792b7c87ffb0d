//! Run configuration and its validation.

use serde::Deserialize;
use twin_seed_core::{Error, Result, fixture::DEFAULT_POLICY_ID, shell::ShellSchema};

// ─── Raw settings ────────────────────────────────────────────────────────────

/// Unvalidated settings, as merged from the config file, the environment and
/// the command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
  pub submodel_urls:         Vec<String>,
  pub submodel_upload_urls:  Option<Vec<String>>,
  pub registry_url:          Option<String>,
  pub registry_upload_url:   Option<String>,
  pub connector_urls:        Vec<String>,
  pub connector_upload_urls: Option<Vec<String>>,
  pub dataplane_urls:        Option<Vec<String>>,
  pub api_key:               Option<String>,
  /// Certificate (ESR) service base URL.
  pub certificate_url:       Option<String>,
  /// Notification testing mode.
  pub ess:                   bool,
  pub ess_url:               Option<String>,
  pub faulty_bpn:            Option<String>,
  pub policy:                Option<String>,
  pub bpns:                  Vec<String>,
  pub aas3:                  bool,
  pub allowed_bpns:          Vec<String>,
}

// ─── Validated config ────────────────────────────────────────────────────────

/// Notification testing settings (`ess` mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTesting {
  pub base_url:   String,
  /// Records with this BPN get a deliberately unreachable endpoint.
  pub faulty_bpn: Option<String>,
}

/// A configuration whose parallel URL lists are known to line up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
  pub submodel_urls:         Vec<String>,
  pub submodel_upload_urls:  Vec<String>,
  pub registry_url:          String,
  pub registry_upload_url:   String,
  pub connector_urls:        Vec<String>,
  pub connector_upload_urls: Vec<String>,
  /// Empty unless targeting [`ShellSchema::V3`].
  pub dataplane_urls:        Vec<String>,
  pub api_key:               String,
  pub certificate_url:       Option<String>,
  pub notifications:         Option<NotificationTesting>,
  pub default_policy:        String,
  pub bpn_filter:            Vec<String>,
  pub schema:                ShellSchema,
  pub allowed_bpns:          Vec<String>,
}

impl UploadConfig {
  /// Whether `bpn` is the one configured to fail in notification testing.
  pub fn is_faulty(&self, bpn: &str) -> bool {
    self
      .notifications
      .as_ref()
      .and_then(|n| n.faulty_bpn.as_deref())
      .is_some_and(|faulty| faulty == bpn)
  }
}

fn required<T>(value: Option<T>, what: &str) -> Result<T> {
  value.ok_or_else(|| Error::Validation(format!("{what} is required")))
}

fn same_length(left: &[String], left_name: &str, right: &[String], right_name: &str) -> Result<()> {
  if left.len() == right.len() {
    Ok(())
  } else {
    Err(Error::Validation(format!(
      "number and order of {left_name} {left:?} has to match number and order of {right_name} {right:?}"
    )))
  }
}

impl UploadSettings {
  /// Apply defaults and check that every parallel URL list lines up.
  pub fn validate(self) -> Result<UploadConfig> {
    if self.submodel_urls.is_empty() {
      return Err(Error::Validation("at least one submodel server URL is required".into()));
    }
    if self.connector_urls.is_empty() {
      return Err(Error::Validation("at least one connector URL is required".into()));
    }
    let registry_url = required(self.registry_url, "registry URL")?;
    let api_key = required(self.api_key, "connector API key")?;

    let schema = if self.aas3 { ShellSchema::V3 } else { ShellSchema::V2 };
    if schema == ShellSchema::V3 && self.dataplane_urls.is_none() {
      return Err(Error::Validation(
        "data plane URLs have to be specified when targeting shell schema v3".into(),
      ));
    }
    let notifications = if self.ess {
      let base_url = self.ess_url.ok_or_else(|| {
        Error::Validation("notification service URL has to be specified in ess mode".into())
      })?;
      Some(NotificationTesting { base_url, faulty_bpn: self.faulty_bpn })
    } else {
      None
    };

    let submodel_upload_urls = self.submodel_upload_urls.unwrap_or_else(|| self.submodel_urls.clone());
    let connector_upload_urls = self.connector_upload_urls.unwrap_or_else(|| self.connector_urls.clone());
    let dataplane_urls = self.dataplane_urls.unwrap_or_default();

    same_length(&submodel_upload_urls, "submodel server upload URLs", &self.submodel_urls, "submodel server URLs")?;
    same_length(&connector_upload_urls, "connector upload URLs", &self.connector_urls, "connector URLs")?;
    same_length(&self.connector_urls, "connector URLs", &self.submodel_urls, "submodel server URLs")?;
    if !dataplane_urls.is_empty() || schema == ShellSchema::V3 {
      same_length(&dataplane_urls, "data plane URLs", &self.connector_urls, "connector URLs")?;
    }

    Ok(UploadConfig {
      submodel_urls: self.submodel_urls,
      submodel_upload_urls,
      registry_upload_url: self.registry_upload_url.unwrap_or_else(|| registry_url.clone()),
      registry_url,
      connector_urls: self.connector_urls,
      connector_upload_urls,
      dataplane_urls: if schema == ShellSchema::V3 { dataplane_urls } else { Vec::new() },
      api_key,
      certificate_url: self.certificate_url,
      notifications,
      default_policy: self.policy.unwrap_or_else(|| DEFAULT_POLICY_ID.to_string()),
      bpn_filter: self.bpns,
      schema,
      allowed_bpns: self.allowed_bpns,
    })
  }
}
