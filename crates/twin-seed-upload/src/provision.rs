//! Create-if-absent provisioning of connector resources that every run needs:
//! policies, the registry asset, and the notification assets.

use serde_json::{Map, Value};
use tracing::{info, warn};
use twin_seed_core::{
  Result,
  notification::NotificationKind,
  payload::{
    AssetRequest, CatalogFilter, CatalogRequest, ContractDefinition,
    REGISTRY_ASSET_ID, REGISTRY_ASSET_TYPE, catalog_has_offers,
  },
  transport::{Audience, HttpResponse, Transport},
};

use crate::{config::UploadConfig, endpoints};

/// Log a response; failures (status > 205) include the body.
pub(crate) fn report(what: &str, resp: &HttpResponse) {
  if resp.is_failure() {
    warn!("{what} failed with status {}: {}", resp.status, resp.body);
  } else {
    info!("{what}: status {}", resp.status);
  }
}

/// Whether a JSON value carries anything: not null, false, zero or empty.
fn is_present(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
    Value::String(s) => !s.is_empty(),
    Value::Array(items) => !items.is_empty(),
    Value::Object(fields) => !fields.is_empty(),
  }
}

pub struct Provisioner<'a, T> {
  transport: &'a T,
  config:    &'a UploadConfig,
}

impl<'a, T: Transport> Provisioner<'a, T> {
  pub fn new(transport: &'a T, config: &'a UploadConfig) -> Self {
    Self { transport, config }
  }

  /// Make sure every named policy exists on every connector.
  pub async fn ensure_policies(&self, policies: &Map<String, Value>) -> Result<()> {
    for (name, policy) in policies {
      let Some(policy_id) = policy.get("@id").and_then(Value::as_str) else {
        warn!("policy {name:?} has no @id; skipping");
        continue;
      };
      for connector in &self.config.connector_upload_urls {
        self.ensure_policy(connector, policy_id, policy).await?;
      }
    }
    Ok(())
  }

  async fn ensure_policy(&self, connector: &str, policy_id: &str, policy: &Value) -> Result<()> {
    let url = endpoints::policy_definitions(connector);
    info!("Create policy {policy_id} on connector {url}");

    let existing = self
      .transport
      .get(&format!("{url}/{policy_id}"), Audience::Connector)
      .await?;
    if existing.status == 200 && existing.json().is_some_and(|v| is_present(&v)) {
      info!("Policy {policy_id} already exists. Skipping creation.");
      return Ok(());
    }

    let resp = self.transport.post_json(&url, Audience::Connector, policy).await?;
    report(&format!("create policy {policy_id}"), &resp);
    if !resp.is_failure() {
      let created = resp.created_id().unwrap_or_else(|| policy_id.to_string());
      info!("Successfully created policy {created}.");
    }
    Ok(())
  }

  /// Make sure each connector offers the digital twin registry.
  pub async fn ensure_registry_asset(&self) -> Result<()> {
    let asset = AssetRequest::registry(&self.config.registry_url, REGISTRY_ASSET_ID);
    for (display, upload) in self.connectors() {
      self
        .ensure_asset(
          display,
          upload,
          CatalogFilter::Type(REGISTRY_ASSET_TYPE),
          REGISTRY_ASSET_ID,
          &asset,
        )
        .await?;
    }
    Ok(())
  }

  /// Make sure each connector offers the three notification endpoints of the
  /// notification service at `base_url`.
  pub async fn ensure_notification_assets(&self, base_url: &str) -> Result<()> {
    for (display, upload) in self.connectors() {
      for kind in NotificationKind::all() {
        let endpoint = format!("{base_url}{}", kind.path());
        let asset = AssetRequest::notification(&endpoint, kind);
        self
          .ensure_asset(display, upload, CatalogFilter::Id(kind.asset_id()), kind.asset_id(), &asset)
          .await?;
      }
    }
    Ok(())
  }

  fn connectors(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
    self
      .config
      .connector_urls
      .iter()
      .zip(&self.config.connector_upload_urls)
      .map(|(display, upload)| (display.as_str(), upload.as_str()))
  }

  /// Catalog lookup, then asset + contract definition if nothing is offered.
  async fn ensure_asset(
    &self,
    display: &str,
    upload: &str,
    filter: CatalogFilter<'_>,
    asset_id: &str,
    asset: &AssetRequest,
  ) -> Result<()> {
    let catalog_url = endpoints::catalog(upload);
    info!("Query catalog for asset {asset_id} at {catalog_url}");
    let query = CatalogRequest::new(&endpoints::dsp(display), filter);
    let catalog = self
      .transport
      .post_json(&catalog_url, Audience::Connector, &query)
      .await?;

    if catalog.status == 200 && catalog.json().is_some_and(|v| catalog_has_offers(&v)) {
      info!("Offer for asset {asset_id} already exists. Skipping creation.");
      return Ok(());
    }

    let resp = self
      .transport
      .post_json(&endpoints::assets(upload), Audience::Connector, asset)
      .await?;
    report(&format!("create asset {asset_id}"), &resp);
    if resp.is_failure() {
      return Ok(());
    }
    info!(
      "Successfully created asset {}.",
      resp.created_id().as_deref().unwrap_or(asset_id)
    );

    let definition = ContractDefinition::new(&self.config.default_policy, asset_id);
    let resp = self
      .transport
      .post_json(&endpoints::contract_definitions(upload), Audience::Connector, &definition)
      .await?;
    report(&format!("create contract definition for {asset_id}"), &resp);
    Ok(())
  }
}
