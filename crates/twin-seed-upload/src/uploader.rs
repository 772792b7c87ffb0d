//! Per-record upload: submodel payloads, their connector assets and contract
//! definitions, and finally the shell that references them.

use serde_json::Value;
use tracing::{info, warn};
use twin_seed_core::{
  Result,
  asset_id::{self, PartIdentity},
  fixture::{ESR_CERTIFICATE_NAME, FixtureRecord, first_document, submodel_name},
  new_urn,
  payload::{AssetRequest, ContractDefinition, certificate_url},
  shell::{Shell, ShellSchema, SubmodelDescriptor},
  transport::{Audience, Transport},
};

use crate::{
  config::UploadConfig,
  endpoints::{self, DATAPLANE_PUBLIC, UNREACHABLE_HOST},
  provision::report,
  rotation::{RoundRobin, Slot},
};

/// What happened to one fixture record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordOutcome {
  pub submodels:      usize,
  pub shell_uploaded: bool,
}

/// Where a submodel descriptor sends its consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndpointTarget<'c> {
  /// A host that does not resolve; simulates an unreachable supplier.
  Unreachable,
  /// The external certificate service.
  CertificateService(&'c str),
  /// The connector (v2) or data plane (v3) chosen by round robin.
  Connector,
}

/// Uploads records one at a time, sharing the round-robin counter across the
/// whole run.
pub struct Uploader<'a, T> {
  transport:        &'a T,
  config:           &'a UploadConfig,
  rotation:         RoundRobin,
  /// One connector asset per data plane; only populated for v3.
  dataplane_assets: Vec<String>,
}

impl<'a, T: Transport> Uploader<'a, T> {
  pub fn new(transport: &'a T, config: &'a UploadConfig) -> Self {
    let dataplane_assets: Vec<String> = config.dataplane_urls.iter().map(|_| new_urn()).collect();
    if !dataplane_assets.is_empty() {
      info!("Data plane asset ids: {dataplane_assets:?}");
    }
    Self {
      transport,
      config,
      rotation: RoundRobin::default(),
      dataplane_assets,
    }
  }

  pub fn with_rotation(mut self, rotation: RoundRobin) -> Self {
    self.rotation = rotation;
    self
  }

  pub fn rotation(&self) -> &RoundRobin {
    &self.rotation
  }

  pub async fn upload_record(&mut self, record: &FixtureRecord) -> Result<RecordOutcome> {
    let config = self.config;
    let identity = PartIdentity::from_record(record);
    info!("Uploading {} ({})", record.catena_x_id, identity.id_short);

    let specific_asset_ids = match config.schema {
      ShellSchema::V2 => asset_id::plain(&identity.specific_asset_ids),
      ShellSchema::V3 => asset_id::scoped(&identity.specific_asset_ids, &config.allowed_bpns),
    };

    let policy_id = record.policy.as_deref().unwrap_or(config.default_policy.as_str());
    info!("Policy: {policy_id}");

    let mut descriptors = Vec::new();
    for (key, value) in record.eligible_submodels() {
      let descriptor = self.upload_submodel(record, key, value, policy_id).await?;
      descriptors.push(descriptor);
    }

    let mut outcome = RecordOutcome {
      submodels:      descriptors.len(),
      shell_uploaded: false,
    };
    if descriptors.is_empty() {
      return Ok(outcome);
    }

    info!("Create shell for {}", record.catena_x_id);
    let shell = Shell::new(
      config.schema,
      &record.catena_x_id,
      identity.id_short,
      new_urn(),
      specific_asset_ids,
      descriptors,
    );
    let url = format!("{}{}", config.registry_upload_url, config.schema.registry_path());
    let resp = self.transport.post_json(&url, Audience::Public, &shell).await?;
    report("create shell", &resp);
    outcome.shell_uploaded = !resp.is_failure();
    Ok(outcome)
  }

  fn target(&self, record: &FixtureRecord, name: &str) -> EndpointTarget<'a> {
    let config: &'a UploadConfig = self.config;
    if config.is_faulty(&record.bpnl) {
      return EndpointTarget::Unreachable;
    }
    match &config.certificate_url {
      Some(esr) if name == ESR_CERTIFICATE_NAME => EndpointTarget::CertificateService(esr),
      _ => EndpointTarget::Connector,
    }
  }

  fn endpoint_address(
    &self,
    target: EndpointTarget<'_>,
    slot: Slot,
    catena_x_id: &str,
    submodel_id: &str,
  ) -> String {
    match (self.config.schema, target) {
      (ShellSchema::V2, EndpointTarget::Unreachable) => format!(
        "{UNREACHABLE_HOST}/{catena_x_id}-{submodel_id}/submodel?content=value&extent=withBlobValue"
      ),
      (ShellSchema::V2, EndpointTarget::CertificateService(esr)) => {
        certificate_url(esr, catena_x_id)
      }
      (ShellSchema::V2, EndpointTarget::Connector) => format!(
        "{}/{catena_x_id}-{submodel_id}/submodel?content=value&extent=withBlobValue",
        slot.pick(&self.config.connector_urls)
      ),
      (ShellSchema::V3, EndpointTarget::Unreachable) => {
        format!("{UNREACHABLE_HOST}{DATAPLANE_PUBLIC}/data/{submodel_id}")
      }
      (ShellSchema::V3, _) => format!(
        "{}{DATAPLANE_PUBLIC}/data/{submodel_id}",
        slot.pick(&self.config.dataplane_urls)
      ),
    }
  }

  async fn upload_submodel(
    &mut self,
    record: &FixtureRecord,
    key: &str,
    value: &Value,
    policy_id: &str,
  ) -> Result<SubmodelDescriptor> {
    let config = self.config;
    let slot = self.rotation.claim();
    let submodel_url = slot.pick(&config.submodel_urls);
    let submodel_upload_url = slot.pick(&config.submodel_upload_urls);
    let connector_url = slot.pick(&config.connector_urls);
    let connector_upload_url = slot.pick(&config.connector_upload_urls);

    let name = submodel_name(key);
    let submodel_id = new_urn();
    let target = self.target(record, name);
    let address = self.endpoint_address(target, slot, &record.catena_x_id, &submodel_id);

    let (descriptor, asset_id) = match config.schema {
      ShellSchema::V2 => (
        SubmodelDescriptor::direct(name, &submodel_id, key, address),
        format!("{}-{submodel_id}", record.catena_x_id),
      ),
      ShellSchema::V3 => {
        let asset_id = slot.pick(&self.dataplane_assets).clone();
        let descriptor =
          SubmodelDescriptor::proxied(name, &submodel_id, key, address, &asset_id, connector_url);
        (descriptor, asset_id)
      }
    };

    if let Some(document) = first_document(value) {
      info!("Create submodel {name} on submodel server");
      let url = endpoints::submodel_data(submodel_upload_url, &submodel_id);
      let resp = self.transport.post_json(&url, Audience::Public, document).await?;
      report(&format!("upload submodel {name}"), &resp);
    }

    let assets_url = endpoints::assets(connector_upload_url);
    info!("Create connector asset on {assets_url}");
    let asset = match (&config.certificate_url, name == ESR_CERTIFICATE_NAME) {
      (Some(esr), true) => AssetRequest::certificate(esr, &asset_id, &record.catena_x_id),
      _ => AssetRequest::submodel(submodel_url, &asset_id),
    };
    let resp = self.transport.post_json(&assets_url, Audience::Connector, &asset).await?;
    report(&format!("create asset {asset_id}"), &resp);

    if resp.is_failure() {
      warn!("Asset creation failed. Skipping creation of contract definition.");
    } else {
      let definition = ContractDefinition::new(policy_id, &asset_id);
      let resp = self
        .transport
        .post_json(
          &endpoints::contract_definitions(connector_upload_url),
          Audience::Connector,
          &definition,
        )
        .await?;
      report(&format!("create contract definition for {asset_id}"), &resp);
    }

    Ok(descriptor)
  }
}
