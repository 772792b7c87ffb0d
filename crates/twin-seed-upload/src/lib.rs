//! Seeds a dataspace with fixture parts.
//!
//! A run provisions the connector resources every submodel relies on
//! (policies, the registry asset, and optionally the notification assets),
//! then uploads each fixture record: submodel payloads, one asset and contract
//! definition per submodel, and a shell referencing them all.
//!
//! Everything goes through a [`Transport`]; calls are strictly sequential.

pub mod config;
mod endpoints;
pub mod provision;
pub mod rotation;
pub mod uploader;

pub use config::{NotificationTesting, UploadConfig, UploadSettings};
pub use provision::Provisioner;
pub use rotation::RoundRobin;
pub use twin_seed_core::{Error, Result};
pub use uploader::{RecordOutcome, Uploader};

use tracing::info;
use twin_seed_core::{fixture::FixtureFile, transport::Transport};

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
  pub records:   usize,
  pub submodels: usize,
  pub shells:    usize,
}

/// Provision shared connector resources, then upload every record that passes
/// the BPN filter.
pub async fn run<T: Transport>(
  transport: &T,
  config: &UploadConfig,
  fixture: FixtureFile,
) -> Result<RunSummary> {
  let provisioner = Provisioner::new(transport, config);
  provisioner.ensure_policies(&fixture.policies).await?;
  provisioner.ensure_registry_asset().await?;
  if let Some(ess) = &config.notifications {
    provisioner.ensure_notification_assets(&ess.base_url).await?;
  }

  let mut uploader = Uploader::new(transport, config);
  let mut summary = RunSummary::default();
  for mut record in fixture.records {
    if !record.matches_bpns(&config.bpn_filter) {
      continue;
    }
    if config.certificate_url.is_some() {
      record.inject_certificate_placeholder();
    }
    let outcome = uploader.upload_record(&record).await?;
    summary.records += 1;
    summary.submodels += outcome.submodels;
    summary.shells += usize::from(outcome.shell_uploaded);
  }

  info!(
    "Uploaded {} records with {} submodels and {} shells",
    summary.records, summary.submodels, summary.shells
  );
  Ok(summary)
}

#[cfg(test)]
mod fake;
