//! Layering of config file, environment and command line into
//! [`UploadSettings`].

use anyhow::Context as _;
use twin_seed_upload::UploadSettings;

use crate::Cli;

const LIST_KEYS: [&str; 7] = [
  "submodel_urls",
  "submodel_upload_urls",
  "connector_urls",
  "connector_upload_urls",
  "dataplane_urls",
  "bpns",
  "allowed_bpns",
];

/// Read the optional config file and `TWIN_SEED_*` variables, then apply the
/// command-line flags on top.
pub(crate) fn load(cli: &Cli) -> anyhow::Result<UploadSettings> {
  let mut builder = config::Config::builder();
  if let Some(path) = &cli.config {
    builder = builder.add_source(config::File::from(path.as_path()).required(true));
  }
  let mut env = config::Environment::with_prefix("TWIN_SEED")
    .try_parsing(true)
    .list_separator(",");
  for key in LIST_KEYS {
    env = env.with_list_parse_key(key);
  }
  let base: UploadSettings = builder
    .add_source(env)
    .build()
    .context("failed to read settings")?
    .try_deserialize()
    .context("failed to deserialise settings")?;

  Ok(overlay(base, cli))
}

/// Command-line values win over anything loaded from file or environment.
fn overlay(base: UploadSettings, cli: &Cli) -> UploadSettings {
  fn list(cli: &[String], base: Vec<String>) -> Vec<String> {
    if cli.is_empty() { base } else { cli.to_vec() }
  }

  UploadSettings {
    submodel_urls:         list(&cli.submodel, base.submodel_urls),
    submodel_upload_urls:  cli.submodel_upload.clone().or(base.submodel_upload_urls),
    registry_url:          cli.aas.clone().or(base.registry_url),
    registry_upload_url:   cli.aas_upload.clone().or(base.registry_upload_url),
    connector_urls:        list(&cli.edc, base.connector_urls),
    connector_upload_urls: cli.edc_upload.clone().or(base.connector_upload_urls),
    dataplane_urls:        cli.dataplane.clone().or(base.dataplane_urls),
    api_key:               cli.api_key.clone().or(base.api_key),
    certificate_url:       cli.esr.clone().or(base.certificate_url),
    ess:                   cli.ess || base.ess,
    ess_url:               cli.ess_url.clone().or(base.ess_url),
    faulty_bpn:            cli.bpn.clone().or(base.faulty_bpn),
    policy:                cli.policy.clone().or(base.policy),
    bpns:                  list(&cli.bpns, base.bpns),
    aas3:                  cli.aas3 || base.aas3,
    allowed_bpns:          list(&cli.allowed_bpns, base.allowed_bpns),
  }
}
