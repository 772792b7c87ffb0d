//! `twin-seed`: upload fixture parts into a dataspace network.
//!
//! # Usage
//!
//! ```text
//! twin-seed -f testdata.json -s http://submodel -a http://registry \
//!   --edc http://connector -k password
//! twin-seed -f testdata.json --config seed.toml
//! ```
//!
//! Any setting can also come from a config file (`--config`) or from
//! `TWIN_SEED_*` environment variables; command-line flags win.

mod settings;

use std::{path::PathBuf, time::Instant};

use anyhow::Context as _;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use twin_seed_core::fixture::FixtureFile;
use twin_seed_http::{HttpTransport, RetryPolicy};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "twin-seed", version, about = "Upload test data into a dataspace network")]
pub(crate) struct Cli {
  /// Test data file location.
  #[arg(short, long, value_name = "FILE")]
  pub file: PathBuf,

  /// Optional config file (TOML, JSON or YAML) supplying any other setting.
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Submodel server display URLs.
  #[arg(short, long, num_args = 1..)]
  pub submodel: Vec<String>,

  /// Submodel server upload URLs, in the same order as `--submodel`.
  #[arg(long = "submodelupload", num_args = 1..)]
  pub submodel_upload: Option<Vec<String>>,

  /// Digital twin registry URL.
  #[arg(short, long)]
  pub aas: Option<String>,

  /// Digital twin registry upload URL.
  #[arg(long = "aasupload")]
  pub aas_upload: Option<String>,

  /// Connector control plane display URLs.
  #[arg(long, num_args = 1..)]
  pub edc: Vec<String>,

  /// Connector control plane upload URLs, in the same order as `--edc`.
  #[arg(long = "edcupload", num_args = 1..)]
  pub edc_upload: Option<Vec<String>>,

  /// Connector API key.
  #[arg(short = 'k', long = "apikey")]
  pub api_key: Option<String>,

  /// Certificate (ESR) service URL.
  #[arg(short, long)]
  pub esr: Option<String>,

  /// Enable notification test data, including an unreachable endpoint for
  /// `--bpn`.
  #[arg(long)]
  pub ess: bool,

  /// Base URL of the notification service.
  #[arg(long = "ess-url", alias = "essURL")]
  pub ess_url: Option<String>,

  /// BPN whose submodels get a non-existent connector endpoint.
  #[arg(long)]
  pub bpn: Option<String>,

  /// Default policy for contract definitions.
  #[arg(short, long)]
  pub policy: Option<String>,

  /// Only upload records of these BPNs.
  #[arg(long, num_args = 1..)]
  pub bpns: Vec<String>,

  /// Register shells in registry schema 3.0.
  #[arg(long)]
  pub aas3: bool,

  /// Connector data plane URLs, in the same order as `--edc`.
  #[arg(short, long = "dataplane", num_args = 1..)]
  pub dataplane: Option<Vec<String>>,

  /// BPNs allowed to see the shells' specific asset ids (schema 3.0 only).
  #[arg(long = "allowed-bpns", alias = "allowedBPNs", num_args = 1..)]
  pub allowed_bpns: Vec<String>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let started = Instant::now();
  let cli = Cli::parse();

  let config = settings::load(&cli)?
    .validate()
    .context("invalid arguments")?;

  let fixture = FixtureFile::from_path(&cli.file)
    .with_context(|| format!("loading fixture file {}", cli.file.display()))?;

  let transport = HttpTransport::new(config.api_key.clone(), RetryPolicy::default())
    .context("failed to build HTTP client")?;
  twin_seed_upload::run(&transport, &config, fixture).await?;

  tracing::info!(
    "Test data upload completed in {} seconds",
    started.elapsed().as_secs_f64().ceil()
  );
  Ok(())
}
