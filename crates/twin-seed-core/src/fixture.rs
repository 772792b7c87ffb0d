//! Fixture file model.
//!
//! A fixture is a JSON document whose test-data container key holds an ordered
//! list of part records. Each record carries its identity fields plus one entry
//! per submodel type URN. Key order matters: it drives naming and the order in
//! which submodels consume round-robin slots.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::{Error, Result};

/// Top-level key holding the list of fixture records.
pub const TEST_DATA_CONTAINER: &str =
  "https://catenax.io/schema/TestDataContainer/1.0.0";

/// Single-level BOM as-built; its `childItems` gate certificate injection.
pub const BOM_AS_BUILT: &str =
  "urn:bamm:io.catenax.single_level_bom_as_built:1.0.0#SingleLevelBomAsBuilt";

/// Certificate statistic submodel served by the external certificate service.
pub const ESR_CERTIFICATE: &str = "urn:bamm:io.catenax.esr_certificates.esr_certificate_state_statistic:1.0.1#EsrCertificateStateStatistic";

/// Short name of [`ESR_CERTIFICATE`].
pub const ESR_CERTIFICATE_NAME: &str = "EsrCertificateStateStatistic";

/// Marker key for the AAS document itself; never uploaded as a submodel.
const AAS_MARKER: &str = "urn:bamm:io.catenax.aas:1.0.0#AAS";

/// Id of the built-in default policy.
pub const DEFAULT_POLICY_ID: &str = "default-policy";

// ─── File ────────────────────────────────────────────────────────────────────

/// A parsed fixture file.
#[derive(Debug, Clone)]
pub struct FixtureFile {
  pub records:  Vec<FixtureRecord>,
  /// Named policy definitions: the built-in default, overlaid by any entries
  /// from the file's `policies` object.
  pub policies: Map<String, Value>,
}

impl FixtureFile {
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    Self::from_slice(&std::fs::read(path)?)
  }

  pub fn from_slice(bytes: &[u8]) -> Result<Self> {
    let mut root: Map<String, Value> = serde_json::from_slice(bytes)?;

    let records = root
      .remove(TEST_DATA_CONTAINER)
      .ok_or_else(|| {
        Error::Fixture(format!("missing top-level key {TEST_DATA_CONTAINER:?}"))
      })?;
    let records: Vec<FixtureRecord> = serde_json::from_value(records)?;

    let mut policies = default_policies();
    match root.remove("policies") {
      Some(Value::Object(extra)) => policies.extend(extra),
      Some(Value::Null) | None => {}
      Some(other) => {
        return Err(Error::Fixture(format!(
          "`policies` must be an object, got {other}"
        )));
      }
    }

    Ok(Self { records, policies })
  }
}

/// The single policy every connector receives, keyed by its fixture name.
pub fn default_policies() -> Map<String, Value> {
  let mut policies = Map::new();
  policies.insert(
    "default".to_string(),
    json!({
      "@context": { "odrl": "http://www.w3.org/ns/odrl/2/" },
      "@type": "PolicyDefinitionRequestDto",
      "@id": DEFAULT_POLICY_ID,
      "policy": {
        "@type": "Policy",
        "odrl:permission": []
      }
    }),
  );
  policies
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One simulated part.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureRecord {
  #[serde(rename = "catenaXId")]
  pub catena_x_id: String,
  pub bpnl:        String,
  /// Contract policy override for this record's submodels.
  #[serde(default)]
  pub policy:      Option<String>,
  /// Submodel type URN → payload list (or `""` for a placeholder), in file
  /// order.
  #[serde(flatten)]
  pub submodels:   Map<String, Value>,
}

impl FixtureRecord {
  /// Whether this record passes a BPN allow-list. An empty list admits all.
  pub fn matches_bpns(&self, allowed: &[String]) -> bool {
    allowed.is_empty() || allowed.iter().any(|bpn| *bpn == self.bpnl)
  }

  /// Add an empty certificate submodel when the part has child items, so a
  /// certificate asset is published next to its BOM.
  pub fn inject_certificate_placeholder(&mut self) {
    let has_children = self
      .submodels
      .get(BOM_AS_BUILT)
      .and_then(first_document)
      .and_then(|doc| doc.get("childItems"))
      .and_then(Value::as_array)
      .is_some_and(|items| !items.is_empty());
    if has_children {
      self
        .submodels
        .insert(ESR_CERTIFICATE.to_string(), Value::String(String::new()));
    }
  }

  /// Submodel keys that become descriptors, assets and uploads.
  pub fn eligible_submodels(&self) -> impl Iterator<Item = (&str, &Value)> {
    self
      .submodels
      .iter()
      .filter(|(key, _)| KeyRole::of(key) == KeyRole::Submodel)
      .map(|(key, value)| (key.as_str(), value))
  }
}

/// The document to upload for a submodel entry: the first element of a
/// payload list. Placeholders and empty lists have none.
pub fn first_document(value: &Value) -> Option<&Value> {
  match value {
    Value::Array(items) => items.first(),
    Value::Object(_) => Some(value),
    _ => None,
  }
}

// ─── Key roles ───────────────────────────────────────────────────────────────

/// How a record key is treated by the uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
  /// Identity or bookkeeping data; never uploaded.
  Administrative,
  Submodel,
}

impl KeyRole {
  pub fn of(key: &str) -> Self {
    const ADMINISTRATIVE: [&str; 5] =
      ["PlainObject", "catenaXId", "bpn", "policy", AAS_MARKER];
    if ADMINISTRATIVE.iter().any(|marker| key.contains(marker)) {
      Self::Administrative
    } else {
      Self::Submodel
    }
  }
}

/// Submodel families that identify the part itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartAspect {
  /// `Batch` or `SerialPart`: carries `localIdentifiers`.
  BatchOrSerial,
  /// `PartAsPlanned`: carries a `manufacturerPartId`.
  AsPlanned,
}

impl PartAspect {
  pub fn of(key: &str) -> Option<Self> {
    if key.contains("Batch") || key.contains("SerialPart") {
      Some(Self::BatchOrSerial)
    } else if key.contains("PartAsPlanned") {
      Some(Self::AsPlanned)
    } else {
      None
    }
  }
}

/// Short submodel name: the fragment after `#`, or the whole key.
pub fn submodel_name(key: &str) -> &str {
  key.split_once('#').map_or(key, |(_, name)| name)
}

#[cfg(test)]
mod tests {
  use super::*;

  const SERIAL_PART: &str =
    "urn:bamm:io.catenax.serial_part:1.0.0#SerialPart";

  fn fixture(extra: &str) -> String {
    format!(
      r#"{{
        "{TEST_DATA_CONTAINER}": [
          {{
            "catenaXId": "urn:uuid:1",
            "bpnl": "BPNL001",
            "{SERIAL_PART}": [{{ "localIdentifiers": [] }}],
            "urn:bamm:io.catenax.aas:1.0.0#AAS": {{}},
            "{BOM_AS_BUILT}": [{{ "childItems": [{{ "catenaXId": "c" }}] }}]
          }}
        ]
        {extra}
      }}"#
    )
  }

  #[test]
  fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("twin-seed-no-such-fixture.json");
    let err = FixtureFile::from_path(&path).unwrap_err();
    assert!(matches!(err, Error::Io(_)), "{err}");
  }

  #[test]
  fn reads_fixture_from_disk() {
    let path = std::env::temp_dir().join(format!("twin-seed-fixture-{}.json", std::process::id()));
    std::fs::write(&path, fixture("")).unwrap();
    let file = FixtureFile::from_path(&path);
    std::fs::remove_file(&path).unwrap();
    assert_eq!(file.unwrap().records[0].bpnl, "BPNL001");
  }

  #[test]
  fn parses_records_in_order() {
    let file = FixtureFile::from_slice(fixture("").as_bytes()).unwrap();
    assert_eq!(file.records.len(), 1);
    let record = &file.records[0];
    assert_eq!(record.catena_x_id, "urn:uuid:1");
    assert_eq!(record.bpnl, "BPNL001");
    assert_eq!(record.policy, None);

    let keys: Vec<_> = record.eligible_submodels().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![SERIAL_PART, BOM_AS_BUILT]);
  }

  #[test]
  fn fixture_policies_override_defaults() {
    let extra = r#", "policies": {
      "default": { "@id": "replaced" },
      "strict":  { "@id": "strict-policy" }
    }"#;
    let file = FixtureFile::from_slice(fixture(extra).as_bytes()).unwrap();
    assert_eq!(file.policies.len(), 2);
    assert_eq!(file.policies["default"]["@id"], "replaced");
    assert_eq!(file.policies["strict"]["@id"], "strict-policy");
  }

  #[test]
  fn missing_container_is_rejected() {
    let err = FixtureFile::from_slice(b"{}").unwrap_err();
    assert!(matches!(err, Error::Fixture(_)), "{err}");
  }

  #[test]
  fn administrative_keys_are_skipped() {
    assert_eq!(KeyRole::of("bpnl"), KeyRole::Administrative);
    assert_eq!(KeyRole::of("catenaXId"), KeyRole::Administrative);
    assert_eq!(KeyRole::of("urn:x#PlainObject"), KeyRole::Administrative);
    assert_eq!(KeyRole::of(AAS_MARKER), KeyRole::Administrative);
    assert_eq!(KeyRole::of(SERIAL_PART), KeyRole::Submodel);
  }

  #[test]
  fn certificate_placeholder_needs_child_items() {
    let mut file = FixtureFile::from_slice(fixture("").as_bytes()).unwrap();
    let record = &mut file.records[0];
    record.inject_certificate_placeholder();
    assert_eq!(record.submodels[ESR_CERTIFICATE], Value::String(String::new()));
    assert_eq!(first_document(&record.submodels[ESR_CERTIFICATE]), None);

    let mut bare: FixtureRecord = serde_json::from_value(json!({
      "catenaXId": "urn:uuid:2",
      "bpnl": "BPNL002",
      BOM_AS_BUILT: [{ "childItems": [] }]
    }))
    .unwrap();
    bare.inject_certificate_placeholder();
    assert!(!bare.submodels.contains_key(ESR_CERTIFICATE));
  }

  #[test]
  fn part_aspects_and_names() {
    assert_eq!(PartAspect::of(SERIAL_PART), Some(PartAspect::BatchOrSerial));
    assert_eq!(PartAspect::of("urn:x#Batch"), Some(PartAspect::BatchOrSerial));
    assert_eq!(PartAspect::of("urn:x#PartAsPlanned"), Some(PartAspect::AsPlanned));
    assert_eq!(PartAspect::of(BOM_AS_BUILT), None);
    assert_eq!(submodel_name(SERIAL_PART), "SerialPart");
    assert_eq!(submodel_name("plain"), "plain");
  }

  #[test]
  fn empty_bpn_filter_admits_everything() {
    let file = FixtureFile::from_slice(fixture("").as_bytes()).unwrap();
    let record = &file.records[0];
    assert!(record.matches_bpns(&[]));
    assert!(record.matches_bpns(&["BPNL001".to_string()]));
    assert!(!record.matches_bpns(&["BPNL999".to_string()]));
  }
}
