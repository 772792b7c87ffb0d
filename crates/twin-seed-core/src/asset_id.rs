//! Specific asset ids: secondary lookup keys attached to a shell.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{
  fixture::{FixtureRecord, PartAspect, first_document},
  shell::Reference,
};

/// Marker granting every participant read access to a v3 asset id.
pub const PUBLIC_READABLE: &str = "PUBLIC_READABLE";

/// A plain key/value pair as it appears in fixture `localIdentifiers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificAssetId {
  pub key:   String,
  pub value: String,
}

impl SpecificAssetId {
  pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self { key: key.into(), value: value.into() }
  }
}

/// The v3 rendering of a [`SpecificAssetId`], scoped to a set of readers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedAssetId {
  pub name:                String,
  pub value:               String,
  pub external_subject_id: Reference,
}

/// A specific asset id in the form the target registry schema expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RegisteredAssetId {
  Plain(SpecificAssetId),
  Scoped(ScopedAssetId),
}

/// Visibility reference: public plus each allowed BPN, in order.
pub fn visibility(allowed_bpns: &[String]) -> Reference {
  let mut values = vec![PUBLIC_READABLE.to_string()];
  values.extend(allowed_bpns.iter().cloned());
  Reference::external(values)
}

/// Wrap each id with the same visibility reference.
pub fn scoped(ids: &[SpecificAssetId], allowed_bpns: &[String]) -> Vec<RegisteredAssetId> {
  let subject = visibility(allowed_bpns);
  ids
    .iter()
    .map(|id| {
      RegisteredAssetId::Scoped(ScopedAssetId {
        name:                id.key.clone(),
        value:               id.value.clone(),
        external_subject_id: subject.clone(),
      })
    })
    .collect()
}

pub fn plain(ids: &[SpecificAssetId]) -> Vec<RegisteredAssetId> {
  ids.iter().cloned().map(RegisteredAssetId::Plain).collect()
}

// ─── Part identity ───────────────────────────────────────────────────────────

/// Naming and lookup data derived from a fixture record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartIdentity {
  /// `nameAtManufacturer` with spaces removed; empty if no part aspect is
  /// present.
  pub id_short:           String,
  pub specific_asset_ids: Vec<SpecificAssetId>,
}

impl PartIdentity {
  pub fn from_record(record: &FixtureRecord) -> Self {
    let mut identity = Self::default();
    let mut named = false;

    for (key, value) in &record.submodels {
      let Some(aspect) = PartAspect::of(key) else { continue };
      let Some(doc) = first_document(value) else { continue };
      let part_type = doc.get("partTypeInformation");

      if !named
        && let Some(name) = part_type
          .and_then(|p| p.get("nameAtManufacturer"))
          .and_then(Value::as_str)
      {
        identity.id_short = name.replace(' ', "");
        named = true;
      }

      match aspect {
        PartAspect::BatchOrSerial => {
          let locals = doc.get("localIdentifiers").and_then(Value::as_array);
          for entry in locals.into_iter().flatten() {
            match SpecificAssetId::deserialize(entry) {
              Ok(id) => identity.specific_asset_ids.push(id),
              Err(e) => warn!("Skipping local identifier {entry} of {}: {e}", record.catena_x_id),
            }
          }
        }
        PartAspect::AsPlanned => {
          if let Some(part_id) = part_type
            .and_then(|p| p.get("manufacturerPartId"))
            .and_then(Value::as_str)
          {
            identity
              .specific_asset_ids
              .push(SpecificAssetId::new("manufacturerPartId", part_id));
          }
        }
      }
    }

    let manufacturer = SpecificAssetId::new("manufacturerId", &record.bpnl);
    if !identity.specific_asset_ids.contains(&manufacturer) {
      identity.specific_asset_ids.push(manufacturer);
    }
    identity
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn record(value: Value) -> FixtureRecord {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn serial_part_identity() {
    let r = record(json!({
      "catenaXId": "urn:uuid:a",
      "bpnl": "BPNL001",
      "urn:bamm:io.catenax.serial_part:1.0.0#SerialPart": [{
        "localIdentifiers": [
          { "key": "partInstanceId", "value": "SN-1" },
          { "key": "manufacturerId", "value": "BPNL001" }
        ],
        "partTypeInformation": { "nameAtManufacturer": "Vehicle Combustion" }
      }]
    }));
    let id = PartIdentity::from_record(&r);
    assert_eq!(id.id_short, "VehicleCombustion");
    assert_eq!(id.specific_asset_ids, vec![
      SpecificAssetId::new("partInstanceId", "SN-1"),
      SpecificAssetId::new("manufacturerId", "BPNL001"),
    ]);
  }

  #[test]
  fn malformed_local_identifier_drops_only_itself() {
    let r = record(json!({
      "catenaXId": "urn:uuid:e",
      "bpnl": "BPNL005",
      "urn:x#Batch": [{
        "localIdentifiers": [
          { "key": "batchId", "value": "B-1" },
          { "key": "lotNumber", "value": 42 },
          { "key": "manufacturerId", "value": "BPNL005" }
        ]
      }]
    }));
    assert_eq!(PartIdentity::from_record(&r).specific_asset_ids, vec![
      SpecificAssetId::new("batchId", "B-1"),
      SpecificAssetId::new("manufacturerId", "BPNL005"),
    ]);
  }

  #[test]
  fn manufacturer_id_added_once() {
    let r = record(json!({
      "catenaXId": "urn:uuid:b",
      "bpnl": "BPNL002",
      "urn:bamm:io.catenax.part_as_planned:1.0.1#PartAsPlanned": [{
        "partTypeInformation": {
          "nameAtManufacturer": "Brake Disc",
          "manufacturerPartId": "MPI-7"
        }
      }]
    }));
    let id = PartIdentity::from_record(&r);
    assert_eq!(id.id_short, "BrakeDisc");
    assert_eq!(id.specific_asset_ids, vec![
      SpecificAssetId::new("manufacturerPartId", "MPI-7"),
      SpecificAssetId::new("manufacturerId", "BPNL002"),
    ]);
  }

  #[test]
  fn first_part_aspect_names_the_shell() {
    let r = record(json!({
      "catenaXId": "urn:uuid:c",
      "bpnl": "BPNL003",
      "urn:x#Batch": [{ "partTypeInformation": { "nameAtManufacturer": "First" } }],
      "urn:y#PartAsPlanned": [{ "partTypeInformation": { "nameAtManufacturer": "Second" } }]
    }));
    assert_eq!(PartIdentity::from_record(&r).id_short, "First");
  }

  #[test]
  fn record_without_aspects_still_has_manufacturer() {
    let r = record(json!({ "catenaXId": "urn:uuid:d", "bpnl": "BPNL004" }));
    let id = PartIdentity::from_record(&r);
    assert_eq!(id.id_short, "");
    assert_eq!(id.specific_asset_ids, vec![SpecificAssetId::new("manufacturerId", "BPNL004")]);
  }

  #[test]
  fn scoped_ids_carry_visibility() {
    let ids = vec![SpecificAssetId::new("manufacturerId", "BPNL001")];
    let rendered = serde_json::to_value(scoped(&ids, &["BPNL009".to_string()])).unwrap();
    assert_eq!(rendered, json!([{
      "name": "manufacturerId",
      "value": "BPNL001",
      "externalSubjectId": {
        "type": "ExternalReference",
        "keys": [
          { "type": "GlobalReference", "value": "PUBLIC_READABLE" },
          { "type": "GlobalReference", "value": "BPNL009" }
        ]
      }
    }]));
  }
}
