//! Registry documents: shells and the submodel descriptors they embed.
//!
//! Two registry schemas are supported. [`ShellSchema::V2`] addresses submodels
//! directly through the connector; [`ShellSchema::V3`] routes every submodel
//! through a connector data plane and advertises the DSP endpoint alongside.

use serde::Serialize;

use crate::asset_id::RegisteredAssetId;

/// Registry schema generation targeted by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShellSchema {
  #[default]
  V2,
  V3,
}

impl ShellSchema {
  /// Path of the shell collection below the registry base URL.
  pub fn registry_path(self) -> &'static str {
    match self {
      Self::V2 => "/registry/shell-descriptors",
      Self::V3 => "/shell-descriptors",
    }
  }
}

// ─── References ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceKey {
  #[serde(rename = "type")]
  pub kind:  String,
  pub value: String,
}

/// An `ExternalReference` made of `GlobalReference` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
  #[serde(rename = "type")]
  pub kind: String,
  pub keys: Vec<ReferenceKey>,
}

impl Reference {
  pub fn external(values: impl IntoIterator<Item = String>) -> Self {
    Self {
      kind: "ExternalReference".to_string(),
      keys: values
        .into_iter()
        .map(|value| ReferenceKey { kind: "GlobalReference".to_string(), value })
        .collect(),
    }
  }
}

/// A `{"value": [...]}` wrapper used by v2 documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueList {
  pub value: Vec<String>,
}

impl ValueList {
  pub fn single(value: impl Into<String>) -> Self {
    Self { value: vec![value.into()] }
  }
}

// ─── Submodel descriptors ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolInformationV2 {
  pub endpoint_address:          String,
  pub endpoint_protocol:         &'static str,
  pub endpoint_protocol_version: &'static str,
  pub subprotocol:               &'static str,
  pub subprotocol_body:          &'static str,
  pub subprotocol_body_encoding: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointV2 {
  pub interface:            &'static str,
  pub protocol_information: ProtocolInformationV2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmodelDescriptorV2 {
  pub description:    Vec<String>,
  pub id_short:       String,
  pub identification: String,
  pub semantic_id:    ValueList,
  pub endpoints:      Vec<EndpointV2>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityAttribute {
  #[serde(rename = "type")]
  pub kind:  &'static str,
  pub key:   &'static str,
  pub value: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolInformationV3 {
  pub href:                      String,
  pub endpoint_protocol:         &'static str,
  pub endpoint_protocol_version: Vec<&'static str>,
  pub subprotocol:               &'static str,
  pub subprotocol_body:          String,
  pub subprotocol_body_encoding: &'static str,
  pub security_attributes:       Vec<SecurityAttribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointV3 {
  pub interface:            &'static str,
  pub protocol_information: ProtocolInformationV3,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmodelDescriptorV3 {
  pub description: Vec<String>,
  pub id_short:    String,
  pub id:          String,
  pub semantic_id: Reference,
  pub endpoints:   Vec<EndpointV3>,
}

/// A descriptor in either registry schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SubmodelDescriptor {
  V2(SubmodelDescriptorV2),
  V3(SubmodelDescriptorV3),
}

impl SubmodelDescriptor {
  /// Descriptor pointing straight at a connector-served submodel address.
  pub fn direct(
    id_short: &str,
    identification: &str,
    semantic_id: &str,
    endpoint_address: String,
  ) -> Self {
    Self::V2(SubmodelDescriptorV2 {
      description:    vec![],
      id_short:       id_short.to_string(),
      identification: identification.to_string(),
      semantic_id:    ValueList::single(semantic_id),
      endpoints:      vec![EndpointV2 {
        interface:            "HTTP",
        protocol_information: ProtocolInformationV2 {
          endpoint_address,
          endpoint_protocol:         "AAS/IDS",
          endpoint_protocol_version: "0.1",
          subprotocol:               "IDS",
          subprotocol_body:          "TDB",
          subprotocol_body_encoding: "plain",
        },
      }],
    })
  }

  /// Descriptor pointing at a data-plane address, negotiated through
  /// `asset_id` on the control plane at `dsp_endpoint`.
  pub fn proxied(
    id_short: &str,
    id: &str,
    semantic_id: &str,
    href: String,
    asset_id: &str,
    dsp_endpoint: &str,
  ) -> Self {
    Self::V3(SubmodelDescriptorV3 {
      description: vec![],
      id_short:    id_short.to_string(),
      id:          id.to_string(),
      semantic_id: Reference::external([semantic_id.to_string()]),
      endpoints:   vec![EndpointV3 {
        interface:            "SUBMODEL-3.0",
        protocol_information: ProtocolInformationV3 {
          href,
          endpoint_protocol:         "HTTP",
          endpoint_protocol_version: vec!["1.1"],
          subprotocol:               "DSP",
          subprotocol_body:          format!("id={asset_id};dspEndpoint={dsp_endpoint}"),
          subprotocol_body_encoding: "plain",
          security_attributes:       vec![SecurityAttribute {
            kind:  "NONE",
            key:   "NONE",
            value: "NONE",
          }],
        },
      }],
    })
  }

  pub fn endpoint_address(&self) -> &str {
    match self {
      Self::V2(d) => &d.endpoints[0].protocol_information.endpoint_address,
      Self::V3(d) => &d.endpoints[0].protocol_information.href,
    }
  }
}

// ─── Shells ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellV2 {
  pub description:          Vec<String>,
  pub global_asset_id:      ValueList,
  pub id_short:             String,
  pub identification:       String,
  pub specific_asset_ids:   Vec<RegisteredAssetId>,
  pub submodel_descriptors: Vec<SubmodelDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellV3 {
  pub description:          Vec<String>,
  pub global_asset_id:      String,
  pub id_short:             String,
  pub id:                   String,
  pub specific_asset_ids:   Vec<RegisteredAssetId>,
  pub submodel_descriptors: Vec<SubmodelDescriptor>,
}

/// A digital twin shell document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Shell {
  V2(ShellV2),
  V3(ShellV3),
}

impl Shell {
  pub fn new(
    schema: ShellSchema,
    global_asset_id: &str,
    id_short: String,
    identification: String,
    specific_asset_ids: Vec<RegisteredAssetId>,
    submodel_descriptors: Vec<SubmodelDescriptor>,
  ) -> Self {
    match schema {
      ShellSchema::V2 => Self::V2(ShellV2 {
        description: vec![],
        global_asset_id: ValueList::single(global_asset_id),
        id_short,
        identification,
        specific_asset_ids,
        submodel_descriptors,
      }),
      ShellSchema::V3 => Self::V3(ShellV3 {
        description: vec![],
        global_asset_id: global_asset_id.to_string(),
        id_short,
        id: identification,
        specific_asset_ids,
        submodel_descriptors,
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn direct_descriptor_shape() {
    let d = SubmodelDescriptor::direct(
      "SerialPart",
      "urn:uuid:s1",
      "urn:bamm:io.catenax.serial_part:1.0.0#SerialPart",
      "http://edc/urn:uuid:c-urn:uuid:s1/submodel".to_string(),
    );
    let v = serde_json::to_value(&d).unwrap();
    assert_eq!(v["identification"], "urn:uuid:s1");
    assert_eq!(v["semanticId"], json!({ "value": ["urn:bamm:io.catenax.serial_part:1.0.0#SerialPart"] }));
    assert_eq!(v["endpoints"][0]["interface"], "HTTP");
    assert_eq!(
      v["endpoints"][0]["protocolInformation"]["endpointAddress"],
      "http://edc/urn:uuid:c-urn:uuid:s1/submodel"
    );
  }

  #[test]
  fn proxied_descriptor_advertises_dsp() {
    let d = SubmodelDescriptor::proxied(
      "SerialPart",
      "urn:uuid:s1",
      "urn:x#SerialPart",
      "http://dp/api/public/data/urn:uuid:s1".to_string(),
      "urn:uuid:asset",
      "http://edc",
    );
    let v = serde_json::to_value(&d).unwrap();
    let info = &v["endpoints"][0]["protocolInformation"];
    assert_eq!(v["id"], "urn:uuid:s1");
    assert_eq!(v["semanticId"]["keys"][0]["value"], "urn:x#SerialPart");
    assert_eq!(info["subprotocolBody"], "id=urn:uuid:asset;dspEndpoint=http://edc");
    assert_eq!(info["endpointProtocolVersion"], json!(["1.1"]));
    assert_eq!(d.endpoint_address(), "http://dp/api/public/data/urn:uuid:s1");
  }

  #[test]
  fn shell_schemas_differ_in_id_fields() {
    let v2 = serde_json::to_value(Shell::new(
      ShellSchema::V2, "urn:uuid:g", "Part".into(), "urn:uuid:i".into(), vec![], vec![],
    ))
    .unwrap();
    assert_eq!(v2["globalAssetId"], json!({ "value": ["urn:uuid:g"] }));
    assert_eq!(v2["identification"], "urn:uuid:i");

    let v3 = serde_json::to_value(Shell::new(
      ShellSchema::V3, "urn:uuid:g", "Part".into(), "urn:uuid:i".into(), vec![], vec![],
    ))
    .unwrap();
    assert_eq!(v3["globalAssetId"], "urn:uuid:g");
    assert_eq!(v3["id"], "urn:uuid:i");
    assert!(v3.get("identification").is_none());
  }
}
