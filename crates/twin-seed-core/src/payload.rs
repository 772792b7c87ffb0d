//! Connector management API payloads: assets, contract definitions and
//! catalog queries.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::notification::NotificationKind;

/// Property IRI matched by id-based asset selectors.
pub const EDC_ID: &str = "https://w3id.org/edc/v0.0.1/ns/id";
/// Property IRI matched by type-based catalog filters.
pub const EDC_TYPE: &str = "https://w3id.org/edc/v0.0.1/ns/type";
/// Asset type advertised by the digital twin registry asset.
pub const REGISTRY_ASSET_TYPE: &str = "data.core.digitalTwinRegistry";
/// Connector-side id of the registry asset.
pub const REGISTRY_ASSET_ID: &str = "registry-asset";

fn empty_context() -> Map<String, Value> {
  Map::new()
}

/// JSON-LD prefixes used by catalog requests.
pub fn edc_context() -> Map<String, Value> {
  let ctx = json!({
    "dct": "https://purl.org/dc/terms/",
    "tx": "https://w3id.org/tractusx/v0.0.1/ns/",
    "edc": "https://w3id.org/edc/v0.0.1/ns/",
    "odrl": "http://www.w3.org/ns/odrl/2/",
    "dcat": "https://www.w3.org/ns/dcat/",
    "dspace": "https://w3id.org/dspace/v0.8/"
  });
  match ctx {
    Value::Object(map) => map,
    _ => Map::new(),
  }
}

// ─── Data addresses ──────────────────────────────────────────────────────────

/// Proxy switch as the management API expects it: a `"true"`/`"false"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Proxy {
  #[serde(rename = "true")]
  On,
  #[serde(rename = "false")]
  Off,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpDataAddress {
  #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
  pub json_ld_type:       Option<&'static str>,
  #[serde(rename = "type")]
  pub transfer_type:      &'static str,
  pub base_url:           String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub proxy_path:         Option<Proxy>,
  pub proxy_body:         Proxy,
  pub proxy_method:       Proxy,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub proxy_query_params: Option<Proxy>,
}

/// Pre-JSON-LD data address used by the certificate service asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyHttpDataAddress {
  pub base_url:      String,
  #[serde(rename = "type")]
  pub transfer_type: &'static str,
  pub proxy_body:    bool,
  pub proxy_method:  bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DataAddress {
  Http(HttpDataAddress),
  Legacy { properties: LegacyHttpDataAddress },
}

// ─── Assets ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetEntry {
  #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
  pub json_ld_type: Option<&'static str>,
  #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
  pub id:           Option<String>,
  pub properties:   Map<String, Value>,
}

/// Body of `POST /management/v2/assets`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRequest {
  #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
  pub context:      Option<Map<String, Value>>,
  pub asset:        AssetEntry,
  pub data_address: DataAddress,
}

fn properties<const N: usize>(pairs: [(&str, &str); N]) -> Map<String, Value> {
  pairs
    .into_iter()
    .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
    .collect()
}

impl AssetRequest {
  /// An asset proxying path requests to a submodel server.
  pub fn submodel(submodel_url: &str, asset_id: &str) -> Self {
    Self {
      context:      Some(empty_context()),
      asset:        AssetEntry {
        json_ld_type: Some("Asset"),
        id:           Some(asset_id.to_string()),
        properties:   properties([("description", "IRS EDC Test Asset")]),
      },
      data_address: DataAddress::Http(HttpDataAddress {
        json_ld_type:       Some("DataAddress"),
        transfer_type:      "HttpData",
        base_url:           submodel_url.to_string(),
        proxy_path:         Some(Proxy::On),
        proxy_body:         Proxy::Off,
        proxy_method:       Proxy::Off,
        proxy_query_params: Some(Proxy::Off),
      }),
    }
  }

  /// The digital twin registry asset; fully proxied so lookups and searches
  /// pass through.
  pub fn registry(registry_url: &str, asset_id: &str) -> Self {
    Self {
      context:      Some(empty_context()),
      asset:        AssetEntry {
        json_ld_type: Some("Asset"),
        id:           Some(asset_id.to_string()),
        properties:   properties([
          ("type", REGISTRY_ASSET_TYPE),
          ("description", "Digital Twin Registry Endpoint of IRS DEV"),
        ]),
      },
      data_address: DataAddress::Http(HttpDataAddress {
        json_ld_type:       Some("DataAddress"),
        transfer_type:      "HttpData",
        base_url:           registry_url.to_string(),
        proxy_path:         Some(Proxy::On),
        proxy_body:         Proxy::On,
        proxy_method:       Proxy::On,
        proxy_query_params: Some(Proxy::On),
      }),
    }
  }

  pub fn notification(endpoint_url: &str, kind: NotificationKind) -> Self {
    Self {
      context:      Some(empty_context()),
      asset:        AssetEntry {
        json_ld_type: None,
        id:           Some(kind.asset_id().to_string()),
        properties:   properties([
          ("description", "ESS notification endpoint"),
          ("contenttype", "application/json"),
          ("notificationtype", kind.notification_type()),
          ("notificationmethod", "receive"),
        ]),
      },
      data_address: DataAddress::Http(HttpDataAddress {
        json_ld_type:       None,
        transfer_type:      "HttpData",
        base_url:           endpoint_url.to_string(),
        proxy_path:         None,
        proxy_body:         Proxy::On,
        proxy_method:       Proxy::On,
        proxy_query_params: None,
      }),
    }
  }

  /// An asset serving the ISO 14001 certificate of `catena_x_id` from the
  /// certificate service.
  pub fn certificate(esr_url: &str, asset_id: &str, catena_x_id: &str) -> Self {
    Self {
      context:      None,
      asset:        AssetEntry {
        json_ld_type: None,
        id:           None,
        properties:   properties([
          ("asset:prop:id", asset_id),
          ("asset:prop:description", "product description"),
          ("asset:prop:contenttype", "application/json"),
        ]),
      },
      data_address: DataAddress::Legacy {
        properties: LegacyHttpDataAddress {
          base_url:      certificate_url(esr_url, catena_x_id),
          transfer_type: "HttpData",
          proxy_body:    true,
          proxy_method:  true,
        },
      },
    }
  }
}

/// Certificate service address for one part.
pub fn certificate_url(esr_url: &str, catena_x_id: &str) -> String {
  format!("{esr_url}/{catena_x_id}/asBuilt/ISO14001/submodel")
}

// ─── Contract definitions ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
  #[serde(rename = "@type")]
  pub json_ld_type:  &'static str,
  pub operand_left:  &'static str,
  pub operator:      &'static str,
  pub operand_right: String,
}

/// Body of `POST /management/v2/contractdefinitions`: offers one asset under
/// one policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDefinition {
  #[serde(rename = "@context")]
  pub context:            Map<String, Value>,
  #[serde(rename = "@type")]
  pub json_ld_type:       &'static str,
  pub access_policy_id:   String,
  pub contract_policy_id: String,
  pub assets_selector:    Criterion,
}

impl ContractDefinition {
  pub fn new(policy_id: &str, asset_id: &str) -> Self {
    Self {
      context:            empty_context(),
      json_ld_type:       "ContractDefinition",
      access_policy_id:   policy_id.to_string(),
      contract_policy_id: policy_id.to_string(),
      assets_selector:    Criterion {
        json_ld_type:  "CriterionDto",
        operand_left:  EDC_ID,
        operator:      "=",
        operand_right: asset_id.to_string(),
      },
    }
  }
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogCriterion {
  #[serde(rename = "@type")]
  pub json_ld_type:  &'static str,
  #[serde(rename = "edc:operandLeft")]
  pub operand_left:  &'static str,
  #[serde(rename = "edc:operator")]
  pub operator:      &'static str,
  #[serde(rename = "edc:operandRight")]
  pub operand_right: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuerySpec {
  #[serde(rename = "edc:filterExpression")]
  pub filter_expression: CatalogCriterion,
}

/// Body of `POST /management/v2/catalog/request`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogRequest {
  #[serde(rename = "@context")]
  pub context:      Map<String, Value>,
  #[serde(rename = "edc:protocol")]
  pub protocol:     &'static str,
  #[serde(rename = "edc:providerUrl")]
  pub provider_url: String,
  #[serde(rename = "edc:querySpec")]
  pub query_spec:   QuerySpec,
}

/// What a catalog lookup filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFilter<'a> {
  Type(&'a str),
  Id(&'a str),
}

impl CatalogRequest {
  pub fn new(provider_url: &str, filter: CatalogFilter<'_>) -> Self {
    let (operand_left, operand_right) = match filter {
      CatalogFilter::Type(t) => (EDC_TYPE, t),
      CatalogFilter::Id(id) => (EDC_ID, id),
    };
    Self {
      context:      edc_context(),
      protocol:     "dataspace-protocol-http",
      provider_url: provider_url.to_string(),
      query_spec:   QuerySpec {
        filter_expression: CatalogCriterion {
          json_ld_type: "edc:Criterion",
          operand_left,
          operator: "=",
          operand_right: operand_right.to_string(),
        },
      },
    }
  }
}

/// Whether a catalog response lists at least one dataset. A single dataset
/// is returned as an object rather than a one-element array.
pub fn catalog_has_offers(catalog: &Value) -> bool {
  match catalog.get("dcat:dataset") {
    Some(Value::Array(items)) => !items.is_empty(),
    Some(Value::Object(fields)) => !fields.is_empty(),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn submodel_asset_shape() {
    let v = serde_json::to_value(AssetRequest::submodel("http://sub", "a-1")).unwrap();
    assert_eq!(v, json!({
      "@context": {},
      "asset": {
        "@type": "Asset",
        "@id": "a-1",
        "properties": { "description": "IRS EDC Test Asset" }
      },
      "dataAddress": {
        "@type": "DataAddress",
        "type": "HttpData",
        "baseUrl": "http://sub",
        "proxyPath": "true",
        "proxyBody": "false",
        "proxyMethod": "false",
        "proxyQueryParams": "false"
      }
    }));
  }

  #[test]
  fn notification_asset_omits_path_proxying() {
    let v = serde_json::to_value(AssetRequest::notification(
      "http://ess/ess/notification/receive",
      NotificationKind::SupplierResponse,
    ))
    .unwrap();
    assert_eq!(v["asset"]["@id"], "ess-response-asset");
    assert_eq!(v["asset"]["properties"]["notificationtype"], "ess-supplier-response");
    assert!(v["asset"].get("@type").is_none());
    assert!(v["dataAddress"].get("proxyPath").is_none());
    assert_eq!(v["dataAddress"]["proxyBody"], "true");
  }

  #[test]
  fn certificate_asset_uses_legacy_layout() {
    let v = serde_json::to_value(AssetRequest::certificate("http://esr", "a-2", "urn:uuid:c")).unwrap();
    assert!(v.get("@context").is_none());
    assert_eq!(v["asset"]["properties"]["asset:prop:id"], "a-2");
    assert_eq!(
      v["dataAddress"]["properties"]["baseUrl"],
      "http://esr/urn:uuid:c/asBuilt/ISO14001/submodel"
    );
    assert_eq!(v["dataAddress"]["properties"]["proxyBody"], true);
  }

  #[test]
  fn contract_definition_selects_asset() {
    let v = serde_json::to_value(ContractDefinition::new("default-policy", "a-3")).unwrap();
    assert_eq!(v["accessPolicyId"], "default-policy");
    assert_eq!(v["contractPolicyId"], "default-policy");
    assert_eq!(v["assetsSelector"]["operandLeft"], EDC_ID);
    assert_eq!(v["assetsSelector"]["operandRight"], "a-3");
  }

  #[test]
  fn catalog_request_filters() {
    let v = serde_json::to_value(CatalogRequest::new(
      "http://edc/api/v1/dsp",
      CatalogFilter::Type(REGISTRY_ASSET_TYPE),
    ))
    .unwrap();
    let filter = &v["edc:querySpec"]["edc:filterExpression"];
    assert_eq!(v["edc:providerUrl"], "http://edc/api/v1/dsp");
    assert_eq!(filter["edc:operandLeft"], EDC_TYPE);
    assert_eq!(filter["edc:operandRight"], REGISTRY_ASSET_TYPE);
    assert_eq!(v["@context"]["edc"], "https://w3id.org/edc/v0.0.1/ns/");
  }

  #[test]
  fn catalog_offers() {
    assert!(catalog_has_offers(&json!({ "dcat:dataset": [{ "@id": "x" }] })));
    assert!(catalog_has_offers(&json!({ "dcat:dataset": { "@id": "x" } })));
    assert!(!catalog_has_offers(&json!({ "dcat:dataset": [] })));
    assert!(!catalog_has_offers(&json!({})));
  }
}
