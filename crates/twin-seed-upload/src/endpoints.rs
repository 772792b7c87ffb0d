//! Fixed paths of the services the uploader talks to.

const ASSETS: &str = "/management/v2/assets";
const POLICY_DEFINITIONS: &str = "/management/v2/policydefinitions";
const CONTRACT_DEFINITIONS: &str = "/management/v2/contractdefinitions";
const CATALOG: &str = "/management/v2/catalog/request";
const DSP: &str = "/api/v1/dsp";
pub(crate) const DATAPLANE_PUBLIC: &str = "/api/public";

/// Host used to simulate a supplier whose connector cannot be reached.
pub(crate) const UNREACHABLE_HOST: &str = "http://idonotexist";

pub(crate) fn assets(connector: &str) -> String {
  format!("{connector}{ASSETS}")
}

pub(crate) fn policy_definitions(connector: &str) -> String {
  format!("{connector}{POLICY_DEFINITIONS}")
}

pub(crate) fn contract_definitions(connector: &str) -> String {
  format!("{connector}{CONTRACT_DEFINITIONS}")
}

pub(crate) fn catalog(connector: &str) -> String {
  format!("{connector}{CATALOG}")
}

/// Dataspace protocol endpoint catalog requests are addressed to.
pub(crate) fn dsp(connector: &str) -> String {
  format!("{connector}{DSP}")
}

/// Submodel server location for one submodel payload.
pub(crate) fn submodel_data(server: &str, submodel_id: &str) -> String {
  format!("{server}/data/{submodel_id}")
}
