//! The fixed set of notification endpoints published in `ess` mode.

use strum::{EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum NotificationKind {
  /// Where suppliers deliver investigation responses.
  SupplierResponse,
  /// Mock receiver for incoming investigation requests.
  SupplierRequest,
  /// Receiver that forwards requests down the supply chain.
  SupplierRequestRecursive,
}

impl NotificationKind {
  pub fn all() -> impl Iterator<Item = Self> {
    Self::iter()
  }

  /// Connector asset id; also the catalog lookup key.
  pub fn asset_id(self) -> &'static str {
    match self {
      Self::SupplierResponse => "ess-response-asset",
      Self::SupplierRequest => "notify-request-asset",
      Self::SupplierRequestRecursive => "notify-request-asset-recursive",
    }
  }

  pub fn notification_type(self) -> &'static str {
    match self {
      Self::SupplierResponse => "ess-supplier-response",
      Self::SupplierRequest | Self::SupplierRequestRecursive => {
        "ess-supplier-request"
      }
    }
  }

  /// Path below the notification service base URL.
  pub fn path(self) -> &'static str {
    match self {
      Self::SupplierResponse => "/ess/notification/receive",
      Self::SupplierRequest => "/ess/mock/notification/receive",
      Self::SupplierRequestRecursive => "/ess/notification/receive-recursive",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn three_distinct_assets() {
    let ids: Vec<_> = NotificationKind::all().map(NotificationKind::asset_id).collect();
    assert_eq!(ids, vec![
      "ess-response-asset",
      "notify-request-asset",
      "notify-request-asset-recursive",
    ]);
  }
}
