use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::paging::Page;

/// A line item of one document.
///
/// Purchase orders and purchase requests name a few fields differently; the
/// aliases fold both shapes into one struct. Anything else the server sends
/// is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentItem {
    #[serde(alias = "requestItem", alias = "purchaseOrderItem")]
    pub item_number: Option<String>,
    #[serde(alias = "itemProduct", alias = "itemSku")]
    pub product: Option<String>,
    pub item_sku_description: Option<String>,
    pub unit_measurement: Option<String>,
    pub quantity: Option<f64>,
    pub unit_value: Option<f64>,
    pub item_total: Option<f64>,
    pub currency: Option<String>,
    pub cost_center: Option<String>,
    pub group_aprov: Option<String>,
    pub item_group: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Raw item-list response. Purchase-order style endpoints answer with
/// `purchaseOrderItems`, the others with `records`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentItemsResponse {
    pub purchase_order_items: Option<Vec<DocumentItem>>,
    pub records: Option<Vec<DocumentItem>>,
    pub has_next: Option<bool>,
}

impl DocumentItemsResponse {
    /// Normalizes either response shape into one page.
    pub fn into_page(self) -> Page<DocumentItem> {
        let items = self
            .purchase_order_items
            .or(self.records)
            .unwrap_or_default();
        Page::new(items, self.has_next.unwrap_or(false))
    }
}
