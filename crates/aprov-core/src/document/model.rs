use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::{AprovError, Result};
use crate::serde_ext::null_as_default;

/// A unit of approval work as returned by the approvals list endpoint.
///
/// `document_branch` is kept byte-for-byte as the server returned it. Branch
/// codes are fixed-width padded on the host side and are only trimmed for
/// display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    #[serde(deserialize_with = "null_as_default")]
    pub scr_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub document_branch: String,
    #[serde(deserialize_with = "null_as_default")]
    pub document_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub document_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub document_status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub document_total: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub document_exchange_value: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub document_exchange_rate: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub document_currency: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub document_symbol: String,
    #[serde(deserialize_with = "null_as_default")]
    pub document_strong_symbol: String,
    #[serde(deserialize_with = "null_as_default")]
    pub document_user_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub document_group_aprov: String,
    #[serde(deserialize_with = "null_as_default")]
    pub document_item_group: String,
    #[serde(deserialize_with = "null_as_default")]
    pub document_created: String,
}

impl Document {
    /// Type code normalized for grouping: trimmed and upper-cased.
    pub fn type_key(&self) -> String {
        self.document_type.trim().to_uppercase()
    }

    /// Parsed document type, if the code belongs to the known set.
    pub fn kind(&self) -> Option<DocumentType> {
        DocumentType::from_str(self.document_type.trim()).ok()
    }

    /// Parsed workflow status, if the code belongs to the known set.
    pub fn status(&self) -> Option<DocumentStatus> {
        DocumentStatus::from_code(&self.document_status)
    }

    /// Only pending documents may be offered for selection.
    pub fn is_pending(&self) -> bool {
        self.status() == Some(DocumentStatus::Pending)
    }

    /// Branch code for display. Never use this as a payload or grouping key.
    pub fn display_branch(&self) -> &str {
        self.document_branch.trim()
    }
}

/// Closed set of document type codes served by the approvals API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum DocumentType {
    /// Purchase request
    #[strum(serialize = "SC")]
    #[serde(rename = "SC")]
    PurchaseRequest,
    /// Purchase order
    #[strum(serialize = "PC")]
    #[serde(rename = "PC")]
    PurchaseOrder,
    /// Purchase order item
    #[strum(serialize = "IP")]
    #[serde(rename = "IP")]
    PurchaseOrderItem,
    /// Delivery authorization
    #[strum(serialize = "AE")]
    #[serde(rename = "AE")]
    DeliveryAuthorization,
    /// Warehouse request
    #[strum(serialize = "SA")]
    #[serde(rename = "SA")]
    WarehouseRequest,
    /// Contract
    #[strum(serialize = "CT")]
    #[serde(rename = "CT")]
    Contract,
    /// Contract measurement
    #[strum(serialize = "MD")]
    #[serde(rename = "MD")]
    ContractMeasurement,
}

impl DocumentType {
    /// Parses a raw type code, ignoring case and surrounding whitespace.
    pub fn parse(code: &str) -> Result<Self> {
        Self::from_str(code.trim())
            .map_err(|_| AprovError::UnsupportedDocumentType(code.trim().to_string()))
    }

    /// Slug of the item-list sub-endpoint for this type.
    pub fn item_endpoint(&self) -> &'static str {
        match self {
            Self::PurchaseRequest => "purchaserequest",
            Self::PurchaseOrder | Self::PurchaseOrderItem | Self::DeliveryAuthorization => {
                "purchaseorder"
            }
            Self::WarehouseRequest => "warehouserequest",
            Self::Contract => "contracts",
            Self::ContractMeasurement => "contractmeasurement",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PurchaseRequest => "Purchase Request",
            Self::PurchaseOrder => "Purchase Order",
            Self::PurchaseOrderItem => "Purchase Order (Item)",
            Self::DeliveryAuthorization => "Delivery Authorization",
            Self::WarehouseRequest => "Warehouse Request",
            Self::Contract => "Contract",
            Self::ContractMeasurement => "Contract Measurement",
        }
    }

    /// Display label for a raw code, falling back to the code itself.
    pub fn label_for(code: &str) -> String {
        match Self::parse(code) {
            Ok(kind) => kind.label().to_string(),
            Err(_) if code.trim().is_empty() => "Document".to_string(),
            Err(_) => code.to_string(),
        }
    }
}

/// Workflow status codes used by the approvals list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[serde(rename = "02")]
    Pending,
    #[serde(rename = "03")]
    Approved,
    #[serde(rename = "06")]
    Rejected,
}

impl DocumentStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pending => "02",
            Self::Approved => "03",
            Self::Rejected => "06",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "02" => Some(Self::Pending),
            "03" => Some(Self::Approved),
            "06" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}
