//! Cost-center apportionment (rateio) lookup through the generic query API.
//!
//! Purchase requests keep their split in `SCX`, purchase orders in `SCH`.
//! Both are joined with the cost-center table `CTT` for its description and
//! with the document's own item table for the product description.

use super::model::DocumentType;
use crate::error::{AprovError, Result};

/// Which apportionment table a document's split lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApportionmentSource {
    /// `SCX` joined with `SC1`
    PurchaseRequest,
    /// `SCH` joined with `SC7`
    PurchaseOrder,
}

impl ApportionmentSource {
    /// Only purchase requests and the purchase order family carry a split.
    pub fn for_type(document_type: DocumentType) -> Result<Self> {
        match document_type {
            DocumentType::PurchaseRequest => Ok(Self::PurchaseRequest),
            DocumentType::PurchaseOrder
            | DocumentType::PurchaseOrderItem
            | DocumentType::DeliveryAuthorization => Ok(Self::PurchaseOrder),
            other => Err(AprovError::UnsupportedDocumentType(other.to_string())),
        }
    }

    fn tables(&self) -> &'static str {
        match self {
            Self::PurchaseRequest => "SCX,CTT,SC1",
            Self::PurchaseOrder => "SCH,CTT,SC7",
        }
    }

    /// Column prefix of the apportionment table.
    fn prefix(&self) -> &'static str {
        match self {
            Self::PurchaseRequest => "cx",
            Self::PurchaseOrder => "ch",
        }
    }

    fn fields(&self) -> String {
        let p = self.prefix();
        let (document, document_item, description) = match self {
            Self::PurchaseRequest => ("solicit", "itemsol", "c1_descri"),
            Self::PurchaseOrder => ("pedido", "itempd", "c7_descri"),
        };

        let mut fields = vec![
            format!("{p}_{document}"),
            format!("{p}_{document_item}"),
            format!("{p}_item"),
            format!("{p}_perc"),
            format!("{p}_cc"),
            format!("{p}_conta"),
            format!("{p}_itemcta"),
            format!("{p}_clvl"),
        ];
        for entity in 5..=9 {
            fields.push(format!("{p}_ec{entity:02}db"));
            fields.push(format!("{p}_ec{entity:02}cr"));
        }
        fields.push("ctt_desc01".to_string());
        fields.push(description.to_string());
        fields.join(",")
    }

    fn where_clause(&self, document_number: &str) -> String {
        match self {
            Self::PurchaseRequest => format!(
                "SCX.D_E_L_E_T_=' ' AND CTT.D_E_L_E_T_=' ' AND SC1.D_E_L_E_T_=' ' \
                 AND CTT.CTT_CUSTO = SCX.CX_CC AND CTT.CTT_FILIAL = SCX.CX_FILIAL \
                 AND SC1.C1_NUM = SCX.CX_SOLICIT AND SC1.C1_ITEM = SCX.CX_ITEMSOL \
                 AND SC1.C1_FILIAL = SCX.CX_FILIAL AND SCX.CX_SOLICIT LIKE '%{}%'",
                document_number
            ),
            Self::PurchaseOrder => format!(
                "SCH.D_E_L_E_T_=' ' AND CTT.D_E_L_E_T_=' ' AND SC7.D_E_L_E_T_=' ' \
                 AND CTT.CTT_CUSTO = SCH.CH_CC AND CTT.CTT_FILIAL = SCH.CH_FILIAL \
                 AND SC7.C7_NUM = SCH.CH_PEDIDO AND SC7.C7_ITEM = SCH.CH_ITEMPD \
                 AND SC7.C7_FILIAL = SCH.CH_FILIAL AND SCH.CH_PEDIDO LIKE '%{}%'",
                document_number
            ),
        }
    }
}

/// A generic-query request for one document's apportionment lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApportionmentQuery {
    pub source: ApportionmentSource,
    pub document_number: String,
}

impl ApportionmentQuery {
    /// The document number is trimmed and single quotes are doubled, since it
    /// is embedded in a SQL literal.
    pub fn new(document_type: DocumentType, document_number: &str) -> Result<Self> {
        Ok(Self {
            source: ApportionmentSource::for_type(document_type)?,
            document_number: document_number.trim().replace('\'', "''"),
        })
    }

    /// Query parameters for `page`. The generic query API spells the size
    /// parameter in lower case.
    pub fn to_query(&self, page: u32, page_size: u32) -> Vec<(&'static str, String)> {
        vec![
            ("tables", self.source.tables().to_string()),
            ("fields", self.source.fields()),
            ("where", self.source.where_clause(&self.document_number)),
            ("page", page.to_string()),
            ("pagesize", page_size.to_string()),
            ("filialFilter", "true".to_string()),
            ("deletedFilter", "true".to_string()),
        ]
    }
}
