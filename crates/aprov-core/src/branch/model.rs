use serde::{Deserialize, Serialize};

use crate::serde_ext::null_as_default;

/// A branch as listed by `/api/framework/environment/v1/branches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Branch {
    #[serde(deserialize_with = "null_as_default")]
    pub enterprise_group: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub unit_of_business: String,
    #[serde(deserialize_with = "null_as_default")]
    pub parent_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cgc: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
}

impl Branch {
    /// Trims the display fields the framework endpoint pads.
    pub fn normalized(self) -> Self {
        Self {
            code: self.code.trim().to_string(),
            description: self.description.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            enterprise_group: self.enterprise_group.trim().to_string(),
            company_code: self.company_code.trim().to_string(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_trims_display_fields() {
        let json = r#"{"EnterpriseGroup":"T1 ","CompanyCode":"D ","Code":"MG 01 ","Description":" Matriz ","City":"BH  ","Phone":" 123 "}"#;
        let branch: Branch = serde_json::from_str(json).unwrap();
        let branch = branch.normalized();
        assert_eq!(branch.code, "MG 01");
        assert_eq!(branch.description, "Matriz");
        assert_eq!(branch.enterprise_group, "T1");
        assert_eq!(branch.city, "BH");
        assert_eq!(branch.phone, " 123 ");
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let json = r#"{"Code": "02", "Description": null, "Phone": null}"#;
        let branch: Branch = serde_json::from_str(json).unwrap();
        assert_eq!(branch.code, "02");
        assert_eq!(branch.description, "");
        assert_eq!(branch.phone, "");
    }
}
