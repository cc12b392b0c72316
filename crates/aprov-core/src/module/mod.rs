//! Back-office modules the user can switch between.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub route: String,
}

impl ModuleItem {
    fn new(id: &str, name: &str, description: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            route: format!("/(tabs)/{}", id),
        }
    }
}

/// The fixed module list. The server exposes no endpoint for it.
pub fn default_modules() -> Vec<ModuleItem> {
    vec![
        ModuleItem::new(
            "purchasing",
            "Purchasing",
            "Purchase requests and purchase orders.",
            "cart-outline",
        ),
        ModuleItem::new(
            "finance",
            "Finance",
            "Payables, receivables and cash flow.",
            "cash-outline",
        ),
        ModuleItem::new(
            "stock",
            "Stock",
            "Product and material movements.",
            "cube-outline",
        ),
        ModuleItem::new("hr", "HR", "Employees and payroll.", "people-outline"),
        ModuleItem::new(
            "controladoria",
            "Controllership",
            "Costs, result centers and analysis.",
            "analytics-outline",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_modules() {
        let modules = default_modules();
        assert_eq!(modules.len(), 5);
        assert_eq!(modules[0].id, "purchasing");
        assert_eq!(modules[0].route, "/(tabs)/purchasing");
    }
}
