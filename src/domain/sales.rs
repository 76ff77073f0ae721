// Sales domain models and seed data
use serde::{Deserialize, Serialize};

/// A single sales record shown in the spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub product: String,
    pub region: String,
    pub month: String,
    pub revenue: f64,
    pub marketing_spend: f64,
    /// Customer acquisition cost
    pub cac: f64,
}

impl Sale {
    pub fn new(
        id: impl Into<String>,
        product: impl Into<String>,
        region: impl Into<String>,
        month: impl Into<String>,
        revenue: f64,
        marketing_spend: f64,
        cac: f64,
    ) -> Self {
        Self {
            id: id.into(),
            product: product.into(),
            region: region.into(),
            month: month.into(),
            revenue,
            marketing_spend,
            cac,
        }
    }

    /// Placeholder row appended by the spreadsheet's "add row" action
    pub fn blank() -> Self {
        Self::new(
            uuid::Uuid::new_v4().to_string(),
            "New Item",
            "N/A",
            "N/A",
            0.0,
            0.0,
            0.0,
        )
    }
}

/// Reduced sales shape exchanged with the cleaning and forecasting flows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleSummary {
    pub product: String,
    pub region: String,
    pub revenue: f64,
    pub month: String,
}

impl From<&Sale> for SaleSummary {
    fn from(sale: &Sale) -> Self {
        Self {
            product: sale.product.clone(),
            region: sale.region.clone(),
            revenue: sale.revenue,
            month: sale.month.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    A,
    B,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbTestResult {
    pub variant: Variant,
    pub users: u32,
    pub conversions: u32,
    pub marketing_spend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfScenario {
    pub name: String,
    pub pessimistic: f64,
    pub neutral: f64,
    pub optimistic: f64,
}

/// The raw quarterly report uploaded at the start of the demo.
/// Casing is intentionally inconsistent so the cleaning step has work to do.
pub fn seed_sales() -> Vec<Sale> {
    vec![
        Sale::new("sale-1", "Gadget X", "North", "January", 15000.0, 2000.0, 133.33),
        Sale::new("sale-2", "Widget Y", "south", "January", 12000.0, 1500.0, 125.00),
        Sale::new("sale-3", "gizmo z", "East", "january", 18000.0, 2500.0, 138.89),
        Sale::new("sale-4", "Gadget X", "West", "January", 9000.0, 1200.0, 133.33),
        Sale::new("sale-5", "Gadget X", "North", "February", 16000.0, 2200.0, 137.50),
        Sale::new("sale-6", "Widget Y", "South", "February", 13000.0, 1800.0, 138.46),
        Sale::new("sale-7", "Gizmo Z", "East", "February", 17500.0, 2300.0, 131.43),
        Sale::new("sale-8", "Widget Y", "West", "February", 10500.0, 1400.0, 133.33),
        Sale::new("sale-9", "gadget x", "North", "March", 17000.0, 2400.0, 141.18),
        Sale::new("sale-10", "Widget Y", "South", "March", 14000.0, 1900.0, 135.71),
        Sale::new("sale-11", "Gizmo Z", "EAST", "March", 19000.0, 2800.0, 147.37),
        Sale::new("sale-12", "Gadget X", "West", "March", 11000.0, 1500.0, 136.36),
        Sale::new("sale-13", "Gizmo Z", "North", "April", 20000.0, 3000.0, 150.00),
        Sale::new("sale-14", "Widget Y", "South", "April", 15000.0, 2000.0, 133.33),
        Sale::new("sale-15", "Gadget X", "East", "April", 21000.0, 3200.0, 152.38),
    ]
}

/// Fixed three month projection; no forecasting model runs in the demo.
pub fn mock_forecast() -> Vec<Sale> {
    vec![
        Sale::new("forecast-1", "Forecast", "All", "May", 23000.0, 3300.0, 155.0),
        Sale::new("forecast-2", "Forecast", "All", "June", 25500.0, 3500.0, 158.0),
        Sale::new("forecast-3", "Forecast", "All", "July", 24000.0, 3400.0, 156.0),
    ]
}

pub fn seed_ab_test() -> Vec<AbTestResult> {
    vec![
        AbTestResult {
            variant: Variant::A,
            users: 1024,
            conversions: 82,
            marketing_spend: 500.0,
        },
        AbTestResult {
            variant: Variant::B,
            users: 1012,
            conversions: 121,
            marketing_spend: 550.0,
        },
    ]
}

pub fn seed_what_if() -> Vec<WhatIfScenario> {
    vec![
        WhatIfScenario {
            name: "Q3 Forecast".to_string(),
            pessimistic: 180000.0,
            neutral: 220000.0,
            optimistic: 260000.0,
        },
        WhatIfScenario {
            name: "Q4 Forecast".to_string(),
            pessimistic: 200000.0,
            neutral: 250000.0,
            optimistic: 310000.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_sales_shape() {
        let sales = seed_sales();
        assert_eq!(sales.len(), 15);
        assert_eq!(sales[0].id, "sale-1");
        assert_eq!(sales[14].id, "sale-15");
    }

    #[test]
    fn test_sale_wire_names() {
        let json = serde_json::to_value(&seed_sales()[0]).unwrap();
        assert_eq!(json["marketingSpend"], 2000.0);
        assert_eq!(json["cac"], 133.33);
    }

    #[test]
    fn test_blank_rows_get_unique_ids() {
        let a = Sale::blank();
        let b = Sale::blank();
        assert_ne!(a.id, b.id);
        assert_eq!(a.product, "New Item");
        assert_eq!(a.revenue, 0.0);
    }
}
