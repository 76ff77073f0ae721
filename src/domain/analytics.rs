// Aggregations behind the pivot table, charts, KPI cards and A/B report
use super::sales::{AbTestResult, Sale, Variant};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Capitalize every space separated word: "gadget x" -> "Gadget X"
pub fn normalize_product(name: &str) -> String {
    name.trim()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first letter only: "EAST" -> "East"
pub fn normalize_region(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotRow {
    pub product: String,
    /// Revenue per region, in the same order as `PivotTable::regions`
    pub cells: Vec<f64>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotTable {
    pub regions: Vec<String>,
    pub rows: Vec<PivotRow>,
    pub grand_total: PivotRow,
}

pub const GRAND_TOTAL_LABEL: &str = "Grand Total";

/// Cross-tabulate revenue by normalized product (rows) and region (columns).
/// Returns `None` for an empty data set.
pub fn pivot_revenue(sales: &[Sale]) -> Option<PivotTable> {
    if sales.is_empty() {
        return None;
    }

    let mut sums: BTreeMap<(String, String), f64> = BTreeMap::new();
    let mut products = BTreeSet::new();
    let mut regions = BTreeSet::new();

    for sale in sales {
        let product = normalize_product(&sale.product);
        let region = normalize_region(&sale.region);
        *sums.entry((product.clone(), region.clone())).or_default() += sale.revenue;
        products.insert(product);
        regions.insert(region);
    }

    let regions: Vec<String> = regions.into_iter().collect();
    let mut column_totals = vec![0.0; regions.len()];

    let rows: Vec<PivotRow> = products
        .into_iter()
        .map(|product| {
            let cells: Vec<f64> = regions
                .iter()
                .map(|region| {
                    sums.get(&(product.clone(), region.clone()))
                        .copied()
                        .unwrap_or(0.0)
                })
                .collect();
            for (total, cell) in column_totals.iter_mut().zip(&cells) {
                *total += cell;
            }
            let total = cells.iter().sum();
            PivotRow { product, cells, total }
        })
        .collect();

    let grand_total = PivotRow {
        product: GRAND_TOTAL_LABEL.to_string(),
        total: column_totals.iter().sum(),
        cells: column_totals,
    };

    Some(PivotTable {
        regions,
        rows,
        grand_total,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRevenue {
    pub region: String,
    pub revenue: f64,
}

/// Revenue per normalized region, largest first
pub fn revenue_by_region(sales: &[Sale]) -> Vec<RegionRevenue> {
    let mut totals: Vec<RegionRevenue> = Vec::new();
    for sale in sales {
        let region = normalize_region(&sale.region);
        match totals.iter_mut().find(|r| r.region == region) {
            Some(entry) => entry.revenue += sale.revenue,
            None => totals.push(RegionRevenue {
                region,
                revenue: sale.revenue,
            }),
        }
    }
    // Stable sort keeps first-seen order between equal totals
    totals.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    totals
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_revenue: f64,
    pub total_sales: usize,
    pub avg_sale_value: f64,
}

pub fn kpis(sales: &[Sale]) -> Kpis {
    let total_revenue: f64 = sales.iter().map(|s| s.revenue).sum();
    let total_sales = sales.len();
    let avg_sale_value = if total_sales > 0 {
        total_revenue / total_sales as f64
    } else {
        0.0
    };
    Kpis {
        total_revenue,
        total_sales,
        avg_sale_value,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantReport {
    pub variant: Variant,
    pub users: u32,
    pub conversions: u32,
    pub marketing_spend: f64,
    /// Percentage, 0 when there were no users
    pub conversion_rate: f64,
    /// 0 when there were no conversions
    pub cost_per_conversion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbTestReport {
    pub variants: Vec<VariantReport>,
    pub winner: Option<Variant>,
}

pub fn ab_test_report(results: &[AbTestResult]) -> AbTestReport {
    let variants: Vec<VariantReport> = results
        .iter()
        .map(|r| VariantReport {
            variant: r.variant,
            users: r.users,
            conversions: r.conversions,
            marketing_spend: r.marketing_spend,
            conversion_rate: if r.users == 0 {
                0.0
            } else {
                r.conversions as f64 / r.users as f64 * 100.0
            },
            cost_per_conversion: if r.conversions == 0 {
                0.0
            } else {
                r.marketing_spend / r.conversions as f64
            },
        })
        .collect();

    // Ties resolve to the later variant
    let winner = variants
        .iter()
        .reduce(|best, current| {
            if best.conversion_rate > current.conversion_rate {
                best
            } else {
                current
            }
        })
        .map(|v| v.variant);

    AbTestReport { variants, winner }
}

/// Summable numeric columns of a sales row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericColumn {
    Revenue,
    MarketingSpend,
    Cac,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 3] = [
        NumericColumn::Revenue,
        NumericColumn::MarketingSpend,
        NumericColumn::Cac,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NumericColumn::Revenue => "revenue",
            NumericColumn::MarketingSpend => "marketingSpend",
            NumericColumn::Cac => "cac",
        }
    }

    fn value(&self, sale: &Sale) -> f64 {
        match self {
            NumericColumn::Revenue => sale.revenue,
            NumericColumn::MarketingSpend => sale.marketing_spend,
            NumericColumn::Cac => sale.cac,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid column name: {0}. Must be 'revenue', 'marketingSpend', or 'cac'.")]
pub struct UnknownColumn(pub String);

impl std::str::FromStr for NumericColumn {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NumericColumn::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| UnknownColumn(s.to_string()))
    }
}

pub fn column_total(sales: &[Sale], column: NumericColumn) -> f64 {
    sales.iter().map(|s| column.value(s)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sales::{seed_ab_test, seed_sales};

    #[test]
    fn test_normalize_names() {
        assert_eq!(normalize_product("gadget x"), "Gadget X");
        assert_eq!(normalize_product("  GIZMO z "), "Gizmo Z");
        assert_eq!(normalize_region("EAST"), "East");
        assert_eq!(normalize_region(" south"), "South");
        assert_eq!(normalize_region(""), "");
    }

    #[test]
    fn test_pivot_merges_dirty_names() {
        let pivot = pivot_revenue(&seed_sales()).unwrap();
        assert_eq!(pivot.regions, vec!["East", "North", "South", "West"]);

        let products: Vec<&str> = pivot.rows.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(products, vec!["Gadget X", "Gizmo Z", "Widget Y"]);

        // Gizmo Z East: 18000 + 17500 + 19000
        let gizmo = &pivot.rows[1];
        assert_eq!(gizmo.cells[0], 54500.0);
        assert_eq!(gizmo.total, 74500.0);

        assert_eq!(pivot.grand_total.product, GRAND_TOTAL_LABEL);
        assert_eq!(pivot.grand_total.total, 228000.0);
        let column_sum: f64 = pivot.grand_total.cells.iter().sum();
        assert_eq!(column_sum, pivot.grand_total.total);
    }

    #[test]
    fn test_pivot_of_nothing() {
        assert!(pivot_revenue(&[]).is_none());
    }

    #[test]
    fn test_revenue_by_region_sorted_descending() {
        let chart = revenue_by_region(&seed_sales());
        let regions: Vec<&str> = chart.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["East", "North", "South", "West"]);
        assert_eq!(chart[0].revenue, 75500.0);
        assert_eq!(chart[3].revenue, 30500.0);
    }

    #[test]
    fn test_kpis() {
        let k = kpis(&seed_sales());
        assert_eq!(k.total_sales, 15);
        assert_eq!(k.total_revenue, 228000.0);
        assert_eq!(k.avg_sale_value, 15200.0);

        let empty = kpis(&[]);
        assert_eq!(empty.avg_sale_value, 0.0);
    }

    #[test]
    fn test_ab_test_winner_is_b() {
        let report = ab_test_report(&seed_ab_test());
        assert_eq!(report.winner, Some(Variant::B));
        let b = &report.variants[1];
        assert!((b.conversion_rate - 11.956).abs() < 0.01);
        assert!((b.cost_per_conversion - 4.545).abs() < 0.01);
    }

    #[test]
    fn test_ab_test_zero_conversions() {
        let results = vec![AbTestResult {
            variant: Variant::A,
            users: 0,
            conversions: 0,
            marketing_spend: 100.0,
        }];
        let report = ab_test_report(&results);
        assert_eq!(report.variants[0].conversion_rate, 0.0);
        assert_eq!(report.variants[0].cost_per_conversion, 0.0);
        assert!(ab_test_report(&[]).winner.is_none());
    }

    #[test]
    fn test_column_totals() {
        let sales = seed_sales();
        assert_eq!(column_total(&sales, "revenue".parse().unwrap()), 228000.0);
        assert_eq!(column_total(&sales, NumericColumn::MarketingSpend), 31700.0);
        assert_eq!(
            "profit".parse::<NumericColumn>(),
            Err(UnknownColumn("profit".to_string()))
        );
    }
}
