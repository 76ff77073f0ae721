// Dashboard domain model: the whole canvas state and its transitions
use super::sales::{seed_sales, Sale};
use super::sheet::{Sheet, TileKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Revenue strictly above this value is highlighted once conditional formatting is on
pub const HIGH_REVENUE_THRESHOLD: f64 = 17000.0;

pub const DEMO_SHEET_ID: &str = "sheet1";

/// Renameable artifacts on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactKey {
    Spreadsheet,
    Chart,
    AbTest,
    WhatIf,
    Salesforce,
    PivotTable,
}

impl ArtifactKey {
    pub const ALL: [ArtifactKey; 6] = [
        ArtifactKey::Spreadsheet,
        ArtifactKey::Chart,
        ArtifactKey::AbTest,
        ArtifactKey::WhatIf,
        ArtifactKey::Salesforce,
        ArtifactKey::PivotTable,
    ];

    pub fn default_name(&self) -> &'static str {
        match self {
            ArtifactKey::Spreadsheet => "@spreadsheet-sales-data",
            ArtifactKey::Chart => "@chart-revenue-by-region",
            ArtifactKey::AbTest => "@abtest-new-checkout-flow",
            ArtifactKey::WhatIf => "@whatif-revenue-scenarios",
            ArtifactKey::Salesforce => "@workflow-salesforce-sync",
            ArtifactKey::PivotTable => "@pivot-sales-summary",
        }
    }

    /// Wire name, as used in `artifactNames` and the artifact routes
    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKey::Spreadsheet => "spreadsheet",
            ArtifactKey::Chart => "chart",
            ArtifactKey::AbTest => "abTest",
            ArtifactKey::WhatIf => "whatIf",
            ArtifactKey::Salesforce => "salesforce",
            ArtifactKey::PivotTable => "pivotTable",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown artifact: {0}")]
pub struct UnknownArtifact(pub String);

impl std::str::FromStr for ArtifactKey {
    type Err = UnknownArtifact;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactKey::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownArtifact(s.to_string()))
    }
}

/// Keeps master rows whose trimmed, lowercased region starts with one of the prefixes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionFilter {
    pub prefixes: Vec<String>,
}

impl RegionFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn matches(&self, sale: &Sale) -> bool {
        let region = sale.region.trim().to_lowercase();
        self.prefixes.iter().any(|p| region.starts_with(p.as_str()))
    }
}

/// A single state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Add catalog tiles to the active sheet, skipping ones already placed
    PlaceTiles(Vec<TileKey>),
    /// Replace the filtered view with a subset of the master rows
    Filter(RegionFilter),
    SetHighlight(bool),
    SetForecast(Vec<Sale>),
    AddSheet,
    RemoveSheet(String),
    RenameSheet { id: String, name: String },
    SelectSheet(String),
    RenameArtifact { key: ArtifactKey, name: String },
    AddRow(Sale),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub sheets: Vec<Sheet>,
    pub active_sheet_id: String,
    /// Master list; filtering never touches it
    pub sales: Vec<Sale>,
    pub filtered_sales: Vec<Sale>,
    /// The view before the last filter, kept so the chart can compare versions
    pub previous_filtered_sales: Option<Vec<Sale>>,
    pub forecast: Option<Vec<Sale>>,
    pub highlight_high_revenue: bool,
    pub artifact_names: BTreeMap<ArtifactKey, String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::seed()
    }
}

impl DashboardState {
    pub fn seed() -> Self {
        let sales = seed_sales();
        Self {
            sheets: vec![
                Sheet::blank(DEMO_SHEET_ID, "Demo Sheet"),
                Sheet::full_dashboard("sheet2", "Full Dashboard"),
            ],
            active_sheet_id: DEMO_SHEET_ID.to_string(),
            filtered_sales: sales.clone(),
            sales,
            previous_filtered_sales: None,
            forecast: None,
            highlight_high_revenue: false,
            artifact_names: ArtifactKey::ALL
                .into_iter()
                .map(|k| (k, k.default_name().to_string()))
                .collect(),
        }
    }

    pub fn active_sheet(&self) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id == self.active_sheet_id)
    }

    /// Ids of filtered rows currently highlighted by conditional formatting
    pub fn highlighted_rows(&self) -> Vec<&str> {
        if !self.highlight_high_revenue {
            return Vec::new();
        }
        self.filtered_sales
            .iter()
            .filter(|s| s.revenue > HIGH_REVENUE_THRESHOLD)
            .map(|s| s.id.as_str())
            .collect()
    }

    /// Produce the state that results from applying `mutation`.
    /// Rejected transitions return an unchanged copy.
    pub fn apply(&self, mutation: Mutation) -> DashboardState {
        let mut next = self.clone();
        if !next.apply_in_place(&mutation) {
            tracing::debug!("Mutation had no effect: {:?}", mutation);
        }
        next
    }

    fn apply_in_place(&mut self, mutation: &Mutation) -> bool {
        match mutation {
            Mutation::PlaceTiles(keys) => self.place_tiles(keys),
            Mutation::Filter(filter) => {
                self.previous_filtered_sales = Some(self.filtered_sales.clone());
                self.filtered_sales = self
                    .sales
                    .iter()
                    .filter(|s| filter.matches(s))
                    .cloned()
                    .collect();
                true
            }
            Mutation::SetHighlight(on) => {
                let changed = self.highlight_high_revenue != *on;
                self.highlight_high_revenue = *on;
                changed
            }
            Mutation::SetForecast(rows) => {
                self.forecast = Some(rows.clone());
                true
            }
            Mutation::AddSheet => {
                self.add_sheet();
                true
            }
            Mutation::RemoveSheet(id) => self.remove_sheet(id),
            Mutation::RenameSheet { id, name } => {
                let name = name.trim();
                if name.is_empty() {
                    return false;
                }
                match self.sheets.iter_mut().find(|s| &s.id == id) {
                    Some(sheet) => {
                        sheet.name = name.to_string();
                        true
                    }
                    None => false,
                }
            }
            Mutation::SelectSheet(id) => {
                if self.sheets.iter().any(|s| &s.id == id) {
                    self.active_sheet_id = id.clone();
                    true
                } else {
                    false
                }
            }
            Mutation::RenameArtifact { key, name } => {
                let name = name.trim();
                if name.is_empty() {
                    return false;
                }
                self.artifact_names.insert(*key, name.to_string());
                true
            }
            Mutation::AddRow(sale) => {
                self.sales.push(sale.clone());
                self.filtered_sales.push(sale.clone());
                true
            }
            Mutation::Reset => {
                *self = Self::seed();
                true
            }
        }
    }

    fn place_tiles(&mut self, keys: &[TileKey]) -> bool {
        let active = self.active_sheet_id.clone();
        match self.sheets.iter_mut().find(|s| s.id == active) {
            Some(sheet) => sheet.place_tiles(keys) > 0,
            None => false,
        }
    }

    fn add_sheet(&mut self) {
        let mut number = self.sheets.len() + 1;
        while self.sheets.iter().any(|s| s.id == format!("sheet{}", number)) {
            number += 1;
        }
        let sheet = Sheet::blank(format!("sheet{}", number), format!("Sheet {}", number));
        self.active_sheet_id = sheet.id.clone();
        self.sheets.push(sheet);
    }

    fn remove_sheet(&mut self, id: &str) -> bool {
        if self.sheets.len() <= 1 {
            return false;
        }
        let Some(index) = self.sheets.iter().position(|s| s.id == id) else {
            return false;
        };

        self.sheets.remove(index);
        if self.active_sheet_id == id {
            let neighbour = index.saturating_sub(1);
            self.active_sheet_id = self.sheets[neighbour].id.clone();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_state() {
        let state = DashboardState::seed();
        assert_eq!(state.sheets.len(), 2);
        assert_eq!(state.active_sheet_id, "sheet1");
        assert!(state.active_sheet().unwrap().layout.is_empty());
        assert_eq!(state.sheets[1].layout.len(), 10);
        assert_eq!(state.filtered_sales, state.sales);
        assert!(!state.highlight_high_revenue);
        assert_eq!(
            state.artifact_names[&ArtifactKey::PivotTable],
            "@pivot-sales-summary"
        );
    }

    #[test]
    fn test_place_tiles_twice_keeps_one_tile() {
        let state = DashboardState::seed()
            .apply(Mutation::PlaceTiles(vec![TileKey::Spreadsheet]))
            .apply(Mutation::PlaceTiles(vec![TileKey::Spreadsheet]));
        let layout = &state.active_sheet().unwrap().layout;
        assert_eq!(layout.iter().filter(|i| i.key == TileKey::Spreadsheet).count(), 1);
    }

    #[test]
    fn test_apply_does_not_touch_original() {
        let seed = DashboardState::seed();
        let _ = seed.apply(Mutation::SetHighlight(true));
        assert_eq!(seed, DashboardState::seed());
    }

    #[test]
    fn test_filter_is_non_destructive() {
        let seed = DashboardState::seed();
        let master_len = seed.sales.len();
        let filtered = seed.apply(Mutation::Filter(RegionFilter::new(["north", "east"])));

        assert_eq!(filtered.sales.len(), master_len);
        assert_eq!(filtered.filtered_sales.len(), 8);
        assert!(filtered
            .filtered_sales
            .iter()
            .all(|s| s.region.eq_ignore_ascii_case("north") || s.region.eq_ignore_ascii_case("east")));
        assert_eq!(filtered.previous_filtered_sales.as_ref().unwrap().len(), master_len);

        // Filtering again derives from the master list, not the current view
        let refiltered = filtered.apply(Mutation::Filter(RegionFilter::new(["west"])));
        assert_eq!(refiltered.sales.len(), master_len);
        assert_eq!(refiltered.filtered_sales.len(), 3);
    }

    #[test]
    fn test_highlighted_rows() {
        let state = DashboardState::seed();
        assert!(state.highlighted_rows().is_empty());

        let state = state.apply(Mutation::SetHighlight(true));
        assert_eq!(
            state.highlighted_rows(),
            vec!["sale-3", "sale-7", "sale-11", "sale-13", "sale-15"]
        );
    }

    #[test]
    fn test_cannot_remove_only_sheet() {
        let state = DashboardState::seed().apply(Mutation::RemoveSheet("sheet2".into()));
        assert_eq!(state.sheets.len(), 1);

        let again = state.apply(Mutation::RemoveSheet("sheet1".into()));
        assert_eq!(again.sheets, state.sheets);
        assert_eq!(again.active_sheet_id, "sheet1");
    }

    #[test]
    fn test_remove_active_sheet_moves_to_neighbour() {
        let state = DashboardState::seed()
            .apply(Mutation::SelectSheet("sheet2".into()))
            .apply(Mutation::RemoveSheet("sheet2".into()));
        assert_eq!(state.active_sheet_id, "sheet1");

        let state = DashboardState::seed().apply(Mutation::RemoveSheet("sheet1".into()));
        assert_eq!(state.active_sheet_id, "sheet2");
    }

    #[test]
    fn test_add_sheet_picks_free_id() {
        let state = DashboardState::seed().apply(Mutation::AddSheet);
        assert_eq!(state.active_sheet_id, "sheet3");
        assert_eq!(state.active_sheet().unwrap().name, "Sheet 3");

        let state = state
            .apply(Mutation::RemoveSheet("sheet2".into()))
            .apply(Mutation::AddSheet);
        let ids: Vec<&str> = state.sheets.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["sheet1", "sheet3", "sheet4"]);
    }

    #[test]
    fn test_rename_ignores_blank_names() {
        let state = DashboardState::seed()
            .apply(Mutation::RenameSheet { id: "sheet1".into(), name: "  Q1 Review ".into() })
            .apply(Mutation::RenameSheet { id: "sheet1".into(), name: "   ".into() })
            .apply(Mutation::RenameArtifact { key: ArtifactKey::Chart, name: "".into() });
        assert_eq!(state.sheets[0].name, "Q1 Review");
        assert_eq!(state.artifact_names[&ArtifactKey::Chart], "@chart-revenue-by-region");
    }

    #[test]
    fn test_select_unknown_sheet_is_ignored() {
        let state = DashboardState::seed().apply(Mutation::SelectSheet("nope".into()));
        assert_eq!(state.active_sheet_id, "sheet1");
    }

    #[test]
    fn test_add_row_extends_master_and_view() {
        let state = DashboardState::seed()
            .apply(Mutation::Filter(RegionFilter::new(["north"])))
            .apply(Mutation::AddRow(Sale::blank()));
        assert_eq!(state.sales.len(), 16);
        assert_eq!(state.filtered_sales.len(), 5);
    }

    #[test]
    fn test_reset_restores_seed() {
        let state = DashboardState::seed()
            .apply(Mutation::PlaceTiles(vec![TileKey::Chart, TileKey::PivotTable]))
            .apply(Mutation::Filter(RegionFilter::new(["east"])))
            .apply(Mutation::SetHighlight(true))
            .apply(Mutation::AddSheet)
            .apply(Mutation::AddRow(Sale::blank()))
            .apply(Mutation::RenameArtifact { key: ArtifactKey::Chart, name: "@mine".into() })
            .apply(Mutation::Reset);
        assert_eq!(state, DashboardState::seed());
    }

    #[test]
    fn test_artifact_key_from_str() {
        assert_eq!("pivotTable".parse::<ArtifactKey>(), Ok(ArtifactKey::PivotTable));
        assert_eq!(
            "pivot".parse::<ArtifactKey>(),
            Err(UnknownArtifact("pivot".to_string()))
        );
    }

    #[test]
    fn test_artifact_names_match_wire_keys() {
        for key in ArtifactKey::ALL {
            let json = serde_json::to_value(key).unwrap();
            assert_eq!(json, key.name());
        }
    }
}
