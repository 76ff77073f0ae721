// Canvas mutation dispatcher - turns a matched intent into a state transition
use crate::domain::dashboard::{DashboardState, Mutation, RegionFilter};
use crate::domain::intent::Intent;
use crate::domain::sales::mock_forecast;
use crate::domain::sheet::TileKey;

pub const UNRECOGNIZED_REPLY: &str =
    "I'm not quite sure how to do that. Could you try asking in a different way?";

/// Result of dispatching one intent
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub state: DashboardState,
    pub reply: String,
    /// Entry for the activity feed, if the intent performed a canvas action
    pub activity: Option<&'static str>,
}

/// Mutations, reply and activity text for a recognized intent
fn plan(intent: Intent) -> Option<(Vec<Mutation>, &'static str, &'static str)> {
    let plan = match intent {
        Intent::Forecast => (
            vec![
                Mutation::SetForecast(mock_forecast()),
                Mutation::PlaceTiles(vec![TileKey::Forecast]),
            ],
            "I've generated the revenue forecast and added the new chart to your canvas.",
            "Generated a 3-month revenue forecast.",
        ),
        Intent::CleanData => (
            vec![Mutation::PlaceTiles(vec![TileKey::Spreadsheet])],
            "Done. I've cleaned up the data, standardized the names, and added it to a spreadsheet on your canvas.",
            "Cleaned the sales data and added a spreadsheet.",
        ),
        Intent::KpiCards => (
            vec![Mutation::PlaceTiles(vec![
                TileKey::KpiRevenue,
                TileKey::KpiSales,
                TileKey::KpiAvgSale,
            ])],
            "I've added KPI cards for Total Revenue, Total Sales, and Average Sale Value to your canvas.",
            "Added KPI cards.",
        ),
        Intent::RegionChart => (
            vec![Mutation::PlaceTiles(vec![TileKey::Chart])],
            "I've added the Revenue by Region chart to your canvas.",
            "Added the Revenue by Region chart.",
        ),
        Intent::PivotTable => (
            vec![Mutation::PlaceTiles(vec![TileKey::PivotTable])],
            "Certainly. I've added a pivot table summarizing revenue by product and region.",
            "Added a revenue pivot table.",
        ),
        Intent::FilterRegions => (
            vec![Mutation::Filter(RegionFilter::new(["north", "east"]))],
            "Okay, I've filtered the data to show only the North and East regions. I've also enabled versioning on the chart so you can compare.",
            "Filtered the data to the North and East regions.",
        ),
        Intent::ConditionalFormatting => (
            vec![Mutation::SetHighlight(true)],
            "I've applied conditional formatting to the spreadsheet to highlight all revenue values above $17,000.",
            "Highlighted revenue values above $17,000.",
        ),
        Intent::WhatIf => (
            vec![Mutation::PlaceTiles(vec![TileKey::WhatIf])],
            "Interesting question. I've run a simulation and added a What-If analysis chart to your canvas.",
            "Added a What-If analysis.",
        ),
        Intent::AbTest => (
            vec![Mutation::PlaceTiles(vec![TileKey::AbTest])],
            "I've analyzed the results and added an A/B Test report. Variant B is the clear winner.",
            "Added an A/B test report.",
        ),
        Intent::Workflow => (
            vec![Mutation::PlaceTiles(vec![TileKey::SalesforcePipeline])],
            "I've created an agentic workflow to sync this data with Salesforce and added it to the canvas. You can click on any node to configure it.",
            "Created a Salesforce sync workflow.",
        ),
        Intent::Unrecognized => return None,
    };
    Some(plan)
}

/// Apply `intent` to `state`. The input state is never modified.
pub fn dispatch(intent: Intent, state: &DashboardState) -> Dispatch {
    let Some((mutations, reply, activity)) = plan(intent) else {
        return Dispatch {
            state: state.clone(),
            reply: UNRECOGNIZED_REPLY.to_string(),
            activity: None,
        };
    };

    let next = mutations
        .into_iter()
        .fold(state.clone(), |acc, mutation| acc.apply(mutation));

    tracing::info!("Dispatched {:?}", intent);

    Dispatch {
        state: next,
        reply: reply.to_string(),
        activity: Some(activity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intent::match_prompt;

    #[test]
    fn test_clean_it_up_adds_spreadsheet() {
        let seed = DashboardState::seed();
        let intent = match_prompt("clean it up").unwrap();
        let result = dispatch(intent, &seed);

        assert!(result.state.active_sheet().unwrap().has_tile(TileKey::Spreadsheet));
        assert!(result.reply.contains("cleaned up the data"));
        assert_eq!(seed, DashboardState::seed());
    }

    #[test]
    fn test_same_tile_intent_twice() {
        let first = dispatch(Intent::KpiCards, &DashboardState::seed());
        let second = dispatch(Intent::KpiCards, &first.state);
        assert_eq!(second.state.active_sheet().unwrap().layout.len(), 3);
        assert_eq!(first.state, second.state);
    }

    #[test]
    fn test_forecast_sets_series_and_tile() {
        let result = dispatch(Intent::Forecast, &DashboardState::seed());
        assert_eq!(result.state.forecast.as_ref().unwrap().len(), 3);
        assert!(result.state.active_sheet().unwrap().has_tile(TileKey::Forecast));
        assert_eq!(result.activity, Some("Generated a 3-month revenue forecast."));
    }

    #[test]
    fn test_filter_keeps_master_rows() {
        let seed = DashboardState::seed();
        let result = dispatch(Intent::FilterRegions, &seed);
        assert_eq!(result.state.sales.len(), seed.sales.len());
        assert_eq!(result.state.filtered_sales.len(), 8);
    }

    #[test]
    fn test_conditional_formatting() {
        let result = dispatch(Intent::ConditionalFormatting, &DashboardState::seed());
        assert!(result.state.highlight_high_revenue);
    }

    #[test]
    fn test_unrecognized_leaves_state_alone() {
        let seed = DashboardState::seed();
        let result = dispatch(Intent::Unrecognized, &seed);
        assert_eq!(result.state, seed);
        assert_eq!(result.reply, UNRECOGNIZED_REPLY);
        assert!(result.activity.is_none());
    }

    #[test]
    fn test_tiles_go_to_active_sheet() {
        let state = DashboardState::seed().apply(Mutation::AddSheet);
        let result = dispatch(Intent::WhatIf, &state);
        let sheet3 = result.state.sheets.iter().find(|s| s.id == "sheet3").unwrap();
        assert!(sheet3.has_tile(TileKey::WhatIf));
        assert!(!result.state.sheets[0].has_tile(TileKey::WhatIf));
    }
}
