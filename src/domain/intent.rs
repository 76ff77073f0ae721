// Intent table and prompt matching
use serde::Serialize;

/// Recognized categories of chat request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    Forecast,
    CleanData,
    KpiCards,
    RegionChart,
    PivotTable,
    FilterRegions,
    ConditionalFormatting,
    WhatIf,
    AbTest,
    Workflow,
    Unrecognized,
}

/// A trigger phrase and the intent it selects
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub trigger: &'static str,
    pub intent: Intent,
}

/// Checked top to bottom; the first trigger found in the prompt wins.
/// Triggers are stored lowercase.
pub const INTENT_TABLE: &[IntentRule] = &[
    IntentRule { trigger: "forecast", intent: Intent::Forecast },
    IntentRule { trigger: "clean it up", intent: Intent::CleanData },
    IntentRule { trigger: "kpi cards", intent: Intent::KpiCards },
    IntentRule { trigger: "chart showing revenue by region", intent: Intent::RegionChart },
    IntentRule { trigger: "pivot table", intent: Intent::PivotTable },
    IntentRule { trigger: "filter the data to show only", intent: Intent::FilterRegions },
    IntentRule { trigger: "conditional formatting", intent: Intent::ConditionalFormatting },
    IntentRule { trigger: "what if we increased marketing spend", intent: Intent::WhatIf },
    IntentRule { trigger: "which variant performed better", intent: Intent::AbTest },
    IntentRule { trigger: "automated workflow", intent: Intent::Workflow },
];

/// Match free text against the default table.
/// Blank input yields `None`; anything else yields an intent, possibly `Unrecognized`.
pub fn match_prompt(text: &str) -> Option<Intent> {
    match_with(INTENT_TABLE, text)
}

pub fn match_with(table: &[IntentRule], text: &str) -> Option<Intent> {
    if text.trim().is_empty() {
        return None;
    }

    let lowered = text.to_lowercase();
    let intent = table
        .iter()
        .find(|rule| lowered.contains(&rule.trigger.to_lowercase()))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Unrecognized);

    Some(intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_rejected() {
        assert_eq!(match_prompt(""), None);
        assert_eq!(match_prompt("   \n\t"), None);
    }

    #[test]
    fn test_forecast_matches_regardless_of_case() {
        assert_eq!(match_prompt("Please FORECAST next quarter"), Some(Intent::Forecast));
        assert_eq!(match_prompt("generate a 3-month revenue Forecast"), Some(Intent::Forecast));
    }

    #[test]
    fn test_clean_it_up() {
        assert_eq!(match_prompt("clean it up"), Some(Intent::CleanData));
    }

    #[test]
    fn test_unknown_text_is_unrecognized() {
        assert_eq!(match_prompt("tell me a joke"), Some(Intent::Unrecognized));
    }

    #[test]
    fn test_first_listed_trigger_wins() {
        // Both the chart and filter triggers are present; the chart rule comes first.
        let text = "Make a chart showing revenue by region and filter the data to show only North";
        assert_eq!(match_prompt(text), Some(Intent::RegionChart));

        // Forecast beats everything below it.
        assert_eq!(
            match_prompt("clean it up and forecast it"),
            Some(Intent::Forecast)
        );
    }

    #[test]
    fn test_matching_is_deterministic() {
        let text = "Can you create some KPI cards for total revenue?";
        let first = match_prompt(text);
        for _ in 0..10 {
            assert_eq!(match_prompt(text), first);
        }
        assert_eq!(first, Some(Intent::KpiCards));
    }

    #[test]
    fn test_custom_table_with_mixed_case_trigger() {
        let table = [IntentRule { trigger: "Pivot", intent: Intent::PivotTable }];
        assert_eq!(match_with(&table, "show a pivot"), Some(Intent::PivotTable));
        assert_eq!(match_with(&table, "nothing here"), Some(Intent::Unrecognized));
    }
}
