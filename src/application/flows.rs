// Prompt-template flows: typed input -> rendered prompt -> model -> typed output
use crate::application::language_model::LanguageModel;
use crate::domain::analytics::NumericColumn;
use crate::domain::chat::ChatMessage;
use crate::domain::sales::SaleSummary;
use crate::infrastructure::config::render_template;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("model call failed: {0}")]
    Model(#[source] anyhow::Error),

    #[error("model returned malformed output: {0}")]
    InvalidOutput(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeDataQueryInput {
    pub query: String,
    /// Sales rows serialized as a JSON array
    pub sales_data: String,
    #[serde(default)]
    pub history: Option<Vec<ChatMessage>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeDataQueryOutput {
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanDataInput {
    pub sales_data: Vec<SaleSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanDataOutput {
    pub cleaned_data: Vec<SaleSummary>,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSalesForecastInput {
    pub months: u32,
    pub sales_data: Vec<SaleSummary>,
}

pub type GenerateSalesForecastOutput = Vec<SaleSummary>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeThreadInput {
    /// Comment thread serialized as JSON
    pub thread: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeThreadOutput {
    pub summary: String,
}

const JSON_ONLY_SYSTEM: &str =
    "Respond with a single JSON value matching the requested output shape and nothing else.";

const ANALYZE_TEMPLATE: &str = "You are the assistant inside the 0str1ch Work OS, running an interactive product demo. \
Keep answers helpful and concise, and describe requested canvas actions as already done \
(for example: \"I've added the chart to your canvas.\").

The data has the columns product, region, month, revenue, marketingSpend and cac (customer acquisition cost).
For sums or totals, use these precomputed column totals instead of adding values yourself:
${totals}

Sales Data: ${salesData}

Conversation History:
${history}

User's Current Request: ${query}

Output JSON shape: {\"summary\": string}";

const CLEAN_TEMPLATE: &str = "You clean sales data. Apply these rules:
1. Region names must be one of 'North', 'South', 'East' or 'West'; correct variations such as 'north', 'S.' or 'eastern'.
2. Capitalize product names, e.g. 'gadget x' becomes 'Gadget X'.
3. Capitalize month names, e.g. 'january' becomes 'January'.
4. Leave no empty or null values. Infer a reasonable value if one is missing and state the assumption in the summary.

Then give a short bulleted summary of the specific changes.

Data to clean:
${salesData}

Output JSON shape: {\"cleanedData\": [{\"product\": string, \"region\": string, \"revenue\": number, \"month\": string}], \"summary\": string}";

const FORECAST_TEMPLATE: &str = "You are an expert sales forecaster. Forecast sales for the next ${months} months from this history.

Sales Data:
${rows}

Output JSON shape: [{\"product\": string, \"region\": string, \"revenue\": number, \"month\": string}]";

const SUMMARIZE_TEMPLATE: &str = "Summarize the following discussion thread concisely. \
Call out decisions made, action items assigned, and the overall sentiment.

Conversation Thread (JSON):
${thread}

Output JSON shape: {\"summary\": string}";

#[derive(Clone)]
pub struct FlowService {
    model: Arc<dyn LanguageModel>,
}

impl FlowService {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn analyze_data_query(
        &self,
        input: &AnalyzeDataQueryInput,
    ) -> Result<AnalyzeDataQueryOutput, FlowError> {
        let totals = column_totals(&input.sales_data)?;
        let history = input
            .history
            .iter()
            .flatten()
            .map(|m| {
                let sender = serde_json::to_value(m.sender)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default();
                format!("- {}: {}", sender, m.text)
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mut vars = HashMap::new();
        vars.insert("totals".to_string(), totals);
        vars.insert("salesData".to_string(), input.sales_data.clone());
        vars.insert("history".to_string(), history);
        vars.insert("query".to_string(), input.query.clone());

        self.run("analyzeDataQuery", ANALYZE_TEMPLATE, &vars).await
    }

    pub async fn clean_data(&self, input: &CleanDataInput) -> Result<CleanDataOutput, FlowError> {
        let mut vars = HashMap::new();
        vars.insert("salesData".to_string(), serde_json::to_string(&input.sales_data)?);

        self.run("cleanData", CLEAN_TEMPLATE, &vars).await
    }

    pub async fn generate_sales_forecast(
        &self,
        input: &GenerateSalesForecastInput,
    ) -> Result<GenerateSalesForecastOutput, FlowError> {
        let rows = input
            .sales_data
            .iter()
            .map(|s| {
                format!(
                    "- Product: {}, Region: {}, Revenue: {}, Month: {}",
                    s.product, s.region, s.revenue, s.month
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mut vars = HashMap::new();
        vars.insert("months".to_string(), input.months.to_string());
        vars.insert("rows".to_string(), rows);

        self.run("generateSalesForecast", FORECAST_TEMPLATE, &vars).await
    }

    pub async fn summarize_thread(
        &self,
        input: &SummarizeThreadInput,
    ) -> Result<SummarizeThreadOutput, FlowError> {
        let mut vars = HashMap::new();
        vars.insert("thread".to_string(), input.thread.clone());

        self.run("summarizeThread", SUMMARIZE_TEMPLATE, &vars).await
    }

    async fn run<T: DeserializeOwned>(
        &self,
        flow: &str,
        template: &str,
        vars: &HashMap<String, String>,
    ) -> Result<T, FlowError> {
        let prompt = render_template(template, vars);
        tracing::debug!("Running flow {} on model {}", flow, self.model.model());

        let raw = self
            .model
            .complete(JSON_ONLY_SYSTEM, &prompt)
            .await
            .map_err(|e| {
                tracing::error!("Flow {} failed: {:#}", flow, e);
                FlowError::Model(e)
            })?;

        let parsed = serde_json::from_str(strip_code_fence(&raw)).map_err(|e| {
            tracing::warn!("Flow {} returned unparseable output: {}", flow, e);
            e
        })?;
        Ok(parsed)
    }
}

/// Totals of every numeric column, skipping values that are not numbers
fn column_totals(sales_json: &str) -> Result<String, FlowError> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(sales_json)
        .map_err(|e| FlowError::InvalidInput(format!("salesData is not a JSON array of rows: {}", e)))?;

    let lines = NumericColumn::ALL
        .iter()
        .map(|column| {
            let total: f64 = rows
                .iter()
                .filter_map(|row| row.get(column.name()).and_then(|v| v.as_f64()))
                .sum();
            format!("- {}: {}", column.name(), total)
        })
        .collect::<Vec<_>>()
        .join("\n");
    Ok(lines)
}

/// Models often wrap JSON in a markdown fence; take what is inside it
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
