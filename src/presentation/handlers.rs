// HTTP request handlers
use crate::application::demo_session::{ScriptStatus, SessionSnapshot};
use crate::application::flows::{
    AnalyzeDataQueryInput, CleanDataInput, GenerateSalesForecastInput, SummarizeThreadInput,
};
use crate::domain::analytics::{
    ab_test_report, column_total, kpis, pivot_revenue, revenue_by_region, NumericColumn, RegionRevenue,
    UnknownColumn,
};
use crate::domain::chat::ChatMessage;
use crate::domain::dashboard::{ArtifactKey, DashboardState, Mutation, UnknownArtifact};
use crate::domain::sales::{seed_ab_test, seed_sales, seed_what_if, Sale, SaleSummary};
use crate::infrastructure::http_response::respond;
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanRequest {
    pub sales_data: Option<Vec<SaleSummary>>,
}

#[derive(Deserialize)]
pub struct ForecastRequest {
    pub months: u32,
}

#[derive(Deserialize)]
pub struct SummarizeRequest {
    /// Comment thread; any JSON shape is forwarded as-is
    pub thread: serde_json::Value,
}

#[derive(Deserialize)]
pub struct MockChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ThreadRef {
    pub id: &'static str,
    pub title: &'static str,
}

#[derive(Serialize)]
pub struct MockChatResponse {
    pub response: String,
    pub threads: Vec<ThreadRef>,
}

#[derive(Deserialize, Default)]
pub struct DemoChatRequest {
    /// Omit to send the next scripted prompt
    pub text: Option<String>,
}

#[derive(Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnTotal {
    pub column_name: &'static str,
    pub total: f64,
}

#[derive(Serialize)]
pub struct RegionChart {
    pub current: Vec<RegionRevenue>,
    /// The view before the last filter, for version comparison
    pub previous: Option<Vec<RegionRevenue>>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Raw seed sales data
pub async fn get_data(headers: HeaderMap) -> Response {
    respond(&headers, &seed_sales()).await
}

pub async fn analyze(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(input): Json<AnalyzeDataQueryInput>,
) -> Result<Response, ApiError> {
    let output = state.flows.analyze_data_query(&input).await.map_err(|e| {
        tracing::error!("Error in analyze: {}", e);
        ApiError::Internal("Failed to analyze data.".to_string())
    })?;
    Ok(respond(&headers, &output).await)
}

pub async fn clean(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CleanRequest>,
) -> Result<Response, ApiError> {
    let sales_data = request
        .sales_data
        .ok_or_else(|| ApiError::BadRequest("Sales data is required.".to_string()))?;

    let output = state
        .flows
        .clean_data(&CleanDataInput { sales_data })
        .await
        .map_err(|e| {
            tracing::error!("Error in clean: {}", e);
            ApiError::Internal("Failed to clean data.".to_string())
        })?;
    Ok(respond(&headers, &output).await)
}

pub async fn forecast(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ForecastRequest>,
) -> Result<Response, ApiError> {
    let input = GenerateSalesForecastInput {
        months: request.months,
        sales_data: seed_sales().iter().map(SaleSummary::from).collect(),
    };
    let output = state.flows.generate_sales_forecast(&input).await.map_err(|e| {
        tracing::error!("Error in forecast: {}", e);
        ApiError::Internal("Failed to generate forecast.".to_string())
    })?;
    Ok(respond(&headers, &output).await)
}

pub async fn summarize(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Response, ApiError> {
    let input = SummarizeThreadInput {
        thread: request.thread.to_string(),
    };
    let output = state.flows.summarize_thread(&input).await.map_err(|e| {
        tracing::error!("Error in summarize: {}", e);
        ApiError::Internal("Failed to summarize thread.".to_string())
    })?;
    Ok(respond(&headers, &output).await)
}

/// Canned echo used by the front-end's thread list
pub async fn mock_chat(Json(request): Json<MockChatRequest>) -> Json<MockChatResponse> {
    Json(MockChatResponse {
        response: format!(
            "You said: \"{}\". This is a mock response. For a real analysis, please use the analyze feature.",
            request.message
        ),
        threads: vec![
            ThreadRef { id: "thread_1", title: "Q1 Revenue Analysis" },
            ThreadRef { id: "thread_2", title: "Product Performance" },
        ],
    })
}

pub async fn demo_state(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let snapshot: SessionSnapshot = state.session.snapshot().await;
    respond(&headers, &snapshot).await
}

/// An empty body sends the next scripted prompt; a body that is present must be valid
pub async fn demo_chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ChatMessage>, ApiError> {
    let request: DemoChatRequest = if body.iter().all(u8::is_ascii_whitespace) {
        DemoChatRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid chat request: {}", e)))?
    };

    let reply = match request.text {
        Some(text) => state.session.submit(&text).await?,
        None => state.session.submit_scripted().await?,
    };
    Ok(Json(reply))
}

pub async fn demo_reset(State(state): State<Arc<AppState>>) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.session.reset().await?))
}

pub async fn demo_script(State(state): State<Arc<AppState>>) -> Json<ScriptStatus> {
    Json(state.session.script_status().await)
}

pub async fn add_sheet(State(state): State<Arc<AppState>>) -> Json<DashboardState> {
    Json(state.session.mutate(Mutation::AddSheet).await)
}

pub async fn rename_sheet(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<RenameRequest>,
) -> Json<DashboardState> {
    Json(
        state
            .session
            .mutate(Mutation::RenameSheet { id, name: request.name })
            .await,
    )
}

pub async fn remove_sheet(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<DashboardState> {
    Json(state.session.mutate(Mutation::RemoveSheet(id)).await)
}

pub async fn select_sheet(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<DashboardState> {
    Json(state.session.mutate(Mutation::SelectSheet(id)).await)
}

pub async fn rename_artifact(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<DashboardState>, ApiError> {
    let key: ArtifactKey = key
        .parse()
        .map_err(|e: UnknownArtifact| ApiError::NotFound(e.to_string()))?;
    Ok(Json(
        state
            .session
            .mutate(Mutation::RenameArtifact { key, name: request.name })
            .await,
    ))
}

pub async fn add_row(State(state): State<Arc<AppState>>) -> Json<DashboardState> {
    Json(state.session.mutate(Mutation::AddRow(Sale::blank())).await)
}

pub async fn activities(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    respond(&headers, &state.session.activities().await).await
}

/// Pivot over the full master list
pub async fn pivot(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let dashboard = state.session.dashboard().await;
    respond(&headers, &pivot_revenue(&dashboard.sales)).await
}

pub async fn region_chart(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let dashboard = state.session.dashboard().await;
    let chart = RegionChart {
        current: revenue_by_region(&dashboard.filtered_sales),
        previous: dashboard
            .previous_filtered_sales
            .as_deref()
            .map(revenue_by_region),
    };
    respond(&headers, &chart).await
}

pub async fn kpi_cards(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let dashboard = state.session.dashboard().await;
    respond(&headers, &kpis(&dashboard.filtered_sales)).await
}

/// Sum of one numeric column over the master rows
pub async fn column_totals(
    Path(column): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ColumnTotal>, ApiError> {
    let column: NumericColumn = column
        .parse()
        .map_err(|e: UnknownColumn| ApiError::BadRequest(e.to_string()))?;
    let dashboard = state.session.dashboard().await;
    Ok(Json(ColumnTotal {
        column_name: column.name(),
        total: column_total(&dashboard.sales, column),
    }))
}

pub async fn ab_test(headers: HeaderMap) -> Response {
    respond(&headers, &ab_test_report(&seed_ab_test())).await
}

pub async fn what_if(headers: HeaderMap) -> Response {
    respond(&headers, &seed_what_if()).await
}
