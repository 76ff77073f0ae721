// Demo session - scripted chat sequencer driving the dashboard state
use crate::application::dispatcher::dispatch;
use crate::application::flows::{AnalyzeDataQueryInput, FlowService};
use crate::application::latency::{PendingDelay, SimulatedLatency};
use crate::domain::activity::Activity;
use crate::domain::chat::{ChatMessage, Transcript};
use crate::domain::dashboard::{DashboardState, Mutation};
use crate::domain::intent::{match_prompt, Intent};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

pub const DEMO_SCRIPT: [&str; 11] = [
    "Hi there, I've just uploaded `q1_sales_report.csv`. Can you clean it up for me? I need capitalization standardized and region names corrected.",
    "Great. Can you create some KPI cards for total revenue, total sales, and average sale value?",
    "Perfect. Now, create a chart showing revenue by region.",
    "That looks good. Now, can you filter the data to show only the 'North' and 'East' regions? I want to compare their performance.",
    "In the main spreadsheet, can you apply conditional formatting to the revenue column? Highlight all values above $17,000 in green.",
    "Interesting. What is the total revenue per product?",
    "Given our current CAC and marketing spend, can you generate a 3-month revenue forecast based on this data?",
    "Thanks. What if we increased marketing spend by 20%? Show me a what-if analysis for that.",
    "Okay, we ran an A/B test on the new checkout flow. Can you show me which variant performed better, considering both conversion rate and the cost per conversion?",
    "Finally, let's set up an automated workflow to sync this data with Salesforce. Add it to the canvas.",
    "This is powerful. I see I can configure the workflow. Can I switch to a faster AI model if I need to?",
];

pub const MODEL_ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("message is empty")]
    EmptyInput,

    #[error("the assistant is still responding")]
    Busy,

    #[error("the demo script is complete")]
    ScriptComplete,

    #[error("the assistant's reply was interrupted")]
    Interrupted,
}

/// Bounded position in a fixed prompt script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptCursor {
    position: usize,
    len: usize,
}

impl ScriptCursor {
    pub fn new(len: usize) -> Self {
        Self { position: 0, len }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_complete(&self) -> bool {
        self.position >= self.len
    }

    /// Move forward one step; a finished cursor stays put
    pub fn advance(&mut self) {
        if !self.is_complete() {
            self.position += 1;
        }
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    AwaitingInput,
    Processing,
    ScriptComplete,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptStatus {
    pub cursor: usize,
    pub total: usize,
    pub next_prompt: Option<&'static str>,
    pub phase: Phase,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub dashboard: DashboardState,
    /// Rows the spreadsheet should render highlighted
    pub highlighted_row_ids: Vec<String>,
    pub messages: Vec<ChatMessage>,
    pub script: ScriptStatus,
}

#[derive(Debug)]
struct SessionState {
    dashboard: DashboardState,
    transcript: Transcript,
    cursor: ScriptCursor,
    processing: bool,
    activities: Vec<Activity>,
}

impl SessionState {
    fn seed() -> Self {
        Self {
            dashboard: DashboardState::seed(),
            transcript: Transcript::seed(),
            cursor: ScriptCursor::new(DEMO_SCRIPT.len()),
            processing: false,
            activities: Vec::new(),
        }
    }

    fn phase(&self) -> Phase {
        if self.processing {
            Phase::Processing
        } else if self.cursor.is_complete() {
            Phase::ScriptComplete
        } else {
            Phase::AwaitingInput
        }
    }

    fn script_status(&self) -> ScriptStatus {
        ScriptStatus {
            cursor: self.cursor.position(),
            total: DEMO_SCRIPT.len(),
            next_prompt: DEMO_SCRIPT.get(self.cursor.position()).copied(),
            phase: self.phase(),
        }
    }
}

/// One demo session: at most one chat request in flight, all state behind a single lock.
#[derive(Clone)]
pub struct DemoSession {
    state: Arc<Mutex<SessionState>>,
    latency: SimulatedLatency,
    /// When set, prompts no intent recognizes are answered by the analyze flow
    analyst: Option<FlowService>,
}

impl DemoSession {
    pub fn new(latency: SimulatedLatency, analyst: Option<FlowService>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::seed())),
            latency,
            analyst,
        }
    }

    /// Send the next scripted prompt
    pub async fn submit_scripted(&self) -> Result<ChatMessage, SessionError> {
        let prompt = {
            let state = self.state.lock().await;
            if state.processing {
                return Err(SessionError::Busy);
            }
            DEMO_SCRIPT
                .get(state.cursor.position())
                .copied()
                .ok_or(SessionError::ScriptComplete)?
        };
        self.submit(prompt).await
    }

    /// Send free-form text and wait for the assistant's reply
    pub async fn submit(&self, text: &str) -> Result<ChatMessage, SessionError> {
        let (intent, history, sales_json) = {
            let mut state = self.state.lock().await;
            let Some(intent) = match_prompt(text) else {
                return Err(SessionError::EmptyInput);
            };
            if state.processing {
                tracing::debug!("Rejected submission while processing");
                return Err(SessionError::Busy);
            }

            let history = state.transcript.messages().to_vec();
            state.transcript.push(ChatMessage::user(text));
            state.processing = true;

            let sales_json = serde_json::to_string(&state.dashboard.sales).unwrap_or_default();
            (intent, history, sales_json)
        };

        tracing::info!("Matched {:?} for prompt {:?}", intent, text);

        // The turn runs to completion even if the caller stops waiting for it
        let session = self.clone();
        let text = text.to_string();
        let turn = tokio::spawn(async move {
            session.finish_turn(intent, text, history, sales_json).await
        });

        match turn.await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                tracing::error!("Chat turn did not complete: {}", e);
                self.state.lock().await.processing = false;
                Err(SessionError::Interrupted)
            }
        }
    }

    async fn finish_turn(
        &self,
        intent: Intent,
        text: String,
        history: Vec<ChatMessage>,
        sales_json: String,
    ) -> ChatMessage {
        let delay = match intent {
            Intent::Forecast => self.latency.forecast,
            _ => self.latency.analyze,
        };
        PendingDelay::new(delay).wait().await;

        let model_reply = match (intent, &self.analyst) {
            (Intent::Unrecognized, Some(analyst)) => {
                let input = AnalyzeDataQueryInput {
                    query: text,
                    sales_data: sales_json,
                    history: Some(history),
                };
                Some(match analyst.analyze_data_query(&input).await {
                    Ok(output) => output.summary,
                    Err(e) => {
                        tracing::error!("Analyze flow failed: {}", e);
                        MODEL_ERROR_REPLY.to_string()
                    }
                })
            }
            _ => None,
        };

        let mut state = self.state.lock().await;
        let outcome = dispatch(intent, &state.dashboard);
        state.dashboard = outcome.state;
        if let Some(activity) = outcome.activity {
            state.activities.insert(0, Activity::assistant_action(activity));
        }

        let reply = ChatMessage::assistant(model_reply.unwrap_or(outcome.reply));
        state.transcript.push(reply.clone());
        state.cursor.advance();
        state.processing = false;

        reply
    }

    /// Restore the seed transcript, cursor and dashboard
    pub async fn reset(&self) -> Result<SessionSnapshot, SessionError> {
        let mut state = self.state.lock().await;
        if state.processing {
            return Err(SessionError::Busy);
        }
        state.dashboard = state.dashboard.apply(Mutation::Reset);
        state.transcript.reset();
        state.cursor.rewind();
        state.activities.clear();
        tracing::info!("Demo reset");
        Ok(Self::snapshot_of(&state))
    }

    /// Apply a direct canvas edit (sheet tabs, renames, rows)
    pub async fn mutate(&self, mutation: Mutation) -> DashboardState {
        let mut state = self.state.lock().await;
        state.dashboard = state.dashboard.apply(mutation);
        state.dashboard.clone()
    }

    pub async fn dashboard(&self) -> DashboardState {
        self.state.lock().await.dashboard.clone()
    }

    pub async fn activities(&self) -> Vec<Activity> {
        self.state.lock().await.activities.clone()
    }

    pub async fn script_status(&self) -> ScriptStatus {
        self.state.lock().await.script_status()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        Self::snapshot_of(&state)
    }

    fn snapshot_of(state: &SessionState) -> SessionSnapshot {
        SessionSnapshot {
            dashboard: state.dashboard.clone(),
            highlighted_row_ids: state
                .dashboard
                .highlighted_rows()
                .into_iter()
                .map(str::to_string)
                .collect(),
            messages: state.transcript.messages().to_vec(),
            script: state.script_status(),
        }
    }
}
