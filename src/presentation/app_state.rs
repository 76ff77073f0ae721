// Application state for HTTP handlers
use crate::application::demo_session::DemoSession;
use crate::application::flows::FlowService;

#[derive(Clone)]
pub struct AppState {
    pub session: DemoSession,
    pub flows: FlowService,
}
