// Presentation layer - HTTP routing state and handlers
pub mod api_error;
pub mod app_state;
pub mod handlers;
