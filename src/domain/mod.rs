// Domain layer - Canvas state, sales data and pure transitions
pub mod activity;
pub mod analytics;
pub mod chat;
pub mod dashboard;
pub mod intent;
pub mod sales;
pub mod sheet;
