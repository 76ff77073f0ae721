// Application layer - Use cases over the domain and the model port
pub mod demo_session;
pub mod dispatcher;
pub mod flows;
pub mod language_model;
pub mod latency;
