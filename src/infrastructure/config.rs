use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::application::latency::SimulatedLatency;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub demo: DemoSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

/// OpenAI-compatible chat completions endpoint
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DemoSettings {
    pub analyze_latency_ms: u64,
    pub forecast_latency_ms: u64,
    /// Forward prompts no intent recognizes to the analyze flow
    pub fallback_to_model: bool,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            analyze_latency_ms: 1200,
            forecast_latency_ms: 1500,
            fallback_to_model: false,
        }
    }
}

impl DemoSettings {
    pub fn latency(&self) -> SimulatedLatency {
        SimulatedLatency::new(
            Duration::from_millis(self.analyze_latency_ms),
            Duration::from_millis(self.forecast_latency_ms),
        )
    }
}

/// Load `config/app.*` (optional) overlaid with `WORKOS__SECTION__KEY` environment variables
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(
            config::Environment::with_prefix("WORKOS")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` placeholders in a prompt template
pub fn render_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template() {
        let mut vars = HashMap::new();
        vars.insert("months".to_string(), "3".to_string());
        vars.insert("query".to_string(), "total revenue".to_string());

        let template = "Forecast the next ${months} months. Request: ${query}. Unknown: ${other}";
        let result = render_template(template, &vars);

        assert_eq!(result, "Forecast the next 3 months. Request: total revenue. Unknown: ${other}");
    }

    #[test]
    fn test_defaults_without_sources() {
        let settings = config::Config::builder().build().unwrap();
        let config: AppConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.demo.latency(), SimulatedLatency::default());
        assert!(!config.demo.fallback_to_model);
    }

    #[test]
    fn test_single_key_keeps_section_defaults() {
        let settings = config::Config::builder()
            .set_override("model.api_key", "sk-x")
            .unwrap()
            .set_override("demo.fallback_to_model", true)
            .unwrap()
            .build()
            .unwrap();
        let config: AppConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.model.api_key, "sk-x");
        assert_eq!(config.model.base_url, "http://localhost:4000");
        assert_eq!(config.model.timeout_secs, 60);
        assert!(config.demo.fallback_to_model);
        assert_eq!(config.demo.latency(), SimulatedLatency::default());
    }

    #[test]
    fn test_partial_override() {
        let settings = config::Config::builder()
            .set_override("demo.analyze_latency_ms", 0)
            .unwrap()
            .set_override("demo.forecast_latency_ms", 10)
            .unwrap()
            .set_override("model.base_url", "http://llm.local")
            .unwrap()
            .set_override("model.model", "demo-model")
            .unwrap()
            .set_override("model.timeout_secs", 5)
            .unwrap()
            .build()
            .unwrap();
        let config: AppConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.demo.latency().analyze, Duration::ZERO);
        assert_eq!(config.model.base_url, "http://llm.local");
        assert_eq!(config.model.api_key, "");
    }
}
