use clevers_config::Config;
use clevers_core::{ApiKey, ConfigError};

/// Strategy for displaying configuration information.
///
/// The API key is masked; an invalid key is reported instead of printed.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== clevers Configuration ===\n");

        println!("Session:");
        println!("  API Key: {}", describe_key(&config.session.api_key));
        println!("  Emotion: {}", describe_mood(config.session.emotion));
        println!("  Engagement: {}", describe_mood(config.session.engagement));
        println!("  Regard: {}", describe_mood(config.session.regard));
        println!();

        println!("Service:");
        println!("  Base URL: {}", config.service.base_url);
        println!("  Wrapper: {}", config.service.wrapper);
        println!("  Timeout: {}s", config.service.timeout_secs);
        println!();

        println!("Retry:");
        println!("  Max Attempts: {}", config.retry.max_attempts);
        println!("  Delay: {}ms", config.retry.delay_ms);

        Ok(())
    }
}

fn describe_key(raw: &str) -> String {
    match ApiKey::new(raw) {
        Ok(key) => key.masked(),
        Err(ConfigError::InvalidApiKey { length }) => {
            format!("(invalid: {length} characters, expected 27)")
        }
        Err(e) => format!("(invalid: {e})"),
    }
}

fn describe_mood(value: Option<i64>) -> String {
    value.map_or_else(|| "(unset)".to_string(), |v| v.to_string())
}
