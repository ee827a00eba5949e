//! Conversation command.
//!
//! With `--message` a single exchange is made; otherwise an interactive loop
//! keeps the conversation going until the user exits.

use anyhow::Context;
use clevers_config::Config;
use clevers_core::MoodField;
use tracing::info;

use super::build_client;

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
    /// Mood overrides applied on top of the config file
    pub emotion: Option<i64>,
    pub engagement: Option<i64>,
    pub regard: Option<i64>,
    /// Print whole replies
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        info!("Loaded config from ~/clevers/config.json");

        let client = build_client(config)?;

        for (field, value) in [
            (MoodField::Emotion, input.emotion),
            (MoodField::Engagement, input.engagement),
            (MoodField::Regard, input.regard),
        ] {
            if let Some(value) = value {
                client
                    .set_mood(field, value)
                    .with_context(|| format!("Invalid --{field}"))?;
            }
        }

        if let Some(msg) = input.message {
            if input.verbose {
                let reply = client.say_verbose(&msg).await?;
                println!("{reply:#?}");
            } else {
                let reply = client.say(&msg).await?;
                println!("{reply}");
            }
        } else {
            client.run_interactive(input.verbose).await?;
            info!("Conversation ended after {} calls", client.call_count());
        }

        Ok(())
    }
}
