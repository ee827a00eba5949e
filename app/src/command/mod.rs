//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use anyhow::Context;
use clevers_config::Config;
use clevers_conversation::{ConversationClient, RetryPolicy};
use clevers_core::{RequestEncoder, SessionConfig};
use clevers_providers::HttpTransport;
use tracing::info;

mod chat;
mod info;
mod init;
mod version;

pub use chat::{ChatInput, ChatStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Build a client from the on-disk config.
fn build_client(config: Config) -> anyhow::Result<ConversationClient<HttpTransport>> {
    let session = SessionConfig::from_settings(config.session).context("Invalid session config")?;

    let transport = HttpTransport::with_timeout(config.service.timeout())?;
    let encoder = RequestEncoder::new()
        .with_base_url(config.service.base_url)
        .with_wrapper(config.service.wrapper);
    let retry = RetryPolicy::new(config.retry.max_attempts).with_delay(config.retry.delay());

    info!(
        "Retry policy: max_attempts={}, delay={}ms",
        retry.max_attempts(),
        retry.delay().as_millis()
    );

    Ok(ConversationClient::new(transport, session)
        .with_encoder(encoder)
        .with_retry_policy(retry))
}

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}
