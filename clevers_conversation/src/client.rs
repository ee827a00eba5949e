//! Conversational client for the `getreply` endpoint.
//!
//! One client holds one conversation. The continuity token returned by each
//! successful reply is echoed on the next request, so calls on a client are
//! queued: a `say` does not build its request until the previous call has
//! stored its token.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use clevers_core::{
    ApiKey, ConfigError, ContinuityToken, Error, Mood, MoodField, RequestEncoder, Result,
    ServiceError, ServiceReply, SessionConfig, Transport,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::retry::{RetryPolicy, retry_transient};

pub struct ConversationClient<T = Arc<dyn Transport>>
where
    T: Transport,
{
    transport: T,
    encoder: RequestEncoder,
    retry: RetryPolicy,
    config: RwLock<SessionConfig>,
    /// Doubles as the call queue: held for the whole logical call.
    token: Mutex<Option<ContinuityToken>>,
    calls: AtomicU64,
}

impl<T> ConversationClient<T>
where
    T: Transport,
{
    #[must_use]
    pub fn new(transport: T, config: SessionConfig) -> Self {
        info!(
            "Creating conversation client (key={})",
            config.api_key().masked()
        );
        Self {
            transport,
            encoder: RequestEncoder::default(),
            retry: RetryPolicy::default(),
            config: RwLock::new(config),
            token: Mutex::new(None),
            calls: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn with_encoder(mut self, encoder: RequestEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Send one message and return the service's reply text.
    pub async fn say(&self, message: &str) -> Result<String> {
        self.say_verbose(message).await.map(|reply| reply.output)
    }

    /// Send one message and return the whole parsed reply.
    pub async fn say_verbose(&self, message: &str) -> Result<ServiceReply> {
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }

        let mut token = self.token.lock().await;
        let config = self.snapshot();
        let url = self.encoder.encode(&config, token.as_ref(), message);
        debug!(
            "Requesting {}",
            self.encoder.encode_redacted(&config, token.as_ref(), message)
        );

        let reply = retry_transient(self.retry, |attempt| self.exchange(&url, attempt)).await?;

        debug!(
            "Conversation token advanced (first_turn={})",
            token.is_none()
        );
        *token = Some(reply.cs.clone());
        info!("Received reply (calls={})", self.call_count());
        Ok(reply)
    }

    /// One physical request. The counter moves for every 2xx body, parsed
    /// or not.
    async fn exchange(&self, url: &str, attempt: u32) -> Result<ServiceReply> {
        let response = self.transport.get(url).await.inspect_err(|e| {
            warn!("Request failed on attempt {attempt}: {e}");
        })?;

        if let Some(err) = ServiceError::from_status(response.status) {
            warn!("Service rejected request: {err}");
            return Err(err.into());
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        ServiceReply::parse(&response.body).map_err(Error::MalformedReply)
    }

    fn snapshot(&self) -> SessionConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn config_mut(&self) -> RwLockWriteGuard<'_, SessionConfig> {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_emotion(&self, value: i64) -> std::result::Result<(), ConfigError> {
        self.config_mut().set_emotion(value)
    }

    pub fn set_engagement(&self, value: i64) -> std::result::Result<(), ConfigError> {
        self.config_mut().set_engagement(value)
    }

    pub fn set_regard(&self, value: i64) -> std::result::Result<(), ConfigError> {
        self.config_mut().set_regard(value)
    }

    pub fn set_mood(&self, field: MoodField, value: i64) -> std::result::Result<(), ConfigError> {
        self.config_mut().set_mood(field, value)
    }

    /// Physical 2xx replies received so far, malformed ones included.
    #[must_use]
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn mood(&self) -> Mood {
        self.snapshot().mood()
    }

    #[must_use]
    pub fn api_key(&self) -> ApiKey {
        self.snapshot().api_key().clone()
    }

    /// Current token. Waits for an in-flight call to finish first.
    pub async fn continuity_token(&self) -> Option<ContinuityToken> {
        self.token.lock().await.clone()
    }

    #[must_use]
    pub const fn encoder(&self) -> &RequestEncoder {
        &self.encoder
    }

    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Read lines from stdin until `exit`, printing each reply.
    ///
    /// `/emotion N`, `/engagement N` and `/regard N` adjust the mood for the
    /// following messages; `/mood` prints it.
    pub async fn run_interactive(&self, verbose: bool) -> std::io::Result<()> {
        println!("=== Conversation ===");
        println!("Type 'exit', 'quit', or Ctrl+C to end the session.\n");

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let mut input = String::new();
            if std::io::stdin().read_line(&mut input)? == 0 {
                break;
            }
            let input = input.trim();

            if matches!(input, "exit" | "quit" | "q") {
                println!("\nSession ended. Total calls: {}", self.call_count());
                break;
            }

            if input.is_empty() {
                continue;
            }

            if let Some(command) = input.strip_prefix('/') {
                self.run_command(command);
                continue;
            }

            if verbose {
                match self.say_verbose(input).await {
                    Ok(reply) => println!("\n{reply:#?}\n"),
                    Err(e) => eprintln!("Error: {e}"),
                }
            } else {
                match self.say(input).await {
                    Ok(reply) => println!("\n{reply}\n"),
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
        }

        Ok(())
    }

    fn run_command(&self, command: &str) {
        let mut parts = command.split_whitespace();
        let field = match parts.next() {
            Some("mood") => {
                println!("{:?}", self.mood());
                return;
            }
            Some("emotion") => MoodField::Emotion,
            Some("engagement") => MoodField::Engagement,
            Some("regard") => MoodField::Regard,
            _ => {
                eprintln!("Unknown command: /{command}");
                return;
            }
        };

        match parts.next().map(str::parse::<i64>) {
            Some(Ok(value)) => match self.set_mood(field, value) {
                Ok(()) => println!("{field} set to {value}"),
                Err(e) => eprintln!("Error: {e}"),
            },
            _ => eprintln!("Usage: /{field} <0-100>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clevers_core::{HttpResponse, TransportError};

    const KEY: &str = "CC1234567890abcdefghijklmno";

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn get(&self, _url: &str) -> std::result::Result<HttpResponse, TransportError> {
            Err(TransportError::new("connection refused"))
        }
    }

    fn client() -> ConversationClient<Unreachable> {
        ConversationClient::new(Unreachable, SessionConfig::new(KEY).unwrap())
    }

    #[tokio::test]
    async fn empty_message_is_rejected_before_io() {
        let client = client();
        assert!(matches!(client.say("").await, Err(Error::EmptyMessage)));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn transport_failure_leaves_state_untouched() {
        let client = client();
        let err = client.say("hello").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(client.call_count(), 0);
        assert_eq!(client.continuity_token().await, None);
    }

    #[test]
    fn mood_setters_go_through_validation() {
        let client = client();
        client.set_emotion(10).unwrap();
        assert!(client.set_regard(101).is_err());
        assert_eq!(
            client.mood(),
            Mood {
                emotion: Some(10),
                engagement: None,
                regard: None,
            }
        );
        assert_eq!(client.api_key().as_str(), KEY);
    }
}
