//! Notification channels for challenge links.

use async_trait::async_trait;
use roocart_core::{NotificationSink, NotifyError};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::client::HttpClient;

/// Telegram Bot API base URL.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

// ============================================================================
// Telegram
// ============================================================================

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: String,
}

/// Sends challenge links to a Telegram chat through a bot.
#[derive(Clone)]
pub struct TelegramNotifier {
    http: HttpClient,
    api_base: String,
    bot_token: String,
    chat_id: String,
    template: String,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api_base", &self.api_base)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    /// Creates a notifier.
    ///
    /// `bot_token` is the path segment identifying the bot (`bot<id>:<secret>`).
    /// A bare `<id>:<secret>` token gets the `bot` prefix added.
    pub fn new(
        http: HttpClient,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        let bot_token = bot_token.into();
        let bot_token = if bot_token.starts_with("bot") {
            bot_token
        } else {
            format!("bot{bot_token}")
        };

        Self {
            http,
            api_base: TELEGRAM_API_BASE.to_string(),
            bot_token,
            chat_id: chat_id.into(),
            template: template.into(),
        }
    }

    /// Overrides the Bot API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Renders the message text: the template line, then the link.
    pub fn render(&self, challenge_url: &str) -> String {
        if self.template.is_empty() {
            challenge_url.to_string()
        } else {
            format!("{}\n{}", self.template, challenge_url)
        }
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    #[instrument(skip(self, challenge_url))]
    async fn notify(&self, challenge_url: &str) -> Result<(), NotifyError> {
        let url = format!("{}/{}/sendMessage", self.api_base, self.bot_token);
        let body = SendMessage {
            chat_id: &self.chat_id,
            text: self.render(challenge_url),
        };

        let response = self
            .http
            .post_json(&url, reqwest::header::HeaderMap::new(), &body)
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            info!("Telegram sent successfully");
            Ok(())
        } else {
            warn!(status = %status, "Telegram rejected the message");
            Err(NotifyError::Rejected(status.as_u16()))
        }
    }
}

// ============================================================================
// Log
// ============================================================================

/// Writes challenge links to the log when no chat is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, challenge_url: &str) -> Result<(), NotifyError> {
        warn!(url = %challenge_url, "Challenge needs a human, open this link");
        Ok(())
    }
}
