//! Run settings read from the environment.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use roocart_fetch::{
    ApiCredentials, DEFAULT_STORE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_WAIT_SECS, ProxyConfig,
};
use tracing::{debug, info};

use crate::error::StoreError;

// ============================================================================
// Variable names
// ============================================================================

/// `Authorization` header value.
pub const AUTHORIZATION: &str = "AUTHORIZATION";
/// Device identifier.
pub const X_ROO_GUID: &str = "X_ROO_GUID";
/// Install identifier.
pub const X_ROO_STICKY_GUID: &str = "X_ROO_STICKY_GUID";
/// Branch the basket is built against.
pub const RESTAURANT_ID: &str = "RESTAURANT_ID";
/// Telegram bot token.
pub const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
/// Telegram chat receiving challenge links.
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
/// Text placed before the challenge link.
pub const TELEGRAM_MESSAGE_TEMPLATE: &str = "TELEGRAM_MESSAGE_TEMPLATE";
/// `True` routes every request through the proxy below.
pub const USE_PROXY: &str = "USE_PROXY";
/// Proxy host.
pub const HOST: &str = "HOST";
/// Proxy port.
pub const PORT: &str = "PORT";
/// Proxy login.
pub const LOGIN: &str = "LOGIN";
/// Proxy password.
pub const PASSWORD: &str = "PASSWORD";
/// Path of the items file.
pub const ITEMS_FILE: &str = "ROOCART_ITEMS_FILE";
/// Seconds to wait after a rate limit.
pub const WAIT_SECS: &str = "ROOCART_WAIT_SECS";
/// Per-request timeout in seconds.
pub const TIMEOUT_SECS: &str = "ROOCART_TIMEOUT_SECS";
/// Submissions per item before the run halts.
pub const MAX_ITEM_ATTEMPTS: &str = "ROOCART_MAX_ITEM_ATTEMPTS";
/// Base URL of the store API.
pub const STORE_URL: &str = "ROOCART_STORE_URL";

/// Default items file.
pub const DEFAULT_ITEMS_FILE: &str = "items.json";

// ============================================================================
// Settings
// ============================================================================

/// Telegram delivery for challenge links.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramSettings {
    /// Bot token.
    pub bot_token: String,
    /// Target chat.
    pub chat_id: String,
    /// Message prefix, may be empty.
    pub template: String,
}

impl fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("template", &self.template)
            .finish()
    }
}

/// Everything a run needs, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Account identity headers.
    pub credentials: ApiCredentials,
    /// Branch identifier.
    pub restaurant_id: String,
    /// Telegram delivery, when both token and chat are set.
    pub telegram: Option<TelegramSettings>,
    /// Upstream proxy, when enabled.
    pub proxy: Option<ProxyConfig>,
    /// Items file.
    pub items_file: PathBuf,
    /// Rate-limit wait in seconds.
    pub wait_secs: u64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Optional per-item submission limit.
    pub max_item_attempts: Option<u32>,
    /// Store API base URL.
    pub store_url: String,
}

impl Settings {
    /// Reads settings from the process environment, falling back to a
    /// `.env` file in the working directory or one of its parents.
    ///
    /// Variables already set in the process win over the file.
    pub fn from_env() -> Result<Self, StoreError> {
        let file = match dotenvy::dotenv_iter() {
            Ok(entries) => {
                info!("Reading .env file");
                collect_env_file(entries)?
            }
            Err(e) if e.not_found() => HashMap::new(),
            Err(e) => return Err(StoreError::Config(format!("Failed to read .env: {e}"))),
        };
        Self::from_process_env_and(&file)
    }

    /// Like [`Settings::from_env`] with an explicit env file.
    pub fn from_env_file(path: &Path) -> Result<Self, StoreError> {
        let entries = dotenvy::from_path_iter(path).map_err(|e| {
            StoreError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_process_env_and(&collect_env_file(entries)?)
    }

    fn from_process_env_and(file: &HashMap<String, String>) -> Result<Self, StoreError> {
        Self::from_lookup(|name| std::env::var(name).ok().or_else(|| file.get(name).cloned()))
    }

    /// Reads settings through `lookup`, which returns the value of a variable
    /// or `None` when it is unset.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &str| get(name).ok_or_else(|| StoreError::missing(name));

        let credentials = ApiCredentials {
            authorization: require(AUTHORIZATION)?,
            roo_guid: require(X_ROO_GUID)?,
            sticky_guid: require(X_ROO_STICKY_GUID)?,
        };
        let restaurant_id = require(RESTAURANT_ID)?;

        let telegram = match (get(TELEGRAM_BOT_TOKEN), get(TELEGRAM_CHAT_ID)) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramSettings {
                bot_token,
                chat_id,
                template: lookup(TELEGRAM_MESSAGE_TEMPLATE).unwrap_or_default(),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(StoreError::missing(TELEGRAM_CHAT_ID)),
            (None, Some(_)) => return Err(StoreError::missing(TELEGRAM_BOT_TOKEN)),
        };

        let proxy = if get(USE_PROXY).as_deref() == Some("True") {
            let port = require(PORT)?;
            Some(ProxyConfig {
                host: require(HOST)?,
                port: port
                    .trim()
                    .parse()
                    .map_err(|_| StoreError::invalid(PORT, &port, "a port number"))?,
                login: require(LOGIN)?,
                password: require(PASSWORD)?,
            })
        } else {
            None
        };

        let settings = Self {
            credentials,
            restaurant_id,
            telegram,
            proxy,
            items_file: get(ITEMS_FILE).map_or_else(|| PathBuf::from(DEFAULT_ITEMS_FILE), PathBuf::from),
            wait_secs: parse_number(WAIT_SECS, get(WAIT_SECS))?.unwrap_or(DEFAULT_WAIT_SECS),
            timeout_secs: parse_number(TIMEOUT_SECS, get(TIMEOUT_SECS))?
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            max_item_attempts: parse_number(MAX_ITEM_ATTEMPTS, get(MAX_ITEM_ATTEMPTS))?,
            store_url: get(STORE_URL).unwrap_or_else(|| DEFAULT_STORE_URL.to_string()),
        };

        if settings.timeout_secs == 0 {
            return Err(StoreError::invalid(TIMEOUT_SECS, "0", "a positive number"));
        }
        if settings.max_item_attempts == Some(0) {
            return Err(StoreError::invalid(MAX_ITEM_ATTEMPTS, "0", "a positive number"));
        }

        debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    /// Returns true if the run should start by checking the proxy egress.
    pub fn verify_egress(&self) -> bool {
        self.proxy.is_some()
    }
}

fn collect_env_file<R: Read>(
    entries: dotenvy::Iter<R>,
) -> Result<HashMap<String, String>, StoreError> {
    entries
        .map(|entry| entry.map_err(|e| StoreError::Config(format!("Invalid .env entry: {e}"))))
        .collect()
}

fn parse_number<T: std::str::FromStr>(
    name: &str,
    value: Option<String>,
) -> Result<Option<T>, StoreError> {
    value
        .map(|v| {
            v.trim()
                .parse()
                .map_err(|_| StoreError::invalid(name, &v, "a non-negative number"))
        })
        .transpose()
}
