// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # roocart Fetch
//!
//! HTTP plumbing for the roocart checkout runner.
//!
//! - [`client::HttpClient`] - Shared session with cookies, timeout and proxy
//! - [`gateway::HttpGateway`] - [`roocart_core::Gateway`] over the GraphQL APIs
//! - [`graphql`] - Request bodies and embedded query documents
//! - [`response`] - Lenient decoding of `200` payloads
//! - [`retry::FixedBackoff`] - Constant wait after rate limiting
//! - [`notify`] - Telegram and log notification channels
//!
//! ## Example
//!
//! ```ignore
//! use roocart_fetch::{ApiCredentials, HttpClient, HttpGateway};
//!
//! let http = HttpClient::builder().proxy(proxy).build()?;
//! let gateway = HttpGateway::new(http, &credentials, "branch-id")?;
//! let outcome = gateway.clear_basket().await?;
//! ```

pub mod client;
pub mod error;
pub mod gateway;
pub mod graphql;
pub mod notify;
pub mod response;
pub mod retry;

pub use client::{DEFAULT_TIMEOUT_SECS, HttpClient, HttpClientBuilder, ProxyConfig};
pub use error::FetchError;
pub use gateway::{ApiCredentials, DEFAULT_EGRESS_URL, DEFAULT_STORE_URL, HttpGateway};
pub use notify::{LogNotifier, TelegramNotifier};
pub use retry::{DEFAULT_WAIT_SECS, FixedBackoff};
