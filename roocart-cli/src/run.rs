//! Wiring settings, gateway and notifier into one checkout run.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use roocart_checkout::{CheckoutMachine, MachineOptions, ModalPolicy, RunReport};
use roocart_core::NotificationSink;
use roocart_fetch::{FixedBackoff, HttpClient, HttpGateway, LogNotifier, TelegramNotifier};
use roocart_store::{Settings, load_items};
use tracing::{info, warn};

use crate::Cli;

/// Loads settings and items, then drives the machine to a terminal phase.
pub async fn run(cli: &Cli) -> Result<RunReport> {
    let mut settings = Settings::from_env().context("Failed to load settings")?;
    apply_overrides(cli, &mut settings);

    let items = load_items(&settings.items_file)
        .await
        .with_context(|| format!("Failed to load {}", settings.items_file.display()))?;
    if items.is_empty() {
        warn!("Items file is empty, going straight to checkout");
    }

    let http = HttpClient::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .proxy(settings.proxy.clone())
        .build()
        .context("Failed to build HTTP client")?;
    if http.is_proxied() {
        info!("Requests go through the configured proxy");
    }

    let gateway = HttpGateway::new(http, &settings.credentials, &settings.restaurant_id)
        .context("Invalid credentials")?
        .with_store_url(&settings.store_url);

    let notifier: Arc<dyn NotificationSink> = match &settings.telegram {
        Some(telegram) => Arc::new(TelegramNotifier::new(
            notifier_client(&settings)?,
            &telegram.bot_token,
            &telegram.chat_id,
            &telegram.template,
        )),
        None => {
            info!("Telegram not configured, challenge links go to the log");
            Arc::new(LogNotifier)
        }
    };

    let machine = CheckoutMachine::new(
        Arc::new(gateway),
        notifier,
        items,
        machine_options(&settings),
    );

    Ok(machine.run().await)
}

/// Client for the chat API: direct, and without the store session's cookies.
fn notifier_client(settings: &Settings) -> Result<HttpClient> {
    HttpClient::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .context("Failed to build notification HTTP client")
}

/// Lets command-line flags win over environment settings.
fn apply_overrides(cli: &Cli, settings: &mut Settings) {
    if let Some(items) = &cli.items {
        settings.items_file.clone_from(items);
    }
    if let Some(wait_secs) = cli.wait_secs {
        settings.wait_secs = wait_secs;
    }
    if let Some(attempts) = cli.max_item_attempts {
        settings.max_item_attempts = Some(attempts);
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        settings.timeout_secs = timeout_secs;
    }
    if let Some(store_url) = &cli.store_url {
        settings.store_url.clone_from(store_url);
    }
}

fn machine_options(settings: &Settings) -> MachineOptions {
    MachineOptions {
        backoff: FixedBackoff::from_secs(settings.wait_secs),
        max_item_attempts: settings.max_item_attempts,
        verify_egress: settings.verify_egress(),
        modal_policy: ModalPolicy::default(),
    }
}
