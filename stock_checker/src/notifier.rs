//! Push notifications through the Prowl public API
//!
//! Delivery is fire-and-forget from the poll loop's point of view: `notify`
//! spawns a detached task whose failures are logged, never retried. `flush`
//! waits for whatever is still in flight, for use before the process exits.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use stock_common::{Result, StockError};
use tokio::task::JoinSet;

/// Prowl "add" endpoint
pub const PROWL_API_URL: &str = "https://api.prowlapp.com/publicapi/add";

const ERROR_PREFIX: &str = "Stock Checker Error: ";

/// Prowl message priority, -2 (lowest) to 2 (highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    VeryLow = -2,
    Moderate = -1,
    Normal = 0,
    High = 1,
    Emergency = 2,
}

impl Priority {
    pub fn value(self) -> i8 {
        self as i8
    }
}

/// What happened to a push attempt that did not error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// No API key configured, console output only
    Skipped,
}

/// Form body of the Prowl add call
#[derive(Debug, Serialize)]
struct ProwlForm<'a> {
    apikey: &'a str,
    priority: i8,
    application: &'a str,
    event: &'a str,
    description: &'a str,
}

/// Push notifier. Cloning is cheap; clones share the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    application: String,
    event: String,
    in_flight: Arc<Mutex<JoinSet<()>>>,
}

impl Notifier {
    /// An empty or missing `api_key` turns every delivery into a no-op.
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        application: impl Into<String>,
        event: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            application: application.into(),
            event: event.into(),
            in_flight: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// Console-only notifier
    pub fn disabled() -> Self {
        Self::new(PROWL_API_URL, None, "Stock Checker", "Stock")
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send one message and wait for the outcome
    pub async fn deliver(&self, message: &str, priority: Priority) -> Result<Delivery> {
        let Some(api_key) = self.api_key.as_deref() else {
            log::info!("Push message skipped, no API key configured");
            return Ok(Delivery::Skipped);
        };

        let form = ProwlForm {
            apikey: api_key,
            priority: priority.value(),
            application: &self.application,
            event: &self.event,
            description: message,
        };

        let response = self.client.post(&self.api_url).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(StockError::HttpStatus(response.status()));
        }

        log::info!("Push notification sent");
        Ok(Delivery::Sent)
    }

    /// Send in a detached task. Returns false when no API key is configured
    /// and nothing was queued.
    pub fn notify(&self, message: impl Into<String>, priority: Priority) -> bool {
        if !self.is_configured() {
            log::info!("Push message skipped, no API key configured");
            return false;
        }

        let notifier = self.clone();
        let message = message.into();
        let mut in_flight = self.lock_in_flight();
        // reap finished deliveries so the set stays bounded
        while in_flight.try_join_next().is_some() {}
        in_flight.spawn(async move {
            if let Err(e) = notifier.deliver(&message, priority).await {
                log::warn!("Error sending push notification: {}", e);
            }
        });
        true
    }

    /// Wait for every queued delivery to finish
    pub async fn flush(&self) {
        let mut pending = std::mem::take(&mut *self.lock_in_flight());
        while let Some(result) = pending.join_next().await {
            if let Err(e) = result {
                log::warn!("Push notification task failed: {}", e);
            }
        }
    }

    /// Log a stock batch and push it at the highest priority
    pub fn stock_alert(&self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.notify(message, Priority::Emergency);
    }

    /// Log an error and push it at normal priority
    pub fn report_error(&self, error: impl AsRef<str>) {
        let message = format!("{}{}", ERROR_PREFIX, error.as_ref());
        log::error!("ERROR: {}", message);
        self.notify(message, Priority::Normal);
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
