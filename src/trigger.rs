//! # Action Trigger
//!
//! Fires the webhook for an entry: `GET {base}/trigger/{action}/with/key/{key}`.
//! Requests are fire-and-forget; the outcome is only logged.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use crate::models::Entry;
use crate::telemetry::redact_secret;

/// Errors raised while building a trigger.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("webhook base '{0}' cannot carry path segments")]
    InvalidBase(Url),
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Dispatches an entry's webhook.
pub trait ActionTrigger: Send + Sync {
    /// Starts the request and returns without waiting for it.
    ///
    /// The handle lets short-lived callers keep the process alive until the
    /// request task ends; it yields no result. `None` means nothing was sent.
    fn trigger(&self, entry: &Entry) -> Option<JoinHandle<()>>;
}

/// Webhook relay trigger backed by reqwest.
#[derive(Debug, Clone)]
pub struct WebhookTrigger {
    client: Client,
    base: Url,
}

impl WebhookTrigger {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, TriggerError> {
        if base.cannot_be_a_base() {
            return Err(TriggerError::InvalidBase(base));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// The request URL for `entry`, with action and key escaped as path segments.
    pub fn trigger_url(&self, entry: &Entry) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "trigger",
                entry.action.as_str(),
                "with",
                "key",
                entry.key.as_str(),
            ]);
        }
        url
    }
}

impl ActionTrigger for WebhookTrigger {
    fn trigger(&self, entry: &Entry) -> Option<JoinHandle<()>> {
        let Ok(runtime) = Handle::try_current() else {
            warn!(action = %entry.action, "No runtime available; trigger skipped");
            return None;
        };

        let url = self.trigger_url(entry);
        let client = self.client.clone();
        let action = entry.action.clone();
        let key_hint = redact_secret(&entry.key);
        debug!(%action, key = %key_hint, "Firing webhook trigger");

        Some(runtime.spawn(async move {
            match client.get(url).send().await {
                Ok(response) => {
                    debug!(%action, status = %response.status(), "Webhook trigger completed")
                }
                Err(err) => {
                    debug!(%action, error = %err.without_url(), "Webhook trigger failed")
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger(base: &str) -> WebhookTrigger {
        WebhookTrigger::new(Url::parse(base).unwrap(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn builds_maker_url() {
        let trigger = trigger("https://maker.ifttt.com");
        let url = trigger.trigger_url(&Entry::new("lamp", "abc123", "turn_on"));
        assert_eq!(
            url.as_str(),
            "https://maker.ifttt.com/trigger/turn_on/with/key/abc123"
        );
    }

    #[test]
    fn escapes_segments_and_keeps_base_path() {
        let trigger = trigger("http://relay.local/hooks/");
        let url = trigger.trigger_url(&Entry::new("lamp", "a/b", "turn on"));
        assert_eq!(
            url.as_str(),
            "http://relay.local/hooks/trigger/turn%20on/with/key/a%2Fb"
        );
    }

    #[test]
    fn rejects_non_base_url() {
        let base = Url::parse("mailto:someone@example.com").unwrap();
        assert!(matches!(
            WebhookTrigger::new(base, Duration::from_secs(1)),
            Err(TriggerError::InvalidBase(_))
        ));
    }

    #[test]
    fn without_runtime_nothing_is_sent() {
        let trigger = trigger("https://maker.ifttt.com");
        assert!(trigger.trigger(&Entry::new("lamp", "k", "a")).is_none());
    }
}
