//! Simulated realtime alert feed shown on the dashboard

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityAlert {
    pub id: String,
    pub title: String,
    pub message: String,
    pub severity: AlertSeverity,
    pub timestamp: DateTime<Utc>,
}

impl SecurityAlert {
    /// The background-shield event published by the feed
    pub fn threat_neutralized(now: DateTime<Utc>) -> Self {
        Self {
            id: format!("alert-{}", now.timestamp_millis()),
            title: "Threat Neutralized".to_string(),
            message: "MobSafe background shield blocked an unauthorized connection attempt from \"WeatherWidget.apk\".".to_string(),
            severity: AlertSeverity::Success,
            timestamp: now,
        }
    }
}

/// Holds at most one alert. Publishing happens once, after the initial delay.
pub struct AlertFeed {
    current: Arc<watch::Sender<Option<SecurityAlert>>>,
    token: CancellationToken,
}

impl AlertFeed {
    /// Schedule the alert `delay` from now. Cancelling `parent` drops the pending alert.
    pub fn spawn(delay: Duration, parent: &CancellationToken) -> Self {
        let (tx, _) = watch::channel(None);
        let current = Arc::new(tx);
        let token = parent.child_token();

        let publisher = current.clone();
        let task_token = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if task_token.is_cancelled() {
                        return;
                    }
                    let alert = SecurityAlert::threat_neutralized(Utc::now());
                    info!(alert_id = %alert.id, title = %alert.title, "Security alert raised");
                    publisher.send_replace(Some(alert));
                }
            }
        });

        Self { current, token }
    }

    pub fn current(&self) -> Option<SecurityAlert> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SecurityAlert>> {
        self.current.subscribe()
    }

    pub fn dismiss(&self) {
        self.current.send_if_modified(|alert| alert.take().is_some());
    }

    pub fn close(&self) {
        self.token.cancel();
    }
}

impl Drop for AlertFeed {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
