//! Notification sink client
//!
//! Outbound, fire-and-forget delivery of access-code and team-invite
//! notices. The sink is an external collaborator; delivery failures are
//! logged and never surfaced to the triggering request. With no sink URL
//! configured the payload is logged instead, which is what local
//! development runs on.

use serde::Serialize;
use tracing::{info, warn};

/// Wire payload for the sink.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationPayload {
    pub to_email: String,
    pub name: String,
    pub uid: String,
    pub is_shadow_notification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader_name: Option<String>,
}

#[derive(Clone)]
pub struct NotificationSink {
    client: reqwest::Client,
    sink_url: Option<String>,
}

impl NotificationSink {
    pub fn new(sink_url: Option<String>, timeout: std::time::Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { client, sink_url }
    }

    /// Welcome notice with the user's login uid.
    pub fn notify_welcome(&self, to_email: String, name: String, uid: String) {
        self.dispatch(NotificationPayload {
            to_email,
            name,
            uid,
            is_shadow_notification: false,
            leader_name: None,
        });
    }

    /// Invite notice for a shadow identity created by a team leader.
    pub fn notify_team_invite(
        &self,
        to_email: String,
        name: String,
        uid: String,
        leader_name: String,
    ) {
        self.dispatch(NotificationPayload {
            to_email,
            name,
            uid,
            is_shadow_notification: true,
            leader_name: Some(leader_name),
        });
    }

    /// Spawn the outbound call so it never blocks the triggering request.
    fn dispatch(&self, payload: NotificationPayload) {
        let Some(url) = self.sink_url.clone() else {
            info!(
                to = %payload.to_email,
                uid = %payload.uid,
                shadow = payload.is_shadow_notification,
                "Notification sink not configured, logging only"
            );
            return;
        };

        let client = self.client.clone();
        tokio::spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(resp) if resp.status().is_success() => {
                    info!(to = %payload.to_email, "Notification delivered");
                }
                Ok(resp) => {
                    warn!(to = %payload.to_email, status = %resp.status(), "Notification sink rejected payload");
                }
                Err(e) => {
                    warn!(to = %payload.to_email, error = %e, "Notification delivery failed");
                }
            }
        });
    }
}
