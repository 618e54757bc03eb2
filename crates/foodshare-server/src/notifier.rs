//! Delivers reservation transitions to an HTTP webhook.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use foodshare_core::{Notification, Notifier, NotifyError};

#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .map_err(|e| NotifyError(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(NotifyError(format!("webhook answered {}", resp.status())));
        }

        debug!(reservation_id = %notification.reservation_id, "webhook notified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use chrono::Utc;
    use foodshare_shared::{ItemId, ReservationId, ReservationState, UserId};
    use tokio::sync::mpsc;

    async fn spawn_hook(status: StatusCode) -> (String, mpsc::Receiver<serde_json::Value>) {
        let (tx, rx) = mpsc::channel(4);
        let app = Router::new()
            .route(
                "/hook",
                post(
                    move |State(tx): State<mpsc::Sender<serde_json::Value>>,
                          Json(body): Json<serde_json::Value>| async move {
                        let _ = tx.send(body).await;
                        status
                    },
                ),
            )
            .with_state(tx);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/hook"), rx)
    }

    fn notification() -> Notification {
        Notification {
            reservation_id: ReservationId::new(),
            item_id: ItemId::new(),
            item_name: "Bread".into(),
            state: ReservationState::SlotClaimed,
            recipients: vec![UserId::new("d"), UserId::new("r")],
            at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_posts_json() {
        let (url, mut rx) = spawn_hook(StatusCode::NO_CONTENT).await;
        let n = notification();
        WebhookNotifier::new(url).unwrap().notify(&n).await.unwrap();

        let body = rx.recv().await.unwrap();
        assert_eq!(body["item_name"], "Bread");
        assert_eq!(body["recipients"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_error_status_is_failure() {
        let (url, _rx) = spawn_hook(StatusCode::SERVICE_UNAVAILABLE).await;
        assert!(WebhookNotifier::new(url)
            .unwrap()
            .notify(&notification())
            .await
            .is_err());
    }
}
