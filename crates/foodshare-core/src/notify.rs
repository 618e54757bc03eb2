//! Best-effort notifications about reservation transitions.
//!
//! Delivery is fire-and-forget from the ledger's point of view: a failing
//! notifier is logged and never undoes the transition it reports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use foodshare_shared::{ItemId, ReservationId, ReservationState, UserId};
use foodshare_store::Reservation;

/// One transition, addressed to everyone involved in the reservation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub reservation_id: ReservationId,
    pub item_id: ItemId,
    pub item_name: String,
    pub state: ReservationState,
    pub recipients: Vec<UserId>,
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn for_reservation(reservation: &Reservation) -> Self {
        Self {
            reservation_id: reservation.id,
            item_id: reservation.item_id,
            item_name: reservation.item_name.clone(),
            state: reservation.state(),
            recipients: reservation.participants(),
            at: Utc::now(),
        }
    }
}

#[derive(Error, Debug)]
#[error("Notification not delivered: {0}")]
pub struct NotifyError(pub String);

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes each notification to the log.  Used when no delivery channel is
/// configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, n: &Notification) -> Result<(), NotifyError> {
        info!(
            reservation_id = %n.reservation_id,
            state = %n.state,
            recipients = n.recipients.len(),
            "reservation transition"
        );
        Ok(())
    }
}
