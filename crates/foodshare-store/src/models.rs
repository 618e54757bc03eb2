//! Domain records persisted in the SQLite database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the HTTP layer.  Optional document fields are explicit
//! `Option`s, validated once when a row is decoded.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use foodshare_shared::constants::DELIVERY_WINDOW_HOURS;
use foodshare_shared::{GeoPoint, ItemId, ItemStatus, ReservationId, ReservationState, Role, UserId};

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// A donation listing created by a donator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,
    /// Creating user; never changes.
    pub donator_id: UserId,
    pub name: String,
    pub description: String,
    /// Pickup coordinate.  Items without one have no map presentation.
    pub location: Option<GeoPoint>,
    /// Retrievable URL of the stored image, if any.
    pub image_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An item together with its status, derived from its reservation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredItem {
    #[serde(flatten)]
    pub item: Item,
    pub status: ItemStatus,
}

// ---------------------------------------------------------------------------
// Reservation
// ---------------------------------------------------------------------------

/// Contact details a receiver fills in when reserving.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReceiverDetails {
    pub name: String,
    pub contact: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Binds one item to one receiver and tracks delivery progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    pub id: ReservationId,
    pub item_id: ItemId,
    pub donator_id: UserId,
    pub receiver_id: UserId,
    /// Rider holding the delivery slot.  `Some` means the slot is claimed.
    pub rider_id: Option<UserId>,
    pub item_name: String,
    pub item_description: String,
    pub item_image_ref: Option<String>,
    /// Snapshotted at reservation time, decoupled from the live item.
    pub donator_location: Option<GeoPoint>,
    pub receiver_location: Option<GeoPoint>,
    pub receiver: ReceiverDetails,
    pub reserved_at: DateTime<Utc>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// A rider has claimed the delivery slot.
    pub fn is_reserved(&self) -> bool {
        self.rider_id.is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn state(&self) -> ReservationState {
        if self.is_completed() {
            ReservationState::Completed
        } else if self.is_reserved() {
            ReservationState::SlotClaimed
        } else {
            ReservationState::Reserved
        }
    }

    /// Whether `user` is the donator, receiver or rider of this reservation.
    pub fn involves(&self, user: &UserId) -> bool {
        &self.donator_id == user || &self.receiver_id == user || self.rider_id.as_ref() == Some(user)
    }

    /// Everyone who should hear about a transition.
    pub fn participants(&self) -> Vec<UserId> {
        let mut users = vec![self.donator_id.clone(), self.receiver_id.clone()];
        if let Some(rider) = &self.rider_id {
            users.push(rider.clone());
        }
        users.sort();
        users.dedup();
        users
    }

    /// Pickup window offered to riders: opens at reservation time.
    pub fn delivery_window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.reserved_at,
            self.reserved_at + Duration::hours(DELIVERY_WINDOW_HOURS),
        )
    }
}

// ---------------------------------------------------------------------------
// User profile
// ---------------------------------------------------------------------------

/// Profile written at registration; carries the role attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feedback {
    pub id: Uuid,
    pub rating: u8,
    pub body: String,
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Reservation {
        Reservation {
            id: ReservationId::new(),
            item_id: ItemId::new(),
            donator_id: UserId::new("donator"),
            receiver_id: UserId::new("receiver"),
            rider_id: None,
            item_name: "Bread".into(),
            item_description: "Fresh loaf".into(),
            item_image_ref: None,
            donator_location: None,
            receiver_location: None,
            receiver: ReceiverDetails::default(),
            reserved_at: Utc::now(),
            claimed_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn test_state_derivation() {
        let mut r = sample();
        assert_eq!(r.state(), ReservationState::Reserved);
        assert!(!r.is_reserved());

        r.rider_id = Some(UserId::new("rider"));
        assert_eq!(r.state(), ReservationState::SlotClaimed);
        assert!(r.is_reserved());

        r.completed_at = Some(Utc::now());
        assert_eq!(r.state(), ReservationState::Completed);
    }

    #[test]
    fn test_participants_include_rider_once_assigned() {
        let mut r = sample();
        assert_eq!(r.participants().len(), 2);
        r.rider_id = Some(UserId::new("rider"));
        assert!(r.participants().contains(&UserId::new("rider")));
        assert!(r.involves(&UserId::new("rider")));
        assert!(!r.involves(&UserId::new("stranger")));
    }

    #[test]
    fn test_delivery_window_is_two_hours() {
        let r = sample();
        let (start, end) = r.delivery_window();
        assert_eq!(end - start, Duration::hours(2));
    }
}
