//! Reservations and their delivery lifecycle.
//!
//! ```text
//!   Open ──reserve──▶ Reserved ──claim──▶ SlotClaimed ──complete──▶ Completed
//! ```
//!
//! Each transition is one conditional write in the store.  When the write
//! does not apply, the row is re-read only to pick the right error; the
//! decision itself was already made atomically by the database.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use foodshare_geo::LocationResolver;
use foodshare_shared::constants::ADDRESS_NOT_AVAILABLE;
use foodshare_shared::{
    AuthenticatedUser, GeoPoint, IdentityProvider, ItemId, ItemStatus, ReservationId,
    ReservationState, Role,
};
use foodshare_store::{Database, ReceiverDetails, Reservation, StoreError};

use crate::access::{require_role, require_user};
use crate::error::{Result, ServiceError};
use crate::notify::{Notification, Notifier};
use crate::validate;
use crate::SharedDatabase;

/// A reservation with human-readable addresses and its delivery window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationDetail {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub state: ReservationState,
    pub donator_address: String,
    pub receiver_address: String,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

pub struct ReservationLedger {
    db: SharedDatabase,
    resolver: Arc<dyn LocationResolver>,
    notifier: Arc<dyn Notifier>,
}

impl ReservationLedger {
    pub fn new(
        db: SharedDatabase,
        resolver: Arc<dyn LocationResolver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            db,
            resolver,
            notifier,
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Reserve an available item for the signed-in receiver.
    pub async fn reserve_item(
        &self,
        identity: &dyn IdentityProvider,
        item_id: ItemId,
        details: ReceiverDetails,
        receiver_location: Option<GeoPoint>,
    ) -> Result<Reservation> {
        let user = require_role(identity, Role::Receiver, "reserve an item")?;
        let receiver = ReceiverDetails {
            name: validate::required("name", &details.name)?,
            contact: validate::required("contact", &details.contact)?,
            email: validate::optional(details.email.as_deref())
                .map(|e| validate::email(&e))
                .transpose()?,
            message: validate::optional(details.message.as_deref()),
        };

        let reservation = {
            let db = self.db.lock()?;
            let stored = db.get_item(item_id).map_err(|e| missing(e, "item", item_id))?;
            let item = stored.item;

            let reservation = Reservation {
                id: ReservationId::new(),
                item_id,
                donator_id: item.donator_id,
                receiver_id: user.id.clone(),
                rider_id: None,
                item_name: item.name,
                item_description: item.description,
                item_image_ref: item.image_ref,
                donator_location: item.location,
                receiver_location,
                receiver,
                reserved_at: Utc::now(),
                claimed_at: None,
                completed_at: None,
            };

            match db.insert_reservation(&reservation) {
                Ok(()) => reservation,
                Err(StoreError::Duplicate(_)) => return Err(already_reserved(&db, item_id)),
                Err(e) => return Err(e.into()),
            }
        };

        info!(
            reservation_id = %reservation.id,
            item_id = %item_id,
            receiver = %user.id,
            "item reserved"
        );
        self.announce(&reservation).await;
        Ok(reservation)
    }

    /// Take the delivery slot of an open reservation.
    pub async fn claim_delivery_slot(
        &self,
        identity: &dyn IdentityProvider,
        id: ReservationId,
    ) -> Result<Reservation> {
        let rider = require_role(identity, Role::Rider, "claim a delivery slot")?;

        let reservation = {
            let db = self.db.lock()?;
            if !db.claim_slot(id, &rider.id, Utc::now())? {
                let current = db.get_reservation(id).map_err(|e| missing(e, "reservation", id))?;
                return Err(if current.is_completed() {
                    ServiceError::InvalidState(format!("reservation {id} is already completed"))
                } else {
                    ServiceError::Conflict(format!("delivery slot for {id} is already claimed"))
                });
            }
            db.get_reservation(id)?
        };

        info!(reservation_id = %id, rider = %rider.id, "delivery slot claimed");
        self.announce(&reservation).await;
        Ok(reservation)
    }

    /// Mark a claimed reservation delivered.  Only its rider may.
    pub async fn complete_delivery(
        &self,
        identity: &dyn IdentityProvider,
        id: ReservationId,
    ) -> Result<Reservation> {
        let rider = require_role(identity, Role::Rider, "complete a delivery")?;

        let reservation = {
            let db = self.db.lock()?;
            if !db.complete_reservation(id, &rider.id, Utc::now())? {
                let current = db.get_reservation(id).map_err(|e| missing(e, "reservation", id))?;
                return Err(match &current.rider_id {
                    _ if current.is_completed() => ServiceError::InvalidState(format!(
                        "reservation {id} is already completed"
                    )),
                    None => ServiceError::InvalidState(format!(
                        "delivery slot for {id} has not been claimed"
                    )),
                    Some(_) => ServiceError::Forbidden(
                        "only the rider holding the slot may complete it".into(),
                    ),
                });
            }
            db.get_reservation(id)?
        };

        info!(reservation_id = %id, rider = %rider.id, "delivery completed");
        self.announce(&reservation).await;
        Ok(reservation)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Reservations waiting for a rider, oldest first.  Riders only, since
    /// each slot carries the receiver's contact details.
    pub fn list_open_slots(&self, identity: &dyn IdentityProvider) -> Result<Vec<Reservation>> {
        require_role(identity, Role::Rider, "browse delivery slots")?;
        let db = self.db.lock()?;
        Ok(db.list_open_slots()?)
    }

    /// Claimed and completed reservations, newest first.  Riders may ask for
    /// the whole board; everyone else, and riders passing `mine_only`, see
    /// only what they donated, received or delivered.
    pub fn list_completed_or_delivering(
        &self,
        identity: &dyn IdentityProvider,
        mine_only: bool,
    ) -> Result<Vec<Reservation>> {
        let user = require_user(identity)?;
        let actor = (mine_only || user.role != Role::Rider).then_some(&user.id);
        let db = self.db.lock()?;
        Ok(db.list_claimed_or_completed(actor)?)
    }

    /// Unscoped read for callers that already hold the reservation id.
    pub fn get_reservation(&self, id: ReservationId) -> Result<Reservation> {
        let db = self.db.lock()?;
        db.get_reservation(id).map_err(|e| missing(e, "reservation", id))
    }

    /// The signed-in receiver's reservations, newest first.
    pub fn list_for_receiver(&self, identity: &dyn IdentityProvider) -> Result<Vec<Reservation>> {
        let user = require_role(identity, Role::Receiver, "view reservations")?;
        let db = self.db.lock()?;
        Ok(db.list_reservations_for_receiver(&user.id)?)
    }

    /// A reservation with both addresses resolved.  Geocoder trouble shows
    /// up as sentinel strings, never as an error.
    ///
    /// Visible to its participants, and to any rider while the slot is open.
    pub async fn reservation_detail(
        &self,
        identity: &dyn IdentityProvider,
        id: ReservationId,
    ) -> Result<ReservationDetail> {
        let user = require_user(identity)?;
        let reservation = self.get_reservation(id)?;
        if !can_view(&user, &reservation) {
            return Err(ServiceError::Forbidden(format!(
                "reservation {id} belongs to other users"
            )));
        }
        let (donator_address, receiver_address) = futures::join!(
            self.address(reservation.donator_location),
            self.address(reservation.receiver_location),
        );
        let (window_start, window_end) = reservation.delivery_window();

        Ok(ReservationDetail {
            state: reservation.state(),
            reservation,
            donator_address,
            receiver_address,
            window_start,
            window_end,
        })
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    async fn address(&self, point: Option<GeoPoint>) -> String {
        match point {
            Some(p) => self.resolver.resolve_address(p).await,
            None => ADDRESS_NOT_AVAILABLE.to_string(),
        }
    }

    async fn announce(&self, reservation: &Reservation) {
        let notification = Notification::for_reservation(reservation);
        if let Err(e) = self.notifier.notify(&notification).await {
            warn!(
                reservation_id = %reservation.id,
                state = %notification.state,
                error = %e,
                "notification failed"
            );
        }
    }
}

fn can_view(user: &AuthenticatedUser, reservation: &Reservation) -> bool {
    reservation.involves(&user.id) || (user.role == Role::Rider && !reservation.is_reserved())
}

fn missing(e: StoreError, what: &str, id: impl std::fmt::Display) -> ServiceError {
    match e {
        StoreError::NotFound => ServiceError::NotFound(format!("{what} {id}")),
        other => other.into(),
    }
}

/// Classify a rejected reservation insert by the item's existing reservation.
fn already_reserved(db: &Database, item_id: ItemId) -> ServiceError {
    match db.get_item(item_id) {
        Ok(stored) if stored.status == ItemStatus::Completed => {
            ServiceError::InvalidState(format!("item {item_id} has already been delivered"))
        }
        Ok(_) => ServiceError::Conflict(format!("item {item_id} is already reserved")),
        Err(e) => e.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodshare_shared::{Anonymous, UserId};
    use foodshare_store::Item;

    use crate::testing::{memory_db, FakeResolver, RecordingNotifier};

    struct Fixture {
        db: SharedDatabase,
        ledger: ReservationLedger,
        notifier: Arc<RecordingNotifier>,
    }

    fn fixture_with(notifier: RecordingNotifier) -> Fixture {
        let db = memory_db();
        let notifier = Arc::new(notifier);
        let resolver = Arc::new(
            FakeResolver::default()
                .with_place(donator_point(), "1 Jalan Padungan, Kuching", "Kuching")
                .with_place(receiver_point(), "7 Jalan Song, Kuching", "Kuching"),
        );
        let ledger = ReservationLedger::new(db.clone(), resolver, notifier.clone());
        Fixture {
            db,
            ledger,
            notifier,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(RecordingNotifier::default())
    }

    fn donator_point() -> GeoPoint {
        GeoPoint::new(1.5575, 110.3439).unwrap()
    }

    fn receiver_point() -> GeoPoint {
        GeoPoint::new(1.5200, 110.3600).unwrap()
    }

    fn receiver() -> AuthenticatedUser {
        AuthenticatedUser::new("receiver-1", Role::Receiver)
    }

    fn rider(id: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(id, Role::Rider)
    }

    fn details() -> ReceiverDetails {
        ReceiverDetails {
            name: "Alice".into(),
            contact: "012-3456789".into(),
            email: Some("alice@example.com".into()),
            message: Some("Leave at the gate".into()),
        }
    }

    fn seed_item(f: &Fixture, name: &str) -> ItemId {
        let item = Item {
            id: ItemId::new(),
            donator_id: UserId::new("donator-1"),
            name: name.into(),
            description: "Fresh".into(),
            location: Some(donator_point()),
            image_ref: None,
            created_at: Utc::now(),
        };
        f.db.lock().unwrap().insert_item(&item).unwrap();
        item.id
    }

    fn item_status(f: &Fixture, id: ItemId) -> ItemStatus {
        f.db.lock().unwrap().get_item(id).unwrap().status
    }

    async fn reserve(f: &Fixture, item: ItemId) -> Reservation {
        f.ledger
            .reserve_item(&receiver(), item, details(), Some(receiver_point()))
            .await
            .unwrap()
    }

    // -- scenario: full happy path ------------------------------------

    #[tokio::test]
    async fn full_lifecycle() {
        let f = fixture();
        let item = seed_item(&f, "Bread");
        assert_eq!(item_status(&f, item), ItemStatus::Available);

        let r = reserve(&f, item).await;
        assert_eq!(r.state(), ReservationState::Reserved);
        assert_eq!(r.item_name, "Bread");
        assert_eq!(r.donator_location, Some(donator_point()));
        assert_eq!(item_status(&f, item), ItemStatus::Reserved);
        assert_eq!(f.ledger.list_open_slots(&rider("rider-z")).unwrap().len(), 1);

        let claimed = f.ledger.claim_delivery_slot(&rider("rider-a"), r.id).await.unwrap();
        assert_eq!(claimed.rider_id, Some(UserId::new("rider-a")));
        assert!(f.ledger.list_open_slots(&rider("rider-z")).unwrap().is_empty());

        let done = f.ledger.complete_delivery(&rider("rider-a"), r.id).await.unwrap();
        assert!(done.is_completed());
        assert_eq!(item_status(&f, item), ItemStatus::Completed);

        let history = f
            .ledger
            .list_completed_or_delivering(&rider("rider-z"), false)
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].state(), ReservationState::Completed);

        let states: Vec<_> = f.notifier.sent().into_iter().map(|n| n.state).collect();
        assert_eq!(
            states,
            vec![
                ReservationState::Reserved,
                ReservationState::SlotClaimed,
                ReservationState::Completed
            ]
        );
        let last = f.notifier.sent().pop().unwrap();
        assert_eq!(last.recipients.len(), 3);
    }

    // -- reserve -------------------------------------------------------

    #[tokio::test]
    async fn second_reservation_conflicts_and_first_survives() {
        let f = fixture();
        let item = seed_item(&f, "Bread");
        let first = reserve(&f, item).await;

        let other = AuthenticatedUser::new("receiver-2", Role::Receiver);
        let err = f
            .ledger
            .reserve_item(&other, item, details(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let kept = f.ledger.get_reservation(first.id).unwrap();
        assert_eq!(kept.receiver_id, UserId::new("receiver-1"));
    }

    #[tokio::test]
    async fn concurrent_reservations_one_wins() {
        let f = fixture();
        let item = seed_item(&f, "Bread");
        let a = AuthenticatedUser::new("receiver-a", Role::Receiver);
        let b = AuthenticatedUser::new("receiver-b", Role::Receiver);

        let (ra, rb) = tokio::join!(
            f.ledger.reserve_item(&a, item, details(), None),
            f.ledger.reserve_item(&b, item, details(), None),
        );
        assert_eq!([ra.is_ok(), rb.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert!(matches!(
            ra.err().or(rb.err()),
            Some(ServiceError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn completed_item_cannot_be_reserved_again() {
        let f = fixture();
        let item = seed_item(&f, "Bread");
        let r = reserve(&f, item).await;
        f.ledger.claim_delivery_slot(&rider("rider-a"), r.id).await.unwrap();
        f.ledger.complete_delivery(&rider("rider-a"), r.id).await.unwrap();

        let err = f
            .ledger
            .reserve_item(&receiver(), item, details(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn reserve_input_and_role_checks() {
        let f = fixture();
        let item = seed_item(&f, "Bread");

        assert!(matches!(
            f.ledger.reserve_item(&Anonymous, item, details(), None).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            f.ledger.reserve_item(&rider("rider-a"), item, details(), None).await,
            Err(ServiceError::Forbidden(_))
        ));

        let mut blank = details();
        blank.contact = "  ".into();
        assert!(matches!(
            f.ledger.reserve_item(&receiver(), item, blank, None).await,
            Err(ServiceError::Validation(_))
        ));

        let mut bad_email = details();
        bad_email.email = Some("not-an-email".into());
        assert!(matches!(
            f.ledger.reserve_item(&receiver(), item, bad_email, None).await,
            Err(ServiceError::Validation(_))
        ));

        assert!(matches!(
            f.ledger.reserve_item(&receiver(), ItemId::new(), details(), None).await,
            Err(ServiceError::NotFound(_))
        ));

        // nothing was written by the rejected attempts
        assert_eq!(item_status(&f, item), ItemStatus::Available);
        assert!(f.notifier.sent().is_empty());
    }

    // -- claim ---------------------------------------------------------

    #[tokio::test]
    async fn concurrent_claims_one_wins() {
        let f = fixture();
        let r = reserve(&f, seed_item(&f, "Bread")).await;
        let (a, b) = (rider("rider-a"), rider("rider-b"));

        let (ca, cb) = tokio::join!(
            f.ledger.claim_delivery_slot(&a, r.id),
            f.ledger.claim_delivery_slot(&b, r.id),
        );
        let winner = match (&ca, &cb) {
            (Ok(w), Err(ServiceError::Conflict(_))) | (Err(ServiceError::Conflict(_)), Ok(w)) => w,
            other => panic!("expected exactly one winner, got {other:?}"),
        };

        let stored = f.ledger.get_reservation(r.id).unwrap();
        assert_eq!(stored.rider_id, winner.rider_id);
    }

    #[tokio::test]
    async fn claim_errors() {
        let f = fixture();
        let r = reserve(&f, seed_item(&f, "Bread")).await;

        assert!(matches!(
            f.ledger.claim_delivery_slot(&receiver(), r.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            f.ledger.claim_delivery_slot(&rider("rider-a"), ReservationId::new()).await,
            Err(ServiceError::NotFound(_))
        ));

        f.ledger.claim_delivery_slot(&rider("rider-a"), r.id).await.unwrap();
        // claiming again, even by the holder, is a conflict
        assert!(matches!(
            f.ledger.claim_delivery_slot(&rider("rider-a"), r.id).await,
            Err(ServiceError::Conflict(_))
        ));

        f.ledger.complete_delivery(&rider("rider-a"), r.id).await.unwrap();
        assert!(matches!(
            f.ledger.claim_delivery_slot(&rider("rider-b"), r.id).await,
            Err(ServiceError::InvalidState(_))
        ));
    }

    // -- complete ------------------------------------------------------

    #[tokio::test]
    async fn complete_errors() {
        let f = fixture();
        let r = reserve(&f, seed_item(&f, "Bread")).await;

        assert!(matches!(
            f.ledger.complete_delivery(&rider("rider-a"), r.id).await,
            Err(ServiceError::InvalidState(_))
        ));

        f.ledger.claim_delivery_slot(&rider("rider-a"), r.id).await.unwrap();
        assert!(matches!(
            f.ledger.complete_delivery(&rider("rider-b"), r.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(!f.ledger.get_reservation(r.id).unwrap().is_completed());

        f.ledger.complete_delivery(&rider("rider-a"), r.id).await.unwrap();
        let completed_at = f.ledger.get_reservation(r.id).unwrap().completed_at;
        assert!(matches!(
            f.ledger.complete_delivery(&rider("rider-a"), r.id).await,
            Err(ServiceError::InvalidState(_))
        ));
        // terminal: a repeated completion changes nothing
        assert_eq!(f.ledger.get_reservation(r.id).unwrap().completed_at, completed_at);
    }

    // -- queries -------------------------------------------------------

    #[tokio::test]
    async fn open_slots_are_oldest_first() {
        let f = fixture();
        let first = reserve(&f, seed_item(&f, "Bread")).await;
        let second = reserve(&f, seed_item(&f, "Rice")).await;

        let ids: Vec<_> = f
            .ledger
            .list_open_slots(&rider("rider-z"))
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn open_slots_are_for_riders() {
        let f = fixture();
        reserve(&f, seed_item(&f, "Bread")).await;

        assert!(matches!(
            f.ledger.list_open_slots(&Anonymous),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            f.ledger.list_open_slots(&receiver()),
            Err(ServiceError::Forbidden(_))
        ));
        assert_eq!(f.ledger.list_open_slots(&rider("rider-a")).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn history_scoped_to_caller() {
        let f = fixture();
        let r = reserve(&f, seed_item(&f, "Bread")).await;
        reserve(&f, seed_item(&f, "Rice")).await;
        f.ledger.claim_delivery_slot(&rider("rider-a"), r.id).await.unwrap();

        // riders see the whole board unless they ask for their own
        assert_eq!(
            f.ledger
                .list_completed_or_delivering(&rider("rider-b"), false)
                .unwrap()
                .len(),
            1
        );
        assert!(f
            .ledger
            .list_completed_or_delivering(&rider("rider-b"), true)
            .unwrap()
            .is_empty());

        let actors = [
            AuthenticatedUser::new("donator-1", Role::Donator),
            receiver(),
            rider("rider-a"),
        ];
        for actor in &actors {
            let mine = f.ledger.list_completed_or_delivering(actor, true).unwrap();
            assert_eq!(mine.len(), 1, "{} should see the delivery", actor.id);
        }

        // non-riders never get the full board
        let stranger = AuthenticatedUser::new("receiver-9", Role::Receiver);
        assert!(f
            .ledger
            .list_completed_or_delivering(&stranger, false)
            .unwrap()
            .is_empty());
        assert!(matches!(
            f.ledger.list_completed_or_delivering(&Anonymous, false),
            Err(ServiceError::Validation(_))
        ));

        assert_eq!(f.ledger.list_for_receiver(&receiver()).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn detail_resolves_addresses_and_window() {
        let f = fixture();
        let r = reserve(&f, seed_item(&f, "Bread")).await;

        let detail = f.ledger.reservation_detail(&receiver(), r.id).await.unwrap();
        assert_eq!(detail.donator_address, "1 Jalan Padungan, Kuching");
        assert_eq!(detail.receiver_address, "7 Jalan Song, Kuching");
        assert_eq!(detail.window_end - detail.window_start, chrono::Duration::hours(2));
        assert_eq!(detail.state, ReservationState::Reserved);
    }

    #[tokio::test]
    async fn detail_tolerates_missing_coordinates() {
        let f = fixture();
        let r = f
            .ledger
            .reserve_item(&receiver(), seed_item(&f, "Bread"), details(), None)
            .await
            .unwrap();
        let detail = f.ledger.reservation_detail(&receiver(), r.id).await.unwrap();
        assert_eq!(detail.receiver_address, ADDRESS_NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn detail_visible_to_participants_and_open_slot_riders() {
        let f = fixture();
        let r = reserve(&f, seed_item(&f, "Bread")).await;
        let stranger = AuthenticatedUser::new("receiver-9", Role::Receiver);
        let donator = AuthenticatedUser::new("donator-1", Role::Donator);

        assert!(matches!(
            f.ledger.reservation_detail(&Anonymous, r.id).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            f.ledger.reservation_detail(&stranger, r.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(f.ledger.reservation_detail(&donator, r.id).await.is_ok());
        // any rider may inspect an open slot before claiming it
        assert!(f.ledger.reservation_detail(&rider("rider-b"), r.id).await.is_ok());

        f.ledger.claim_delivery_slot(&rider("rider-a"), r.id).await.unwrap();
        assert!(f.ledger.reservation_detail(&rider("rider-a"), r.id).await.is_ok());
        assert!(matches!(
            f.ledger.reservation_detail(&rider("rider-b"), r.id).await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    // -- notifier ------------------------------------------------------

    #[tokio::test]
    async fn failing_notifier_never_rolls_back() {
        let f = fixture_with(RecordingNotifier::failing());
        let item = seed_item(&f, "Bread");
        let r = reserve(&f, item).await;
        f.ledger.claim_delivery_slot(&rider("rider-a"), r.id).await.unwrap();

        assert_eq!(f.notifier.sent().len(), 2);
        assert!(f.ledger.get_reservation(r.id).unwrap().is_reserved());
        assert_eq!(item_status(&f, item), ItemStatus::Reserved);
    }
}
