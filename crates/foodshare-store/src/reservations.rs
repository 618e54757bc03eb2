//! Reservation rows and their conditional state transitions.
//!
//! `claim_slot` and `complete_reservation` are compare-and-set updates: the
//! `WHERE` clause carries the expected current state, and the affected row
//! count tells the caller whether its transition won.

use chrono::{DateTime, Utc};
use rusqlite::params;

use foodshare_shared::{ItemId, ReservationId, UserId};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{ReceiverDetails, Reservation};
use crate::row::{opt_ts_at, opt_user_at, point_at, ts, ts_at, user_at, uuid_at};

const SELECT_RESERVATION: &str = "SELECT id, item_id, donator_id, receiver_id, rider_id,
        item_name, item_description, item_image_ref,
        donator_lat, donator_lon, receiver_lat, receiver_lon,
        receiver_name, receiver_contact, receiver_email, receiver_message,
        reserved_at, claimed_at, completed_at
     FROM reservations";

impl Database {
    /// Insert a new reservation.
    ///
    /// Fails with [`StoreError::Duplicate`] if the item already has a
    /// reservation; the unique index makes the check and the write one step.
    pub fn insert_reservation(&self, r: &Reservation) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO reservations (
                    id, item_id, donator_id, receiver_id, rider_id,
                    item_name, item_description, item_image_ref,
                    donator_lat, donator_lon, receiver_lat, receiver_lon,
                    receiver_name, receiver_contact, receiver_email, receiver_message,
                    reserved_at, claimed_at, completed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
                params![
                    r.id.to_string(),
                    r.item_id.to_string(),
                    r.donator_id.as_str(),
                    r.receiver_id.as_str(),
                    r.rider_id.as_ref().map(|u| u.as_str()),
                    r.item_name,
                    r.item_description,
                    r.item_image_ref,
                    r.donator_location.map(|p| p.latitude),
                    r.donator_location.map(|p| p.longitude),
                    r.receiver_location.map(|p| p.latitude),
                    r.receiver_location.map(|p| p.longitude),
                    r.receiver.name,
                    r.receiver.contact,
                    r.receiver.email,
                    r.receiver.message,
                    ts(&r.reserved_at),
                    r.claimed_at.as_ref().map(ts),
                    r.completed_at.as_ref().map(ts),
                ],
            )
            .map_err(|e| StoreError::from_insert(e, "reservation for item"))?;
        Ok(())
    }

    pub fn get_reservation(&self, id: ReservationId) -> Result<Reservation> {
        self.conn()
            .query_row(
                &format!("{SELECT_RESERVATION} WHERE id = ?1"),
                params![id.to_string()],
                row_to_reservation,
            )
            .map_err(StoreError::from_query)
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Assign `rider` to an unclaimed, uncompleted reservation.
    /// Returns `false` if the row was not in that state (or does not exist).
    pub fn claim_slot(
        &self,
        id: ReservationId,
        rider: &UserId,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE reservations SET rider_id = ?2, claimed_at = ?3
             WHERE id = ?1 AND rider_id IS NULL AND completed_at IS NULL",
            params![id.to_string(), rider.as_str(), ts(&at)],
        )?;
        Ok(affected > 0)
    }

    /// Mark a reservation held by `rider` as delivered.
    /// Returns `false` if it is not claimed by `rider` or already completed.
    pub fn complete_reservation(
        &self,
        id: ReservationId,
        rider: &UserId,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE reservations SET completed_at = ?3
             WHERE id = ?1 AND rider_id = ?2 AND completed_at IS NULL",
            params![id.to_string(), rider.as_str(), ts(&at)],
        )?;
        Ok(affected > 0)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Unclaimed, uncompleted reservations, oldest first.
    pub fn list_open_slots(&self) -> Result<Vec<Reservation>> {
        self.query_reservations(
            &format!(
                "{SELECT_RESERVATION} WHERE rider_id IS NULL AND completed_at IS NULL
                 ORDER BY reserved_at ASC, rowid ASC"
            ),
            [],
        )
    }

    /// Claimed or completed reservations, newest first, optionally limited to
    /// those `participant` takes part in.
    pub fn list_claimed_or_completed(
        &self,
        participant: Option<&UserId>,
    ) -> Result<Vec<Reservation>> {
        match participant {
            Some(user) => self.query_reservations(
                &format!(
                    "{SELECT_RESERVATION}
                     WHERE (rider_id IS NOT NULL OR completed_at IS NOT NULL)
                       AND (donator_id = ?1 OR receiver_id = ?1 OR rider_id = ?1)
                     ORDER BY reserved_at DESC, rowid DESC"
                ),
                params![user.as_str()],
            ),
            None => self.query_reservations(
                &format!(
                    "{SELECT_RESERVATION}
                     WHERE rider_id IS NOT NULL OR completed_at IS NOT NULL
                     ORDER BY reserved_at DESC, rowid DESC"
                ),
                [],
            ),
        }
    }

    /// Every reservation made by one receiver, newest first.
    pub fn list_reservations_for_receiver(&self, receiver: &UserId) -> Result<Vec<Reservation>> {
        self.query_reservations(
            &format!(
                "{SELECT_RESERVATION} WHERE receiver_id = ?1 ORDER BY reserved_at DESC, rowid DESC"
            ),
            params![receiver.as_str()],
        )
    }

    fn query_reservations<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<Reservation>> {
        let mut stmt = self.conn().prepare(sql)?;
        let rows = stmt.query_map(params, row_to_reservation)?;

        let mut reservations = Vec::new();
        for row in rows {
            reservations.push(row?);
        }
        Ok(reservations)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    Ok(Reservation {
        id: ReservationId(uuid_at(row, 0)?),
        item_id: ItemId(uuid_at(row, 1)?),
        donator_id: user_at(row, 2)?,
        receiver_id: user_at(row, 3)?,
        rider_id: opt_user_at(row, 4)?,
        item_name: row.get(5)?,
        item_description: row.get(6)?,
        item_image_ref: row.get(7)?,
        donator_location: point_at(row, 8)?,
        receiver_location: point_at(row, 10)?,
        receiver: ReceiverDetails {
            name: row.get(12)?,
            contact: row.get(13)?,
            email: row.get(14)?,
            message: row.get(15)?,
        },
        reserved_at: ts_at(row, 16)?,
        claimed_at: opt_ts_at(row, 17)?,
        completed_at: opt_ts_at(row, 18)?,
    })
}
