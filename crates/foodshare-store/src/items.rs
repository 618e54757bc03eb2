//! CRUD operations for [`Item`] records.
//!
//! Item status is never stored; every read derives it from the item's
//! reservation row with a LEFT JOIN.

use rusqlite::params;

use foodshare_shared::{GeoPoint, ItemId, ItemStatus, UserId};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Item, StoredItem};
use crate::row::{point_at, ts, ts_at, user_at, uuid_at};

const SELECT_ITEM: &str = "SELECT i.id, i.donator_id, i.name, i.description, i.latitude, i.longitude,
        i.image_ref, i.created_at,
        CASE WHEN r.id IS NULL THEN 'available'
             WHEN r.completed_at IS NULL THEN 'reserved'
             ELSE 'completed' END
     FROM items i
     LEFT JOIN reservations r ON r.item_id = i.id";

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    pub fn insert_item(&self, item: &Item) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO items (id, donator_id, name, description, latitude, longitude, image_ref, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    item.id.to_string(),
                    item.donator_id.as_str(),
                    item.name,
                    item.description,
                    item.location.map(|p| p.latitude),
                    item.location.map(|p| p.longitude),
                    item.image_ref,
                    ts(&item.created_at),
                ],
            )
            .map_err(|e| StoreError::from_insert(e, "item"))?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_item(&self, id: ItemId) -> Result<StoredItem> {
        self.conn()
            .query_row(
                &format!("{SELECT_ITEM} WHERE i.id = ?1"),
                params![id.to_string()],
                row_to_stored_item,
            )
            .map_err(StoreError::from_query)
    }

    /// All items, newest first.
    pub fn list_items(&self) -> Result<Vec<StoredItem>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{SELECT_ITEM} ORDER BY i.created_at DESC, i.rowid DESC"))?;

        let rows = stmt.query_map([], row_to_stored_item)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    /// Items created by one donator, newest first.
    pub fn list_items_by_donator(&self, donator: &UserId) -> Result<Vec<StoredItem>> {
        let mut stmt = self.conn().prepare(&format!(
            "{SELECT_ITEM} WHERE i.donator_id = ?1 ORDER BY i.created_at DESC, i.rowid DESC"
        ))?;

        let rows = stmt.query_map(params![donator.as_str()], row_to_stored_item)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Overwrite the editable fields.  Only rows owned by `donator` are
    /// touched; returns `false` when nothing matched.
    pub fn update_item(
        &self,
        id: ItemId,
        donator: &UserId,
        name: &str,
        description: &str,
        location: Option<GeoPoint>,
    ) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE items SET name = ?1, description = ?2, latitude = ?3, longitude = ?4
             WHERE id = ?5 AND donator_id = ?6",
            params![
                name,
                description,
                location.map(|p| p.latitude),
                location.map(|p| p.longitude),
                id.to_string(),
                donator.as_str(),
            ],
        )?;
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn row_to_stored_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredItem> {
    let status_str: String = row.get(8)?;
    let status = status_str.parse::<ItemStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(StoredItem {
        item: Item {
            id: ItemId(uuid_at(row, 0)?),
            donator_id: user_at(row, 1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            location: point_at(row, 4)?,
            image_ref: row.get(6)?,
            created_at: ts_at(row, 7)?,
        },
        status,
    })
}
