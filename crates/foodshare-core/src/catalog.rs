//! Donation listings.
//!
//! Donators create and edit items; everyone else browses them.  Listings are
//! labelled with the city their pickup coordinate reverse-geocodes to, and
//! filtered on that label and the item name.

use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use foodshare_geo::LocationResolver;
use foodshare_shared::constants::{ALL_LOCATIONS, UNKNOWN_LOCATION};
use foodshare_shared::{GeoPoint, IdentityProvider, ItemId, ItemStatus, Role};
use foodshare_store::{Item, StoredItem};

use crate::access::require_role;
use crate::error::{Result, ServiceError};
use crate::object_store::{item_image_key, ObjectStore};
use crate::validate;
use crate::SharedDatabase;

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ItemImage {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub location: Option<GeoPoint>,
    pub image: Option<ItemImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemUpdate {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

/// What to do when the image upload fails while creating an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageUploadPolicy {
    /// Keep the item without an image and report the failure.
    #[default]
    Tolerate,
    /// Fail the whole creation; nothing is persisted.
    Require,
}

impl FromStr for ImageUploadPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tolerate" => Ok(Self::Tolerate),
            "require" => Ok(Self::Require),
            other => Err(format!("unknown image upload policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum ImageOutcome {
    /// No image was supplied.
    None,
    /// Stored; carries the retrievable URL.
    Stored(String),
    /// Upload failed; carries the reason.
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedItem {
    pub item: StoredItem,
    pub image: ImageOutcome,
}

/// Browse filter.  Unset fields match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilter {
    /// City label; `"All"` matches every label.
    pub location_label: Option<String>,
    /// Substring of the item name or its label.
    pub search_text: Option<String>,
    pub status: Option<ItemStatus>,
}

impl ItemFilter {
    fn matches(&self, listing: &ItemListing) -> bool {
        if let Some(status) = self.status {
            if listing.item.status != status {
                return false;
            }
        }
        if let Some(label) = self.location_label.as_deref().map(str::trim) {
            if !label.is_empty()
                && !label.eq_ignore_ascii_case(ALL_LOCATIONS)
                && !label.eq_ignore_ascii_case(&listing.location_label)
            {
                return false;
            }
        }
        if let Some(text) = self.search_text.as_deref().map(str::trim) {
            let needle = text.to_lowercase();
            if !needle.is_empty()
                && !listing.item.item.name.to_lowercase().contains(&needle)
                && !listing.location_label.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// A stored item with its display label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemListing {
    #[serde(flatten)]
    pub item: StoredItem,
    pub location_label: String,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct ItemCatalog {
    db: SharedDatabase,
    objects: Arc<dyn ObjectStore>,
    resolver: Arc<dyn LocationResolver>,
    image_policy: ImageUploadPolicy,
}

impl ItemCatalog {
    pub fn new(
        db: SharedDatabase,
        objects: Arc<dyn ObjectStore>,
        resolver: Arc<dyn LocationResolver>,
    ) -> Self {
        Self {
            db,
            objects,
            resolver,
            image_policy: ImageUploadPolicy::default(),
        }
    }

    pub fn with_image_policy(mut self, policy: ImageUploadPolicy) -> Self {
        self.image_policy = policy;
        self
    }

    /// List a new item on behalf of the signed-in donator.
    pub async fn create_item(
        &self,
        identity: &dyn IdentityProvider,
        new: NewItem,
    ) -> Result<CreatedItem> {
        let user = require_role(identity, Role::Donator, "list an item")?;
        let name = validate::required("name", &new.name)?;
        let description = validate::required("description", &new.description)?;
        let now = Utc::now();

        let (image_ref, image) = match new.image {
            None => (None, ImageOutcome::None),
            Some(img) => {
                let key = item_image_key(&user.id, now);
                match self
                    .objects
                    .put(&key, img.bytes, img.content_type.as_deref())
                    .await
                {
                    Ok(url) => (Some(url.clone()), ImageOutcome::Stored(url)),
                    Err(e) => match self.image_policy {
                        ImageUploadPolicy::Require => {
                            return Err(ServiceError::Storage(format!("image upload failed: {e}")))
                        }
                        ImageUploadPolicy::Tolerate => {
                            warn!(donator = %user.id, error = %e, "image upload failed, keeping item without image");
                            (None, ImageOutcome::Failed(e.to_string()))
                        }
                    },
                }
            }
        };

        let item = Item {
            id: ItemId::new(),
            donator_id: user.id.clone(),
            name,
            description,
            location: new.location,
            image_ref,
            created_at: now,
        };

        let stored = {
            let db = self.db.lock()?;
            db.insert_item(&item)?;
            db.get_item(item.id)?
        };

        info!(item_id = %item.id, donator = %user.id, "item listed");
        Ok(CreatedItem {
            item: stored,
            image,
        })
    }

    /// Snapshot of every item matching `filter`, newest first.
    pub async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<ItemListing>> {
        let items = {
            let db = self.db.lock()?;
            db.list_items()?
        };

        let items = match filter.status {
            Some(status) => items.into_iter().filter(|i| i.status == status).collect(),
            None => items,
        };

        let listings = self.label(items).await;
        Ok(listings.into_iter().filter(|l| filter.matches(l)).collect())
    }

    pub async fn get_item(&self, id: ItemId) -> Result<ItemListing> {
        let item = {
            let db = self.db.lock()?;
            db.get_item(id).map_err(|e| not_found(e, id))?
        };
        let label = self.locality(item.item.location).await;
        Ok(ItemListing {
            item,
            location_label: label,
        })
    }

    /// Edit an item.  Only the donator who listed it may.
    pub async fn update_item(
        &self,
        identity: &dyn IdentityProvider,
        id: ItemId,
        update: ItemUpdate,
    ) -> Result<ItemListing> {
        let user = require_role(identity, Role::Donator, "edit an item")?;
        let name = validate::required("name", &update.name)?;
        let description = validate::required("description", &update.description)?;

        {
            let db = self.db.lock()?;
            let updated = db.update_item(id, &user.id, &name, &description, update.location)?;
            if !updated {
                // Nothing matched: either missing, or somebody else's.
                db.get_item(id).map_err(|e| not_found(e, id))?;
                return Err(ServiceError::Forbidden(
                    "only the donator who listed an item may edit it".into(),
                ));
            }
        }

        info!(item_id = %id, donator = %user.id, "item updated");
        self.get_item(id).await
    }

    /// The signed-in donator's own listings.
    pub async fn list_donations(&self, identity: &dyn IdentityProvider) -> Result<Vec<ItemListing>> {
        let user = require_role(identity, Role::Donator, "view donations")?;
        let items = {
            let db = self.db.lock()?;
            db.list_items_by_donator(&user.id)?
        };
        Ok(self.label(items).await)
    }

    // ------------------------------------------------------------------
    // Labels
    // ------------------------------------------------------------------

    async fn label(&self, items: Vec<StoredItem>) -> Vec<ItemListing> {
        let labels = join_all(items.iter().map(|i| self.locality(i.item.location))).await;
        items
            .into_iter()
            .zip(labels)
            .map(|(item, location_label)| ItemListing {
                item,
                location_label,
            })
            .collect()
    }

    async fn locality(&self, location: Option<GeoPoint>) -> String {
        match location {
            Some(point) => self.resolver.resolve_locality(point).await,
            None => UNKNOWN_LOCATION.to_string(),
        }
    }
}

fn not_found(e: foodshare_store::StoreError, id: ItemId) -> ServiceError {
    match e {
        foodshare_store::StoreError::NotFound => ServiceError::NotFound(format!("item {id}")),
        other => other.into(),
    }
}
