//! Image blob storage collaborator.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use foodshare_shared::constants::ITEM_IMAGE_PREFIX;
use foodshare_shared::UserId;

#[derive(Error, Debug)]
pub enum ObjectStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The store refused the object (size, key, content type).
    #[error("Rejected: {0}")]
    Rejected(String),
}

/// Stores opaque blobs under a key and hands back a retrievable URL.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> Result<String, ObjectStoreError>;
}

/// Key for an item image: `items/{hex(donator)}/{unix_millis}-{nonce}`.
///
/// User ids are opaque gateway strings (`auth0|...`, emails), so the donator
/// segment is hex encoded to keep keys in `[0-9a-f-]`.  The nonce keeps two
/// uploads in the same millisecond apart.
pub fn item_image_key(donator: &UserId, at: DateTime<Utc>) -> String {
    format!(
        "{ITEM_IMAGE_PREFIX}/{}/{}-{}",
        hex::encode(donator.as_str()),
        at.timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn is_safe_segment(seg: &str) -> bool {
        !seg.is_empty() && seg.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    }

    #[test]
    fn image_key_layout() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let key = item_image_key(&UserId::new("uid-9"), at);
        let parts: Vec<_> = key.split('/').collect();
        assert_eq!(parts[0], "items");
        assert_eq!(parts[1], hex::encode("uid-9"));
        assert!(parts[2].starts_with("1700000000123-"));
    }

    #[test]
    fn opaque_user_ids_give_plain_keys() {
        let at = Utc::now();
        for id in ["auth0|5f7c8ec7", "alice@example.com", "google-oauth2:1234", "a/../b"] {
            let key = item_image_key(&UserId::new(id), at);
            let segments: Vec<_> = key.split('/').collect();
            assert_eq!(segments.len(), 3, "{key}");
            assert!(segments.iter().all(|s| is_safe_segment(s)), "{key}");
        }
    }

    #[test]
    fn same_millisecond_keys_differ() {
        let at = Utc::now();
        let donator = UserId::new("uid-9");
        assert_ne!(item_image_key(&donator, at), item_image_key(&donator, at));
    }
}
