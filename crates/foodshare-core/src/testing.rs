//! In-memory collaborators for service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use foodshare_geo::{GeoError, LocationResolver};
use foodshare_shared::constants::{NO_ADDRESS_FOUND, UNKNOWN_LOCATION};
use foodshare_shared::GeoPoint;
use foodshare_store::Database;

use crate::notify::{Notification, Notifier, NotifyError};
use crate::object_store::{ObjectStore, ObjectStoreError};
use crate::SharedDatabase;

pub fn memory_db() -> SharedDatabase {
    crate::share(Database::open_in_memory().unwrap())
}

/// Resolver answering from a fixed table keyed by `GeoPoint`'s display form.
#[derive(Default)]
pub struct FakeResolver {
    places: HashMap<String, (String, String)>,
}

impl FakeResolver {
    pub fn with_place(mut self, point: GeoPoint, address: &str, city: &str) -> Self {
        self.places
            .insert(point.to_string(), (address.to_string(), city.to_string()));
        self
    }
}

#[async_trait]
impl LocationResolver for FakeResolver {
    async fn resolve_address(&self, point: GeoPoint) -> String {
        self.places
            .get(&point.to_string())
            .map(|(a, _)| a.clone())
            .unwrap_or_else(|| NO_ADDRESS_FOUND.to_string())
    }

    async fn resolve_coordinates(&self, address: &str) -> Result<GeoPoint, GeoError> {
        self.places
            .iter()
            .find(|(_, (a, _))| a == address)
            .and_then(|(k, _)| {
                let (lat, lon) = k.split_once(',')?;
                GeoPoint::new(lat.parse().ok()?, lon.parse().ok()?).ok()
            })
            .ok_or_else(|| GeoError::NotFound(address.to_string()))
    }

    async fn resolve_locality(&self, point: GeoPoint) -> String {
        self.places
            .get(&point.to_string())
            .map(|(_, c)| c.clone())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
    }
}

#[derive(Default)]
pub struct MemoryObjectStore {
    pub objects: Mutex<HashMap<String, Bytes>>,
    pub fail: AtomicBool,
}

impl MemoryObjectStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.fail.store(true, Ordering::SeqCst);
        store
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        _content_type: Option<&str>,
    ) -> Result<String, ObjectStoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ObjectStoreError::Rejected("bucket unavailable".into()));
        }
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
        Ok(format!("memory://{key}"))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Notification>>,
    pub fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        let n = Self::default();
        n.fail.store(true, Ordering::SeqCst);
        n
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError("webhook down".into()));
        }
        Ok(())
    }
}
