use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use reqwest::Method;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use super::{Collection, Resource, ResourceId};
use crate::envelope;
use crate::error::HttpError;
use crate::transport::{HttpTransport, RequestOptions};

const CHANGE_CAPACITY: usize = 64;

/// Notification published after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Created(ResourceId),
    Updated(ResourceId),
    Removed(ResourceId),
}

/// CRUD client and in-memory cache for one resource type.
///
/// Clone-friendly via Arc: clones share the cache and the change channel,
/// so several view models can sit on the same store.
#[derive(Clone)]
pub struct ResourceStore<T: Resource> {
    transport: HttpTransport,
    collection: Arc<RwLock<Collection<T>>>,
    changes: broadcast::Sender<StoreChange>,
}

impl<T: Resource> ResourceStore<T> {
    pub fn new(transport: HttpTransport) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            transport,
            collection: Arc::new(RwLock::new(Collection::new())),
            changes,
        }
    }

    /// Copy of the cached collection.
    pub fn snapshot(&self) -> Collection<T> {
        self.read().clone()
    }

    /// Cached entity by id, without a network call.
    pub fn cached(&self, id: ResourceId) -> Option<T> {
        self.read().get(id).cloned()
    }

    /// Receive a [`StoreChange`] after every successful create, update or remove.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    /// `GET PATH`; replaces the cache with the server's list.
    pub async fn list(&self) -> Result<Collection<T>, HttpError> {
        self.fetch_collection(T::PATH.to_string()).await
    }

    /// `GET PATH?<param>=<id>`; replaces the cache with the server's list.
    pub async fn list_scoped(
        &self,
        param: &str,
        id: ResourceId,
    ) -> Result<Collection<T>, HttpError> {
        self.fetch_collection(format!("{}?{}={}", T::PATH, param, id))
            .await
    }

    /// `GET PATH/<id>`; a 404 becomes [`HttpError::NotFound`].
    pub async fn get(&self, id: ResourceId) -> Result<T, HttpError> {
        let body = self
            .transport
            .request(Method::GET, &item_path::<T>(id), RequestOptions::new())
            .await
            .map_err(|e| e.not_found_as(describe::<T>(id)))?;
        let item: T = envelope::item(body, T::ITEM)?;
        self.write().upsert(item.clone());
        Ok(item)
    }

    /// `POST PATH`; the server assigns the id.
    pub async fn create(&self, draft: &T::Draft) -> Result<T, HttpError> {
        let body = self
            .transport
            .request(Method::POST, T::PATH, RequestOptions::new().json(encode(draft)?))
            .await?;
        let created: T = envelope::item(body, T::ITEM)?;
        let id = created.id();
        self.write().upsert(created.clone());
        self.notify(StoreChange::Created(id));
        Ok(created)
    }

    /// `PUT PATH/<id>` with `patch`. The cache takes the server's returned
    /// representation, not the patch.
    pub async fn update<P>(&self, id: ResourceId, patch: &P) -> Result<T, HttpError>
    where
        P: Serialize + ?Sized,
    {
        let body = self
            .transport
            .request(
                Method::PUT,
                &item_path::<T>(id),
                RequestOptions::new().json(encode(patch)?),
            )
            .await
            .map_err(|e| e.not_found_as(describe::<T>(id)))?;
        let updated: T = envelope::item(body, T::ITEM)?;
        self.write().upsert(updated.clone());
        self.notify(StoreChange::Updated(id));
        Ok(updated)
    }

    /// `DELETE PATH/<id>`. The cache is pruned only once the server
    /// acknowledges; on any error it is left untouched.
    pub async fn remove(&self, id: ResourceId) -> Result<(), HttpError> {
        let body = self
            .transport
            .request(Method::DELETE, &item_path::<T>(id), RequestOptions::new())
            .await
            .map_err(|e| e.not_found_as(describe::<T>(id)))?;
        envelope::acknowledge(body)?;
        self.write().remove(id);
        self.notify(StoreChange::Removed(id));
        Ok(())
    }

    async fn fetch_collection(&self, path: String) -> Result<Collection<T>, HttpError> {
        let body = self
            .transport
            .request(Method::GET, &path, RequestOptions::new())
            .await?;
        let collection = Collection::from(envelope::collection::<T>(body, T::COLLECTION)?);
        *self.write() = collection.clone();
        Ok(collection)
    }

    fn notify(&self, change: StoreChange) {
        debug!(resource = T::COLLECTION, ?change, "store changed");
        // No subscribers is fine.
        let _ = self.changes.send(change);
    }

    // Every write stores a complete server value, so a poisoned guard is
    // still consistent.
    fn read(&self) -> RwLockReadGuard<'_, Collection<T>> {
        self.collection.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collection<T>> {
        self.collection.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn item_path<T: Resource>(id: ResourceId) -> String {
    format!("{}/{}", T::PATH.trim_end_matches('/'), id)
}

fn describe<T: Resource>(id: ResourceId) -> String {
    format!("{} {}", T::ITEM, id)
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, HttpError> {
    serde_json::to_value(body).map_err(|e| HttpError::Encode(e.to_string()))
}
