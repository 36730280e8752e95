use std::cmp::Ordering;
use std::future::Future;
use std::sync::Arc;

use crate::error::HttpError;
use crate::store::{Collection, Resource, ResourceId, ResourceStore};

/// A keyed fetch a [`ViewModel`](super::ViewModel) can drive.
pub trait Query: Send + Sync + 'static {
    /// The dependency the fetch is bound to.
    type Key: Clone + Send + Sync + 'static;
    type Output: Clone + Send + Sync + 'static;

    fn fetch(&self, key: Self::Key) -> impl Future<Output = Result<Self::Output, HttpError>> + Send;
}

/// Queries backed by a [`ResourceStore`], which gives their view models
/// create, update and remove.
pub trait StoreBacked {
    type Resource: Resource;

    fn store(&self) -> &ResourceStore<Self::Resource>;
}

type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// The whole collection, in server order unless [`sorted_by`](Self::sorted_by).
pub struct ListQuery<T: Resource> {
    store: ResourceStore<T>,
    order: Option<Comparator<T>>,
}

impl<T: Resource> ListQuery<T> {
    pub fn new(store: ResourceStore<T>) -> Self {
        Self { store, order: None }
    }

    /// Re-sort every fetched list with `compare` (stable).
    pub fn sorted_by<F>(mut self, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.order = Some(Arc::new(compare));
        self
    }
}

impl<T: Resource> Query for ListQuery<T> {
    type Key = ();
    type Output = Collection<T>;

    fn fetch(&self, _key: ()) -> impl Future<Output = Result<Collection<T>, HttpError>> + Send {
        let store = self.store.clone();
        let order = self.order.clone();
        async move {
            let mut collection = store.list().await?;
            if let Some(order) = order {
                collection.sort_by(|a, b| order(a, b));
            }
            Ok(collection)
        }
    }
}

impl<T: Resource> StoreBacked for ListQuery<T> {
    type Resource = T;

    fn store(&self) -> &ResourceStore<T> {
        &self.store
    }
}

/// The collection filtered server-side by a parent id, e.g. chat messages
/// for the selected contact. A `None` key yields an empty collection
/// without a request.
pub struct ScopedListQuery<T: Resource> {
    store: ResourceStore<T>,
    param: &'static str,
}

impl<T: Resource> ScopedListQuery<T> {
    /// Scope by the query-string parameter `param`.
    pub fn new(store: ResourceStore<T>, param: &'static str) -> Self {
        Self { store, param }
    }
}

impl<T: Resource> Query for ScopedListQuery<T> {
    type Key = Option<ResourceId>;
    type Output = Collection<T>;

    fn fetch(
        &self,
        key: Option<ResourceId>,
    ) -> impl Future<Output = Result<Collection<T>, HttpError>> + Send {
        let store = self.store.clone();
        let param = self.param;
        async move {
            match key {
                Some(id) => store.list_scoped(param, id).await,
                None => Ok(Collection::new()),
            }
        }
    }
}

impl<T: Resource> StoreBacked for ScopedListQuery<T> {
    type Resource = T;

    fn store(&self) -> &ResourceStore<T> {
        &self.store
    }
}

/// One entity by id.
pub struct ItemQuery<T: Resource> {
    store: ResourceStore<T>,
}

impl<T: Resource> ItemQuery<T> {
    pub fn new(store: ResourceStore<T>) -> Self {
        Self { store }
    }
}

impl<T: Resource> Query for ItemQuery<T> {
    type Key = ResourceId;
    type Output = T;

    fn fetch(&self, id: ResourceId) -> impl Future<Output = Result<T, HttpError>> + Send {
        let store = self.store.clone();
        async move { store.get(id).await }
    }
}

impl<T: Resource> StoreBacked for ItemQuery<T> {
    type Resource = T;

    fn store(&self) -> &ResourceStore<T> {
        &self.store
    }
}
