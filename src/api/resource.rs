//! Generic CRUD binding
//!
//! Every list resource lives at `<PATH>` and `<PATH>/<id>` and speaks the
//! same envelope, so one client serves all of them.

use std::fmt::Debug;
use std::marker::PhantomData;

use log::{debug, info};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{ApiClient, Method};
use crate::error::ApiError;
use crate::models::RecordId;

/// Characters escaped when an id becomes a path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A REST collection: its path plus read and write shapes
pub trait Resource: 'static {
    /// Collection path relative to the API root
    const PATH: &'static str;

    /// Shape returned by the server
    type Record: DeserializeOwned + Clone + PartialEq + Debug + Send + Sync + 'static;

    /// Shape sent on create/update
    type Draft: Serialize + Clone + PartialEq + Debug + Send + Sync + 'static;

    fn id(record: &Self::Record) -> &RecordId;
}

pub struct ResourceClient<R: Resource> {
    api: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self::new(self.api.clone())
    }
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(api: ApiClient) -> Self {
        Self { api, _resource: PhantomData }
    }

    pub fn item_path(id: &RecordId) -> String {
        format!("{}/{}", R::PATH, utf8_percent_encode(&id.canonical(), SEGMENT))
    }

    /// `GET <PATH>`; a missing `data` is an empty collection
    pub async fn list(&self) -> Result<Vec<R::Record>, ApiError> {
        let envelope = self
            .api
            .request::<Vec<R::Record>, ()>(Method::Get, R::PATH, None)
            .await?;
        let records = envelope.data.unwrap_or_default();
        debug!("[API] Loaded {} {} records", records.len(), R::PATH);
        Ok(records)
    }

    /// `POST <PATH>`; returns the created record when the server echoes it
    pub async fn create(&self, draft: &R::Draft) -> Result<Option<R::Record>, ApiError> {
        let envelope = self
            .api
            .request::<Value, R::Draft>(Method::Post, R::PATH, Some(draft))
            .await?;
        info!("[API] Created {} record", R::PATH);
        Ok(Self::echoed(envelope.data))
    }

    /// `PUT <PATH>/<id>`; returns the updated record when the server echoes it
    pub async fn update(&self, draft: &R::Draft, id: &RecordId) -> Result<Option<R::Record>, ApiError> {
        let envelope = self
            .api
            .request::<Value, R::Draft>(Method::Put, &Self::item_path(id), Some(draft))
            .await?;
        info!("[API] Updated {} {}", R::PATH, id);
        Ok(Self::echoed(envelope.data))
    }

    /// `DELETE <PATH>/<id>`
    pub async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
        self.api
            .request::<Value, ()>(Method::Delete, &Self::item_path(id), None)
            .await?;
        info!("[API] Deleted {} {}", R::PATH, id);
        Ok(())
    }

    /// Servers differ in what they echo after a write; anything that is not
    /// a record is ignored.
    fn echoed(data: Option<Value>) -> Option<R::Record> {
        let value = data?;
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("[API] {} response carries no record: {}", R::PATH, e);
                None
            }
        }
    }
}
