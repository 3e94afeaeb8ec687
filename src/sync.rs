//! Server round trips for list screens
//!
//! Drives a `ListModel` through its `begin_*`/`finish_*` pairs around the
//! actual requests. The model is reached through a `ModelHandle`; a handle
//! whose screen is gone swallows late results.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;

use crate::api::ResourceClient;
use crate::error::ListError;
use crate::list_model::{AfterMutation, ListModel, ListResource, Operation, Submission};
use crate::models::RecordId;

/// Access to a screen's model. `None` means the screen was unmounted.
pub trait ModelHandle<R: ListResource> {
    fn update_model<U>(&self, change: impl FnOnce(&mut ListModel<R>) -> U) -> Option<U>;
}

impl<R: ListResource> ModelHandle<R> for RwSignal<ListModel<R>>
where
    ListModel<R>: Send + Sync,
{
    fn update_model<U>(&self, change: impl FnOnce(&mut ListModel<R>) -> U) -> Option<U> {
        self.try_update(change)
    }
}

impl<R: ListResource> ModelHandle<R> for Rc<RefCell<ListModel<R>>> {
    fn update_model<U>(&self, change: impl FnOnce(&mut ListModel<R>) -> U) -> Option<U> {
        Some(change(&mut self.borrow_mut()))
    }
}

pub struct ListSync<R: ListResource> {
    client: ResourceClient<R>,
}

impl<R: ListResource> Clone for ListSync<R> {
    fn clone(&self) -> Self {
        Self { client: self.client.clone() }
    }
}

impl<R: ListResource> ListSync<R> {
    pub fn new(client: ResourceClient<R>) -> Self {
        Self { client }
    }

    /// Reload the whole collection
    pub async fn refresh(&self, model: &impl ModelHandle<R>) {
        let Some(generation) = model.update_model(|m| m.begin_refresh()) else {
            return;
        };
        let result = self.client.list().await;
        if model.update_model(|m| m.finish_refresh(generation, result)).is_none() {
            debug!("[SYNC] {} screen gone, load discarded", R::PATH);
        }
    }

    /// Send the active draft (create or update) and sync the cache
    pub async fn submit(&self, model: &impl ModelHandle<R>) -> Result<(), ListError> {
        let Some(started) = model.update_model(|m| m.begin_submit()) else {
            return Ok(());
        };
        let submission = started?;

        let result = match &submission {
            Submission::Create(draft) => self.client.create(draft).await,
            Submission::Update { id, draft } => self.client.update(draft, id).await,
        };
        let outcome = result.clone().map(|_| ());

        let step = model.update_model(|m| m.finish_submit(submission, result));
        if step == Some(AfterMutation::Refetch) {
            self.refresh(model).await;
        }
        outcome.map_err(ListError::from)
    }

    /// Delete one row and sync the cache
    pub async fn delete(&self, model: &impl ModelHandle<R>, id: RecordId) -> Result<(), ListError> {
        let Some(started) = model.update_model(|m| m.begin_delete(&id)) else {
            return Ok(());
        };
        started?;

        let result = self.client.delete(&id).await;
        let outcome = result.clone();

        let step = model.update_model(|m| m.finish_delete(&id, result));
        if step == Some(AfterMutation::Refetch) {
            self.refresh(model).await;
        }
        outcome.map_err(ListError::from)
    }

    /// Run the operation behind the current error again
    pub async fn retry(&self, model: &impl ModelHandle<R>) -> Result<(), ListError> {
        let failed = model
            .update_model(|m| m.last_error().map(|f| f.operation.clone()))
            .flatten();
        match failed {
            None => Ok(()),
            Some(Operation::Load) => {
                self.refresh(model).await;
                Ok(())
            }
            Some(Operation::Create) | Some(Operation::Update(_)) => self.submit(model).await,
            Some(Operation::Delete(id)) => self.delete(model, id).await,
        }
    }
}
