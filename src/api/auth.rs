//! Auth Bindings
//!
//! `auth/register` and `auth/login`.

use log::info;
use serde_json::Value;

use super::{ApiClient, Envelope, Method};
use crate::error::ApiError;
use crate::models::{Credentials, LoginData, Registration};

#[derive(Clone, Debug)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `POST auth/register`
    pub async fn register(&self, registration: &Registration) -> Result<Envelope<Value>, ApiError> {
        let envelope = self
            .api
            .request::<Value, Registration>(Method::Post, "auth/register", Some(registration))
            .await?;
        info!("[AUTH] Registered {}", registration.email);
        Ok(envelope)
    }

    /// `POST auth/login`; the token is returned, not stored
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginData, ApiError> {
        let envelope = self
            .api
            .request::<LoginData, Credentials>(Method::Post, "auth/login", Some(credentials))
            .await?;
        envelope.into_data()
    }
}
