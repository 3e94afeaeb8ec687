//! Application Context
//!
//! Configuration and clients shared by every screen via the Leptos Context
//! API.

use leptos::prelude::*;

use crate::api::{ApiClient, AuthClient, ExpenseClient, Expenses, TemplateClient, Templates};
use crate::config::Config;
use crate::list_model::DraftDefaults;
use crate::session::Session;
use crate::sync::ListSync;

/// App-wide services provided via context
#[derive(Clone, Debug)]
pub struct AppContext {
    pub config: Config,
    /// Session token shared with the HTTP client
    pub session: Session,
    api: ApiClient,
}

impl AppContext {
    /// Browser wiring: localStorage session, reqwest transport
    pub fn new(config: Config) -> Self {
        let session = Session::local_storage(config.token_key.clone());
        let api = ApiClient::http(config.api_base_url.clone(), session.clone());
        Self::with_client(config, api)
    }

    pub fn with_client(config: Config, api: ApiClient) -> Self {
        Self {
            config,
            session: api.session().clone(),
            api,
        }
    }

    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.api.clone())
    }

    pub fn templates(&self) -> ListSync<Templates> {
        ListSync::new(TemplateClient::new(self.api.clone()))
    }

    pub fn expenses(&self) -> ListSync<Expenses> {
        ListSync::new(ExpenseClient::new(self.api.clone()))
    }

    pub fn draft_defaults(&self) -> DraftDefaults {
        DraftDefaults {
            template_id: self.config.default_template_id.clone(),
        }
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
