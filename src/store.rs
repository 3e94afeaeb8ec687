//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

/// Session-derived state the shell renders from
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// A session token is held
    pub authenticated: bool,
    /// Email of the last successful login in this tab
    pub user_email: Option<String>,
}

impl AppState {
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}
