//! Ledger Frontend App
//!
//! Provides shared services and routes between the three screens.

use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;
use log::info;

use crate::components::{AuthPage, ExpensePage, NavBar, TemplatePage};
use crate::config::Config;
use crate::context::AppContext;
use crate::store::{AppState, AppStore};

/// Screens reachable from the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRoute {
    Auth,
    Templates,
    Expenses,
}

impl AppRoute {
    pub const ALL: [AppRoute; 3] = [AppRoute::Auth, AppRoute::Templates, AppRoute::Expenses];

    pub fn path(&self) -> &'static str {
        match self {
            AppRoute::Auth => "/auth",
            AppRoute::Templates => "/template",
            AppRoute::Expenses => "/expense",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppRoute::Auth => "Auth",
            AppRoute::Templates => "Templates",
            AppRoute::Expenses => "Expenses",
        }
    }
}

#[component]
pub fn App(config: Config) -> impl IntoView {
    let ctx = AppContext::new(config);
    let authenticated = ctx.session.is_authenticated();
    info!("[APP] Starting, API at {}, session present: {}", ctx.config.api_base_url, authenticated);

    // Provide context to all children
    provide_context(ctx);
    provide_context(AppStore::new(AppState::new(authenticated)));

    view! {
        <Router>
            <NavBar />
            <main class="main-content">
                <Routes fallback=|| view! { <p class="not-found">"Page not found."</p> }>
                    <Route path=path!("/") view=|| view! { <Redirect path=AppRoute::Auth.path() /> } />
                    <Route path=path!("/auth") view=AuthPage />
                    <Route path=path!("/template") view=TemplatePage />
                    <Route path=path!("/expense") view=ExpensePage />
                </Routes>
            </main>
        </Router>
    }
}
