//! Navigation Bar Component
//!
//! Links to the three screens plus logout once a session exists.

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::app::AppRoute;
use crate::auth_form;
use crate::components::ActivityLog;
use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn NavBar() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let navigate = use_navigate();

    let on_logout = move |_| {
        auth_form::logout(&ctx.session);
        store.authenticated().set(false);
        store.user_email().set(None);
        navigate(AppRoute::Auth.path(), Default::default());
    };

    view! {
        <nav class="nav-bar">
            <span class="brand">"Ledger"</span>
            <ul class="nav-links">
                {AppRoute::ALL.into_iter().map(|route| view! {
                    <li><A href=route.path()>{route.label()}</A></li>
                }).collect_view()}
            </ul>
            <Show when=move || store.authenticated().get()>
                <span class="user-email">{move || store.user_email().get().unwrap_or_default()}</span>
                <button class="logout-btn" on:click=on_logout.clone()>"Logout"</button>
            </Show>
            <ActivityLog />
        </nav>
    }
}
