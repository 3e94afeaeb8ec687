//! Auth Screen
//!
//! Login and sign-up tabs. Login stores the session token and moves on to
//! the templates; sign-up returns to the login tab.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use log::debug;

use crate::app::AppRoute;
use crate::auth_form::{self, AuthForm, AuthTab, Notice};
use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn AuthPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let navigate = use_navigate();
    let form = RwSignal::new(AuthForm::default());

    let tab = Memo::new(move |_| form.with(|f| f.tab));
    let submitting = Memo::new(move |_| form.with(|f| f.is_submitting()));
    let notice = Memo::new(move |_| form.with(|f| f.notice().cloned()));

    let on_login = {
        let ctx = ctx.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let mut claimed = false;
            form.update(|f| claimed = f.begin_submit());
            if !claimed {
                return;
            }
            let credentials = form.with_untracked(|f| f.login.clone());
            let auth = ctx.auth();
            let session = ctx.session.clone();
            let navigate = navigate.clone();
            spawn_local(async move {
                let result = auth_form::login(&auth, &session, &credentials).await;
                let ok = result.is_ok();
                if form.try_update(|f| f.finish_login(&result)).is_none() {
                    debug!("[AUTH] Screen gone, login result dropped");
                    return;
                }
                if ok {
                    store.authenticated().set(true);
                    store.user_email().set(Some(credentials.email));
                    navigate(AppRoute::Templates.path(), Default::default());
                }
            });
        }
    };

    let on_signup = {
        let ctx = ctx.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let mut claimed = false;
            form.update(|f| claimed = f.begin_submit());
            if !claimed {
                return;
            }
            let registration = form.with_untracked(|f| f.signup.clone());
            let auth = ctx.auth();
            spawn_local(async move {
                let result = auth_form::register(&auth, &registration).await;
                form.try_update(|f| f.finish_signup(&result));
            });
        }
    };

    let tab_button = move |target: AuthTab, label: &'static str| {
        view! {
            <button
                type="button"
                class=move || if tab.get() == target { "auth-tab active" } else { "auth-tab" }
                disabled=move || submitting.get()
                on:click=move |_| form.update(|f| f.switch_tab(target))
            >
                {label}
            </button>
        }
    };

    view! {
        <section class="auth-page">
            <div class="auth-card">
                <div class="auth-tabs">
                    {tab_button(AuthTab::Login, "Login")}
                    {tab_button(AuthTab::Signup, "Sign Up")}
                </div>

                <Show
                    when=move || tab.get() == AuthTab::Login
                    fallback=move || view! {
                        <form class="auth-form" on:submit=on_signup.clone()>
                            <input
                                type="email"
                                required
                                placeholder="Email"
                                prop:value=move || form.with(|f| f.signup.email.clone())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    form.update(|f| f.signup.email = value);
                                }
                            />
                            <input
                                type="password"
                                required
                                placeholder="Password"
                                prop:value=move || form.with(|f| f.signup.password.clone())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    form.update(|f| f.signup.password = value);
                                }
                            />
                            <button type="submit" disabled=move || submitting.get()>
                                {move || if submitting.get() { "Signing up..." } else { "Sign Up" }}
                            </button>
                        </form>
                    }
                >
                    <form class="auth-form" on:submit=on_login.clone()>
                        <input
                            type="email"
                            required
                            placeholder="Email"
                            prop:value=move || form.with(|f| f.login.email.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                form.update(|f| f.login.email = value);
                            }
                        />
                        <input
                            type="password"
                            required
                            placeholder="Password"
                            prop:value=move || form.with(|f| f.login.password.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                form.update(|f| f.login.password = value);
                            }
                        />
                        <button type="submit" disabled=move || submitting.get()>
                            {move || if submitting.get() { "Logging in..." } else { "Login" }}
                        </button>
                    </form>
                </Show>

                {move || notice.get().map(|n| match n {
                    Notice::Success(msg) => view! { <p class="notice success">{msg}</p> }.into_any(),
                    Notice::Error(msg) => view! { <p class="notice error" role="alert">{msg}</p> }.into_any(),
                })}
            </div>
        </section>
    }
}
