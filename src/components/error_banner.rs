//! Error Banner Component
//!
//! The one place a screen's last failure is shown, with Retry and Dismiss.

use leptos::prelude::*;

use crate::list_model::Failure;

#[component]
pub fn ErrorBanner(
    #[prop(into)] failure: Signal<Option<Failure>>,
    #[prop(into)] busy: Signal<bool>,
    #[prop(into)] on_retry: Callback<()>,
    #[prop(into)] on_dismiss: Callback<()>,
) -> impl IntoView {
    view! {
        <Show when=move || failure.get().is_some()>
            <div class="error-banner" role="alert">
                <p>{move || failure.get().map(|f| f.message).unwrap_or_default()}</p>
                <button
                    class="retry-btn"
                    disabled=move || busy.get()
                    on:click=move |_| on_retry.run(())
                >
                    "Retry"
                </button>
                <button class="dismiss-btn" on:click=move |_| on_dismiss.run(())>
                    "Dismiss"
                </button>
            </div>
        </Show>
    }
}
