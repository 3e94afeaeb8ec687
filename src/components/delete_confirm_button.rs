//! Delete Confirm Button Component
//!
//! Row delete that asks first. A pending question is withdrawn as soon as
//! the row stops accepting actions (another row went into edit, a request
//! started).

use leptos::prelude::*;

/// Text of the confirmation prompt for a row
pub fn confirm_prompt(item_name: &str) -> String {
    let name = item_name.trim();
    if name.is_empty() {
        "Delete this row?".to_string()
    } else {
        format!("Delete \"{}\"?", name)
    }
}

/// # Arguments
/// * `item_name` - Shown in the prompt so the user sees which row goes
/// * `disabled` - Row actions are unavailable; also withdraws a pending prompt
/// * `on_confirm` - Runs once the user answers Yes
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] item_name: String,
    #[prop(into)] disabled: Signal<bool>,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (asking, set_asking) = signal(false);
    let prompt = confirm_prompt(&item_name);

    Effect::new(move |_| {
        if disabled.get() {
            set_asking.set(false);
        }
    });

    move || {
        if asking.get() {
            view! {
                <span class="delete-confirm" role="alertdialog">
                    <span class="delete-confirm-text">{prompt.clone()}</span>
                    <button
                        class="confirm-btn"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_asking.set(false);
                            on_confirm.run(());
                        }
                    >
                        "Yes"
                    </button>
                    <button
                        class="cancel-btn"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_asking.set(false);
                        }
                    >
                        "No"
                    </button>
                </span>
            }
            .into_any()
        } else {
            view! {
                <button
                    class="delete-btn"
                    title="Delete"
                    disabled=move || disabled.get()
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_asking.set(true);
                    }
                >
                    "Delete"
                </button>
            }
            .into_any()
        }
    }
}
