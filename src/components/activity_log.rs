//! Activity Log Component
//!
//! Collapsible view of the logger's rolling buffer.

use console_logger::LogHandle;
use leptos::prelude::*;

#[component]
pub fn ActivityLog() -> impl IntoView {
    let handle = use_context::<LogHandle>();
    let (open, set_open) = signal(false);
    let (lines, set_lines) = signal(Vec::<String>::new());

    let toggle = move |_| {
        let opening = !open.get_untracked();
        if opening {
            let recent = handle.as_ref().map(|h| h.recent()).unwrap_or_default();
            set_lines.set(recent);
        }
        set_open.set(opening);
    };

    view! {
        <div class="activity-log">
            <button class="activity-log-toggle" on:click=toggle>
                {move || if open.get() { "Hide activity" } else { "Show activity" }}
            </button>
            <Show when=move || open.get()>
                <pre class="activity-log-lines">
                    {move || lines.get().join("\n")}
                </pre>
            </Show>
        </div>
    }
}
