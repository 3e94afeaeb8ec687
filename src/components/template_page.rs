//! Template Screen
//!
//! Card list of templates with inline rename, an add form and delete.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::Templates;
use crate::components::{DeleteConfirmButton, ErrorBanner};
use crate::context::use_app_context;
use crate::list_model::ListModel;
use crate::models::{RecordId, Template};
use crate::resources::TemplateField;

type TemplateModel = RwSignal<ListModel<Templates>>;

fn draft_name(model: TemplateModel) -> String {
    model.with(|m| m.draft().map(|d| d.name.clone()).unwrap_or_default())
}

fn set_draft_name(model: TemplateModel, name: String) {
    model.update(|m| {
        m.edit_draft(|d| d.name = name);
    });
}

#[component]
pub fn TemplatePage() -> impl IntoView {
    let ctx = use_app_context();
    let model: TemplateModel = RwSignal::new(ListModel::new(ctx.draft_defaults()));
    let sync = StoredValue::new(ctx.templates());

    // Load on mount
    Effect::new(move |_| {
        let sync = sync.get_value();
        spawn_local(async move {
            sync.refresh(&model).await;
        });
    });

    let rows = Memo::new(move |_| model.with(|m| m.visible()));
    let editing = Memo::new(move |_| model.with(|m| m.editing_id().cloned()));
    let creating = Memo::new(move |_| model.with(|m| m.is_creating()));
    let idle = Memo::new(move |_| model.with(|m| m.is_idle()));
    let submitting = Memo::new(move |_| model.with(|m| m.is_submitting()));
    let empty = Memo::new(move |_| model.with(|m| m.is_empty_state()));
    let failure = Memo::new(move |_| model.with(|m| m.last_error().cloned()));
    let first_load = Memo::new(move |_| model.with(|m| !m.is_loaded()));
    let busy = Memo::new(move |_| model.with(|m| m.is_submitting() || m.is_loading()));
    let count = Memo::new(move |_| model.with(|m| m.items().len()));
    let sort = Memo::new(move |_| model.with(|m| m.sort()));

    let submit = move || {
        let sync = sync.get_value();
        spawn_local(async move {
            let _ = sync.submit(&model).await;
        });
    };

    let cancel = move || {
        model.update(|m| {
            let _ = m.cancel();
        });
    };

    let render_row = move |template: Template| {
        let id = template.id.clone();
        let is_editing = {
            let id = id.clone();
            move || editing.get().as_ref() == Some(&id)
        };
        let begin_edit = {
            let id = id.clone();
            move |_| {
                model.update(|m| {
                    let _ = m.begin_edit(&id);
                });
            }
        };
        let on_delete = Callback::new(move |_| {
            let id: RecordId = id.clone();
            let sync = sync.get_value();
            spawn_local(async move {
                let _ = sync.delete(&model, id).await;
            });
        });

        view! {
            <div class="template-card">
                {move || if is_editing() {
                    view! {
                        <form class="template-edit" on:submit=move |ev| {
                            ev.prevent_default();
                            submit();
                        }>
                            <input
                                type="text"
                                required
                                prop:value=move || draft_name(model)
                                on:input=move |ev| set_draft_name(model, event_target_value(&ev))
                            />
                            <button type="submit" class="save-btn" disabled=move || submitting.get()>
                                {move || if submitting.get() { "Saving..." } else { "Save" }}
                            </button>
                            <button
                                type="button"
                                class="cancel-btn"
                                disabled=move || submitting.get()
                                on:click=move |_| cancel()
                            >
                                "Cancel"
                            </button>
                        </form>
                    }.into_any()
                } else {
                    view! {
                        <div class="template-row">
                            <h3>{template.name.clone()}</h3>
                            <div class="row-actions">
                                <button
                                    class="edit-btn"
                                    title="Edit"
                                    disabled=move || !idle.get()
                                    on:click=begin_edit.clone()
                                >
                                    "Edit"
                                </button>
                                <DeleteConfirmButton
                                    item_name=template.name.clone()
                                    disabled=Signal::derive(move || !idle.get())
                                    on_confirm=on_delete
                                />
                            </div>
                        </div>
                    }.into_any()
                }}
            </div>
        }
    };

    view! {
        <section class="template-page">
            <header class="page-header">
                <h1>"Templates"</h1>
                <span class="item-count">{move || format!("{} templates", count.get())}</span>
                <button
                    class="sort-btn"
                    title="Sort by name"
                    on:click=move |_| model.update(|m| m.toggle_sort(TemplateField::Name))
                >
                    "Name "
                    <span class="sort-indicator">
                        {move || sort.get().map(|s| s.direction.arrow()).unwrap_or("⇅")}
                    </span>
                </button>
                <Show when=move || !creating.get() && !first_load.get()>
                    <button
                        class="add-btn"
                        disabled=move || !idle.get()
                        on:click=move |_| {
                            model.update(|m| {
                                let _ = m.begin_create();
                            });
                        }
                    >
                        "Add Template"
                    </button>
                </Show>
            </header>

            <ErrorBanner
                failure=failure
                busy=busy
                on_retry=Callback::new(move |_| {
                    let sync = sync.get_value();
                    spawn_local(async move {
                        let _ = sync.retry(&model).await;
                    });
                })
                on_dismiss=Callback::new(move |_| model.update(|m| m.dismiss_error()))
            />

            <Show
                when=move || !first_load.get()
                fallback=|| view! { <div class="loading">"Loading templates..."</div> }
            >
                <Show when=move || creating.get()>
                    <form class="new-template-form" on:submit=move |ev| {
                        ev.prevent_default();
                        submit();
                    }>
                        <h2>"Add New Template"</h2>
                        <label>
                            "Name"
                            <input
                                type="text"
                                required
                                placeholder="Enter name"
                                prop:value=move || draft_name(model)
                                on:input=move |ev| set_draft_name(model, event_target_value(&ev))
                            />
                        </label>
                        <div class="form-actions">
                            <button
                                type="button"
                                class="cancel-btn"
                                disabled=move || submitting.get()
                                on:click=move |_| cancel()
                            >
                                "Cancel"
                            </button>
                            <button
                                type="submit"
                                class="save-btn"
                                disabled=move || submitting.get() || draft_name(model).trim().is_empty()
                            >
                                "Add"
                            </button>
                        </div>
                    </form>
                </Show>

                <Show when=move || empty.get()>
                    <p class="empty-state">"No templates yet. Add your first one!"</p>
                </Show>

                <div class="template-grid">
                    {move || rows.get().into_iter().map(render_row).collect_view()}
                </div>
            </Show>
        </section>
    }
}
