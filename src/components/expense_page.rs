//! Expense Screen
//!
//! Sortable table of financial entries with an inline edit row, a new-entry
//! panel and confirmed deletes. Every change reloads the table.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::Expenses;
use crate::components::{DeleteConfirmButton, ErrorBanner};
use crate::context::use_app_context;
use crate::list_model::ListModel;
use crate::models::{EntryType, ExpenseDraft, ExpenseEntry};
use crate::resources::ExpenseField;

type ExpenseModel = RwSignal<ListModel<Expenses>>;

fn read_draft<T: Default>(model: ExpenseModel, field: impl FnOnce(&ExpenseDraft) -> T) -> T {
    model.with(|m| m.draft().map(field).unwrap_or_default())
}

fn write_draft(model: ExpenseModel, change: impl FnOnce(&mut ExpenseDraft)) {
    model.update(|m| {
        m.edit_draft(change);
    });
}

/// Inputs bound to the active draft; shared by the new-entry panel and the
/// edit row.
fn draft_fields(model: ExpenseModel) -> impl IntoView {
    view! {
        <input
            type="text"
            name="name"
            required
            placeholder="Name"
            prop:value=move || read_draft(model, |d| d.name.clone())
            on:input=move |ev| {
                let value = event_target_value(&ev);
                write_draft(model, |d| d.name = value);
            }
        />
        <input
            type="text"
            name="description"
            placeholder="Description"
            prop:value=move || read_draft(model, |d| d.description.clone())
            on:input=move |ev| {
                let value = event_target_value(&ev);
                write_draft(model, |d| d.description = value);
            }
        />
        <select
            name="type"
            prop:value=move || read_draft(model, |d| d.entry_type).as_str()
            on:change=move |ev| {
                if let Ok(entry_type) = event_target_value(&ev).parse::<EntryType>() {
                    write_draft(model, |d| d.entry_type = entry_type);
                }
            }
        >
            {EntryType::ALL.iter().map(|t| view! {
                <option value=t.as_str()>{t.label()}</option>
            }).collect_view()}
        </select>
        <label class="checkbox">
            <input
                type="checkbox"
                name="isDefault"
                prop:checked=move || read_draft(model, |d| d.is_default)
                on:change=move |ev| {
                    let checked = event_target_checked(&ev);
                    write_draft(model, |d| d.is_default = checked);
                }
            />
            "Default"
        </label>
    }
}

#[component]
pub fn ExpensePage() -> impl IntoView {
    let ctx = use_app_context();
    let model: ExpenseModel = RwSignal::new(ListModel::new(ctx.draft_defaults()));
    let sync = StoredValue::new(ctx.expenses());

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
    let first_load = Memo::new(move |_| model.with(|m| !m.is_loaded()));
    let failure = Memo::new(move |_| model.with(|m| m.last_error().cloned()));
    let sort = Memo::new(move |_| model.with(|m| m.sort()));
    let busy = Memo::new(move |_| model.with(|m| m.is_submitting() || m.is_loading()));

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
    let add_new = move |_| {
        model.update(|m| {
            let _ = m.begin_create();
        });
    };

    let header = move |field: ExpenseField| {
        let indicator = move || match sort.get() {
            Some(state) if state.field == field => state.direction.arrow(),
            _ => "⇅",
        };
        view! {
            <th class="sortable" on:click=move |_| model.update(|m| m.toggle_sort(field))>
                {field.label()} " " <span class="sort-indicator">{indicator}</span>
            </th>
        }
    };

    let render_row = move |entry: ExpenseEntry| {
        let id = entry.id.clone();
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
            let id = id.clone();
            let sync = sync.get_value();
            spawn_local(async move {
                let _ = sync.delete(&model, id).await;
            });
        });

        move || if is_editing() {
            view! {
                <tr class="editing-row">
                    <td colspan="4" class="edit-cells">{draft_fields(model)}</td>
                    <td class="row-actions">
                        <button class="save-btn" disabled=move || submitting.get() on:click=move |_| submit()>
                            {move || if submitting.get() { "Saving..." } else { "Save" }}
                        </button>
                        <button class="cancel-btn" disabled=move || submitting.get() on:click=move |_| cancel()>
                            "Cancel"
                        </button>
                    </td>
                </tr>
            }.into_any()
        } else {
            let type_class = match entry.entry_type {
                EntryType::Debit => "badge debit",
                EntryType::Credit => "badge credit",
            };
            view! {
                <tr>
                    <td>{entry.name.clone()}</td>
                    <td>{entry.description.clone()}</td>
                    <td><span class=type_class>{entry.entry_type.label()}</span></td>
                    <td>{if entry.is_default() { "Yes" } else { "No" }}</td>
                    <td class="row-actions">
                        <button
                            class="edit-btn"
                            title="Edit"
                            disabled=move || !idle.get()
                            on:click=begin_edit.clone()
                        >
                            "Edit"
                        </button>
                        <DeleteConfirmButton
                            item_name=entry.name.clone()
                            disabled=Signal::derive(move || !idle.get())
                            on_confirm=on_delete
                        />
                    </td>
                </tr>
            }.into_any()
        }
    };

    view! {
        <section class="expense-page">
            <header class="page-header">
                <h1>"Financial Entries"</h1>
                <button class="add-btn" disabled=move || !idle.get() on:click=add_new>
                    "Add New Entry"
                </button>
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
                fallback=|| view! { <div class="loading">"Loading entries..."</div> }
            >
                <Show when=move || creating.get()>
                    <form class="new-entry-form" on:submit=move |ev| {
                        ev.prevent_default();
                        submit();
                    }>
                        <h2>"New Financial Entry"</h2>
                        <div class="form-grid">{draft_fields(model)}</div>
                        <div class="form-actions">
                            <button type="button" class="cancel-btn" disabled=move || submitting.get() on:click=move |_| cancel()>
                                "Cancel"
                            </button>
                            <button type="submit" class="save-btn" disabled=move || submitting.get()>
                                {move || if submitting.get() { "Saving..." } else { "Save" }}
                            </button>
                        </div>
                    </form>
                </Show>

                <Show
                    when=move || !empty.get()
                    fallback=move || view! {
                        <div class="empty-state">
                            <p>"No entries found. Create your first entry!"</p>
                            <button class="add-btn" disabled=move || !idle.get() on:click=add_new>
                                "Add New Entry"
                            </button>
                        </div>
                    }
                >
                    <table class="entries-table">
                        <thead>
                            <tr>
                                {ExpenseField::ALL.into_iter().map(header).collect_view()}
                                <th>"Default"</th>
                                <th>"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || rows.get().into_iter().map(render_row).collect_view()}
                        </tbody>
                    </table>
                </Show>
            </Show>
        </section>
    }
}
