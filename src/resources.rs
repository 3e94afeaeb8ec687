//! List behavior of each resource
//!
//! Templates sync locally (echoed record on create, name patch on edit,
//! removal on delete). Expense entries reload after every change because
//! their read shape is derived on the server.

use crate::api::{Expenses, Templates};
use crate::list_model::{DraftDefaults, ListResource, SyncPolicy};
use crate::models::{ExpenseDraft, ExpenseEntry, Template, TemplateDraft, TEMPLATE_EDIT_DAYS};
use crate::sort::SortValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateField {
    Name,
}

impl ListResource for Templates {
    const SYNC: SyncPolicy = SyncPolicy::Local;

    type SortField = TemplateField;

    fn new_draft(_defaults: &DraftDefaults) -> TemplateDraft {
        TemplateDraft::default()
    }

    fn edit_draft(record: &Template, _defaults: &DraftDefaults) -> TemplateDraft {
        TemplateDraft {
            name: record.name.clone(),
            allowed_edit_days: Some(TEMPLATE_EDIT_DAYS),
        }
    }

    fn validate(draft: &TemplateDraft) -> Result<(), String> {
        require("Name", &draft.name)
    }

    fn apply_edit(record: &mut Template, draft: &TemplateDraft) {
        record.name = draft.name.clone();
    }

    fn sort_value(record: &Template, field: TemplateField) -> SortValue<'_> {
        match field {
            TemplateField::Name => SortValue::Text(&record.name),
        }
    }
}

/// Sortable columns of the expense table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseField {
    Name,
    Description,
    Type,
}

impl ExpenseField {
    pub const ALL: [ExpenseField; 3] = [ExpenseField::Name, ExpenseField::Description, ExpenseField::Type];

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseField::Name => "Name",
            ExpenseField::Description => "Description",
            ExpenseField::Type => "Type",
        }
    }
}

impl ListResource for Expenses {
    const SYNC: SyncPolicy = SyncPolicy::Refetch;

    type SortField = ExpenseField;

    fn new_draft(defaults: &DraftDefaults) -> ExpenseDraft {
        ExpenseDraft::blank(defaults.template_id.clone())
    }

    fn edit_draft(record: &ExpenseEntry, defaults: &DraftDefaults) -> ExpenseDraft {
        ExpenseDraft::from_entry(record, &defaults.template_id)
    }

    fn validate(draft: &ExpenseDraft) -> Result<(), String> {
        require("Name", &draft.name)
    }

    fn apply_edit(_record: &mut ExpenseEntry, _draft: &ExpenseDraft) {}

    fn sort_value(record: &ExpenseEntry, field: ExpenseField) -> SortValue<'_> {
        match field {
            ExpenseField::Name => SortValue::Text(&record.name),
            ExpenseField::Description => SortValue::Text(&record.description),
            ExpenseField::Type => SortValue::Text(record.entry_type.as_str()),
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} is required", field))
    } else {
        Ok(())
    }
}
