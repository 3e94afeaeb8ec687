//! Expense Bindings
//!
//! `expense` and `expense/{id}`. Reads return the nested shape
//! (`template: [{templateId, isDefault}]`), writes take the flat draft.

use super::{Resource, ResourceClient};
use crate::models::{ExpenseDraft, ExpenseEntry, RecordId};

/// The `expense` collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expenses;

impl Resource for Expenses {
    const PATH: &'static str = "expense";

    type Record = ExpenseEntry;
    type Draft = ExpenseDraft;

    fn id(record: &ExpenseEntry) -> &RecordId {
        &record.id
    }
}

pub type ExpenseClient = ResourceClient<Expenses>;
