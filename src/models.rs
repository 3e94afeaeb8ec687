//! Frontend Models
//!
//! Read and write shapes of the REST resources. The server reads and writes
//! expense entries in different shapes; drafts are the write side.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque server identifier. The API sends numbers or strings; both compare
/// by their text form so `3` and `"3"` are the same record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId::Text(id.into())
    }

    pub fn canonical(&self) -> String {
        match self {
            RecordId::Number(n) => n.to_string(),
            RecordId::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for RecordId {}

impl Hash for RecordId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::new(s)
    }
}

// ========================
// Templates
// ========================

/// Template (named category) as listed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: RecordId,
    pub name: String,
}

/// Template write payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDraft {
    pub name: String,
    /// Only sent on edit; never shown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_edit_days: Option<u32>,
}

/// Edit window the server expects with every template edit
pub const TEMPLATE_EDIT_DAYS: u32 = 1;

// ========================
// Expense entries
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[default]
    Debit,
    Credit,
}

impl EntryType {
    pub const ALL: [EntryType; 2] = [EntryType::Debit, EntryType::Credit];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Debit => "debit",
            EntryType::Credit => "credit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntryType::Debit => "Debit",
            EntryType::Credit => "Credit",
        }
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(EntryType::Debit),
            "credit" => Ok(EntryType::Credit),
            other => Err(format!("Unknown entry type: {}", other)),
        }
    }
}

/// Link between an entry and its template, as nested in the read shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateLink {
    pub template_id: RecordId,
    #[serde(default)]
    pub is_default: bool,
}

/// Expense entry as listed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default)]
    pub template: Vec<TemplateLink>,
}

impl ExpenseEntry {
    pub fn is_default(&self) -> bool {
        self.template.first().map(|link| link.is_default).unwrap_or(false)
    }
}

/// Expense write payload (flat shape)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub template_id: RecordId,
    pub is_default: bool,
}

impl ExpenseDraft {
    /// Blank debit entry attached to `template_id`
    pub fn blank(template_id: RecordId) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            entry_type: EntryType::Debit,
            template_id,
            is_default: false,
        }
    }

    /// Flatten the nested read shape, taking the first template link
    pub fn from_entry(entry: &ExpenseEntry, fallback_template: &RecordId) -> Self {
        let link = entry.template.first();
        Self {
            name: entry.name.clone(),
            description: entry.description.clone(),
            entry_type: entry.entry_type,
            template_id: link
                .map(|l| l.template_id.clone())
                .unwrap_or_else(|| fallback_template.clone()),
            is_default: link.map(|l| l.is_default).unwrap_or(false),
        }
    }
}

// ========================
// Auth
// ========================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub role: String,
}

impl Default for Registration {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            role: "user".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_number_and_text_are_equal() {
        let from_number: RecordId = serde_json::from_value(json!(3)).unwrap();
        let from_text: RecordId = serde_json::from_value(json!("3")).unwrap();
        assert_eq!(from_number, from_text);
        assert_eq!(from_number.to_string(), "3");
    }

    #[test]
    fn test_expense_entry_reads_nested_template() {
        let entry: ExpenseEntry = serde_json::from_value(json!({
            "id": 5,
            "name": "Rent",
            "description": "Monthly",
            "type": "credit",
            "template": [{ "templateId": 2, "isDefault": true }]
        }))
        .unwrap();

        assert_eq!(entry.entry_type, EntryType::Credit);
        assert!(entry.is_default());

        let draft = ExpenseDraft::from_entry(&entry, &RecordId::new("1"));
        assert_eq!(draft.template_id, RecordId::Number(2));
        assert!(draft.is_default);
        assert_eq!(draft.name, "Rent");
    }

    #[test]
    fn test_flatten_without_template_uses_fallback() {
        let entry: ExpenseEntry = serde_json::from_value(json!({
            "id": "a1",
            "name": "Coffee",
            "type": "debit"
        }))
        .unwrap();

        let draft = ExpenseDraft::from_entry(&entry, &RecordId::new("1"));
        assert_eq!(draft.template_id, RecordId::new("1"));
        assert!(!draft.is_default);
        assert_eq!(draft.description, "");
    }

    #[test]
    fn test_expense_draft_write_shape() {
        let draft = ExpenseDraft::blank(RecordId::new("1"));
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({
                "name": "",
                "description": "",
                "type": "debit",
                "templateId": "1",
                "isDefault": false
            })
        );
    }

    #[test]
    fn test_template_create_omits_edit_days() {
        let create = TemplateDraft { name: "Rent".to_string(), allowed_edit_days: None };
        assert_eq!(serde_json::to_value(&create).unwrap(), json!({ "name": "Rent" }));

        let edit = TemplateDraft { name: "Rent".to_string(), allowed_edit_days: Some(TEMPLATE_EDIT_DAYS) };
        assert_eq!(
            serde_json::to_value(&edit).unwrap(),
            json!({ "allowedEditDays": 1, "name": "Rent" })
        );
    }
}
