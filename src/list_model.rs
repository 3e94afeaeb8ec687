//! List-with-inline-edit View Model
//!
//! State behind the Template and Expense screens: a cached copy of the
//! server collection, at most one draft (new row or edited row), an
//! in-flight flag and a single last-error slot.
//!
//! Every operation is split in two. `begin_*` checks the state and marks the
//! work as started; `finish_*` applies the server's answer. The async glue in
//! `sync` runs the request in between.

use log::{debug, warn};

use crate::api::Resource;
use crate::error::{ApiError, ListError};
use crate::models::RecordId;
use crate::sort::{self, SortState, SortValue};

/// How the cache catches up after a successful mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Reload the whole collection
    Refetch,
    /// Apply the change to the cache; reload only if the server did not
    /// return what is needed
    Local,
}

/// Values new drafts start from
#[derive(Debug, Clone, PartialEq)]
pub struct DraftDefaults {
    pub template_id: RecordId,
}

/// Per-resource behavior of a list screen
pub trait ListResource: Resource {
    const SYNC: SyncPolicy;

    /// Sortable columns
    type SortField: Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static;

    fn new_draft(defaults: &DraftDefaults) -> Self::Draft;

    /// Read shape -> write shape for editing
    fn edit_draft(record: &Self::Record, defaults: &DraftDefaults) -> Self::Draft;

    fn validate(draft: &Self::Draft) -> Result<(), String>;

    /// Reflect a successful edit in the cached row (local sync only)
    fn apply_edit(record: &mut Self::Record, draft: &Self::Draft);

    fn sort_value(record: &Self::Record, field: Self::SortField) -> SortValue<'_>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode<D> {
    Viewing,
    Creating(D),
    Editing { id: RecordId, draft: D },
}

/// Request a submit needs sent
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<D> {
    Create(D),
    Update { id: RecordId, draft: D },
}

/// What to do once a mutation has been applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterMutation {
    Done,
    Refetch,
}

/// Operation a failure belongs to, so Retry can run it again
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Load,
    Create,
    Update(RecordId),
    Delete(RecordId),
}

impl Operation {
    fn describe(&self) -> &'static str {
        match self {
            Operation::Load => "load entries",
            Operation::Create => "create entry",
            Operation::Update(_) => "save changes",
            Operation::Delete(_) => "delete entry",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub operation: Operation,
    pub message: String,
}

impl Failure {
    fn new(operation: Operation, error: &ListError) -> Self {
        let message = format!("Failed to {}: {}", operation.describe(), error);
        Self { operation, message }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListModel<R: ListResource> {
    items: Vec<R::Record>,
    mode: Mode<R::Draft>,
    defaults: DraftDefaults,
    loaded: bool,
    loading: bool,
    submitting: bool,
    generation: u64,
    sort: Option<SortState<R::SortField>>,
    last_error: Option<Failure>,
}

impl<R: ListResource> ListModel<R> {
    pub fn new(defaults: DraftDefaults) -> Self {
        Self {
            items: Vec::new(),
            mode: Mode::Viewing,
            defaults,
            loaded: false,
            loading: false,
            submitting: false,
            generation: 0,
            sort: None,
            last_error: None,
        }
    }

    // ========================
    // Queries
    // ========================

    /// Cached collection in server order
    pub fn items(&self) -> &[R::Record] {
        &self.items
    }

    #[cfg(test)]
    pub fn mode(&self) -> &Mode<R::Draft> {
        &self.mode
    }

    pub fn is_creating(&self) -> bool {
        matches!(self.mode, Mode::Creating(_))
    }

    pub fn editing_id(&self) -> Option<&RecordId> {
        match &self.mode {
            Mode::Editing { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&R::Draft> {
        match &self.mode {
            Mode::Viewing => None,
            Mode::Creating(draft) | Mode::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Row actions (edit, delete, add) are available
    pub fn is_idle(&self) -> bool {
        !self.submitting && self.mode == Mode::Viewing
    }

    /// Nothing to show and nothing being added
    pub fn is_empty_state(&self) -> bool {
        self.loaded && self.items.is_empty() && !self.is_creating()
    }

    pub fn last_error(&self) -> Option<&Failure> {
        self.last_error.as_ref()
    }

    pub fn sort(&self) -> Option<SortState<R::SortField>> {
        self.sort
    }

    /// Rows in display order
    pub fn visible(&self) -> Vec<R::Record> {
        sort::sorted(&self.items, self.sort, R::sort_value)
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.items.iter().position(|r| R::id(r) == id)
    }

    // ========================
    // Local transitions
    // ========================

    pub fn toggle_sort(&mut self, field: R::SortField) {
        self.sort = Some(SortState::toggle(self.sort, field));
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Viewing -> Creating
    pub fn begin_create(&mut self) -> Result<(), ListError> {
        if !self.is_idle() {
            warn!("[LIST] {} add refused: busy", R::PATH);
            return Err(ListError::Busy);
        }
        self.mode = Mode::Creating(R::new_draft(&self.defaults));
        self.last_error = None;
        Ok(())
    }

    /// Viewing -> Editing(id)
    pub fn begin_edit(&mut self, id: &RecordId) -> Result<(), ListError> {
        if !self.is_idle() {
            warn!("[LIST] {} edit of {} refused: busy", R::PATH, id);
            return Err(ListError::Busy);
        }
        let index = self.position(id).ok_or_else(|| ListError::NotFound(id.clone()))?;
        let draft = R::edit_draft(&self.items[index], &self.defaults);
        self.mode = Mode::Editing { id: id.clone(), draft };
        self.last_error = None;
        Ok(())
    }

    /// Creating/Editing -> Viewing, discarding the draft
    pub fn cancel(&mut self) -> Result<(), ListError> {
        if self.submitting {
            return Err(ListError::Busy);
        }
        self.mode = Mode::Viewing;
        if matches!(
            self.last_error,
            Some(Failure { operation: Operation::Create | Operation::Update(_), .. })
        ) {
            self.last_error = None;
        }
        Ok(())
    }

    /// Change the active draft in place. Ignored without a draft or while
    /// it is being sent.
    pub fn edit_draft(&mut self, change: impl FnOnce(&mut R::Draft)) -> bool {
        if self.submitting {
            return false;
        }
        match &mut self.mode {
            Mode::Viewing => false,
            Mode::Creating(draft) | Mode::Editing { draft, .. } => {
                change(draft);
                true
            }
        }
    }

    // ========================
    // Server round trips
    // ========================

    /// Start a load; the returned generation must be handed back
    pub fn begin_refresh(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    /// Replace the cache with a fresh list. Answers to superseded loads are
    /// dropped; returns whether this one was applied.
    pub fn finish_refresh(&mut self, generation: u64, result: Result<Vec<R::Record>, ApiError>) -> bool {
        if generation != self.generation {
            debug!("[LIST] {} dropping stale load {}", R::PATH, generation);
            return false;
        }
        self.loading = false;
        self.loaded = true;
        match result {
            Ok(items) => {
                debug!("[LIST] {} loaded {} rows", R::PATH, items.len());
                self.items = items;
                if matches!(self.last_error, Some(Failure { operation: Operation::Load, .. })) {
                    self.last_error = None;
                }
            }
            Err(e) => {
                self.last_error = Some(Failure::new(Operation::Load, &ListError::Api(e)));
            }
        }
        true
    }

    /// Validate the active draft and mark it in flight
    pub fn begin_submit(&mut self) -> Result<Submission<R::Draft>, ListError> {
        if self.submitting {
            return Err(ListError::Busy);
        }
        let (submission, operation) = match &self.mode {
            Mode::Viewing => return Err(ListError::Invalid("Nothing to save".to_string())),
            Mode::Creating(draft) => (Submission::Create(draft.clone()), Operation::Create),
            Mode::Editing { id, draft } => (
                Submission::Update { id: id.clone(), draft: draft.clone() },
                Operation::Update(id.clone()),
            ),
        };
        let draft = match &submission {
            Submission::Create(draft) | Submission::Update { draft, .. } => draft,
        };
        if let Err(reason) = R::validate(draft) {
            let error = ListError::Invalid(reason);
            self.last_error = Some(Failure::new(operation, &error));
            return Err(error);
        }
        self.submitting = true;
        Ok(submission)
    }

    /// Apply the outcome of a create/update. On failure the draft stays so
    /// the user can retry.
    pub fn finish_submit(
        &mut self,
        submission: Submission<R::Draft>,
        result: Result<Option<R::Record>, ApiError>,
    ) -> AfterMutation {
        self.submitting = false;
        let echoed = match result {
            Ok(echoed) => echoed,
            Err(e) => {
                let operation = match &submission {
                    Submission::Create(_) => Operation::Create,
                    Submission::Update { id, .. } => Operation::Update(id.clone()),
                };
                self.last_error = Some(Failure::new(operation, &ListError::Api(e)));
                return AfterMutation::Done;
            }
        };

        self.mode = Mode::Viewing;
        self.last_error = None;
        if R::SYNC == SyncPolicy::Refetch {
            return AfterMutation::Refetch;
        }

        match submission {
            Submission::Create(_) => match echoed {
                Some(record) => {
                    if self.position(R::id(&record)).is_none() {
                        self.items.push(record);
                    }
                    self.after_local_change()
                }
                None => AfterMutation::Refetch,
            },
            Submission::Update { id, draft } => match self.position(&id) {
                Some(index) => {
                    R::apply_edit(&mut self.items[index], &draft);
                    self.after_local_change()
                }
                None => AfterMutation::Refetch,
            },
        }
    }

    /// Mark a delete in flight. Only allowed while idle.
    pub fn begin_delete(&mut self, id: &RecordId) -> Result<(), ListError> {
        if !self.is_idle() {
            warn!("[LIST] {} delete of {} refused: busy", R::PATH, id);
            return Err(ListError::Busy);
        }
        if self.position(id).is_none() {
            return Err(ListError::NotFound(id.clone()));
        }
        self.submitting = true;
        self.last_error = None;
        Ok(())
    }

    pub fn finish_delete(&mut self, id: &RecordId, result: Result<(), ApiError>) -> AfterMutation {
        self.submitting = false;
        if let Err(e) = result {
            self.last_error = Some(Failure::new(Operation::Delete(id.clone()), &ListError::Api(e)));
            return AfterMutation::Done;
        }
        match R::SYNC {
            SyncPolicy::Refetch => AfterMutation::Refetch,
            SyncPolicy::Local => {
                self.items.retain(|r| R::id(r) != id);
                self.after_local_change()
            }
        }
    }

    /// A load started before a local change would overwrite it with an old
    /// snapshot. Invalidate it and ask for a fresh one instead.
    fn after_local_change(&mut self) -> AfterMutation {
        if !self.loading {
            return AfterMutation::Done;
        }
        debug!("[LIST] {} load {} predates a local change, reloading", R::PATH, self.generation);
        self.generation += 1;
        self.loading = false;
        AfterMutation::Refetch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Expenses, Templates};
    use crate::models::{EntryType, ExpenseEntry, Template, TemplateLink};
    use crate::resources::ExpenseField;

    fn defaults() -> DraftDefaults {
        DraftDefaults { template_id: RecordId::new("1") }
    }

    fn template(id: i64, name: &str) -> Template {
        Template { id: RecordId::Number(id), name: name.to_string() }
    }

    fn entry(id: i64, name: &str, entry_type: EntryType) -> ExpenseEntry {
        ExpenseEntry {
            id: RecordId::Number(id),
            name: name.to_string(),
            description: String::new(),
            entry_type,
            template: vec![TemplateLink { template_id: RecordId::Number(2), is_default: true }],
        }
    }

    fn loaded_templates(items: Vec<Template>) -> ListModel<Templates> {
        let mut model = ListModel::new(defaults());
        let generation = model.begin_refresh();
        model.finish_refresh(generation, Ok(items));
        model
    }

    fn loaded_expenses(items: Vec<ExpenseEntry>) -> ListModel<Expenses> {
        let mut model = ListModel::new(defaults());
        let generation = model.begin_refresh();
        model.finish_refresh(generation, Ok(items));
        model
    }

    #[test]
    fn test_create_and_edit_are_exclusive() {
        let mut model = loaded_templates(vec![template(1, "Rent")]);

        model.begin_create().unwrap();
        assert_eq!(model.begin_edit(&RecordId::Number(1)), Err(ListError::Busy));
        assert_eq!(model.begin_create(), Err(ListError::Busy));

        model.cancel().unwrap();
        model.begin_edit(&RecordId::Number(1)).unwrap();
        assert_eq!(model.begin_create(), Err(ListError::Busy));
        assert_eq!(model.begin_edit(&RecordId::Number(1)), Err(ListError::Busy));
        assert!(!model.is_creating());
        assert_eq!(model.editing_id(), Some(&RecordId::Number(1)));
    }

    #[test]
    fn test_new_expense_draft_defaults() {
        let mut model = loaded_expenses(vec![]);
        model.begin_create().unwrap();

        let draft = model.draft().unwrap();
        assert_eq!(draft.entry_type, EntryType::Debit);
        assert!(!draft.is_default);
        assert_eq!(draft.template_id, RecordId::new("1"));
    }

    #[test]
    fn test_edit_draft_flattens_read_shape() {
        let mut model = loaded_expenses(vec![entry(5, "Salary", EntryType::Debit)]);
        model.begin_edit(&RecordId::Number(5)).unwrap();

        let draft = model.draft().unwrap();
        assert_eq!(draft.template_id, RecordId::Number(2));
        assert!(draft.is_default);
        assert_eq!(draft.name, "Salary");
    }

    #[test]
    fn test_edit_unknown_row_is_not_found() {
        let mut model = loaded_templates(vec![]);
        assert_eq!(
            model.begin_edit(&RecordId::new("9")),
            Err(ListError::NotFound(RecordId::new("9")))
        );
        assert_eq!(model.mode(), &Mode::Viewing);
    }

    #[test]
    fn test_blank_name_is_refused_and_reported() {
        let mut model = loaded_templates(vec![]);
        model.begin_create().unwrap();
        model.edit_draft(|d| d.name = "   ".to_string());

        assert!(matches!(model.begin_submit(), Err(ListError::Invalid(_))));
        assert!(!model.is_submitting());
        assert!(model.is_creating());
        assert_eq!(model.last_error().unwrap().operation, Operation::Create);
    }

    #[test]
    fn test_second_submit_while_in_flight_is_busy() {
        let mut model = loaded_templates(vec![]);
        model.begin_create().unwrap();
        model.edit_draft(|d| d.name = "Rent".to_string());

        model.begin_submit().unwrap();
        assert_eq!(model.begin_submit(), Err(ListError::Busy));
        assert_eq!(model.cancel(), Err(ListError::Busy));
        assert!(!model.edit_draft(|d| d.name.clear()));
    }

    #[test]
    fn test_local_create_appends_echoed_record_once() {
        let mut model = loaded_templates(vec![template(1, "Food")]);
        model.begin_create().unwrap();
        model.edit_draft(|d| d.name = "Rent".to_string());
        let submission = model.begin_submit().unwrap();

        let step = model.finish_submit(submission.clone(), Ok(Some(template(2, "Rent"))));
        assert_eq!(step, AfterMutation::Done);
        assert_eq!(model.items(), &[template(1, "Food"), template(2, "Rent")]);
        assert_eq!(model.mode(), &Mode::Viewing);

        // a duplicate echo does not add the row twice
        model.finish_submit(submission, Ok(Some(template(2, "Rent"))));
        assert_eq!(model.items().len(), 2);
    }

    #[test]
    fn test_local_create_without_echo_asks_for_refetch() {
        let mut model = loaded_templates(vec![]);
        model.begin_create().unwrap();
        model.edit_draft(|d| d.name = "Rent".to_string());
        let submission = model.begin_submit().unwrap();

        assert_eq!(model.finish_submit(submission, Ok(None)), AfterMutation::Refetch);
    }

    #[test]
    fn test_local_edit_patches_name_only() {
        let mut model = loaded_templates(vec![template(1, "Food"), template(2, "Rent")]);
        model.begin_edit(&RecordId::Number(2)).unwrap();
        model.edit_draft(|d| d.name = "Housing".to_string());
        let submission = model.begin_submit().unwrap();

        assert_eq!(model.finish_submit(submission, Ok(None)), AfterMutation::Done);
        assert_eq!(model.items(), &[template(1, "Food"), template(2, "Housing")]);
    }

    #[test]
    fn test_refetch_policy_asks_for_reload() {
        let mut model = loaded_expenses(vec![entry(5, "Salary", EntryType::Debit)]);
        model.begin_edit(&RecordId::Number(5)).unwrap();
        model.edit_draft(|d| d.entry_type = EntryType::Credit);
        let submission = model.begin_submit().unwrap();

        assert_eq!(model.finish_submit(submission, Ok(None)), AfterMutation::Refetch);
        // cache untouched until the reload lands
        assert_eq!(model.items()[0].entry_type, EntryType::Debit);
    }

    #[test]
    fn test_failed_submit_keeps_draft() {
        let mut model = loaded_expenses(vec![]);
        model.begin_create().unwrap();
        model.edit_draft(|d| d.name = "Salary".to_string());
        let submission = model.begin_submit().unwrap();

        let step = model.finish_submit(
            submission,
            Err(ApiError::Status { status: 500, body: String::new() }),
        );
        assert_eq!(step, AfterMutation::Done);
        assert!(!model.is_submitting());
        assert_eq!(model.draft().unwrap().name, "Salary");
        assert_eq!(model.last_error().unwrap().operation, Operation::Create);
    }

    #[test]
    fn test_delete_requires_idle() {
        let mut model = loaded_templates(vec![template(3, "Rent")]);
        model.begin_edit(&RecordId::Number(3)).unwrap();
        assert_eq!(model.begin_delete(&RecordId::Number(3)), Err(ListError::Busy));

        model.cancel().unwrap();
        model.begin_delete(&RecordId::Number(3)).unwrap();
        assert_eq!(model.begin_edit(&RecordId::Number(3)), Err(ListError::Busy));
    }

    #[test]
    fn test_local_delete_of_only_row_shows_empty_state() {
        let mut model = loaded_templates(vec![template(3, "Rent")]);
        model.begin_delete(&RecordId::new("3")).unwrap();

        let step = model.finish_delete(&RecordId::new("3"), Ok(()));
        assert_eq!(step, AfterMutation::Done);
        assert!(model.items().is_empty());
        assert!(model.is_empty_state());
    }

    #[test]
    fn test_failed_delete_keeps_row() {
        let mut model = loaded_templates(vec![template(3, "Rent")]);
        model.begin_delete(&RecordId::Number(3)).unwrap();
        model.finish_delete(&RecordId::Number(3), Err(ApiError::Transport("offline".to_string())));

        assert_eq!(model.items().len(), 1);
        assert_eq!(
            model.last_error().unwrap().operation,
            Operation::Delete(RecordId::Number(3))
        );
        assert!(model.is_idle());
    }

    #[test]
    fn test_stale_refresh_is_dropped() {
        let mut model: ListModel<Templates> = ListModel::new(defaults());
        let first = model.begin_refresh();
        let second = model.begin_refresh();

        assert!(model.finish_refresh(second, Ok(vec![template(2, "New")])));
        assert!(!model.finish_refresh(first, Ok(vec![template(1, "Old")])));
        assert_eq!(model.items(), &[template(2, "New")]);
        assert!(!model.is_loading());
    }

    #[test]
    fn test_local_create_survives_load_started_before_it() {
        let mut model = loaded_templates(vec![template(1, "Food")]);
        let generation = model.begin_refresh();

        model.begin_create().unwrap();
        model.edit_draft(|d| d.name = "Rent".to_string());
        let submission = model.begin_submit().unwrap();
        let step = model.finish_submit(submission, Ok(Some(template(2, "Rent"))));
        assert_eq!(step, AfterMutation::Refetch);
        assert!(!model.is_loading());

        assert!(!model.finish_refresh(generation, Ok(vec![template(1, "Food")])));
        assert_eq!(model.items(), &[template(1, "Food"), template(2, "Rent")]);
    }

    #[test]
    fn test_local_delete_survives_load_started_before_it() {
        let mut model = loaded_templates(vec![template(1, "Food"), template(3, "Rent")]);
        let generation = model.begin_refresh();

        model.begin_delete(&RecordId::Number(3)).unwrap();
        let step = model.finish_delete(&RecordId::Number(3), Ok(()));
        assert_eq!(step, AfterMutation::Refetch);

        assert!(!model.finish_refresh(generation, Ok(vec![template(1, "Food"), template(3, "Rent")])));
        assert_eq!(model.items(), &[template(1, "Food")]);

        // the follow-up load is applied normally
        let generation = model.begin_refresh();
        assert!(model.finish_refresh(generation, Ok(vec![template(1, "Food")])));
        assert!(!model.is_loading());
    }

    #[test]
    fn test_failed_refresh_keeps_cache_and_reports() {
        let mut model = loaded_templates(vec![template(1, "Food")]);
        let generation = model.begin_refresh();
        model.finish_refresh(generation, Err(ApiError::Transport("offline".to_string())));

        assert_eq!(model.items().len(), 1);
        assert_eq!(model.last_error().unwrap().operation, Operation::Load);

        let generation = model.begin_refresh();
        model.finish_refresh(generation, Ok(vec![]));
        assert!(model.last_error().is_none());
    }

    #[test]
    fn test_sorting_leaves_cache_order_alone() {
        let mut model = loaded_expenses(vec![
            entry(1, "rent", EntryType::Debit),
            entry(2, "Bus", EntryType::Credit),
        ]);
        model.toggle_sort(ExpenseField::Name);

        let visible: Vec<String> = model.visible().into_iter().map(|e| e.name).collect();
        assert_eq!(visible, vec!["Bus", "rent"]);
        assert_eq!(model.items()[0].name, "rent");
    }

    #[test]
    fn test_cancel_clears_draft_error_only() {
        let mut model = loaded_templates(vec![]);
        model.begin_create().unwrap();
        model.edit_draft(|d| d.name.clear());
        let _ = model.begin_submit();
        assert!(model.last_error().is_some());

        model.cancel().unwrap();
        assert!(model.last_error().is_none());
        assert!(model.draft().is_none());
    }
}
