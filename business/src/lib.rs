//! Headless business layer of the roster dashboard.
//!
//! Holds every piece of domain state the UI renders: the generic table model,
//! student roster, bulk-action dialogs, pagination, course structure and the
//! activity-log viewer. The UI crate only reads these states and dispatches
//! the commands defined here.

pub mod activity;
pub mod api;
pub mod bulk;
mod config;
mod course;
mod page;
mod pagination;
mod roster_page;
mod students;
pub mod table;

pub use activity::{
    ActivityDecodeError, ActivityPage, ActivityQuery, ActivityRow, ActivityTable,
    FetchActivityLogsCommand,
};
pub use api::{ApiError, ApiResult, ApiState, HttpRosterApi, RosterApi};
pub use bulk::{
    BulkActionKind, BulkActionRequest, BulkDialogRouter, BulkTarget, ConfirmBulkActionCommand,
    MutationPayload, ValidationError,
};
pub use config::{BusinessConfig, ConfigError, DEFAULT_API_BASE_URL, DEFAULT_PAGE_SIZE};
pub use course::{Batch, BatchOptions, CourseStructure, Level, Session};
pub use page::PageEnvelope;
pub use pagination::Pagination;
pub use roster_page::{
    FetchStudentsCommand, StudentTable, StudentsPage, StudentsQuery, roster_columns,
};
pub use students::{StudentRef, StudentRow, StudentStatus};

use roster_states::StateCtx;

/// Builds the store for one roster page: every state and command it needs.
///
/// Each call returns an independent context, so two pages never share
/// selection, sizing or dialog state.
pub fn roster_ctx(config: BusinessConfig, api: ApiState) -> StateCtx {
    let mut ctx = StateCtx::new();
    ctx.add_state(StudentsQuery::from_config(&config));
    ctx.add_state(config);
    ctx.add_state(api);
    ctx.add_state(StudentsPage::default());
    ctx.add_state(StudentTable::default());
    ctx.add_state(BulkDialogRouter::default());
    ctx.add_state(BatchOptions::default());
    ctx.add_state(ActivityQuery::default());
    ctx.add_state(ActivityPage::default());
    ctx.add_state(ActivityTable::default());

    ctx.record_command(FetchStudentsCommand);
    ctx.record_command(ConfirmBulkActionCommand);
    ctx.record_command(FetchActivityLogsCommand);
    ctx
}

/// Validates the open dialog against the configured institute and dispatches
/// the mutation. Returns the validation error when nothing was sent.
pub fn confirm_bulk_action(ctx: &mut StateCtx) -> Result<(), ValidationError> {
    let institute_id = ctx.state::<BusinessConfig>().institute_id.clone();
    ctx.update::<BulkDialogRouter, _>(|router| router.begin_submit(&institute_id))?;
    ctx.dispatch::<ConfirmBulkActionCommand>();
    Ok(())
}

/// Moves the roster to `page_no` and fetches it.
pub fn go_to_page(ctx: &mut StateCtx, page_no: usize) {
    ctx.update::<StudentsQuery, _>(|query| query.set_page(page_no));
    ctx.dispatch::<FetchStudentsCommand>();
}

/// Opens the activity viewer for one learner and fetches its first page.
pub fn open_activity(ctx: &mut StateCtx, user_id: &str, slide_id: &str) {
    ctx.add_state(ActivityTable::default());
    ctx.update::<ActivityQuery, _>(|query| *query = ActivityQuery::for_learner(user_id, slide_id));
    ctx.dispatch::<FetchActivityLogsCommand>();
}
