//! Shared helpers for roster business integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use roster_business::activity::RawActivityLog;
use roster_business::bulk::{ChangeBatchBody, ExtendSessionBody, ReRegisterBody, StudentsBody};
use roster_business::{
    ActivityQuery, ApiError, ApiResult, ApiState, BusinessConfig, MutationPayload, PageEnvelope,
    RosterApi, StudentRow, StudentTable, StudentsPage, StudentsQuery, roster_ctx,
};
use roster_states::StateCtx;
use tokio::sync::oneshot;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn student(user_id: &str, package_session_id: &str) -> StudentRow {
    StudentRow {
        user_id: user_id.to_string(),
        full_name: format!("Student {user_id}"),
        package_session_id: package_session_id.to_string(),
        ..Default::default()
    }
}

/// In-memory [`RosterApi`] that records every mutation it receives.
///
/// Student pages can be gated: a page registered with [`FakeRosterApi::gate_page`]
/// only resolves when the test sends it through the returned channel.
#[derive(Default)]
pub struct FakeRosterApi {
    calls: Mutex<Vec<MutationPayload>>,
    fail_with: Mutex<Option<ApiError>>,
    gated_pages: Mutex<HashMap<usize, oneshot::Receiver<PageEnvelope<StudentRow>>>>,
}

impl FakeRosterApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_with(&self, error: ApiError) {
        *self.fail_with.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> Vec<MutationPayload> {
        self.calls.lock().unwrap().clone()
    }

    pub fn gate_page(&self, page_no: usize) -> oneshot::Sender<PageEnvelope<StudentRow>> {
        let (send, recv) = oneshot::channel();
        self.gated_pages.lock().unwrap().insert(page_no, recv);
        send
    }

    fn record(&self, payload: MutationPayload) -> ApiResult<()> {
        self.calls.lock().unwrap().push(payload);
        match self.fail_with.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RosterApi for FakeRosterApi {
    async fn change_batch(&self, body: &ChangeBatchBody) -> ApiResult<()> {
        self.record(MutationPayload::ChangeBatch(body.clone()))
    }

    async fn extend_session(&self, body: &ExtendSessionBody) -> ApiResult<()> {
        self.record(MutationPayload::ExtendSession(body.clone()))
    }

    async fn re_register(&self, body: &ReRegisterBody) -> ApiResult<()> {
        self.record(MutationPayload::ReRegister(body.clone()))
    }

    async fn terminate(&self, body: &StudentsBody) -> ApiResult<()> {
        self.record(MutationPayload::Terminate(body.clone()))
    }

    async fn delete(&self, body: &StudentsBody) -> ApiResult<()> {
        self.record(MutationPayload::Delete(body.clone()))
    }

    async fn fetch_students(&self, query: &StudentsQuery) -> ApiResult<PageEnvelope<StudentRow>> {
        let gate = self.gated_pages.lock().unwrap().remove(&query.page_no);
        match gate {
            Some(recv) => recv
                .await
                .map_err(|_| ApiError::Transport("gate dropped".to_string())),
            None => Ok(PageEnvelope::empty()),
        }
    }

    async fn fetch_activity_logs(
        &self,
        _query: &ActivityQuery,
    ) -> ApiResult<PageEnvelope<RawActivityLog>> {
        Ok(PageEnvelope::empty())
    }
}

/// Roster store wired to `fake`, for institute `inst-1`.
pub fn fake_ctx(fake: &Arc<FakeRosterApi>) -> StateCtx {
    let config = BusinessConfig::new("http://fake.invalid".to_string()).with_institute("inst-1");
    let api: Arc<dyn RosterApi> = fake.clone();
    roster_ctx(config, ApiState::from_arc(api))
}

/// Roster store talking HTTP to `base_url` (usually a wiremock server).
pub fn http_ctx(base_url: String) -> StateCtx {
    let config = BusinessConfig::new(base_url).with_institute("inst-1");
    let api = ApiState::http(&config);
    roster_ctx(config, api)
}

/// Loads `rows` as page 0 and returns them.
pub fn load_rows(ctx: &mut StateCtx, rows: Vec<StudentRow>) -> Vec<StudentRow> {
    ctx.update::<StudentsPage, _>(|page| {
        *page = StudentsPage::Loaded(PageEnvelope::paginate(rows.clone(), 0, 10));
    });
    rows
}

/// Selects every loaded row through the header checkbox.
pub fn select_all(ctx: &mut StateCtx) {
    let rows = ctx.state::<StudentsPage>().rows().to_vec();
    ctx.update::<StudentTable, _>(|table| table.table.selection.toggle_all_rows(&rows));
}

/// Currently selected rows, cloned out of the store.
pub fn selected(ctx: &StateCtx) -> Vec<StudentRow> {
    let page = ctx.state::<StudentsPage>();
    ctx.state::<StudentTable>()
        .selected_rows(page)
        .into_iter()
        .cloned()
        .collect()
}
