use egui_kittest::Harness;
use roster_business::{StudentTable, StudentsPage};
use roster_ui::RosterApp;
use roster_ui::state::State;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LEARNERS_PATH: &str = "/api/institutes/inst-1/learners";

pub struct TestCtx<'a> {
    mock_server: MockServer,
    harness: Harness<'a, RosterApp>,
}

impl<'a> TestCtx<'a> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, RosterApp> {
        &mut self.harness
    }

    pub fn mock_server(&self) -> &MockServer {
        &self.mock_server
    }

    /// Waits for every dispatched command, then draws a frame with the results.
    pub async fn settle(&mut self) {
        self.harness.state_mut().state_mut().ctx.settle().await;
        self.harness.step();
    }

    pub fn select_all(&mut self) {
        let state = self.harness.state_mut().state_mut();
        let rows = state.ctx.state::<StudentsPage>().rows().to_vec();
        state
            .ctx
            .update::<StudentTable, _>(|students| students.table.selection.toggle_all_rows(&rows));
        self.harness.step();
    }
}

pub fn students_page(page_no: usize, total_pages: usize) -> serde_json::Value {
    serde_json::json!({
        "content": [
            {
                "user_id": "u-1",
                "full_name": "Ada Lovelace",
                "username": "ada",
                "email": "ada@example.com",
                "package_session_id": "ps-1",
                "status": "ACTIVE"
            },
            {
                "user_id": "u-2",
                "full_name": "Alan Turing",
                "username": "alan",
                "email": "alan@example.com",
                "package_session_id": "ps-1",
                "status": "ACTIVE"
            },
            {
                "user_id": "u-3",
                "full_name": "Grace Hopper",
                "username": "grace",
                "email": "grace@example.com",
                "package_session_id": "ps-2",
                "status": "INACTIVE"
            }
        ],
        "total_pages": total_pages,
        "page_no": page_no,
        "page_size": 3,
        "total_elements": total_pages * 3,
        "last": page_no + 1 >= total_pages
    })
}

/// Mock server answering the learners endpoint, plus a harness over a fresh
/// app pointed at it. Mocks must be mounted before the first frame, which
/// fetches the roster.
pub async fn setup(total_pages: usize) -> TestCtx<'static> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LEARNERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(students_page(0, total_pages)))
        .mount(&mock_server)
        .await;

    let app = RosterApp::new(State::test(mock_server.uri()));
    let harness = Harness::new_ui_state(|ui, app: &mut RosterApp| app.ui(ui), app);

    TestCtx {
        mock_server,
        harness,
    }
}
