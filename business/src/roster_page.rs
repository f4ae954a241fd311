//! The student roster page: query, fetched page, table and fetch command.

use log::{error, info};
use roster_states::{Command, CommandFuture, CommandSnapshot, State, Updater, snapshot_state};

use crate::api::ApiState;
use crate::table::{ColumnDef, ColumnKind, TableState};
use crate::{BusinessConfig, PageEnvelope, Pagination, StudentRow};

/// What the roster is currently asking the server for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentsQuery {
    pub institute_id: String,
    /// Zero-based.
    pub page_no: usize,
    pub page_size: usize,
    pub search: String,
}

snapshot_state!(StudentsQuery);

impl StudentsQuery {
    pub fn from_config(config: &BusinessConfig) -> Self {
        Self {
            institute_id: config.institute_id.clone(),
            page_no: 0,
            page_size: config.page_size,
            search: String::new(),
        }
    }

    pub fn set_page(&mut self, page_no: usize) {
        self.page_no = page_no;
    }

    /// A new search always starts from the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page_no = 0;
    }
}

/// Latest roster fetch result.
///
/// Responses are applied in arrival order. A slow response for an older
/// query can replace a newer one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StudentsPage {
    #[default]
    Idle,
    Loading,
    Loaded(PageEnvelope<StudentRow>),
    Error(String),
}

impl State for StudentsPage {}

impl StudentsPage {
    pub fn envelope(&self) -> Option<&PageEnvelope<StudentRow>> {
        match self {
            Self::Loaded(page) => Some(page),
            Self::Idle | Self::Loading | Self::Error(_) => None,
        }
    }

    pub fn rows(&self) -> &[StudentRow] {
        self.envelope().map_or(&[][..], |page| page.content.as_slice())
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            Self::Idle | Self::Loading | Self::Loaded(_) => None,
        }
    }

    pub fn pagination(&self) -> Pagination {
        self.envelope()
            .map(|page| Pagination::new(page.page_no, page.total_pages))
            .unwrap_or_default()
    }
}

/// Roster columns in display order.
pub fn roster_columns() -> Vec<ColumnDef<StudentRow>> {
    vec![
        ColumnDef::select("select"),
        ColumnDef::new("details", "Details")
            .kind(ColumnKind::Details)
            .with_size(80.0)
            .with_min_size(60.0)
            .with_max_size(120.0),
        ColumnDef::new("full_name", "Name")
            .accessor(|row: &StudentRow| row.full_name.clone())
            .with_size(180.0)
            .with_min_size(120.0)
            .with_max_size(360.0),
        ColumnDef::new("username", "Username")
            .accessor(|row: &StudentRow| row.username.clone())
            .with_min_size(100.0)
            .with_max_size(300.0),
        ColumnDef::new("email", "Email")
            .accessor(|row: &StudentRow| row.email.clone())
            .with_size(220.0)
            .with_min_size(120.0)
            .with_max_size(400.0),
        ColumnDef::new("mobile_number", "Mobile")
            .accessor(|row: &StudentRow| row.mobile_number.clone())
            .with_min_size(100.0),
        ColumnDef::new("institute_enrollment_id", "Enrollment No.")
            .accessor(|row: &StudentRow| row.institute_enrollment_id.clone())
            .with_min_size(100.0),
        ColumnDef::new("package_session_id", "Batch")
            .accessor(|row: &StudentRow| row.package_session_id.clone())
            .with_min_size(100.0)
            .hidden(),
        ColumnDef::new("status", "Status")
            .accessor(|row: &StudentRow| row.status.label().to_string())
            .with_size(110.0)
            .with_min_size(80.0)
            .with_max_size(160.0),
        ColumnDef::new("expiry_date", "Session Expiry")
            .accessor(|row: &StudentRow| row.expiry_date.clone().unwrap_or_default())
            .with_min_size(100.0),
        ColumnDef::new("actions", "")
            .kind(ColumnKind::Actions)
            .with_size(60.0)
            .with_min_size(60.0)
            .with_max_size(60.0)
            .resizable(false),
    ]
}

/// Table state of the roster page.
#[derive(Debug, Clone)]
pub struct StudentTable {
    pub table: TableState<StudentRow>,
}

impl State for StudentTable {}

impl Default for StudentTable {
    fn default() -> Self {
        Self {
            table: TableState::new(roster_columns()),
        }
    }
}

impl StudentTable {
    /// Selected rows of the loaded page.
    pub fn selected_rows<'a>(&self, page: &'a StudentsPage) -> Vec<&'a StudentRow> {
        self.table.selection.selected_rows(page.rows())
    }
}

/// Fetches the page described by [`StudentsQuery`] into [`StudentsPage`].
#[derive(Debug, Default)]
pub struct FetchStudentsCommand;

impl Command for FetchStudentsCommand {
    fn run(&self, snap: CommandSnapshot, updater: Updater) -> CommandFuture {
        let query = snap.state::<StudentsQuery>().clone();
        let client = snap.state::<ApiState>().api();

        Box::pin(async move {
            updater.set(StudentsPage::Loading);
            info!(
                "FetchStudentsCommand: page {} (size {}) search={:?}",
                query.page_no, query.page_size, query.search
            );
            match client.fetch_students(&query).await {
                Ok(page) => updater.set(StudentsPage::Loaded(page)),
                Err(err) => {
                    error!("FetchStudentsCommand: {err}");
                    updater.set(StudentsPage::Error(err.to_string()));
                }
            }
        })
    }
}
