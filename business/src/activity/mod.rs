//! Learner activity-log viewer.

mod entry;

pub use entry::{
    ActivityDecodeError, ActivityRow, ActivitySummary, RawActivityLog, SourceType, decode_page,
    format_duration,
};

use log::{error, info, warn};
use roster_states::{Command, CommandFuture, CommandSnapshot, State, Updater, snapshot_state};

use crate::api::ApiState;
use crate::table::{ColumnDef, TableState};
use crate::{PageEnvelope, Pagination};

pub const DEFAULT_ACTIVITY_PAGE_SIZE: usize = 10;

/// Which learner and slide the viewer shows, and which page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityQuery {
    pub user_id: String,
    pub slide_id: String,
    /// Zero-based.
    pub page_no: usize,
    pub page_size: usize,
}

snapshot_state!(ActivityQuery);

impl Default for ActivityQuery {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            slide_id: String::new(),
            page_no: 0,
            page_size: DEFAULT_ACTIVITY_PAGE_SIZE,
        }
    }
}

impl ActivityQuery {
    pub fn for_learner(user_id: impl Into<String>, slide_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            slide_id: slide_id.into(),
            ..Self::default()
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.user_id.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActivityPage {
    #[default]
    Idle,
    Loading,
    Loaded(PageEnvelope<ActivityRow>),
    Error(String),
}

impl State for ActivityPage {}

impl ActivityPage {
    pub fn envelope(&self) -> Option<&PageEnvelope<ActivityRow>> {
        match self {
            Self::Loaded(page) => Some(page),
            Self::Idle | Self::Loading | Self::Error(_) => None,
        }
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

pub fn activity_columns() -> Vec<ColumnDef<ActivityRow>> {
    vec![
        ColumnDef::new("date", "Date")
            .accessor(|row: &ActivityRow| row.date.clone())
            .with_size(110.0)
            .with_min_size(90.0),
        ColumnDef::new("source_type", "Type")
            .accessor(|row: &ActivityRow| row.source_type.label().to_string())
            .with_size(100.0)
            .with_min_size(80.0),
        ColumnDef::new("start_time", "Start")
            .accessor(|row: &ActivityRow| row.start_time.clone())
            .with_size(100.0)
            .with_min_size(80.0),
        ColumnDef::new("end_time", "End")
            .accessor(|row: &ActivityRow| row.end_time.clone())
            .with_size(100.0)
            .with_min_size(80.0),
        ColumnDef::new("duration", "Duration")
            .accessor(|row: &ActivityRow| row.duration.clone())
            .with_size(100.0)
            .with_min_size(80.0),
        ColumnDef::new("summary", "Activity")
            .accessor(|row: &ActivityRow| row.summary.to_string())
            .with_size(260.0)
            .with_min_size(120.0),
    ]
}

/// Table state of the activity viewer. Separate from the roster table.
#[derive(Debug, Clone)]
pub struct ActivityTable {
    pub table: TableState<ActivityRow>,
}

impl State for ActivityTable {}

impl Default for ActivityTable {
    fn default() -> Self {
        Self {
            table: TableState::new(activity_columns()),
        }
    }
}

/// Fetches and decodes the page described by [`ActivityQuery`].
#[derive(Debug, Default)]
pub struct FetchActivityLogsCommand;

impl Command for FetchActivityLogsCommand {
    fn run(&self, snap: CommandSnapshot, updater: Updater) -> CommandFuture {
        let query = snap.state::<ActivityQuery>().clone();
        if !query.is_ready() {
            warn!("FetchActivityLogsCommand: no learner selected");
            return Box::pin(async {});
        }
        let client = snap.state::<ApiState>().api();

        Box::pin(async move {
            updater.set(ActivityPage::Loading);
            info!(
                "FetchActivityLogsCommand: user {} slide {:?} page {}",
                query.user_id, query.slide_id, query.page_no
            );
            let next = match client.fetch_activity_logs(&query).await {
                Ok(raw) => match decode_page(raw) {
                    Ok(page) => ActivityPage::Loaded(page),
                    Err(err) => {
                        error!("FetchActivityLogsCommand: {err}");
                        ActivityPage::Error(err.to_string())
                    }
                },
                Err(err) => {
                    error!("FetchActivityLogsCommand: {err}");
                    ActivityPage::Error(err.to_string())
                }
            };
            updater.set(next);
        })
    }
}
