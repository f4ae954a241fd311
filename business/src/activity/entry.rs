//! Raw activity-log entries and their one-time decode into table rows.
//!
//! The server ships each entry's details as a JSON string whose shape depends
//! on the source type. It is parsed once, when the page arrives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ustr::Ustr;

use crate::PageEnvelope;
use crate::table::TableRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    Video,
    Document,
    Question,
    Assignment,
}

impl SourceType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Document => "Document",
            Self::Question => "Question",
            Self::Assignment => "Assignment",
        }
    }
}

/// One entry exactly as the server sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawActivityLog {
    pub id: String,
    pub source_type: SourceType,
    pub user_id: String,
    pub slide_id: String,
    pub start_time_in_millis: i64,
    pub end_time_in_millis: i64,
    /// JSON document, shape decided by `source_type`.
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TimeSpan {
    start_time: i64,
    end_time: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VideoDetails {
    timestamps: Vec<TimeSpan>,
}

#[derive(Debug, Deserialize)]
struct PageView {
    page_number: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DocumentDetails {
    pages: Vec<PageView>,
}

#[derive(Debug, Deserialize)]
struct QuestionAttempt {
    #[serde(default)]
    response_status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuestionDetails {
    questions: Vec<QuestionAttempt>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AssignmentDetails {
    submission_status: String,
    file_count: u32,
}

/// Per-source summary shown in the last column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivitySummary {
    Video { segments: usize, watched_millis: i64 },
    Document { pages: Vec<u32> },
    Question { attempted: usize, correct: usize },
    Assignment { status: String, files: u32 },
}

impl std::fmt::Display for ActivitySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Video {
                segments,
                watched_millis,
            } => write!(
                f,
                "{segments} segment(s), {} watched",
                format_duration(*watched_millis)
            ),
            Self::Document { pages } if pages.is_empty() => f.write_str("No pages viewed"),
            Self::Document { pages } => {
                let list: Vec<String> = pages.iter().map(u32::to_string).collect();
                write!(f, "Pages {}", list.join(", "))
            }
            Self::Question { attempted, correct } => {
                write!(f, "{correct} of {attempted} correct")
            }
            Self::Assignment { status, files } => write!(f, "{status} ({files} file(s))"),
        }
    }
}

/// A decoded entry, ready for the activity table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    pub id: String,
    pub source_type: SourceType,
    /// `DD-MM-YYYY`, UTC.
    pub date: String,
    /// `HH:MM:SS`, UTC.
    pub start_time: String,
    pub end_time: String,
    pub duration: String,
    pub summary: ActivitySummary,
}

impl TableRow for ActivityRow {
    fn row_id(&self) -> Ustr {
        Ustr::from(&self.id)
    }
}

#[derive(Debug, Error)]
pub enum ActivityDecodeError {
    #[error("activity {id}: malformed {source_type:?} details: {source}")]
    Details {
        id: String,
        source_type: SourceType,
        #[source]
        source: serde_json::Error,
    },
    #[error("activity {id}: timestamp {millis} is out of range")]
    Timestamp { id: String, millis: i64 },
    #[error("activity {id}: ends before it starts")]
    EndBeforeStart { id: String },
}

/// `1h 02m 03s`, `4m 05s` or `9s`.
pub fn format_duration(millis: i64) -> String {
    let total = millis.max(0) / 1000;
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

fn parse_details<T>(raw: &RawActivityLog) -> Result<T, ActivityDecodeError>
where
    T: for<'de> Deserialize<'de> + Default,
{
    if raw.details.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&raw.details).map_err(|source| ActivityDecodeError::Details {
        id: raw.id.clone(),
        source_type: raw.source_type,
        source,
    })
}

fn timestamp(id: &str, millis: i64) -> Result<DateTime<Utc>, ActivityDecodeError> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| ActivityDecodeError::Timestamp {
        id: id.to_string(),
        millis,
    })
}

impl RawActivityLog {
    fn summary(&self) -> Result<ActivitySummary, ActivityDecodeError> {
        Ok(match self.source_type {
            SourceType::Video => {
                let details: VideoDetails = parse_details(self)?;
                ActivitySummary::Video {
                    segments: details.timestamps.len(),
                    watched_millis: details
                        .timestamps
                        .iter()
                        .map(|span| span.end_time.saturating_sub(span.start_time).max(0))
                        .fold(0, i64::saturating_add),
                }
            }
            SourceType::Document => {
                let details: DocumentDetails = parse_details(self)?;
                let mut pages: Vec<u32> = details.pages.iter().map(|p| p.page_number).collect();
                pages.sort_unstable();
                pages.dedup();
                ActivitySummary::Document { pages }
            }
            SourceType::Question => {
                let details: QuestionDetails = parse_details(self)?;
                ActivitySummary::Question {
                    attempted: details.questions.len(),
                    correct: details
                        .questions
                        .iter()
                        .filter(|q| q.response_status.eq_ignore_ascii_case("correct"))
                        .count(),
                }
            }
            SourceType::Assignment => {
                let details: AssignmentDetails = parse_details(self)?;
                ActivitySummary::Assignment {
                    status: if details.submission_status.is_empty() {
                        "Pending".to_string()
                    } else {
                        details.submission_status
                    },
                    files: details.file_count,
                }
            }
        })
    }

    pub fn decode(&self) -> Result<ActivityRow, ActivityDecodeError> {
        let start = timestamp(&self.id, self.start_time_in_millis)?;
        let end = timestamp(&self.id, self.end_time_in_millis)?;
        if end < start {
            return Err(ActivityDecodeError::EndBeforeStart {
                id: self.id.clone(),
            });
        }
        Ok(ActivityRow {
            id: self.id.clone(),
            source_type: self.source_type,
            date: start.format("%d-%m-%Y").to_string(),
            start_time: start.format("%H:%M:%S").to_string(),
            end_time: end.format("%H:%M:%S").to_string(),
            duration: format_duration(
                self.end_time_in_millis.saturating_sub(self.start_time_in_millis),
            ),
            summary: self.summary()?,
        })
    }
}

/// Decodes a whole page. The first bad entry fails the page.
pub fn decode_page(
    page: PageEnvelope<RawActivityLog>,
) -> Result<PageEnvelope<ActivityRow>, ActivityDecodeError> {
    page.try_map(|raw| raw.decode())
}
