//! Course structure: which combination of sessions and levels a course has,
//! and the batches that result from it.

use serde::{Deserialize, Serialize};

/// A session (e.g. "2024-25") of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub session_name: String,
}

/// A level (e.g. "Class 10") of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    pub level_name: String,
}

/// One session × level combination, identified server-side by a
/// `package_session_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub package_session_id: String,
    pub package_name: String,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub level: Option<Level>,
}

/// Shape of a course, computed once from its sessions and levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CourseStructure {
    #[default]
    None,
    SessionsOnly,
    LevelsOnly,
    Both,
}

impl CourseStructure {
    pub fn from_parts(has_sessions: bool, has_levels: bool) -> Self {
        match (has_sessions, has_levels) {
            (false, false) => Self::None,
            (true, false) => Self::SessionsOnly,
            (false, true) => Self::LevelsOnly,
            (true, true) => Self::Both,
        }
    }

    /// Derives the structure from the batches a course exposes.
    pub fn of(batches: &[Batch]) -> Self {
        Self::from_parts(
            batches.iter().any(|b| b.session.is_some()),
            batches.iter().any(|b| b.level.is_some()),
        )
    }

    /// Human-readable name of `batch` under this structure.
    pub fn batch_label(self, batch: &Batch) -> String {
        let session = batch.session.as_ref().map(|s| s.session_name.as_str());
        let level = batch.level.as_ref().map(|l| l.level_name.as_str());
        match (self, session, level) {
            (Self::Both, Some(session), Some(level)) => {
                format!("{} · {level} · {session}", batch.package_name)
            }
            (Self::Both | Self::SessionsOnly, Some(session), _) => {
                format!("{} · {session}", batch.package_name)
            }
            (Self::Both | Self::LevelsOnly, _, Some(level)) => {
                format!("{} · {level}", batch.package_name)
            }
            (Self::None | Self::SessionsOnly | Self::LevelsOnly | Self::Both, _, _) => {
                batch.package_name.clone()
            }
        }
    }
}

/// Target batches a student can be moved or re-registered into.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchOptions {
    pub structure: CourseStructure,
    pub batches: Vec<Batch>,
}

roster_states::snapshot_state!(BatchOptions);

impl BatchOptions {
    pub fn new(batches: Vec<Batch>) -> Self {
        Self {
            structure: CourseStructure::of(&batches),
            batches,
        }
    }

    /// `(package_session_id, label)` pairs for a picker, in server order.
    pub fn choices(&self) -> Vec<(String, String)> {
        self.batches
            .iter()
            .map(|b| (b.package_session_id.clone(), self.structure.batch_label(b)))
            .collect()
    }

    /// Choices excluding the batch a student is currently in.
    pub fn choices_excluding(&self, current_package_session_id: &str) -> Vec<(String, String)> {
        self.choices()
            .into_iter()
            .filter(|(id, _)| id != current_package_session_id)
            .collect()
    }

    pub fn contains(&self, package_session_id: &str) -> bool {
        self.batches
            .iter()
            .any(|b| b.package_session_id == package_session_id)
    }
}
