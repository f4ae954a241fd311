//! Request bodies for the bulk mutation endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::BulkActionKind;
use crate::StudentRef;

/// Expiry dates travel as `DD-MM-YYYY`.
pub const EXPIRY_DATE_FORMAT: &str = "%d-%m-%Y";

pub fn format_expiry(date: NaiveDate) -> String {
    date.format(EXPIRY_DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeBatchBody {
    pub students: Vec<StudentRef>,
    pub new_package_session_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendSessionBody {
    pub students: Vec<StudentRef>,
    pub new_expiry_date: String,
}

/// Body of terminate and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentsBody {
    pub students: Vec<StudentRef>,
}

/// One batch a learner is re-registered into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRegistration {
    pub package_session_id: String,
    pub access_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReRegisterBody {
    pub user_ids: Vec<String>,
    pub institute_id: String,
    pub learner_batch_register_infos: Vec<BatchRegistration>,
    /// Longest access period among the registrations.
    pub access_days: u32,
}

/// A validated, ready-to-send mutation. One payload is one network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationPayload {
    ChangeBatch(ChangeBatchBody),
    ExtendSession(ExtendSessionBody),
    ReRegister(ReRegisterBody),
    Terminate(StudentsBody),
    Delete(StudentsBody),
}

impl MutationPayload {
    pub fn kind(&self) -> BulkActionKind {
        match self {
            Self::ChangeBatch(_) => BulkActionKind::ChangeBatch,
            Self::ExtendSession(_) => BulkActionKind::ExtendSession,
            Self::ReRegister(_) => BulkActionKind::ReRegister,
            Self::Terminate(_) => BulkActionKind::Terminate,
            Self::Delete(_) => BulkActionKind::Delete,
        }
    }

    pub fn student_count(&self) -> usize {
        match self {
            Self::ChangeBatch(body) => body.students.len(),
            Self::ExtendSession(body) => body.students.len(),
            Self::ReRegister(body) => body.user_ids.len(),
            Self::Terminate(body) | Self::Delete(body) => body.students.len(),
        }
    }
}
