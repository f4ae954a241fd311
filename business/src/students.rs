//! Student roster rows as returned by the institute learner endpoints.

use serde::{Deserialize, Serialize};
use ustr::Ustr;

use crate::table::TableRow;

/// Enrollment status of a learner in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
    Terminated,
}

impl StudentStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Terminated => "Terminated",
        }
    }
}

/// One row of the student roster table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentRow {
    /// Learner id. Also the row identity used for selection when present.
    pub user_id: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub mobile_number: String,
    pub institute_enrollment_id: String,
    /// Batch the learner currently belongs to.
    pub package_session_id: String,
    pub status: StudentStatus,
    /// Session expiry as sent by the server (`YYYY-MM-DD`), if any.
    pub expiry_date: Option<String>,
}

impl TableRow for StudentRow {
    /// The learner id, or a key built from the other identifying fields when
    /// the server left `user_id` blank.
    fn row_id(&self) -> Ustr {
        if !self.user_id.trim().is_empty() {
            return Ustr::from(&self.user_id);
        }
        Ustr::from(&format!(
            "~{}|{}|{}|{}|{}|{}",
            self.institute_enrollment_id,
            self.username,
            self.email,
            self.mobile_number,
            self.full_name,
            self.package_session_id,
        ))
    }
}

/// Identifying keys of one learner inside a bulk request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    pub user_id: String,
    pub current_package_session_id: String,
}

impl StudentRow {
    /// Keys for a bulk request, or `None` when either id is missing.
    pub fn student_ref(&self) -> Option<StudentRef> {
        let user_id = self.user_id.trim();
        let session_id = self.package_session_id.trim();
        if user_id.is_empty() || session_id.is_empty() {
            return None;
        }
        Some(StudentRef {
            user_id: user_id.to_string(),
            current_package_session_id: session_id.to_string(),
        })
    }
}
