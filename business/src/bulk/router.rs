//! Which bulk-action dialog is open, its inputs and its submit status.
//!
//! At most one dialog is open at a time. Opening a dialog while another is
//! open closes the previous one first, discarding its inputs.

use chrono::NaiveDate;
use log::{info, warn};
use roster_states::snapshot_state;
use thiserror::Error;

use super::payload::{
    BatchRegistration, ChangeBatchBody, ExtendSessionBody, MutationPayload, ReRegisterBody,
    StudentsBody, format_expiry,
};
use super::{BulkActionKind, BulkActionRequest};
use crate::StudentRef;

/// Why confirm is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no dialog is open")]
    NotOpen,
    #[error("choose a target batch")]
    MissingTargetBatch,
    #[error("choose a new expiry date")]
    MissingExpiryDate,
    #[error("add at least one batch to re-register into")]
    NoRegistrations,
    #[error("access days for batch {package_session_id} must be positive")]
    NonPositiveAccessDays { package_session_id: String },
    #[error("institute is not configured")]
    MissingInstitute,
    #[error("none of the selected students can be updated")]
    NoEligibleStudents,
    #[error("a request is already being submitted")]
    AlreadySubmitting,
}

/// User-entered values of the open dialog. Each action reads only its own fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkInputs {
    /// Change Batch: destination `package_session_id`.
    pub target_batch: Option<String>,
    /// Extend Session: new expiry date.
    pub expiry_date: Option<NaiveDate>,
    /// Re-register: batches with their access days.
    pub registrations: Vec<BatchRegistration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogStatus {
    #[default]
    Idle,
    Submitting,
    /// The last submit failed. The dialog stays open with this message.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDialog {
    pub request: BulkActionRequest,
    pub inputs: BulkInputs,
    pub status: DialogStatus,
    /// Payload captured by [`BulkDialogRouter::begin_submit`].
    pending: Option<MutationPayload>,
}

impl OpenDialog {
    fn new(request: BulkActionRequest) -> Self {
        Self {
            request,
            inputs: BulkInputs::default(),
            status: DialogStatus::Idle,
            pending: None,
        }
    }

    pub fn kind(&self) -> BulkActionKind {
        self.request.kind
    }

    pub fn is_submitting(&self) -> bool {
        self.status == DialogStatus::Submitting
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            DialogStatus::Failed(message) => Some(message),
            DialogStatus::Idle | DialogStatus::Submitting => None,
        }
    }

    /// Rows that carry both a user id and a batch id.
    pub fn eligible_students(&self) -> Vec<StudentRef> {
        self.request
            .target
            .rows()
            .iter()
            .filter_map(crate::StudentRow::student_ref)
            .collect()
    }

    /// How many targeted rows are left out for missing ids.
    pub fn excluded_count(&self) -> usize {
        self.request.target.rows().len() - self.eligible_students().len()
    }

    pub fn build_payload(&self, institute_id: &str) -> Result<MutationPayload, ValidationError> {
        let students = self.eligible_students();
        if students.is_empty() {
            return Err(ValidationError::NoEligibleStudents);
        }

        let payload = match self.request.kind {
            BulkActionKind::ChangeBatch => {
                let target = self
                    .inputs
                    .target_batch
                    .as_deref()
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .ok_or(ValidationError::MissingTargetBatch)?;
                MutationPayload::ChangeBatch(ChangeBatchBody {
                    students,
                    new_package_session_id: target.to_string(),
                })
            }
            BulkActionKind::ExtendSession => {
                let date = self
                    .inputs
                    .expiry_date
                    .ok_or(ValidationError::MissingExpiryDate)?;
                MutationPayload::ExtendSession(ExtendSessionBody {
                    students,
                    new_expiry_date: format_expiry(date),
                })
            }
            BulkActionKind::ReRegister => {
                if institute_id.trim().is_empty() {
                    return Err(ValidationError::MissingInstitute);
                }
                let registrations = &self.inputs.registrations;
                if registrations.is_empty() {
                    return Err(ValidationError::NoRegistrations);
                }
                if let Some(bad) = registrations.iter().find(|r| r.access_days == 0) {
                    return Err(ValidationError::NonPositiveAccessDays {
                        package_session_id: bad.package_session_id.clone(),
                    });
                }
                let access_days = registrations
                    .iter()
                    .map(|r| r.access_days)
                    .max()
                    .unwrap_or_default();
                MutationPayload::ReRegister(ReRegisterBody {
                    user_ids: students.into_iter().map(|s| s.user_id).collect(),
                    institute_id: institute_id.to_string(),
                    learner_batch_register_infos: registrations.clone(),
                    access_days,
                })
            }
            BulkActionKind::Terminate => MutationPayload::Terminate(StudentsBody { students }),
            BulkActionKind::Delete => MutationPayload::Delete(StudentsBody { students }),
        };
        Ok(payload)
    }
}

/// Router over the five bulk-action dialogs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkDialogRouter {
    open: Option<OpenDialog>,
    /// Set when a submit succeeds, until the page takes it.
    completed: Option<BulkActionKind>,
}

snapshot_state!(BulkDialogRouter);

impl BulkDialogRouter {
    /// Opens the dialog for `request`, closing whatever was open.
    pub fn open(&mut self, request: BulkActionRequest) {
        if let Some(previous) = self.open.take() {
            info!(
                "BulkDialogRouter: closing {} before opening {}",
                previous.kind().label(),
                request.kind.label()
            );
        }
        info!(
            "BulkDialogRouter: open {} for {}",
            request.kind.label(),
            request.target.display_label()
        );
        self.open = Some(OpenDialog::new(request));
    }

    pub fn close(&mut self) {
        if let Some(dialog) = self.open.take() {
            info!("BulkDialogRouter: close {}", dialog.kind().label());
        }
    }

    pub fn current(&self) -> Option<&OpenDialog> {
        self.open.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut OpenDialog> {
        self.open.as_mut()
    }

    pub fn open_kind(&self) -> Option<BulkActionKind> {
        self.open.as_ref().map(OpenDialog::kind)
    }

    pub fn is_open(&self, kind: BulkActionKind) -> bool {
        self.open_kind() == Some(kind)
    }

    pub fn inputs_mut(&mut self) -> Option<&mut BulkInputs> {
        self.open.as_mut().map(|dialog| &mut dialog.inputs)
    }

    pub fn status(&self) -> Option<&DialogStatus> {
        self.open.as_ref().map(|dialog| &dialog.status)
    }

    pub fn validate(&self, institute_id: &str) -> Result<MutationPayload, ValidationError> {
        let dialog = self.open.as_ref().ok_or(ValidationError::NotOpen)?;
        if dialog.is_submitting() {
            return Err(ValidationError::AlreadySubmitting);
        }
        dialog.build_payload(institute_id)
    }

    pub fn can_confirm(&self, institute_id: &str) -> bool {
        self.validate(institute_id).is_ok()
    }

    /// Validates, captures the payload and marks the dialog as submitting.
    ///
    /// Nothing changes when validation fails.
    pub fn begin_submit(&mut self, institute_id: &str) -> Result<(), ValidationError> {
        let payload = self.validate(institute_id)?;
        if let Some(dialog) = self.open.as_mut() {
            info!(
                "BulkDialogRouter: submitting {} for {} students",
                dialog.kind().label(),
                payload.student_count()
            );
            dialog.status = DialogStatus::Submitting;
            dialog.pending = Some(payload);
        }
        Ok(())
    }

    pub fn pending_payload(&self) -> Option<&MutationPayload> {
        self.open
            .as_ref()
            .filter(|dialog| dialog.is_submitting())
            .and_then(|dialog| dialog.pending.as_ref())
    }

    /// Closes the dialog that submitted `kind`. A dialog for another action
    /// opened in the meantime is left alone.
    pub fn finish_success(&mut self, kind: BulkActionKind) {
        if self.is_open(kind) {
            self.open = None;
        }
        self.completed = Some(kind);
    }

    /// Keeps the dialog open with `message`; the user may retry or cancel.
    pub fn finish_failure(&mut self, kind: BulkActionKind, message: String) {
        match self.open.as_mut() {
            Some(dialog) if dialog.kind() == kind => {
                dialog.status = DialogStatus::Failed(message);
                dialog.pending = None;
            }
            _ => warn!(
                "BulkDialogRouter: {} failed after its dialog closed: {message}",
                kind.label()
            ),
        }
    }

    /// Takes the kind of the last successful submit, if any.
    pub fn take_completed(&mut self) -> Option<BulkActionKind> {
        self.completed.take()
    }
}
