//! Bulk student-lifecycle actions: change batch, extend session,
//! re-register, terminate and delete.

mod action;
mod command;
mod payload;
mod router;

pub use action::{BulkActionKind, BulkActionRequest, BulkTarget};
pub use command::ConfirmBulkActionCommand;
pub use payload::{
    BatchRegistration, ChangeBatchBody, EXPIRY_DATE_FORMAT, ExtendSessionBody, MutationPayload,
    ReRegisterBody, StudentsBody, format_expiry,
};
pub use router::{BulkDialogRouter, BulkInputs, DialogStatus, OpenDialog, ValidationError};
