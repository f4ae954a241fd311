use log::{error, info, warn};
use roster_states::{Command, CommandFuture, CommandSnapshot, Updater};

use super::BulkDialogRouter;
use crate::api::{self, ApiState};
use crate::roster_page::StudentTable;

/// Sends the payload captured by [`BulkDialogRouter::begin_submit`].
///
/// Success closes the dialog and clears the roster selection. Failure keeps
/// the dialog open with the error; nothing is retried.
#[derive(Debug, Default)]
pub struct ConfirmBulkActionCommand;

impl Command for ConfirmBulkActionCommand {
    fn run(&self, snap: CommandSnapshot, updater: Updater) -> CommandFuture {
        let router = snap.state::<BulkDialogRouter>();
        let Some(payload) = router.pending_payload().cloned() else {
            warn!("ConfirmBulkActionCommand: no pending payload, nothing sent");
            return Box::pin(async {});
        };
        let client = snap.state::<ApiState>().api();

        Box::pin(async move {
            let kind = payload.kind();
            match api::submit(client.as_ref(), &payload).await {
                Ok(()) => {
                    info!(
                        "ConfirmBulkActionCommand: {} succeeded for {} students",
                        kind.label(),
                        payload.student_count()
                    );
                    updater.apply::<BulkDialogRouter, _>(move |router| {
                        router.finish_success(kind);
                    });
                    updater.apply::<StudentTable, _>(|table| table.table.selection.clear());
                }
                Err(err) => {
                    error!("ConfirmBulkActionCommand: {} failed: {err}", kind.label());
                    updater.apply::<BulkDialogRouter, _>(move |router| {
                        router.finish_failure(kind, err.to_string());
                    });
                }
            }
        })
    }
}
