use egui::{Button, Color32, RichText, Ui};
use log::info;
use roster_business::{
    BulkActionKind, BulkActionRequest, BulkDialogRouter, StudentRow, StudentTable, StudentsPage,
};
use roster_states::StateCtx;

/// Selection count, the five bulk actions and "Clear". Hidden while nothing
/// on the page is selected.
pub fn bulk_bar(ctx: &mut StateCtx, ui: &mut Ui) {
    let selected: Vec<StudentRow> = ctx
        .state::<StudentTable>()
        .selected_rows(ctx.state::<StudentsPage>())
        .into_iter()
        .cloned()
        .collect();
    if selected.is_empty() {
        return;
    }

    let mut clicked = None;
    let mut clear = false;
    ui.horizontal(|ui| {
        ui.label(RichText::new(format!("{} selected", selected.len())).strong());
        ui.separator();
        for kind in BulkActionKind::ALL {
            let text = if kind.is_destructive() {
                RichText::new(kind.label()).color(Color32::RED)
            } else {
                RichText::new(kind.label())
            };
            if ui.add(Button::new(text)).clicked() {
                clicked = Some(kind);
            }
        }
        ui.separator();
        if ui.button("Clear").clicked() {
            clear = true;
        }
    });

    if clear {
        ctx.update::<StudentTable, _>(|students| students.table.selection.clear());
    }
    if let Some(kind) = clicked {
        info!("BulkBar: opening {} for {} students", kind.label(), selected.len());
        ctx.update::<BulkDialogRouter, _>(|router| {
            router.open(BulkActionRequest::bulk(kind, selected));
        });
    }
}
