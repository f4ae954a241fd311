//! The student roster: search, column picker, bulk bar, table, pagination
//! and the dialogs opened from them.

use egui::{Color32, Key, Ui};
use log::info;
use roster_business::{
    BulkActionKind, BulkActionRequest, BulkDialogRouter, FetchStudentsCommand, StudentTable,
    StudentsPage, StudentsQuery, go_to_page, open_activity,
};
use roster_business::table::ColumnKind;
use roster_states::StateCtx;
use ustr::Ustr;

use super::table::{DataTable, PageEvent, apply_table_events};
use super::{RosterPageUi, activity_window, bulk_bar, bulk_dialogs, pagination_bar};

const ROW_ACTIONS: [(&str, BulkActionKind); 5] = [
    ("Change Batch", BulkActionKind::ChangeBatch),
    ("Extend Session", BulkActionKind::ExtendSession),
    ("Re-register", BulkActionKind::ReRegister),
    ("Terminate", BulkActionKind::Terminate),
    ("Delete", BulkActionKind::Delete),
];

pub fn roster_page(ctx: &mut StateCtx, page_ui: &mut RosterPageUi, ui: &mut Ui) {
    toolbar(ctx, page_ui, ui);
    ui.separator();

    let mut retry = false;
    match ctx.state::<StudentsPage>() {
        StudentsPage::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading students...");
            });
        }
        StudentsPage::Error(message) => {
            ui.horizontal(|ui| {
                ui.colored_label(Color32::RED, format!("Error: {message}"));
                retry = ui.button("Retry").clicked();
            });
        }
        StudentsPage::Idle | StudentsPage::Loaded(_) => {}
    }
    if retry {
        ctx.dispatch::<FetchStudentsCommand>();
    }

    bulk_bar(ctx, ui);

    let events = DataTable::new("roster_table")
        .empty_text("No students found")
        .row_actions(&ROW_ACTIONS)
        .show(
            ui,
            &ctx.state::<StudentTable>().table,
            ctx.state::<StudentsPage>().envelope(),
        );
    let rows = ctx.state::<StudentsPage>().rows().to_vec();
    let page_events = ctx.update::<StudentTable, _>(|students| {
        apply_table_events(&mut students.table, &rows, events)
    });

    for event in page_events {
        match event {
            PageEvent::Details(index) => {
                if let Some(row) = rows.get(index) {
                    info!("RosterPage: opening activity for {}", row.user_id);
                    open_activity(ctx, &row.user_id, "");
                    page_ui.activity_open = true;
                    page_ui.activity_slide_text.clear();
                    page_ui.activity_jump_text.clear();
                }
            }
            PageEvent::RowAction { row, action } => {
                if let Some(row) = rows.get(row) {
                    let request = BulkActionRequest::single(action, row.clone());
                    ctx.update::<BulkDialogRouter, _>(|router| router.open(request));
                }
            }
        }
    }

    ui.separator();
    let pagination = ctx.state::<StudentsPage>().pagination();
    if let Some(page_no) = pagination_bar(ui, pagination, &mut page_ui.jump_text) {
        go_to_page(ctx, page_no);
    }

    bulk_dialogs(ctx, &mut page_ui.dialog_form, ui);
    activity_window(ctx, page_ui, ui);
}

fn toolbar(ctx: &mut StateCtx, page_ui: &mut RosterPageUi, ui: &mut Ui) {
    let mut search = false;
    let mut toggled: Option<Ustr> = None;

    ui.horizontal(|ui| {
        ui.label("Search:");
        let response = ui.text_edit_singleline(&mut page_ui.search_text);
        search = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        search |= ui.button("Search").clicked();

        let table = &ctx.state::<StudentTable>().table;
        ui.menu_button("Columns", |ui| {
            for column in table.columns() {
                if matches!(column.column_kind(), ColumnKind::Select | ColumnKind::Actions) {
                    continue;
                }
                let mut visible = table.visibility.is_visible(column);
                if ui.checkbox(&mut visible, column.header()).changed() {
                    toggled = Some(column.id());
                }
            }
        });
    });

    if let Some(id) = toggled {
        ctx.update::<StudentTable, _>(|students| students.table.toggle_column_visibility(id));
    }
    if search {
        let text = page_ui.search_text.trim().to_owned();
        info!("RosterPage: searching for {text:?}");
        ctx.update::<StudentsQuery, _>(|query| query.set_search(text));
        ctx.dispatch::<FetchStudentsCommand>();
    }
}
