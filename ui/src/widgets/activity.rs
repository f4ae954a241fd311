//! Activity-log viewer for one learner.

use egui::{Color32, Ui, Window};
use log::info;
use roster_business::{ActivityPage, ActivityQuery, ActivityTable, FetchActivityLogsCommand};
use roster_states::StateCtx;

use super::table::{DataTable, apply_table_events};
use super::{RosterPageUi, pagination_bar};

pub fn activity_window(ctx: &mut StateCtx, page_ui: &mut RosterPageUi, ui: &mut Ui) {
    if !page_ui.activity_open {
        return;
    }

    let query = ctx.state::<ActivityQuery>().clone();
    let mut open = true;
    let mut reload = None;

    Window::new(format!("Activity - {}", query.user_id))
        .id(egui::Id::new("activity_window"))
        .open(&mut open)
        .default_size([720.0, 420.0])
        .show(ui.ctx(), |ui| {
            ui.horizontal(|ui| {
                ui.label("Slide:");
                ui.text_edit_singleline(&mut page_ui.activity_slide_text);
                if ui.button("Load").clicked() {
                    reload = Some((page_ui.activity_slide_text.trim().to_owned(), 0));
                }
            });
            ui.separator();

            let page = ctx.state::<ActivityPage>();
            match page {
                ActivityPage::Idle => {
                    ui.weak("No activity loaded");
                }
                ActivityPage::Loading => {
                    ui.spinner();
                }
                ActivityPage::Error(message) => {
                    ui.colored_label(Color32::RED, format!("Error: {message}"));
                    if ui.button("Retry").clicked() {
                        reload = Some((query.slide_id.clone(), query.page_no));
                    }
                }
                ActivityPage::Loaded(_) => {}
            }

            let envelope = page.envelope().cloned();
            let pagination = page.pagination();
            let events = DataTable::<()>::new("activity_table")
                .empty_text("No activity recorded")
                .show(ui, &ctx.state::<ActivityTable>().table, envelope.as_ref());
            let rows = envelope.map(|e| e.content).unwrap_or_default();
            ctx.update::<ActivityTable, _>(|activity| {
                apply_table_events(&mut activity.table, &rows, events);
            });

            ui.separator();
            if let Some(page_no) = pagination_bar(ui, pagination, &mut page_ui.activity_jump_text) {
                reload = Some((query.slide_id.clone(), page_no));
            }
        });

    if let Some((slide_id, page_no)) = reload {
        info!("Activity: loading {} page {page_no}", query.user_id);
        ctx.update::<ActivityQuery, _>(|query| {
            query.slide_id = slide_id;
            query.page_no = page_no;
        });
        ctx.dispatch::<FetchActivityLogsCommand>();
    }
    if !open {
        page_ui.activity_open = false;
    }
}
