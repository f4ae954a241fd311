//! Renders a [`TableState`] render plan: a left-pinned group, a horizontally
//! scrolling center group, resize handles, selection checkboxes and row menus.
//!
//! The widget never mutates the table. It returns [`TableEvent`]s which the
//! caller applies with [`apply_table_events`] once the frame's borrows end.

use egui::{Align, CursorIcon, Id, Label, Layout, ScrollArea, Sense, Stroke, Ui, vec2};
use log::debug;
use roster_business::PageEnvelope;
use roster_business::table::{ColumnKind, PlannedColumn, RenderPlan, TableRow, TableState};
use ustr::Ustr;

pub const HEADER_HEIGHT: f32 = 30.0;
pub const ROW_HEIGHT: f32 = 28.0;
const HANDLE_WIDTH: f32 = 6.0;

/// Something the user did to the table this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent<A> {
    ResizeStarted { column: Ustr, x: f32 },
    ResizeMoved { x: f32 },
    ResizeEnded,
    /// The pointer left the window mid-drag.
    ResizeCancelled,
    ToggleAll,
    ToggleRow(Ustr),
    /// The details button of row `usize` (index into the page).
    Details(usize),
    RowAction { row: usize, action: A },
}

/// Events the table cannot handle itself.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent<A> {
    Details(usize),
    RowAction { row: usize, action: A },
}

/// Applies resize and selection events to `table` and hands back the rest.
pub fn apply_table_events<R: TableRow, A>(
    table: &mut TableState<R>,
    rows: &[R],
    events: Vec<TableEvent<A>>,
) -> Vec<PageEvent<A>> {
    let mut rest = Vec::new();
    for event in events {
        match event {
            TableEvent::ResizeStarted { column, x } => {
                table.begin_resize(column, x);
            }
            TableEvent::ResizeMoved { x } => {
                table.resize.pointer_move(x);
            }
            TableEvent::ResizeEnded => {
                if let Some((column, width)) = table.end_resize() {
                    debug!("Table: {column} resized to {width}");
                }
            }
            TableEvent::ResizeCancelled => {
                table.cancel_resize();
            }
            TableEvent::ToggleAll => table.selection.toggle_all_rows(rows),
            TableEvent::ToggleRow(id) => table.selection.toggle_one(id),
            TableEvent::Details(row) => rest.push(PageEvent::Details(row)),
            TableEvent::RowAction { row, action } => {
                rest.push(PageEvent::RowAction { row, action });
            }
        }
    }
    rest
}

/// Builder for one table on screen.
pub struct DataTable<'a, A> {
    id_salt: &'a str,
    empty_text: &'a str,
    row_actions: &'a [(&'static str, A)],
}

impl<'a, A: Copy> DataTable<'a, A> {
    pub fn new(id_salt: &'a str) -> Self {
        Self {
            id_salt,
            empty_text: "No rows",
            row_actions: &[],
        }
    }

    pub fn empty_text(mut self, text: &'a str) -> Self {
        self.empty_text = text;
        self
    }

    /// Entries of the per-row menu, shown in [`ColumnKind::Actions`] cells.
    pub fn row_actions(mut self, actions: &'a [(&'static str, A)]) -> Self {
        self.row_actions = actions;
        self
    }

    pub fn show<R: TableRow>(
        &self,
        ui: &mut Ui,
        table: &TableState<R>,
        page: Option<&PageEnvelope<R>>,
    ) -> Vec<TableEvent<A>> {
        let plan = table.plan(page);
        let mut events = Vec::new();
        let id = Id::new(self.id_salt);

        if table.resize.is_dragging() && !ui.ctx().input(|i| i.pointer.has_pointer()) {
            events.push(TableEvent::ResizeCancelled);
        }

        ScrollArea::vertical()
            .id_salt(id.with("rows"))
            .auto_shrink([false, true])
            .show(ui, |ui| {
                ui.horizontal_top(|ui| {
                    ui.spacing_mut().item_spacing = vec2(0.0, 0.0);

                    ui.vertical(|ui| {
                        self.group(ui, table, &plan, &plan.left_pinned, &mut events);
                    });

                    ScrollArea::horizontal()
                        .id_salt(id.with("center"))
                        .show(ui, |ui| {
                            ui.vertical(|ui| {
                                self.group(ui, table, &plan, &plan.center, &mut events);
                            });
                        });
                });

                if plan.is_empty() {
                    ui.add_space(8.0);
                    ui.weak(self.empty_text);
                }
            });

        events
    }

    fn group<R: TableRow>(
        &self,
        ui: &mut Ui,
        table: &TableState<R>,
        plan: &RenderPlan<'_, R>,
        columns: &[PlannedColumn],
        events: &mut Vec<TableEvent<A>>,
    ) {
        ui.horizontal(|ui| {
            for column in columns {
                self.header_cell(ui, table, plan, column, events);
            }
        });
        ui.separator();

        for (index, row) in plan.rows.iter().enumerate() {
            ui.horizontal(|ui| {
                for column in columns {
                    cell(ui, column.width, ROW_HEIGHT, |ui| {
                        self.body_cell(ui, table, column, index, row, events);
                    });
                }
            });
        }
    }

    fn header_cell<R: TableRow>(
        &self,
        ui: &mut Ui,
        table: &TableState<R>,
        plan: &RenderPlan<'_, R>,
        column: &PlannedColumn,
        events: &mut Vec<TableEvent<A>>,
    ) {
        let Some(def) = table.columns().get(column.index) else {
            return;
        };
        let label_width = (column.width - HANDLE_WIDTH).max(0.0);

        cell(ui, label_width, HEADER_HEIGHT, |ui| match column.kind {
            ColumnKind::Select => {
                let mut all = table.selection.all_selected(plan.rows);
                if ui
                    .add_enabled(!plan.is_empty(), egui::Checkbox::without_text(&mut all))
                    .on_hover_text("Select all on this page")
                    .changed()
                {
                    events.push(TableEvent::ToggleAll);
                }
            }
            ColumnKind::Data | ColumnKind::Details | ColumnKind::Actions => {
                ui.add(Label::new(egui::RichText::new(def.header()).strong()).truncate());
            }
        });

        if !column.resizable {
            ui.add_space(HANDLE_WIDTH);
            return;
        }

        let (rect, response) =
            ui.allocate_exact_size(vec2(HANDLE_WIDTH, HEADER_HEIGHT), Sense::drag());
        let response = response.on_hover_cursor(CursorIcon::ResizeHorizontal);
        if response.drag_started()
            && let Some(pos) = response.interact_pointer_pos()
        {
            events.push(TableEvent::ResizeStarted {
                column: column.id,
                x: pos.x,
            });
        }
        if response.dragged()
            && let Some(pos) = response.interact_pointer_pos()
        {
            events.push(TableEvent::ResizeMoved { x: pos.x });
        }
        if response.drag_stopped() {
            events.push(TableEvent::ResizeEnded);
        }

        let visuals = ui.visuals();
        let dragging = table.resize.dragging_column() == Some(column.id);
        let stroke = if dragging || response.hovered() {
            visuals.widgets.active.fg_stroke
        } else {
            Stroke::new(1.0, visuals.widgets.noninteractive.bg_stroke.color)
        };
        ui.painter().vline(rect.center().x, rect.y_range(), stroke);

        if dragging {
            // Preview only; the width is committed on release.
            let x = rect.center().x + table.resize.visual_offset(column.id);
            let bottom = rect.bottom() + ROW_HEIGHT * plan.row_count() as f32;
            ui.painter()
                .vline(x, rect.top()..=bottom, visuals.widgets.active.fg_stroke);
        }
    }

    fn body_cell<R: TableRow>(
        &self,
        ui: &mut Ui,
        table: &TableState<R>,
        column: &PlannedColumn,
        index: usize,
        row: &R,
        events: &mut Vec<TableEvent<A>>,
    ) {
        match column.kind {
            ColumnKind::Select => {
                let id = row.row_id();
                let mut selected = table.selection.is_selected(id);
                if ui.add(egui::Checkbox::without_text(&mut selected)).changed() {
                    events.push(TableEvent::ToggleRow(id));
                }
            }
            ColumnKind::Details => {
                if ui.small_button("View").clicked() {
                    events.push(TableEvent::Details(index));
                }
            }
            ColumnKind::Actions => {
                ui.menu_button("⋮", |ui| {
                    for (label, action) in self.row_actions {
                        if ui.button(*label).clicked() {
                            events.push(TableEvent::RowAction {
                                row: index,
                                action: *action,
                            });
                            ui.close();
                        }
                    }
                });
            }
            ColumnKind::Data => {
                let text = table
                    .columns()
                    .get(column.index)
                    .map(|def| def.cell(row))
                    .unwrap_or_default();
                ui.add(Label::new(text).truncate());
            }
        }
    }
}

/// Fixed-size cell with its contents vertically centered.
fn cell(ui: &mut Ui, width: f32, height: f32, add_contents: impl FnOnce(&mut Ui)) {
    ui.allocate_ui_with_layout(
        vec2(width, height),
        Layout::left_to_right(Align::Center),
        |ui| {
            ui.set_min_size(vec2(width, height));
            ui.set_max_width(width);
            ui.add_space(4.0);
            add_contents(ui);
        },
    );
}
