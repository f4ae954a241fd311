//! The five bulk-action dialogs. Only the one the router has open is drawn.

use chrono::NaiveDate;
use egui::{Color32, ComboBox, DragValue, Id, RichText, Ui, Window};
use egui_extras::{Column, TableBuilder};
use log::warn;
use roster_business::bulk::{BatchRegistration, BulkInputs, EXPIRY_DATE_FORMAT, OpenDialog};
use roster_business::{
    BatchOptions, BulkActionKind, BulkActionRequest, BulkDialogRouter, BulkTarget, BusinessConfig,
    ValidationError, confirm_bulk_action,
};
use roster_states::StateCtx;

const DEFAULT_ACCESS_DAYS: u32 = 365;

/// Text buffers behind the dialog inputs. Reset whenever the open dialog
/// changes kind or target.
#[derive(Debug, Default)]
pub struct DialogForm {
    for_request: Option<BulkActionRequest>,
    pub batch_text: String,
    pub expiry_text: String,
    pub new_registration: String,
    pub new_registration_days: u32,
}

impl DialogForm {
    fn sync(&mut self, request: Option<&BulkActionRequest>) {
        if self.for_request.as_ref() != request {
            *self = Self {
                for_request: request.cloned(),
                new_registration_days: DEFAULT_ACCESS_DAYS,
                ..Self::default()
            };
        }
    }
}

#[derive(Default)]
struct DialogOutcome {
    confirm: bool,
    cancel: bool,
}

pub fn bulk_dialogs(ctx: &mut StateCtx, form: &mut DialogForm, ui: &mut Ui) {
    let Some(dialog) = ctx.state::<BulkDialogRouter>().current() else {
        form.sync(None);
        return;
    };
    form.sync(Some(&dialog.request));
    let kind = dialog.kind();
    let title = format!("{} - {}", kind.label(), dialog.request.target.display_label());

    let institute_id = ctx.state::<BusinessConfig>().institute_id.clone();
    let options = ctx.state::<BatchOptions>().clone();
    let mut open = true;
    let mut outcome = DialogOutcome::default();

    Window::new(title)
        .id(Id::new(("bulk_dialog", kind)))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ui.ctx(), |ui| {
            let router = ctx.state_mut::<BulkDialogRouter>();
            let Some(dialog) = router.current_mut() else {
                return;
            };

            if let Some(error) = dialog.error() {
                ui.colored_label(Color32::RED, format!("Error: {error}"));
                ui.add_space(8.0);
            }

            if dialog.is_submitting() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(format!("{}...", kind.label()));
                });
                return;
            }

            let current_batch = match &dialog.request.target {
                BulkTarget::Single(row) => Some(row.package_session_id.clone()),
                BulkTarget::Bulk { .. } => None,
            };
            match kind {
                BulkActionKind::ChangeBatch => change_batch_inputs(
                    ui,
                    &mut dialog.inputs,
                    form,
                    &options,
                    current_batch.as_deref(),
                ),
                BulkActionKind::ExtendSession => {
                    extend_session_inputs(ui, &mut dialog.inputs, form);
                }
                BulkActionKind::ReRegister => {
                    re_register_inputs(ui, &mut dialog.inputs, form, &options);
                }
                BulkActionKind::Terminate => {
                    ui.colored_label(Color32::from_rgb(255, 165, 0), "⚠ Warning");
                    ui.label("Terminated students lose access to every batch immediately.");
                }
                BulkActionKind::Delete => {
                    ui.colored_label(Color32::from_rgb(255, 165, 0), "⚠ Warning");
                    ui.label("Deleted students are removed from the institute.");
                    ui.label("This action cannot be undone.");
                }
            }

            ui.add_space(8.0);
            target_list(ui, dialog);

            let validation = router.validate(&institute_id);
            ui.add_space(8.0);
            if let Err(reason) = &validation
                && *reason != ValidationError::AlreadySubmitting
            {
                ui.weak(reason.to_string());
            }

            ui.horizontal(|ui| {
                let text = RichText::new(kind.confirm_label());
                let text = if kind.is_destructive() {
                    text.color(Color32::RED)
                } else {
                    text
                };
                if ui
                    .add_enabled(validation.is_ok(), egui::Button::new(text))
                    .clicked()
                {
                    outcome.confirm = true;
                }
                if ui.button("Cancel").clicked() {
                    outcome.cancel = true;
                }
            });
        });

    if outcome.confirm
        && let Err(e) = confirm_bulk_action(ctx)
    {
        warn!("BulkDialogs: confirm rejected: {e}");
    }
    if !open || outcome.cancel {
        ctx.update::<BulkDialogRouter, _>(BulkDialogRouter::close);
    }
}

fn change_batch_inputs(
    ui: &mut Ui,
    inputs: &mut BulkInputs,
    form: &mut DialogForm,
    options: &BatchOptions,
    current_batch: Option<&str>,
) {
    let choices = match current_batch {
        Some(current) => options.choices_excluding(current),
        None => options.choices(),
    };

    ui.label("Move the students into:");
    if choices.is_empty() {
        ui.horizontal(|ui| {
            ui.label("Batch id:");
            if ui.text_edit_singleline(&mut form.batch_text).changed() {
                let text = form.batch_text.trim();
                inputs.target_batch = (!text.is_empty()).then(|| text.to_owned());
            }
        });
        return;
    }

    let selected = inputs
        .target_batch
        .as_ref()
        .and_then(|id| choices.iter().find(|(choice, _)| choice == id))
        .map(|(_, label)| label.clone())
        .unwrap_or_else(|| "Select batch".to_owned());
    ComboBox::from_id_salt("target_batch")
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for (id, label) in choices {
                ui.selectable_value(&mut inputs.target_batch, Some(id), label);
            }
        });
}

fn extend_session_inputs(ui: &mut Ui, inputs: &mut BulkInputs, form: &mut DialogForm) {
    ui.horizontal(|ui| {
        ui.label("New expiry date:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut form.expiry_text).hint_text("DD-MM-YYYY"),
        );
        if response.changed() {
            inputs.expiry_date =
                NaiveDate::parse_from_str(form.expiry_text.trim(), EXPIRY_DATE_FORMAT).ok();
        }
    });
    if !form.expiry_text.trim().is_empty() && inputs.expiry_date.is_none() {
        ui.colored_label(Color32::YELLOW, "Use the DD-MM-YYYY format");
    }
}

fn re_register_inputs(
    ui: &mut Ui,
    inputs: &mut BulkInputs,
    form: &mut DialogForm,
    options: &BatchOptions,
) {
    ui.label("Re-register into:");
    let choices = options.choices();

    if !choices.is_empty() {
        for (id, label) in choices {
            ui.horizontal(|ui| {
                let position = inputs
                    .registrations
                    .iter()
                    .position(|r| r.package_session_id == id);
                let mut checked = position.is_some();
                if ui.checkbox(&mut checked, label).changed() {
                    match position {
                        Some(index) if !checked => {
                            inputs.registrations.remove(index);
                        }
                        None if checked => inputs.registrations.push(BatchRegistration {
                            package_session_id: id.clone(),
                            access_days: form.new_registration_days,
                        }),
                        _ => {}
                    }
                }
                if let Some(registration) = inputs
                    .registrations
                    .iter_mut()
                    .find(|r| r.package_session_id == id)
                {
                    ui.add(access_days(&mut registration.access_days));
                }
            });
        }
        return;
    }

    let mut remove = None;
    for (index, registration) in inputs.registrations.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.label(&registration.package_session_id);
            ui.add(access_days(&mut registration.access_days));
            if ui.small_button("✕").clicked() {
                remove = Some(index);
            }
        });
    }
    if let Some(index) = remove {
        inputs.registrations.remove(index);
    }

    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(&mut form.new_registration).hint_text("Batch id"));
        ui.add(access_days(&mut form.new_registration_days));
        let id = form.new_registration.trim().to_owned();
        let duplicate = inputs.registrations.iter().any(|r| r.package_session_id == id);
        if ui
            .add_enabled(!id.is_empty() && !duplicate, egui::Button::new("Add"))
            .clicked()
        {
            inputs.registrations.push(BatchRegistration {
                package_session_id: id,
                access_days: form.new_registration_days,
            });
            form.new_registration.clear();
        }
    });
}

fn access_days(value: &mut u32) -> DragValue<'_> {
    DragValue::new(value).range(0..=3650).suffix(" days")
}

/// The targeted students, flagging rows that will be skipped.
fn target_list(ui: &mut Ui, dialog: &OpenDialog) {
    let rows = dialog.request.target.rows();
    TableBuilder::new(ui)
        .id_salt("bulk_targets")
        .striped(true)
        .max_scroll_height(160.0)
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(100.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Name");
            });
            header.col(|ui| {
                ui.strong("Username");
            });
            header.col(|ui| {
                ui.strong("Included");
            });
        })
        .body(|mut body| {
            for row in rows {
                body.row(18.0, |mut table_row| {
                    table_row.col(|ui| {
                        ui.label(&row.full_name);
                    });
                    table_row.col(|ui| {
                        ui.label(&row.username);
                    });
                    table_row.col(|ui| {
                        if row.student_ref().is_some() {
                            ui.label("✔");
                        } else {
                            ui.colored_label(Color32::YELLOW, "missing ids");
                        }
                    });
                });
            }
        });

    let excluded = dialog.excluded_count();
    if excluded > 0 {
        ui.colored_label(
            Color32::YELLOW,
            format!("{excluded} of {} students will be skipped", rows.len()),
        );
    }
}
