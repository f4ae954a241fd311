use egui::{Button, Key, TextEdit, Ui};
use roster_business::Pagination;

/// Previous / next buttons, the page label and a jump box.
///
/// Returns the zero-based page the user asked for. Invalid jump input is
/// dropped and leaves the box as typed.
pub fn pagination_bar(
    ui: &mut Ui,
    pagination: Pagination,
    jump_text: &mut String,
) -> Option<usize> {
    let mut target = None;

    ui.horizontal(|ui| {
        if ui
            .add_enabled(pagination.can_previous(), Button::new("◀ Previous"))
            .clicked()
        {
            target = pagination.previous();
        }

        ui.label(pagination.label());

        if ui
            .add_enabled(pagination.can_next(), Button::new("Next ▶"))
            .clicked()
        {
            target = pagination.next();
        }

        ui.separator();
        ui.label("Go to");
        let response = ui.add(TextEdit::singleline(jump_text).desired_width(40.0));
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        if (ui.button("Go").clicked() || submitted)
            && pagination.jump(jump_text.as_str(), |page| target = Some(page))
        {
            jump_text.clear();
        }
    });

    target
}
