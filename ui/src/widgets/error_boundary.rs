//! Catches panics raised while drawing a subtree and shows a fallback instead
//! of taking the whole window down.

use std::panic::{AssertUnwindSafe, catch_unwind};

use egui::{Color32, Ui};
use log::error;

/// What the user picked on the fallback screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryAction {
    None,
    /// Draw the subtree again with the same state.
    TryAgain,
    /// The caller should rebuild the page state, then draw again.
    Reload,
}

#[derive(Debug, Default)]
pub struct ErrorBoundary {
    failed: Option<String>,
}

impl ErrorBoundary {
    pub fn has_failed(&self) -> bool {
        self.failed.is_some()
    }

    pub fn reset(&mut self) {
        self.failed = None;
    }

    /// Runs `add_contents` unless a previous frame panicked, in which case the
    /// fallback is drawn until the user resets it.
    pub fn show(&mut self, ui: &mut Ui, add_contents: impl FnOnce(&mut Ui)) -> BoundaryAction {
        if let Some(message) = &self.failed {
            let action = fallback(ui, message);
            if action != BoundaryAction::None {
                self.failed = None;
            }
            return action;
        }

        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| add_contents(ui))) {
            let message = panic_message(payload.as_ref());
            error!("ErrorBoundary: caught panic while rendering: {message}");
            self.failed = Some(message);
            ui.ctx().request_repaint();
        }
        BoundaryAction::None
    }
}

fn fallback(ui: &mut Ui, message: &str) -> BoundaryAction {
    let mut action = BoundaryAction::None;
    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        ui.colored_label(Color32::RED, "Something went wrong");
        ui.label(message);
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Try again").clicked() {
                action = BoundaryAction::TryAgain;
            }
            if ui.button("Reload").clicked() {
                action = BoundaryAction::Reload;
            }
        });
    });
    action
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown error".to_owned()
    }
}
