use std::time::Duration;

use log::info;
use roster_business::{BulkDialogRouter, BusinessConfig, FetchStudentsCommand};

use crate::state::State;
use crate::widgets::{BoundaryAction, ErrorBoundary, roster_page};

pub struct RosterApp {
    state: State,
    boundary: ErrorBoundary,
    started: bool,
}

impl RosterApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self {
            state,
            boundary: ErrorBoundary::default(),
            started: false,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Draws the roster page into `ui`. Also used directly by UI tests.
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Apply what finished commands sent before anything reads the store.
        self.state.ctx.sync_updates();

        if !self.started {
            self.started = true;
            self.state.ctx.dispatch::<FetchStudentsCommand>();
        }
        if let Some(kind) = self
            .state
            .ctx
            .update::<BulkDialogRouter, _>(BulkDialogRouter::take_completed)
        {
            info!("RosterApp: {} finished, refreshing roster", kind.label());
            self.state.ctx.dispatch::<FetchStudentsCommand>();
        }

        let state = &mut self.state;
        let action = self
            .boundary
            .show(ui, |ui| roster_page(&mut state.ctx, &mut state.page_ui, ui));
        match action {
            BoundaryAction::Reload => {
                self.state.reload();
                self.started = false;
            }
            BoundaryAction::TryAgain | BoundaryAction::None => {}
        }

        if self.state.ctx.in_flight() > 0 {
            ui.ctx().request_repaint_after(Duration::from_millis(50));
        }
    }
}

impl eframe::App for RosterApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.heading("Students");
                ui.separator();
                ui.weak(self.state.ctx.state::<BusinessConfig>().api_base_url.as_str());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| self.ui(ui));
    }
}
