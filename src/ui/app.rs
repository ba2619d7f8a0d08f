//! Main application struct and eframe integration
//!
//! `ConsoleApp` renders the shared console state, forwards button presses to
//! the [`SessionController`] and keeps the transport binder in step with the
//! current session.

use crate::session::SessionController;
use crate::state::SharedConsoleState;
use crate::transport::TransportBinder;
use crate::ui::console::ConsoleView;
use crate::ui::state::{FormState, UiAction};
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, SidePanel};
use std::time::Duration;
use tracing::{debug, info};

/// Repaint cadence so poll results show up without user input
const REPAINT_INTERVAL: Duration = Duration::from_millis(100);

/// Main console application
pub struct ConsoleApp {
    shared: SharedConsoleState,
    controller: SessionController,
    binder: TransportBinder,
    form: FormState,
    theme: Theme,
}

impl ConsoleApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        controller: SessionController,
        binder: TransportBinder,
    ) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        let shared = controller.state().clone();
        shared.write().log("Console started");
        controller.check_backend();

        Self {
            shared,
            controller,
            binder,
            form: FormState::new(),
            theme,
        }
    }

    fn dispatch(&self, action: UiAction) {
        debug!("[UI] {:?}", action);
        match action {
            UiAction::StartSession => {
                self.controller.start_session();
            }
            UiAction::ResetSession => self.controller.reset_session(),
            UiAction::CheckBackend => self.controller.check_backend(),
        }
    }
}

impl eframe::App for ConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Render from a snapshot so the session tasks never wait on a frame
        let mut snapshot = self.shared.snapshot();
        let config_before = snapshot.config.clone();

        SidePanel::right("activity_panel")
            .resizable(true)
            .default_width(260.0)
            .min_width(200.0)
            .frame(egui::Frame::none().fill(self.theme.bg_primary).inner_margin(self.theme.spacing))
            .show(ctx, |ui| {
                ConsoleView::show_activity(&snapshot, &self.theme, ui);
            });

        let actions = CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary).inner_margin(self.theme.spacing))
            .show(ctx, |ui| ConsoleView::new(&mut snapshot, &mut self.form, &self.theme).show(ui))
            .inner;

        if snapshot.config != config_before {
            self.shared.write().config = snapshot.config;
        }

        for action in actions {
            self.dispatch(action);
        }

        self.binder.follow_session(&self.shared);

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("[UI] Shutting down");
        self.controller.shutdown();
        self.binder.release();
    }
}
