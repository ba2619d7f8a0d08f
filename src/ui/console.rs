//! One frame of the console layout
//!
//! `ConsoleView` renders a [`ConsoleState`] without touching the network so
//! it can be driven from the app and from UI tests alike.

use crate::state::ConsoleState;
use crate::ui::components::{ActivityPanel, ConfigForm, SessionControls, StatusPanel, VoicePanel};
use crate::ui::state::{FormState, UiAction};
use crate::ui::theme::Theme;
use crate::ui::view::StatusView;
use egui::{self, RichText};

pub struct ConsoleView<'a> {
    state: &'a mut ConsoleState,
    form: &'a mut FormState,
    theme: &'a Theme,
}

impl<'a> ConsoleView<'a> {
    pub fn new(state: &'a mut ConsoleState, form: &'a mut FormState, theme: &'a Theme) -> Self {
        Self { state, form, theme }
    }

    /// Render and collect the actions the user triggered
    pub fn show(self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();

        ui.label(
            RichText::new("Agent Console")
                .size(20.0)
                .strong()
                .color(self.theme.text_primary),
        );
        ui.add_space(self.theme.spacing_sm);

        egui::ScrollArea::vertical()
            .id_salt("console_scroll")
            .show(ui, |ui| {
                ConfigForm::new(&mut self.state.config, self.form, self.theme).show(ui);
                ui.add_space(self.theme.spacing);

                actions.extend(SessionControls::new(&self.state.session, self.theme).show(ui));
                ui.add_space(self.theme.spacing);

                let status = StatusView::from_report(self.state.session.report.as_ref());
                StatusPanel::new(&status, self.theme).show(ui);
                ui.add_space(self.theme.spacing);

                actions.extend(VoicePanel::new(self.state, self.theme).show(ui));
            });

        actions
    }

    /// Activity log, for a side panel
    pub fn show_activity(state: &ConsoleState, theme: &Theme, ui: &mut egui::Ui) {
        ActivityPanel::new(&state.activity, theme).show(ui);
    }
}
