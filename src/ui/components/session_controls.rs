//! Start / reset buttons and session messages

use crate::session::SessionLifecycle;
use crate::ui::state::UiAction;
use crate::ui::theme::Theme;
use crate::ui::view;
use egui::{self, RichText, WidgetInfo, WidgetType};

pub struct SessionControls<'a> {
    session: &'a SessionLifecycle,
    theme: &'a Theme,
}

impl<'a> SessionControls<'a> {
    pub fn new(session: &'a SessionLifecycle, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    /// Show the controls and return the button the user pressed, if any
    pub fn show(self, ui: &mut egui::Ui) -> Option<UiAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            let (label, enabled) = view::start_button(self.session);
            let start = ui.add_enabled(
                enabled,
                egui::Button::new(RichText::new(label).strong())
                    .fill(self.theme.primary)
                    .rounding(self.theme.button_rounding),
            );
            start.widget_info(|| WidgetInfo::labeled(WidgetType::Button, enabled, label));
            if start.clicked() {
                action = Some(UiAction::StartSession);
            }

            let reset = ui.add(
                egui::Button::new("Reset Session").rounding(self.theme.button_rounding),
            );
            reset.widget_info(|| WidgetInfo::labeled(WidgetType::Button, true, "Reset Session"));
            if reset.clicked() {
                action = Some(UiAction::ResetSession);
            }
        });

        if let Some(session_id) = self.session.session_id() {
            ui.label(
                RichText::new(format!("Session: {}", session_id))
                    .small()
                    .family(egui::FontFamily::Monospace)
                    .color(self.theme.text_muted),
            );
        }

        if let Some(message) = &self.session.create_error {
            self.error_line(ui, message);
        }
        if let Some(message) = &self.session.expiry_message {
            self.error_line(ui, message);
        }
        if let Some(message) = &self.session.last_poll_error {
            ui.label(
                RichText::new(format!("Poll failed: {}", message))
                    .small()
                    .color(self.theme.warning),
            );
        }

        action
    }

    fn error_line(&self, ui: &mut egui::Ui, message: &str) {
        let response = ui.label(RichText::new(message).color(self.theme.error));
        response.widget_info(|| WidgetInfo::labeled(WidgetType::Label, true, message));
    }
}
