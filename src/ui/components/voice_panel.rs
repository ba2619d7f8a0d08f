//! Realtime room panel: transport state, audio output and backend health

use crate::state::{BackendHealth, ConsoleState};
use crate::ui::state::UiAction;
use crate::ui::theme::Theme;
use egui::{self, RichText, WidgetInfo, WidgetType};

pub struct VoicePanel<'a> {
    state: &'a ConsoleState,
    theme: &'a Theme,
}

impl<'a> VoicePanel<'a> {
    pub fn new(state: &'a ConsoleState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) -> Option<UiAction> {
        let mut action = None;

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.label(
                    RichText::new("Voice")
                        .size(16.0)
                        .strong()
                        .color(self.theme.text_primary),
                );

                let transport = format!("Transport: {}", self.state.transport_state);
                let response = ui.label(RichText::new(&transport).color(self.theme.text_secondary));
                response.widget_info(|| WidgetInfo::labeled(WidgetType::Label, true, &transport));

                if let Some(audio) = &self.state.audio_status {
                    ui.label(RichText::new(audio).small().color(self.theme.text_muted));
                }

                ui.add_space(self.theme.spacing_sm);

                ui.horizontal(|ui| {
                    let health = self.state.backend_health;
                    let color = match health {
                        BackendHealth::Reachable => self.theme.success,
                        BackendHealth::Unreachable => self.theme.error,
                        BackendHealth::Checking | BackendHealth::Unknown => self.theme.text_muted,
                    };
                    let text = format!("Backend: {}", health);
                    let response = ui.label(RichText::new(&text).small().color(color));
                    response.widget_info(|| WidgetInfo::labeled(WidgetType::Label, true, &text));

                    let enabled = health != BackendHealth::Checking;
                    if ui
                        .add_enabled(enabled, egui::Button::new("Check").small())
                        .on_hover_text(&self.state.backend_url)
                        .clicked()
                    {
                        action = Some(UiAction::CheckBackend);
                    }
                });
            });

        action
    }
}
