//! Agent configuration form

use crate::config::{AgentConfig, ConfigField};
use crate::ui::state::FormState;
use crate::ui::theme::Theme;
use egui::{self, Id, RichText, TextEdit, WidgetInfo, WidgetType};

/// Form for the agent's LLM, STT and TTS settings
pub struct ConfigForm<'a> {
    config: &'a mut AgentConfig,
    form: &'a mut FormState,
    theme: &'a Theme,
}

impl<'a> ConfigForm<'a> {
    pub fn new(config: &'a mut AgentConfig, form: &'a mut FormState, theme: &'a Theme) -> Self {
        Self {
            config,
            form,
            theme,
        }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.label(
                    RichText::new("Agent Configuration")
                        .size(16.0)
                        .strong()
                        .color(self.theme.text_primary),
                );
                ui.add_space(self.theme.spacing_sm);

                self.show_system_prompt(ui);
                ui.add_space(self.theme.spacing_sm);

                egui::Grid::new("config_numeric_fields")
                    .num_columns(2)
                    .spacing([self.theme.spacing, self.theme.spacing_sm])
                    .show(ui, |ui| {
                        for field in ConfigField::ALL {
                            self.show_numeric_field(ui, field);
                            ui.end_row();
                        }

                        self.field_label(ui, "TTS Voice");
                        let response = ui.add(
                            TextEdit::singleline(&mut self.config.tts.voice)
                                .desired_width(280.0)
                                .id(Id::new("config_tts_voice")),
                        );
                        response.widget_info(|| {
                            WidgetInfo::labeled(WidgetType::TextEdit, true, "TTS Voice")
                        });
                        ui.end_row();
                    });
            });
    }

    fn show_system_prompt(&mut self, ui: &mut egui::Ui) {
        self.field_label(ui, "System Prompt");
        let response = ui.add(
            TextEdit::multiline(&mut self.config.llm.system_prompt)
                .desired_rows(4)
                .desired_width(f32::INFINITY)
                .id(Id::new("config_system_prompt")),
        );
        response.widget_info(|| WidgetInfo::labeled(WidgetType::TextEdit, true, "System Prompt"));
    }

    fn show_numeric_field(&mut self, ui: &mut egui::Ui, field: ConfigField) {
        self.field_label(ui, field.label());

        let range = field.range();
        let mut text = self.form.text(field, self.config);
        let response = ui.add(
            TextEdit::singleline(&mut text)
                .desired_width(120.0)
                .id(Id::new(("config_field", field))),
        );
        response.widget_info(|| WidgetInfo::labeled(WidgetType::TextEdit, true, field.label()));

        if response.changed() {
            self.form.edit(field, self.config, text);
        }
        if response.lost_focus() {
            self.form.finish(field);
        }

        response.on_hover_text(format!(
            "{} to {}, step {}",
            range.min, range.max, range.step
        ));
    }

    fn field_label(&self, ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(text).color(self.theme.text_secondary));
    }
}
