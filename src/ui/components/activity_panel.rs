//! Recent session events

use crate::state::ActivityLog;
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub struct ActivityPanel<'a> {
    log: &'a ActivityLog,
    theme: &'a Theme,
}

impl<'a> ActivityPanel<'a> {
    pub fn new(log: &'a ActivityLog, theme: &'a Theme) -> Self {
        Self { log, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new(
            RichText::new(format!("Activity ({})", self.log.len()))
                .strong()
                .color(self.theme.text_primary),
        )
        .id_salt("activity_header")
        .default_open(true)
        .show(ui, |ui| {
            if self.log.is_empty() {
                ui.label(RichText::new("No activity yet").color(self.theme.text_muted));
                return;
            }

            egui::ScrollArea::vertical()
                .id_salt("activity_log")
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for entry in self.log.iter() {
                        ui.label(
                            RichText::new(entry.to_string())
                                .size(11.0)
                                .family(egui::FontFamily::Monospace)
                                .color(self.theme.text_secondary),
                        );
                    }
                });
        });
    }
}
