//! Bot state panel: status dot, state name, latency and bot error

use crate::ui::theme::Theme;
use crate::ui::view::{DotStyle, StatusView};
use egui::{self, RichText, Sense, Vec2, WidgetInfo, WidgetType};

const DOT_RADIUS: f32 = 6.0;

pub struct StatusPanel<'a> {
    view: &'a StatusView,
    theme: &'a Theme,
}

impl<'a> StatusPanel<'a> {
    pub fn new(view: &'a StatusView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    self.paint_dot(ui);

                    let state = self.view.state.as_str();
                    let response = ui.label(
                        RichText::new(state)
                            .size(16.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    response.widget_info(|| {
                        WidgetInfo::labeled(WidgetType::Label, true, format!("Bot state: {}", state))
                    });
                });

                let latency = ui.label(
                    RichText::new(&self.view.latency_text).color(self.theme.text_secondary),
                );
                latency.widget_info(|| {
                    WidgetInfo::labeled(WidgetType::Label, true, &self.view.latency_text)
                });

                if let Some(error) = &self.view.error_text {
                    let response = ui.label(RichText::new(error).color(self.theme.error));
                    response.widget_info(|| WidgetInfo::labeled(WidgetType::Label, true, error));
                }
            });
    }

    fn paint_dot(&self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(DOT_RADIUS * 2.0), Sense::hover());
        if ui.is_rect_visible(rect) {
            ui.painter()
                .circle_filled(rect.center(), DOT_RADIUS, self.theme.dot_color(self.view.dot));
        }

        let dot = match self.view.dot {
            DotStyle::Default => "default",
            DotStyle::Listening => "listening",
            DotStyle::Thinking => "thinking",
            DotStyle::Speaking => "speaking",
        };
        response.widget_info(|| {
            WidgetInfo::labeled(WidgetType::Other, true, format!("Status dot: {}", dot))
        });
    }
}
