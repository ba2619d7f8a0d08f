//! Theme and styling for the console UI

use crate::ui::view::DotStyle;
use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    /// Primary accent color
    pub primary: Color32,
    /// Success color (green)
    pub success: Color32,
    /// Warning color (yellow/orange)
    pub warning: Color32,
    /// Error color (red)
    pub error: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    /// Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// Status dot colors
    pub dot_idle: Color32,
    pub dot_listening: Color32,
    pub dot_thinking: Color32,
    pub dot_speaking: Color32,

    /// Border radius for buttons
    pub button_rounding: Rounding,
    /// Border radius for cards/panels
    pub card_rounding: Rounding,

    /// Standard spacing
    pub spacing: f32,
    /// Large spacing
    pub spacing_lg: f32,
    /// Small spacing
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(99, 102, 241), // Indigo
            success: Color32::from_rgb(34, 197, 94),  // Green
            warning: Color32::from_rgb(234, 179, 8),  // Yellow
            error: Color32::from_rgb(239, 68, 68),    // Red

            bg_primary: Color32::from_rgb(17, 24, 39),
            bg_secondary: Color32::from_rgb(31, 41, 55),
            bg_tertiary: Color32::from_rgb(55, 65, 81),

            text_primary: Color32::from_rgb(249, 250, 251),
            text_secondary: Color32::from_rgb(209, 213, 219),
            text_muted: Color32::from_rgb(156, 163, 175),

            dot_idle: Color32::from_rgb(107, 114, 128),
            dot_listening: Color32::from_rgb(34, 197, 94),
            dot_thinking: Color32::from_rgb(234, 179, 8),
            dot_speaking: Color32::from_rgb(59, 130, 246),

            button_rounding: Rounding::same(8.0),
            card_rounding: Rounding::same(12.0),

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,
        }
    }

    /// Fill color for a status dot
    pub fn dot_color(&self, style: DotStyle) -> Color32 {
        match style {
            DotStyle::Default => self.dot_idle,
            DotStyle::Listening => self.dot_listening,
            DotStyle::Thinking => self.dot_thinking,
            DotStyle::Speaking => self.dot_speaking,
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_tertiary;

        visuals.widgets.noninteractive.bg_fill = self.bg_secondary;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_muted);

        visuals.widgets.inactive.bg_fill = self.bg_tertiary;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.hovered.bg_fill = self.primary.gamma_multiply(0.8);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.active.bg_fill = self.primary;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.selection.bg_fill = self.primary.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.primary);

        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.bg_tertiary);

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm / 2.0);

        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(20.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            FontId::new(12.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
    }
}
