//! UI-local state
//!
//! Anything shared with the session tasks lives in
//! [`ConsoleState`](crate::state::ConsoleState). This module only holds what
//! the widgets need between frames.

use crate::config::{AgentConfig, ConfigField};
use std::collections::HashMap;

/// Something the user asked for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    StartSession,
    ResetSession,
    CheckBackend,
}

/// Raw text of numeric fields while they are being edited
///
/// A field holds a draft only while it has focus, so partial input such as
/// `"0."` stays on screen. The parsed value is committed to the config on
/// every change; the draft is dropped when focus leaves and the field falls
/// back to showing the committed value.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    drafts: HashMap<ConfigField, String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text to show for `field`
    pub fn text(&self, field: ConfigField, config: &AgentConfig) -> String {
        self.drafts
            .get(&field)
            .cloned()
            .unwrap_or_else(|| field.display(config))
    }

    /// Record an edit and commit whatever it parses to
    pub fn edit(&mut self, field: ConfigField, config: &mut AgentConfig, text: String) {
        field.apply(config, &text);
        self.drafts.insert(field, text);
    }

    /// Drop the draft for `field`
    pub fn finish(&mut self, field: ConfigField) {
        self.drafts.remove(&field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_keeps_value_but_shows_draft() {
        let mut form = FormState::new();
        let mut config = AgentConfig::default();

        form.edit(ConfigField::LlmTemperature, &mut config, "abc".into());
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(form.text(ConfigField::LlmTemperature, &config), "abc");

        form.finish(ConfigField::LlmTemperature);
        assert_eq!(form.text(ConfigField::LlmTemperature, &config), "0.7");
    }

    #[test]
    fn test_edit_commits_clamped_value() {
        let mut form = FormState::new();
        let mut config = AgentConfig::default();

        form.edit(ConfigField::LlmTemperature, &mut config, "5".into());
        assert_eq!(config.llm.temperature, 2.0);
        assert_eq!(form.text(ConfigField::LlmTemperature, &config), "5");

        form.edit(ConfigField::LlmMaxTokens, &mut config, "0".into());
        assert_eq!(config.llm.max_tokens, 1);
    }
}
