//! Agent configuration and console settings

pub mod agent;
pub mod settings;

pub use agent::{
    clamp, parse_number, AgentConfig, ConfigField, FieldRange, LlmSettings, SttSettings,
    TtsSettings,
};
pub use settings::ConsoleSettings;
