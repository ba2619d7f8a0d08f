//! Agent configuration edited in the console form
//!
//! The whole structure is sent verbatim as the body of the session-creation
//! request. Numeric fields only ever change through [`ConfigField::apply`],
//! which parses the raw input and clamps it into range, so a stored value is
//! always finite and in bounds.

use serde::{Deserialize, Serialize};

/// Default system prompt for the agent
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a QA bot working at Zepliner. Zepliner is an e-SIM company and sells e-SIMs through the Zepliner mobile app.";

/// Default Cartesia voice id
pub const DEFAULT_VOICE: &str = "e00d0e4c-a5c8-443f-a8a3-473eb9a62355";

/// Clamp `value` into `[min, max]`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    min.max(value).min(max)
}

/// Parse raw form input as a number, keeping `fallback` when it is not a
/// finite number.
pub fn parse_number(input: &str, fallback: f64) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => fallback,
    }
}

/// LLM parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub system_prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: 0.7,
            max_tokens: 512,
        }
    }
}

/// Speech-to-text parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SttSettings {
    pub temperature: f64,
}

/// Text-to-speech parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsSettings {
    pub voice: String,
    pub speed: f64,
    pub temperature: f64,
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            speed: 1.0,
            temperature: 0.3,
        }
    }
}

/// Complete agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub llm: LlmSettings,
    pub stt: SttSettings,
    pub tts: TtsSettings,
    pub interruptibility_pct: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            llm: LlmSettings::default(),
            stt: SttSettings::default(),
            tts: TtsSettings::default(),
            interruptibility_pct: 100,
        }
    }
}

impl AgentConfig {
    /// Return a copy with every numeric field forced into range.
    ///
    /// Used for configs that did not come through the form (settings files).
    pub fn clamped(mut self) -> Self {
        for field in ConfigField::ALL {
            let value = field.value(&self);
            let fallback = if value.is_finite() {
                value
            } else {
                field.value(&AgentConfig::default())
            };
            field.store(&mut self, fallback);
        }
        self
    }

    /// Set the system prompt (free text, no validation)
    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.llm.system_prompt = prompt.into();
    }

    /// Set the TTS voice id (free text, no validation)
    pub fn set_voice(&mut self, voice: impl Into<String>) {
        self.tts.voice = voice.into();
    }
}

/// Inclusive range of a numeric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// Numeric fields of [`AgentConfig`] that the form edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    LlmTemperature,
    LlmMaxTokens,
    SttTemperature,
    InterruptibilityPct,
    TtsSpeed,
    TtsTemperature,
}

impl ConfigField {
    /// Form order
    pub const ALL: [ConfigField; 6] = [
        ConfigField::LlmTemperature,
        ConfigField::LlmMaxTokens,
        ConfigField::SttTemperature,
        ConfigField::InterruptibilityPct,
        ConfigField::TtsSpeed,
        ConfigField::TtsTemperature,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConfigField::LlmTemperature => "LLM Temperature",
            ConfigField::LlmMaxTokens => "LLM Max Tokens",
            ConfigField::SttTemperature => "STT Temperature",
            ConfigField::InterruptibilityPct => "Interruptibility %",
            ConfigField::TtsSpeed => "TTS Speed",
            ConfigField::TtsTemperature => "TTS Temperature",
        }
    }

    pub fn range(&self) -> FieldRange {
        match self {
            ConfigField::LlmTemperature => FieldRange { min: 0.0, max: 2.0, step: 0.1 },
            ConfigField::LlmMaxTokens => FieldRange { min: 1.0, max: 4096.0, step: 1.0 },
            ConfigField::SttTemperature => FieldRange { min: 0.0, max: 1.0, step: 0.1 },
            ConfigField::InterruptibilityPct => FieldRange { min: 0.0, max: 100.0, step: 1.0 },
            ConfigField::TtsSpeed => FieldRange { min: 0.5, max: 2.0, step: 0.1 },
            ConfigField::TtsTemperature => FieldRange { min: 0.0, max: 1.0, step: 0.1 },
        }
    }

    /// Whether the field stores a whole number
    pub fn is_integer(&self) -> bool {
        matches!(self, ConfigField::LlmMaxTokens | ConfigField::InterruptibilityPct)
    }

    /// Current value as a float
    pub fn value(&self, config: &AgentConfig) -> f64 {
        match self {
            ConfigField::LlmTemperature => config.llm.temperature,
            ConfigField::LlmMaxTokens => config.llm.max_tokens as f64,
            ConfigField::SttTemperature => config.stt.temperature,
            ConfigField::InterruptibilityPct => config.interruptibility_pct as f64,
            ConfigField::TtsSpeed => config.tts.speed,
            ConfigField::TtsTemperature => config.tts.temperature,
        }
    }

    /// Text shown in the form for the current value
    pub fn display(&self, config: &AgentConfig) -> String {
        format!("{}", self.value(config))
    }

    /// Apply raw form input: parse, fall back to the current value on
    /// garbage, clamp into range.
    pub fn apply(&self, config: &mut AgentConfig, input: &str) {
        let parsed = parse_number(input, self.value(config));
        self.store(config, parsed);
    }

    fn store(&self, config: &mut AgentConfig, value: f64) {
        let range = self.range();
        let mut value = clamp(value, range.min, range.max);
        if self.is_integer() {
            // Rounding can't leave the range: both bounds are whole numbers.
            value = value.round();
        }
        match self {
            ConfigField::LlmTemperature => config.llm.temperature = value,
            ConfigField::LlmMaxTokens => config.llm.max_tokens = value as u32,
            ConfigField::SttTemperature => config.stt.temperature = value,
            ConfigField::InterruptibilityPct => config.interruptibility_pct = value as u32,
            ConfigField::TtsSpeed => config.tts.speed = value,
            ConfigField::TtsTemperature => config.tts.temperature = value,
        }
    }
}
