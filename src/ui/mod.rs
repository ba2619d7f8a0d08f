//! UI components and application module
//!
//! This module provides the egui/eframe-based console.

mod app;
pub mod components;
mod console;
mod state;
mod theme;
pub mod view;

pub use app::ConsoleApp;
pub use console::ConsoleView;
pub use state::{FormState, UiAction};
pub use theme::Theme;
pub use view::{DotStyle, StatusView};
