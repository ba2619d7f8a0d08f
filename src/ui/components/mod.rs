//! UI components module
//!
//! Each component borrows the state it renders and reports user intent back
//! as a [`UiAction`](crate::ui::UiAction) instead of calling into the
//! session controller itself.

pub mod activity_panel;
pub mod config_form;
pub mod session_controls;
pub mod status_panel;
pub mod voice_panel;

pub use activity_panel::ActivityPanel;
pub use config_form::ConfigForm;
pub use session_controls::SessionControls;
pub use status_panel::StatusPanel;
pub use voice_panel::VoicePanel;
