//! Session lifecycle: state machine and async driver

pub mod controller;
pub mod lifecycle;

pub use controller::SessionController;
pub use lifecycle::{
    CreateAttempt, LifecyclePhase, PollControl, SessionLifecycle, CREATE_FAILED_MESSAGE,
    SESSION_EXPIRED_MESSAGE,
};
