//! Real-time transport seam
//!
//! The media connection (signaling, WebRTC, codecs) belongs to an external
//! client SDK. This module fixes the interface the console needs from it:
//! connect with a room URL and token, disconnect, and a stream of
//! [`TransportEvent`]s. [`TransportBinder`] owns the one live client.

mod binder;
mod offline;

pub use binder::TransportBinder;
pub use offline::OfflineTransport;

use crate::Result;
use crossbeam_channel::{Receiver, Sender};
use std::fmt;

/// Connection phase reported by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Disconnected,
    Initializing,
    Initialized,
    Authenticating,
    Authenticated,
    Connecting,
    Connected,
    Ready,
    Disconnecting,
    Error,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportState::Disconnected => "disconnected",
            TransportState::Initializing => "initializing",
            TransportState::Initialized => "initialized",
            TransportState::Authenticating => "authenticating",
            TransportState::Authenticated => "authenticated",
            TransportState::Connecting => "connecting",
            TransportState::Connected => "connected",
            TransportState::Ready => "ready",
            TransportState::Disconnecting => "disconnecting",
            TransportState::Error => "error",
        };
        f.write_str(s)
    }
}

/// Client options for a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    pub enable_mic: bool,
    pub enable_cam: bool,
    /// Hold local audio until the remote bot reports ready
    pub buffer_local_audio_until_bot_ready: bool,
}

impl TransportOptions {
    /// Microphone on, camera off, local audio buffered until the bot is ready
    pub fn audio_only() -> Self {
        Self {
            enable_mic: true,
            enable_cam: false,
            buffer_local_audio_until_bot_ready: true,
        }
    }
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self::audio_only()
    }
}

/// Where to connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParams {
    pub url: String,
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

/// Participant a track belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: String,
    pub local: bool,
}

/// A started media track. Audio frames are mono f32 PCM.
#[derive(Debug, Clone)]
pub struct MediaTrack {
    pub id: String,
    pub kind: TrackKind,
    pub sample_rate: u32,
    pub frames: Receiver<Vec<f32>>,
}

/// Notifications from a connected client
#[derive(Debug, Clone)]
pub enum TransportEvent {
    TrackStarted {
        track: MediaTrack,
        participant: Participant,
    },
    StateChanged(TransportState),
}

/// One real-time client instance
pub trait RealtimeTransport {
    /// Begin connecting. Events are delivered on `events` until disconnect.
    fn connect(&mut self, params: &ConnectParams, events: Sender<TransportEvent>) -> Result<()>;

    /// Tear the connection down. Must tolerate being called when already
    /// disconnected.
    fn disconnect(&mut self) -> Result<()>;
}

/// Builds a fresh client for each binding
pub trait TransportFactory {
    fn create(&self, options: &TransportOptions) -> Box<dyn RealtimeTransport>;
}

impl<F> TransportFactory for F
where
    F: Fn(&TransportOptions) -> Box<dyn RealtimeTransport>,
{
    fn create(&self, options: &TransportOptions) -> Box<dyn RealtimeTransport> {
        self(options)
    }
}
