//! Remote audio playback
//!
//! The transport binder hands the agent's audio track to an [`AudioSink`].
//! With the `audio-io` feature the default sink plays through the system
//! output device; otherwise frames are dropped.

#[cfg(feature = "audio-io")]
pub mod output;
#[cfg(feature = "audio-io")]
pub mod resampler;

#[cfg(feature = "audio-io")]
pub use output::CpalAudioSink;
#[cfg(feature = "audio-io")]
pub use resampler::StreamResampler;

use crate::transport::MediaTrack;
use crate::Result;
use tracing::{info, warn};

/// Consumer of the remote agent's audio
pub trait AudioSink {
    /// Start playing `track`, replacing whatever was attached before
    fn attach(&mut self, track: MediaTrack) -> Result<()>;

    /// Stop playback. No-op when nothing is attached.
    fn detach(&mut self);

    /// Short description for the voice panel
    fn describe(&self) -> String;
}

/// Sink that ignores audio
#[derive(Debug, Default)]
pub struct NullAudioSink {
    attached: Option<String>,
}

impl AudioSink for NullAudioSink {
    fn attach(&mut self, track: MediaTrack) -> Result<()> {
        self.attached = Some(track.id);
        Ok(())
    }

    fn detach(&mut self) {
        self.attached = None;
    }

    fn describe(&self) -> String {
        match &self.attached {
            Some(id) => format!("Audio output disabled (track {})", id),
            None => "Audio output disabled".to_string(),
        }
    }
}

/// Build the sink selected by settings, falling back to [`NullAudioSink`]
/// when no output device can be opened.
pub fn default_sink(enabled: bool) -> Box<dyn AudioSink> {
    if !enabled {
        info!("[AUDIO] Audio output disabled by settings");
        return Box::new(NullAudioSink::default());
    }

    #[cfg(feature = "audio-io")]
    {
        match CpalAudioSink::new() {
            Ok(sink) => return Box::new(sink),
            Err(e) => warn!("[AUDIO] Failed to open output device: {}", e),
        }
    }

    #[cfg(not(feature = "audio-io"))]
    warn!("[AUDIO] Built without audio-io, remote audio will not play");

    Box::new(NullAudioSink::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TrackKind;
    use crossbeam_channel::bounded;

    #[test]
    fn test_null_sink_tracks_attachment() {
        let (_tx, rx) = bounded(1);
        let mut sink = NullAudioSink::default();
        sink.attach(MediaTrack {
            id: "bot-audio".into(),
            kind: TrackKind::Audio,
            sample_rate: 16000,
            frames: rx,
        })
        .unwrap();
        assert!(sink.describe().contains("bot-audio"));
        sink.detach();
        sink.detach();
        assert_eq!(sink.describe(), "Audio output disabled");
    }
}
