//! Transport used when no media SDK is linked in
//!
//! Accepts the connect call so the session lifecycle runs end to end, reports
//! the connection as down and never produces tracks.
//!
//! A client backed by a real room SDK implements [`RealtimeTransport`] and
//! replaces this one in the factory closure handed to
//! [`TransportBinder::new`](super::TransportBinder::new) in `main`. It emits
//! [`TransportEvent::StateChanged`] as the room connection moves and
//! [`TransportEvent::TrackStarted`] with PCM frames for the agent's audio;
//! the binder routes that track to the audio sink.

use super::{ConnectParams, RealtimeTransport, TransportEvent, TransportOptions, TransportState};
use crate::Result;
use crossbeam_channel::Sender;
use tracing::{debug, warn};

pub struct OfflineTransport {
    options: TransportOptions,
    events: Option<Sender<TransportEvent>>,
}

impl OfflineTransport {
    pub fn new(options: &TransportOptions) -> Self {
        Self {
            options: *options,
            events: None,
        }
    }

    fn emit(&self, state: TransportState) {
        if let Some(tx) = &self.events {
            let _ = tx.send(TransportEvent::StateChanged(state));
        }
    }
}

impl RealtimeTransport for OfflineTransport {
    fn connect(&mut self, params: &ConnectParams, events: Sender<TransportEvent>) -> Result<()> {
        warn!(
            "[TRANSPORT] No media transport available, not joining {} (mic: {}, cam: {})",
            params.url, self.options.enable_mic, self.options.enable_cam
        );
        self.events = Some(events);
        self.emit(TransportState::Initializing);
        self.emit(TransportState::Disconnected);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        if self.events.take().is_some() {
            debug!("[TRANSPORT] Offline transport released");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_reports_disconnected_and_tolerates_double_disconnect() {
        let (tx, rx) = unbounded();
        let mut transport = OfflineTransport::new(&TransportOptions::audio_only());
        transport
            .connect(
                &ConnectParams {
                    url: "room".into(),
                    token: "tok".into(),
                },
                tx,
            )
            .unwrap();

        let states: Vec<_> = rx
            .try_iter()
            .filter_map(|e| match e {
                TransportEvent::StateChanged(s) => Some(s),
                _ => None,
            })
            .collect();
        assert_eq!(
            states,
            vec![TransportState::Initializing, TransportState::Disconnected]
        );

        assert!(transport.disconnect().is_ok());
        assert!(transport.disconnect().is_ok());
    }
}
