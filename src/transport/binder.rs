//! Binds one real-time client to the active session
//!
//! The binder is a single resource slot. `acquire` fills it only when it is
//! empty, `release` empties it and is safe to call any number of times. The
//! UI loop calls [`TransportBinder::sync`] every frame with the current
//! session credentials and [`TransportBinder::pump`] to drain client events.

use super::{
    ConnectParams, RealtimeTransport, TrackKind, TransportEvent, TransportFactory,
    TransportOptions, TransportState,
};
use crate::audio::AudioSink;
use crate::state::SharedConsoleState;
use crate::Result;
use crossbeam_channel::{unbounded, Receiver};
use tracing::{debug, info, warn};
use uuid::Uuid;

struct Binding {
    id: Uuid,
    params: ConnectParams,
    client: Box<dyn RealtimeTransport>,
    events: Receiver<TransportEvent>,
    /// Remote audio track forwarded to the sink for this binding
    audio_track: Option<String>,
}

/// Owner of the single live real-time client
pub struct TransportBinder {
    factory: Box<dyn TransportFactory>,
    options: TransportOptions,
    sink: Box<dyn AudioSink>,
    slot: Option<Binding>,
    /// Credentials whose connect call failed; not retried until they change
    failed: Option<ConnectParams>,
    state: Option<TransportState>,
    audio_status: Option<String>,
}

impl TransportBinder {
    pub fn new(factory: Box<dyn TransportFactory>, sink: Box<dyn AudioSink>) -> Self {
        Self {
            factory,
            options: TransportOptions::audio_only(),
            sink,
            slot: None,
            failed: None,
            state: None,
            audio_status: None,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.slot.is_some()
    }

    /// Connection phase text for display; "idle" before any binding
    pub fn display_state(&self) -> String {
        self.state
            .map(|s| s.to_string())
            .unwrap_or_else(|| "idle".to_string())
    }

    pub fn audio_status(&self) -> String {
        self.audio_status
            .clone()
            .unwrap_or_else(|| self.sink.describe())
    }

    /// Create and connect a client if the slot is empty.
    ///
    /// Returns `Ok(false)` when a client already exists.
    pub fn acquire(&mut self, params: ConnectParams) -> Result<bool> {
        if self.slot.is_some() {
            debug!("[TRANSPORT] Client already bound, not acquiring");
            return Ok(false);
        }

        let (tx, rx) = unbounded();
        let mut client = self.factory.create(&self.options);
        let id = Uuid::new_v4();
        info!("[TRANSPORT] Binding {} connecting to {}", id, params.url);

        if let Err(e) = client.connect(&params, tx) {
            warn!("[TRANSPORT] Binding {} failed to connect: {}", id, e);
            if let Err(e) = client.disconnect() {
                debug!("[TRANSPORT] Cleanup after failed connect: {}", e);
            }
            self.state = Some(TransportState::Error);
            self.audio_status = Some(e.user_message());
            return Err(e);
        }

        self.slot = Some(Binding {
            id,
            params,
            client,
            events: rx,
            audio_track: None,
        });
        self.audio_status = None;
        Ok(true)
    }

    /// Disconnect and empty the slot. Returns whether a client was released.
    pub fn release(&mut self) -> bool {
        let Some(mut binding) = self.slot.take() else {
            return false;
        };

        if let Err(e) = binding.client.disconnect() {
            warn!("[TRANSPORT] Binding {} disconnect failed: {}", binding.id, e);
        }
        if binding.audio_track.is_some() {
            self.sink.detach();
        }
        self.state = Some(TransportState::Disconnected);
        self.audio_status = None;
        info!("[TRANSPORT] Binding {} released", binding.id);
        true
    }

    /// Make the slot match the session credentials.
    ///
    /// No credentials releases the client; new credentials replace it.
    pub fn sync(&mut self, credentials: Option<(&str, &str)>) {
        let Some((url, token)) = credentials else {
            self.release();
            self.failed = None;
            return;
        };

        let params = ConnectParams {
            url: url.to_string(),
            token: token.to_string(),
        };

        if let Some(binding) = &self.slot {
            if binding.params == params {
                return;
            }
            self.release();
        }

        if self.failed.as_ref() == Some(&params) {
            return;
        }
        self.failed = None;

        if self.acquire(params.clone()).is_err() {
            self.failed = Some(params);
        }
    }

    /// Drain pending client events. Returns true if anything changed.
    pub fn pump(&mut self) -> bool {
        let Some(binding) = self.slot.as_mut() else {
            return false;
        };

        let mut changed = false;
        let events: Vec<TransportEvent> = binding.events.try_iter().collect();
        for event in events {
            changed = true;
            match event {
                TransportEvent::StateChanged(state) => {
                    debug!("[TRANSPORT] Binding {} is {}", binding.id, state);
                    self.state = Some(state);
                }
                TransportEvent::TrackStarted { track, participant } => {
                    if participant.local || track.kind != TrackKind::Audio {
                        continue;
                    }
                    if let Some(current) = &binding.audio_track {
                        debug!(
                            "[TRANSPORT] Ignoring remote track {}, already playing {}",
                            track.id, current
                        );
                        continue;
                    }

                    let track_id = track.id.clone();
                    match self.sink.attach(track) {
                        Ok(()) => {
                            info!(
                                "[TRANSPORT] Forwarding track {} from {}",
                                track_id, participant.id
                            );
                            binding.audio_track = Some(track_id);
                            self.audio_status = None;
                        }
                        Err(e) => {
                            warn!("[AUDIO] Could not play track {}: {}", track_id, e);
                            self.audio_status = Some(e.user_message());
                        }
                    }
                }
            }
        }
        changed
    }

    /// Follow the session held in `shared`: bind or release the client,
    /// drain its events and mirror the connection status back.
    ///
    /// Called once per UI frame. When a poll clears the session (expiry or
    /// reset) the next call tears the client down.
    pub fn follow_session(&mut self, shared: &SharedConsoleState) {
        let credentials = shared
            .read()
            .session
            .credentials()
            .map(|(url, token)| (url.to_string(), token.to_string()));

        self.sync(credentials.as_ref().map(|(url, token)| (url.as_str(), token.as_str())));
        self.pump();

        let transport_state = self.display_state();
        let audio_status = self.audio_status();

        let mut state = shared.write();
        if state.transport_state != transport_state {
            state.log(format!("Transport {}", transport_state));
            state.transport_state = transport_state;
        }
        state.audio_status = Some(audio_status);
    }
}

impl Drop for TransportBinder {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{PollOutcome, SessionInfo};
    use crate::session::PollControl;
    use crate::transport::{MediaTrack, Participant};
    use crate::ConsoleError;
    use crossbeam_channel::{bounded, Sender};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Log {
        created: usize,
        connects: Vec<ConnectParams>,
        disconnects: usize,
        senders: Vec<Sender<TransportEvent>>,
        attached: Vec<String>,
        detaches: usize,
    }

    struct FakeClient {
        log: Arc<Mutex<Log>>,
        fail_connect: bool,
        fail_disconnect: bool,
    }

    impl RealtimeTransport for FakeClient {
        fn connect(&mut self, params: &ConnectParams, events: Sender<TransportEvent>) -> Result<()> {
            if self.fail_connect {
                return Err(ConsoleError::Transport("refused".into()));
            }
            let mut log = self.log.lock();
            log.connects.push(params.clone());
            log.senders.push(events);
            Ok(())
        }

        fn disconnect(&mut self) -> Result<()> {
            self.log.lock().disconnects += 1;
            if self.fail_disconnect {
                return Err(ConsoleError::Transport("already gone".into()));
            }
            Ok(())
        }
    }

    struct FakeSink {
        log: Arc<Mutex<Log>>,
    }

    impl AudioSink for FakeSink {
        fn attach(&mut self, track: MediaTrack) -> Result<()> {
            self.log.lock().attached.push(track.id);
            Ok(())
        }

        fn detach(&mut self) {
            self.log.lock().detaches += 1;
        }

        fn describe(&self) -> String {
            "fake".to_string()
        }
    }

    fn binder(fail_connect: bool, fail_disconnect: bool) -> (TransportBinder, Arc<Mutex<Log>>) {
        let log = Arc::new(Mutex::new(Log::default()));
        let factory_log = Arc::clone(&log);
        let factory = move |options: &TransportOptions| -> Box<dyn RealtimeTransport> {
            assert_eq!(*options, TransportOptions::audio_only());
            factory_log.lock().created += 1;
            Box::new(FakeClient {
                log: Arc::clone(&factory_log),
                fail_connect,
                fail_disconnect,
            })
        };
        let sink = FakeSink {
            log: Arc::clone(&log),
        };
        (TransportBinder::new(Box::new(factory), Box::new(sink)), log)
    }

    fn track(id: &str, kind: TrackKind) -> MediaTrack {
        let (_tx, rx) = bounded(1);
        MediaTrack {
            id: id.to_string(),
            kind,
            sample_rate: 16000,
            frames: rx,
        }
    }

    fn participant(local: bool) -> Participant {
        Participant {
            id: if local { "me" } else { "bot" }.to_string(),
            local,
        }
    }

    fn send(log: &Arc<Mutex<Log>>, event: TransportEvent) {
        log.lock().senders.last().unwrap().send(event).unwrap();
    }

    #[test]
    fn test_sync_binds_once_for_same_credentials() {
        let (mut binder, log) = binder(false, false);

        for _ in 0..5 {
            binder.sync(Some(("room", "tok")));
        }

        assert!(binder.is_bound());
        assert_eq!(log.lock().created, 1);
        assert_eq!(
            log.lock().connects,
            vec![ConnectParams {
                url: "room".into(),
                token: "tok".into()
            }]
        );
    }

    #[test]
    fn test_acquire_refuses_second_client() {
        let (mut binder, log) = binder(false, false);
        let params = ConnectParams {
            url: "room".into(),
            token: "tok".into(),
        };
        assert!(binder.acquire(params.clone()).unwrap());
        assert!(!binder.acquire(params).unwrap());
        assert_eq!(log.lock().created, 1);
    }

    #[test]
    fn test_cleared_credentials_release_client() {
        let (mut binder, log) = binder(false, false);
        binder.sync(Some(("room", "tok")));
        binder.sync(None);

        assert!(!binder.is_bound());
        assert_eq!(log.lock().disconnects, 1);
        assert_eq!(binder.display_state(), "disconnected");

        // A later session binds fresh.
        binder.sync(Some(("room2", "tok2")));
        assert!(binder.is_bound());
        assert_eq!(log.lock().created, 2);
    }

    #[test]
    fn test_release_is_idempotent_and_swallows_disconnect_errors() {
        let (mut binder, log) = binder(false, true);
        binder.sync(Some(("room", "tok")));

        assert!(binder.release());
        assert!(!binder.release());
        assert!(!binder.release());
        assert_eq!(log.lock().disconnects, 1);
    }

    #[test]
    fn test_new_credentials_rebind() {
        let (mut binder, log) = binder(false, false);
        binder.sync(Some(("room", "tok")));
        binder.sync(Some(("room2", "tok2")));

        assert_eq!(log.lock().created, 2);
        assert_eq!(log.lock().disconnects, 1);
        assert!(binder.is_bound());
        assert_eq!(log.lock().connects.last().unwrap().url, "room2");
    }

    #[test]
    fn test_failed_connect_is_not_retried_every_frame() {
        let (mut binder, log) = binder(true, false);
        binder.sync(Some(("room", "tok")));
        binder.sync(Some(("room", "tok")));

        assert!(!binder.is_bound());
        assert_eq!(log.lock().created, 1);
        assert_eq!(binder.display_state(), "error");

        binder.sync(Some(("room2", "tok2")));
        assert_eq!(log.lock().created, 2);
    }

    #[test]
    fn test_state_changes_are_mirrored() {
        let (mut binder, log) = binder(false, false);
        assert_eq!(binder.display_state(), "idle");
        binder.sync(Some(("room", "tok")));

        send(&log, TransportEvent::StateChanged(TransportState::Connecting));
        send(&log, TransportEvent::StateChanged(TransportState::Ready));

        assert!(binder.pump());
        assert_eq!(binder.display_state(), "ready");
        assert!(!binder.pump());
    }

    #[test]
    fn test_only_first_remote_audio_track_is_forwarded() {
        let (mut binder, log) = binder(false, false);
        binder.sync(Some(("room", "tok")));

        send(
            &log,
            TransportEvent::TrackStarted {
                track: track("mic", TrackKind::Audio),
                participant: participant(true),
            },
        );
        send(
            &log,
            TransportEvent::TrackStarted {
                track: track("cam", TrackKind::Video),
                participant: participant(false),
            },
        );
        send(
            &log,
            TransportEvent::TrackStarted {
                track: track("bot-audio", TrackKind::Audio),
                participant: participant(false),
            },
        );
        send(
            &log,
            TransportEvent::TrackStarted {
                track: track("bot-audio-2", TrackKind::Audio),
                participant: participant(false),
            },
        );
        binder.pump();

        assert_eq!(log.lock().attached, vec!["bot-audio".to_string()]);

        binder.sync(None);
        assert_eq!(log.lock().detaches, 1);
    }

    #[test]
    fn test_drop_disconnects() {
        let (mut binder, log) = binder(false, false);
        binder.sync(Some(("room", "tok")));
        drop(binder);
        assert_eq!(log.lock().disconnects, 1);
    }

    #[test]
    fn test_follow_session_tears_down_on_expiry() {
        let (mut binder, log) = binder(false, false);
        let shared = SharedConsoleState::default();

        binder.follow_session(&shared);
        assert!(!binder.is_bound());
        assert_eq!(shared.read().transport_state, "idle");

        {
            let mut state = shared.write();
            let attempt = state.session.begin_create().unwrap();
            state.session.apply_created(
                attempt,
                SessionInfo {
                    session_id: "s1".into(),
                    room_url: "room".into(),
                    token: "tok".into(),
                },
            );
        }
        binder.follow_session(&shared);
        send(&log, TransportEvent::StateChanged(TransportState::Ready));
        binder.follow_session(&shared);

        assert!(binder.is_bound());
        assert_eq!(log.lock().created, 1);
        assert_eq!(shared.read().transport_state, "ready");

        let control = shared
            .write()
            .session
            .apply_poll("s1", Ok(PollOutcome::Expired));
        assert_eq!(control, PollControl::Stop);

        binder.follow_session(&shared);
        assert!(!binder.is_bound());
        assert_eq!(log.lock().disconnects, 1);
        assert_eq!(shared.read().transport_state, "disconnected");
        assert_eq!(shared.read().audio_status.as_deref(), Some("fake"));
        assert_eq!(
            shared.read().activity.last().map(|e| e.message.as_str()),
            Some("Transport disconnected")
        );
    }
}
