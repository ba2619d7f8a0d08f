use super::{AudioSink, StreamResampler};
use crate::transport::MediaTrack;
use crate::{ConsoleError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Playback buffer cap, in seconds of device audio
const MAX_BUFFERED_SECONDS: usize = 2;

struct Playback {
    track_id: String,
    stream: Stream,
    stop: Arc<AtomicBool>,
    feeder: Option<JoinHandle<()>>,
}

/// Plays the remote agent track on the default output device
pub struct CpalAudioSink {
    device: Device,
    config: StreamConfig,
    playback: Option<Playback>,
}

impl CpalAudioSink {
    /// Create a sink on the default output device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| ConsoleError::AudioDevice("No output device available".into()))?;

        info!(
            "[AUDIO] Using output device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_output_config()
            .map_err(|e| ConsoleError::AudioDevice(format!("Failed to get output config: {}", e)))?
            .into();

        Ok(Self {
            device,
            config,
            playback: None,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }
}

impl AudioSink for CpalAudioSink {
    fn attach(&mut self, track: MediaTrack) -> Result<()> {
        self.detach();

        let channels = self.config.channels as usize;
        let device_rate = self.sample_rate();
        let max_buffered = device_rate as usize * MAX_BUFFERED_SECONDS;
        let buffer = Arc::new(Mutex::new(VecDeque::<f32>::with_capacity(max_buffered)));
        let stop = Arc::new(AtomicBool::new(false));

        // One resampler per track keeps filter state across transport frames
        let mut resampler = StreamResampler::new(track.sample_rate, device_rate)?;

        // Feed the playback buffer from the track
        let feeder = {
            let buffer = Arc::clone(&buffer);
            let stop = Arc::clone(&stop);
            let frames = track.frames.clone();
            std::thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    match frames.recv_timeout(Duration::from_millis(100)) {
                        Ok(samples) => {
                            let samples = match resampler.push(&samples) {
                                Ok(samples) => samples,
                                Err(e) => {
                                    warn!("[AUDIO] Dropping track audio: {}", e);
                                    break;
                                }
                            };
                            let mut buf = buffer.lock();
                            buf.extend(samples);
                            let excess = buf.len().saturating_sub(max_buffered);
                            if excess > 0 {
                                buf.drain(..excess);
                            }
                        }
                        Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
                        Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("[AUDIO] Track feeder finished");
            })
        };

        let err_fn = |err| {
            error!("[AUDIO] Output stream error: {}", err);
        };

        let playback_buffer = Arc::clone(&buffer);
        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut buf = playback_buffer.lock();
                    for frame in data.chunks_mut(channels) {
                        let sample = buf.pop_front().unwrap_or(0.0);
                        frame.fill(sample);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                stop.store(true, Ordering::Relaxed);
                ConsoleError::AudioDevice(format!("Failed to build output stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            stop.store(true, Ordering::Relaxed);
            ConsoleError::AudioDevice(format!("Failed to start output stream: {}", e))
        })?;

        info!(
            "[AUDIO] Playing track {} ({} Hz -> {} Hz)",
            track.id, track.sample_rate, device_rate
        );

        self.playback = Some(Playback {
            track_id: track.id,
            stream,
            stop,
            feeder: Some(feeder),
        });
        Ok(())
    }

    fn detach(&mut self) {
        if let Some(mut playback) = self.playback.take() {
            playback.stop.store(true, Ordering::Relaxed);
            drop(playback.stream);
            if let Some(feeder) = playback.feeder.take() {
                let _ = feeder.join();
            }
            info!("[AUDIO] Stopped track {}", playback.track_id);
        }
    }

    fn describe(&self) -> String {
        match &self.playback {
            Some(playback) => format!("Playing {}", playback.track_id),
            None => "Waiting for agent audio".to_string(),
        }
    }
}

impl Drop for CpalAudioSink {
    fn drop(&mut self) {
        self.detach();
    }
}
