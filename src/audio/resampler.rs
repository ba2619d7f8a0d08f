//! Streaming sample-rate conversion for remote audio

use crate::{ConsoleError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Input frames per resampler call
const CHUNK_FRAMES: usize = 256;

/// Mono resampler that keeps its filter state across pushes
///
/// Input is buffered until a whole chunk is available, so a stream resamples
/// to the same output however the transport splits it into frames.
pub struct StreamResampler {
    /// `None` when input and output rates match
    resampler: Option<SincFixedIn<f32>>,
    pending: Vec<f32>,
}

impl StreamResampler {
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(ConsoleError::AudioProcessing(
                "Sample rates must be greater than 0".into(),
            ));
        }

        let resampler = if input_rate == output_rate {
            None
        } else {
            let params = SincInterpolationParameters {
                sinc_len: 256,
                f_cutoff: 0.95,
                interpolation: SincInterpolationType::Linear,
                oversampling_factor: 256,
                window: WindowFunction::BlackmanHarris2,
            };
            let resampler = SincFixedIn::<f32>::new(
                output_rate as f64 / input_rate as f64,
                1.0,
                params,
                CHUNK_FRAMES,
                1,
            )
            .map_err(|e| {
                ConsoleError::AudioProcessing(format!("Failed to create resampler: {}", e))
            })?;
            Some(resampler)
        };

        debug!("[AUDIO] Resampling {} Hz -> {} Hz", input_rate, output_rate);

        Ok(Self {
            resampler,
            pending: Vec::with_capacity(CHUNK_FRAMES * 2),
        })
    }

    /// Feed samples, returning every output sample that is ready
    pub fn push(&mut self, samples: &[f32]) -> Result<Vec<f32>> {
        let Some(resampler) = self.resampler.as_mut() else {
            return Ok(samples.to_vec());
        };

        self.pending.extend_from_slice(samples);

        let mut output = Vec::new();
        let mut consumed = 0;
        loop {
            let needed = resampler.input_frames_next();
            if self.pending.len() - consumed < needed {
                break;
            }
            let input = [&self.pending[consumed..consumed + needed]];
            let chunk = resampler
                .process(&input[..], None)
                .map_err(|e| ConsoleError::AudioProcessing(format!("Resampling failed: {}", e)))?;
            output.extend_from_slice(&chunk[0]);
            consumed += needed;
        }
        self.pending.drain(..consumed);

        Ok(output)
    }

    /// Samples held back until the next full chunk
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| i as f32 / len as f32).collect()
    }

    #[test]
    fn test_invalid_rates() {
        assert!(StreamResampler::new(0, 48000).is_err());
        assert!(StreamResampler::new(16000, 0).is_err());
    }

    #[test]
    fn test_same_rate_passes_through() {
        let mut resampler = StreamResampler::new(48000, 48000).unwrap();
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(resampler.push(&samples).unwrap(), samples);
        assert_eq!(resampler.pending(), 0);
    }

    #[test]
    fn test_frame_split_does_not_change_output() {
        let input = ramp(22050);

        let mut whole = StreamResampler::new(22050, 48000).unwrap();
        let expected = whole.push(&input).unwrap();

        let mut chunked = StreamResampler::new(22050, 48000).unwrap();
        let mut output = Vec::new();
        for frame in input.chunks(220) {
            output.extend(chunked.push(frame).unwrap());
        }

        assert_eq!(output.len(), expected.len());
        assert_eq!(output, expected);
        assert_eq!(chunked.pending(), whole.pending());
    }

    #[test]
    fn test_output_length_tracks_rate_ratio() {
        let mut resampler = StreamResampler::new(22050, 48000).unwrap();
        let mut produced = 0usize;
        for frame in ramp(22050 * 3).chunks(220) {
            produced += resampler.push(frame).unwrap().len();
        }

        let consumed = 22050 * 3 - resampler.pending();
        let exact = consumed as f64 * 48000.0 / 22050.0;
        assert!(
            (produced as f64 - exact).abs() <= 2.0,
            "produced {} samples for {} input, expected about {}",
            produced,
            consumed,
            exact
        );
    }
}
