//! Microphone capture.
//!
//! Captures audio from the default input device, downmixes to mono,
//! resamples to the requested rate, and delivers PCM16 frames over a
//! channel. The returned [`cpal::Stream`] must be kept alive for capture to
//! continue.

use crate::error::{Result, SamtaleError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};
use tokio::sync::mpsc;
use tracing::info;

/// A live microphone capture.
pub struct MicrophoneCapture {
    stream: Stream,
    /// Native sample rate of the input device.
    pub device_sample_rate: u32,
}

impl MicrophoneCapture {
    /// Start capturing, delivering PCM16 mono frames at `target_sample_rate`.
    pub fn start(
        target_sample_rate: u32,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Vec<i16>>)> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| SamtaleError::Audio("No default input device found".to_string()))?;

        let input_config = device
            .default_input_config()
            .map_err(|e| SamtaleError::Audio(format!("No default input configuration: {}", e)))?;

        let stream_config: StreamConfig = input_config.clone().into();
        let sample_format = input_config.sample_format();
        let device_sample_rate = stream_config.sample_rate.0;
        let channels = stream_config.channels as usize;

        info!(
            "Capturing at {} Hz ({} channels), resampling to {} Hz mono",
            device_sample_rate, channels, target_sample_rate
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let err_fn = |err| tracing::error!("Input stream error: {}", err);

        let stream = match sample_format {
            SampleFormat::F32 => {
                let tx = tx.clone();
                device
                    .build_input_stream(
                        &stream_config,
                        move |data: &[f32], _| {
                            send_frame(data, channels, device_sample_rate, target_sample_rate, &tx)
                        },
                        err_fn,
                        None,
                    )
                    .map_err(|e| SamtaleError::Audio(e.to_string()))?
            }
            SampleFormat::I16 => {
                let tx = tx.clone();
                device
                    .build_input_stream(
                        &stream_config,
                        move |data: &[i16], _| {
                            let scale = 1.0 / i16::MAX as f32;
                            let floats: Vec<f32> =
                                data.iter().map(|s| *s as f32 * scale).collect();
                            send_frame(
                                &floats,
                                channels,
                                device_sample_rate,
                                target_sample_rate,
                                &tx,
                            )
                        },
                        err_fn,
                        None,
                    )
                    .map_err(|e| SamtaleError::Audio(e.to_string()))?
            }
            SampleFormat::U16 => {
                let tx = tx.clone();
                device
                    .build_input_stream(
                        &stream_config,
                        move |data: &[u16], _| {
                            const MIDPOINT: f32 = 32768.0;
                            let floats: Vec<f32> = data
                                .iter()
                                .map(|s| (*s as f32 - MIDPOINT) / MIDPOINT)
                                .collect();
                            send_frame(
                                &floats,
                                channels,
                                device_sample_rate,
                                target_sample_rate,
                                &tx,
                            )
                        },
                        err_fn,
                        None,
                    )
                    .map_err(|e| SamtaleError::Audio(e.to_string()))?
            }
            other => {
                return Err(SamtaleError::Audio(format!(
                    "Input sample format {:?} is not supported",
                    other
                )))
            }
        };

        stream
            .play()
            .map_err(|e| SamtaleError::Audio(format!("Failed to start input stream: {}", e)))?;

        Ok((
            Self {
                stream,
                device_sample_rate,
            },
            rx,
        ))
    }

    /// Stop capturing.
    pub fn stop(self) {
        drop(self.stream);
    }
}

fn send_frame(
    samples: &[f32],
    channels: usize,
    source_rate: u32,
    target_rate: u32,
    tx: &mpsc::UnboundedSender<Vec<i16>>,
) {
    let mono = downmix_mono(samples, channels);
    let resampled = resample(&mono, source_rate, target_rate);
    let pcm: Vec<i16> = resampled
        .iter()
        .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect();
    let _ = tx.send(pcm);
}

/// Average interleaved channels down to mono.
fn downmix_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Linear-interpolation resampling.
fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = source_rate as f64 / target_rate as f64;
    let output_len = ((samples.len() as f64) / ratio).floor() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let position = i as f64 * ratio;
        let index = position.floor() as usize;
        let fraction = (position - index as f64) as f32;

        let current = samples[index];
        let next = *samples.get(index + 1).unwrap_or(&current);
        output.push(current + (next - current) * fraction);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_stereo() {
        let stereo = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix_mono(&stereo, 2), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_downmix_mono_passthrough() {
        let mono = [0.1, 0.2, 0.3];
        assert_eq!(downmix_mono(&mono, 1), mono.to_vec());
    }

    #[test]
    fn test_resample_identity() {
        let samples = [0.1, 0.2, 0.3];
        assert_eq!(resample(&samples, 16000, 16000), samples.to_vec());
    }

    #[test]
    fn test_resample_halves_length() {
        let samples: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let out = resample(&samples, 32000, 16000);
        assert_eq!(out.len(), 50);
        // Downsampling preserves the ramp shape.
        assert!(out.windows(2).all(|w| w[1] >= w[0]));
    }
}
