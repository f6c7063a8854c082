/// Tone synthesis and audio output using cpal
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::config::ToneConfig;
use crate::grid::PitchClass;

/// Anything that can sound a note. `play_tone` blocks until the tone is over.
pub trait ToneOutput {
    fn play_tone(&mut self, note: PitchClass, duration: Duration);

    /// Route tones to a MIDI port as well. Outputs without MIDI refuse.
    fn connect_midi(&mut self, port_index: usize) -> anyhow::Result<()> {
        bail!("this output cannot route to MIDI port {port_index}")
    }
}

/// Playback position inside the tone currently being streamed.
#[derive(Default)]
struct ToneBuffer {
    samples: Vec<f32>,
    cursor: usize,
}

pub struct AudioOutput {
    _stream: Option<cpal::Stream>,
    buffer: Arc<Mutex<ToneBuffer>>,
    sample_rate: u32,
    tone: ToneConfig,
}

impl AudioOutput {
    /// Open the default output device.
    pub fn new(tone: ToneConfig) -> anyhow::Result<Self> {
        let buffer = Arc::new(Mutex::new(ToneBuffer::default()));
        let (stream, sample_rate) = Self::setup_audio_stream(Arc::clone(&buffer))?;

        Ok(Self {
            _stream: Some(stream),
            buffer,
            sample_rate,
            tone,
        })
    }

    /// No device: tones only take up their time.
    pub fn silent(tone: ToneConfig) -> Self {
        Self {
            _stream: None,
            buffer: Arc::new(Mutex::new(ToneBuffer::default())),
            sample_rate: tone.fallback_sample_rate,
            tone,
        }
    }

    /// Fall back to a silent output when no device can be opened.
    pub fn open_or_silent(tone: ToneConfig) -> Self {
        match Self::new(tone.clone()) {
            Ok(output) => output,
            Err(e) => {
                log::warn!("audio output unavailable, continuing silently: {e:#}");
                Self::silent(tone)
            }
        }
    }

    pub fn is_silent(&self) -> bool {
        self._stream.is_none()
    }

    fn setup_audio_stream(buffer: Arc<Mutex<ToneBuffer>>) -> anyhow::Result<(cpal::Stream, u32)> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no default output device")?;
        let config = device
            .default_output_config()
            .context("no default output config")?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device.build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let Ok(mut tone) = buffer.lock() else {
                        data.fill(0.0);
                        return;
                    };
                    for frame in data.chunks_mut(channels) {
                        let sample = tone.samples.get(tone.cursor).copied().unwrap_or(0.0);
                        tone.cursor = tone.cursor.saturating_add(1);
                        frame.fill(sample);
                    }
                },
                |err| log::error!("audio stream error: {err}"),
                None,
            )?,
            format => bail!("unsupported sample format {format:?} (only f32 supported)"),
        };

        stream.play().context("failed to start output stream")?;
        log::info!("audio output running at {sample_rate} Hz, {channels} channel(s)");
        Ok((stream, sample_rate))
    }
}

impl ToneOutput for AudioOutput {
    fn play_tone(&mut self, note: PitchClass, duration: Duration) {
        if self._stream.is_some() {
            let samples = synthesize_tone(note.frequency(), self.sample_rate, duration, &self.tone);
            if let Ok(mut tone) = self.buffer.lock() {
                *tone = ToneBuffer { samples, cursor: 0 };
            }
        }
        thread::sleep(duration);
    }
}

/// Fundamental plus a quieter octave overtone, shaped by a linear attack and
/// decay and scaled to `tone.gain`.
pub fn synthesize_tone(frequency: f32, sample_rate: u32, duration: Duration, tone: &ToneConfig) -> Vec<f32> {
    let sr = sample_rate as f32;
    let n = (sr * duration.as_secs_f32()) as usize;
    let attack_n = ((sr * tone.attack.as_secs_f32()) as usize).min(n);
    let decay_n = ((sr * tone.decay.as_secs_f32()) as usize).min(n);
    let two_pi_f = 2.0 * std::f32::consts::PI * frequency;

    (0..n)
        .map(|i| {
            let t = i as f32 / sr;
            let wave = (two_pi_f * t).sin() + tone.overtone_gain * (2.0 * two_pi_f * t).sin();

            let mut envelope = 1.0;
            if i < attack_n {
                envelope = ramp(0.0, 1.0, i, attack_n);
            }
            if i >= n - decay_n {
                envelope = ramp(1.0, 0.0, i - (n - decay_n), decay_n);
            }
            wave * envelope * tone.gain
        })
        .collect()
}

/// Point `k` of `count` evenly spaced values from `start` to `end` inclusive.
fn ramp(start: f32, end: f32, k: usize, count: usize) -> f32 {
    if count <= 1 {
        return start;
    }
    start + (end - start) * k as f32 / (count - 1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_tone_length_and_edges() {
        let cfg = ToneConfig::default();
        let samples = synthesize_tone(440.0, 44_100, Duration::from_millis(250), &cfg);
        assert_eq!(samples.len(), 11_025);
        assert_eq!(samples[0], 0.0);
        assert!(samples.last().unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_tone_headroom() {
        let cfg = ToneConfig::default();
        let samples = synthesize_tone(261.63, 44_100, Duration::from_millis(250), &cfg);
        let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak <= cfg.gain * (1.0 + cfg.overtone_gain) + 1e-4);
        assert!(peak > 0.1, "tone should be audible, peak {peak}");
    }

    #[test]
    fn test_attack_ramps_up() {
        let cfg = ToneConfig::default();
        let samples = synthesize_tone(440.0, 1_000, Duration::from_millis(250), &cfg);
        // 20 ms attack at 1 kHz is 20 samples
        let early = samples[..5].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let body = samples[60..120].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(early < body);
    }

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(ramp(0.0, 1.0, 0, 5), 0.0);
        assert_eq!(ramp(0.0, 1.0, 4, 5), 1.0);
        assert_eq!(ramp(1.0, 0.0, 0, 1), 1.0);
    }

    #[test]
    fn test_silent_output_blocks_for_duration() {
        let mut out = AudioOutput::silent(ToneConfig::default());
        assert!(out.is_silent());
        let start = Instant::now();
        out.play_tone(PitchClass::A, Duration::from_millis(20));
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert!(out.connect_midi(0).is_err());
    }
}
