/// MIDI output using midir, mirroring every tone played on the grid
use std::time::Duration;

use anyhow::{anyhow, Context};
use midir::{MidiOutput, MidiOutputConnection};

use crate::audio::{AudioOutput, ToneOutput};
use crate::grid::PitchClass;

const CLIENT_NAME: &str = "Tonnetz MIDI Output";
const NOTE_VELOCITY: u8 = 100;

pub struct MidiOutputDevice {
    connection: Option<MidiOutputConnection>,
}

impl MidiOutputDevice {
    pub fn new() -> Self {
        Self { connection: None }
    }

    pub fn available_ports() -> Vec<String> {
        match MidiOutput::new(CLIENT_NAME) {
            Ok(midi_out) => midi_out
                .ports()
                .iter()
                .filter_map(|p| midi_out.port_name(p).ok())
                .collect(),
            Err(e) => {
                log::warn!("cannot enumerate MIDI ports: {e}");
                vec![]
            }
        }
    }

    pub fn connect(&mut self, port_index: usize) -> anyhow::Result<()> {
        let midi_out = MidiOutput::new(CLIENT_NAME).context("failed to create MIDI output")?;

        let ports = midi_out.ports();
        let port = ports
            .get(port_index)
            .ok_or_else(|| anyhow!("invalid MIDI port index {port_index}"))?;

        let connection = midi_out
            .connect(port, "tonnetz")
            .map_err(|e| anyhow!("failed to connect to MIDI port {port_index}: {e}"))?;

        self.connection = Some(connection);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn send_note_on(&mut self, note: u8, velocity: u8) -> anyhow::Result<()> {
        if let Some(ref mut conn) = self.connection {
            conn.send(&[0x90, note, velocity])
                .context("failed to send note on")?;
        }
        Ok(())
    }

    pub fn send_note_off(&mut self, note: u8) -> anyhow::Result<()> {
        if let Some(ref mut conn) = self.connection {
            conn.send(&[0x80, note, 0])
                .context("failed to send note off")?;
        }
        Ok(())
    }
}

impl Default for MidiOutputDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// Plays on the audio device and mirrors each tone as a MIDI note.
pub struct ToneRouter {
    audio: AudioOutput,
    midi: MidiOutputDevice,
}

impl ToneRouter {
    pub fn new(audio: AudioOutput) -> Self {
        Self {
            audio,
            midi: MidiOutputDevice::new(),
        }
    }

    pub fn midi_connected(&self) -> bool {
        self.midi.is_connected()
    }
}

impl ToneOutput for ToneRouter {
    fn play_tone(&mut self, note: PitchClass, duration: Duration) {
        let midi_note = note.midi_note();
        if self.midi.is_connected() {
            log::debug!("midi note {}", midi_note_name(midi_note));
        }
        if let Err(e) = self.midi.send_note_on(midi_note, NOTE_VELOCITY) {
            log::warn!("{e:#}");
        }
        self.audio.play_tone(note, duration);
        if let Err(e) = self.midi.send_note_off(midi_note) {
            log::warn!("{e:#}");
        }
    }

    fn connect_midi(&mut self, port_index: usize) -> anyhow::Result<()> {
        self.midi.connect(port_index)?;
        log::info!("mirroring tones to MIDI port {port_index}");
        Ok(())
    }
}

pub fn midi_note_name(note: u8) -> String {
    let name = PitchClass::from_index(note as usize).name();
    let octave = (note / 12) as i32 - 1;
    format!("{}{}", name, octave)
}
