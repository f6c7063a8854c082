/// Pattern playback - walks a pattern step by step, and the worker thread
/// that runs taps and playback one unit of work at a time
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::Rng;

use crate::audio::ToneOutput;
use crate::config::{PlaybackConfig, RegenerationPolicy};
use crate::grid::Coordinate;
use crate::pattern::Pattern;

use super::{CellSurface, CellVisual, SequencerContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    Running,
}

/// What happened during one `play` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackReport {
    pub pattern: String,
    pub played: usize,
    pub skipped: usize,
}

pub struct PlaybackSequencer {
    state: SequencerState,
    step_delay: Duration,
}

impl PlaybackSequencer {
    pub fn new(step_delay: Duration) -> Self {
        Self {
            state: SequencerState::Idle,
            step_delay,
        }
    }

    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self::new(config.step_delay)
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SequencerState::Running
    }

    /// Activate every resolvable coordinate in order, pausing after each.
    /// Coordinates off the grid are skipped. Always runs to the end.
    pub fn play<S, T, R>(
        &mut self,
        pattern: &Pattern,
        ctx: &mut SequencerContext,
        surface: &mut S,
        tone: &mut T,
        rng: &mut R,
    ) -> PlaybackReport
    where
        S: CellSurface + ?Sized,
        T: ToneOutput + ?Sized,
        R: Rng,
    {
        self.play_with(pattern, ctx, surface, tone, rng, |_, _, _, _| {})
    }

    /// Like `play`, but hands the session to `between_steps` after each
    /// played step's pause so other work can run between two activations.
    pub fn play_with<S, T, R, F>(
        &mut self,
        pattern: &Pattern,
        ctx: &mut SequencerContext,
        surface: &mut S,
        tone: &mut T,
        rng: &mut R,
        mut between_steps: F,
    ) -> PlaybackReport
    where
        S: CellSurface + ?Sized,
        T: ToneOutput + ?Sized,
        R: Rng,
        F: FnMut(&mut SequencerContext, &mut S, &mut T, &mut R),
    {
        self.state = SequencerState::Running;
        log::info!("playing '{}' ({} steps)", pattern.name, pattern.len());

        let mut report = PlaybackReport {
            pattern: pattern.name.clone(),
            played: 0,
            skipped: 0,
        };

        for &coord in &pattern.coords {
            if ctx.activate(coord, surface, tone, rng).is_none() {
                report.skipped += 1;
                continue;
            }
            report.played += 1;
            if !self.step_delay.is_zero() {
                thread::sleep(self.step_delay);
            }
            between_steps(ctx, surface, tone, rng);
        }

        self.state = SequencerState::Idle;
        log::info!(
            "finished '{}': {} played, {} skipped",
            report.pattern,
            report.played,
            report.skipped
        );
        report
    }

    /// Pick the next pattern, refreshing generated entries first when the
    /// library is set to regenerate per play.
    pub fn next_pattern<R: Rng>(&self, ctx: &mut SequencerContext, rng: &mut R) -> Pattern {
        if ctx.pattern_config().regeneration == RegenerationPolicy::PerPlay {
            ctx.regenerate_library(rng);
        }
        ctx.library().choose_pattern(rng).clone()
    }

    /// Choose a pattern and play it.
    pub fn trigger<S, T, R>(
        &mut self,
        ctx: &mut SequencerContext,
        surface: &mut S,
        tone: &mut T,
        rng: &mut R,
    ) -> PlaybackReport
    where
        S: CellSurface + ?Sized,
        T: ToneOutput + ?Sized,
        R: Rng,
    {
        let pattern = self.next_pattern(ctx, rng);
        self.play(&pattern, ctx, surface, tone, rng)
    }
}

#[derive(Debug, Clone)]
pub enum PlaybackCommand {
    Tap(Coordinate),
    PlayPattern,
    ConnectMidi(usize),
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    CellVisual(Coordinate, CellVisual),
    Started { pattern: String, steps: usize },
    Finished(PlaybackReport),
    MidiConnected(usize),
    MidiError(String),
}

/// Forwards visual changes to whoever polls the engine.
struct EventSurface {
    sender: Sender<PlaybackEvent>,
}

impl CellSurface for EventSurface {
    fn set_cell_visual_state(&mut self, coord: Coordinate, visual: CellVisual) {
        let _ = self.sender.send(PlaybackEvent::CellVisual(coord, visual));
    }
}

/// Single worker thread that owns the session and processes commands
/// strictly in order. Each pattern step is its own unit of work: taps sent
/// while a pattern plays run between two steps, and any other command
/// waits for the pattern to finish. Nothing is dropped.
pub struct PlaybackEngine {
    commands: Sender<PlaybackCommand>,
    receiver: Receiver<PlaybackEvent>,
    is_running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl PlaybackEngine {
    /// `make_output` runs on the worker thread, so the tone output itself
    /// does not need to be `Send`.
    pub fn spawn<T, F, R>(
        mut ctx: SequencerContext,
        mut sequencer: PlaybackSequencer,
        make_output: F,
        mut rng: R,
    ) -> Self
    where
        T: ToneOutput,
        F: FnOnce() -> T + Send + 'static,
        R: Rng + Send + 'static,
    {
        let (commands, command_rx) = channel::<PlaybackCommand>();
        let (sender, receiver) = channel();
        let is_running = Arc::new(AtomicBool::new(false));
        let running = Arc::clone(&is_running);

        let worker = thread::spawn(move || {
            let mut output = make_output();
            let mut surface = EventSurface {
                sender: sender.clone(),
            };

            // Non-tap commands that arrived mid-pattern, still in arrival order.
            let mut deferred: VecDeque<PlaybackCommand> = VecDeque::new();

            loop {
                let cmd = match deferred.pop_front() {
                    Some(cmd) => cmd,
                    None => match command_rx.recv() {
                        Ok(cmd) => cmd,
                        Err(_) => break,
                    },
                };
                match cmd {
                    PlaybackCommand::Tap(coord) => {
                        ctx.activate(coord, &mut surface, &mut output, &mut rng);
                    }
                    PlaybackCommand::PlayPattern => {
                        running.store(true, Ordering::SeqCst);
                        let pattern = sequencer.next_pattern(&mut ctx, &mut rng);
                        let _ = sender.send(PlaybackEvent::Started {
                            pattern: pattern.name.clone(),
                            steps: pattern.len(),
                        });
                        let report = sequencer.play_with(
                            &pattern,
                            &mut ctx,
                            &mut surface,
                            &mut output,
                            &mut rng,
                            |ctx, surface, output, rng| {
                                while let Ok(cmd) = command_rx.try_recv() {
                                    match cmd {
                                        PlaybackCommand::Tap(coord) => {
                                            ctx.activate(coord, surface, output, rng);
                                        }
                                        other => deferred.push_back(other),
                                    }
                                }
                            },
                        );
                        running.store(false, Ordering::SeqCst);
                        let _ = sender.send(PlaybackEvent::Finished(report));
                    }
                    PlaybackCommand::ConnectMidi(port) => {
                        let event = match output.connect_midi(port) {
                            Ok(()) => PlaybackEvent::MidiConnected(port),
                            Err(e) => PlaybackEvent::MidiError(format!("{e:#}")),
                        };
                        let _ = sender.send(event);
                    }
                    PlaybackCommand::Shutdown => break,
                }
            }
            log::debug!("playback worker stopped");
        });

        Self {
            commands,
            receiver,
            is_running,
            worker: Some(worker),
        }
    }

    pub fn tap(&self, coord: Coordinate) {
        self.send(PlaybackCommand::Tap(coord));
    }

    pub fn play_pattern(&self) {
        self.send(PlaybackCommand::PlayPattern);
    }

    pub fn connect_midi(&self, port_index: usize) {
        self.send(PlaybackCommand::ConnectMidi(port_index));
    }

    fn send(&self, cmd: PlaybackCommand) {
        if self.commands.send(cmd).is_err() {
            log::warn!("playback worker is gone; command dropped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    pub fn poll_events(&self) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Finish queued work, then stop the worker and wait for it.
    pub fn shutdown(mut self) {
        let _ = self.commands.send(PlaybackCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("playback worker panicked");
            }
        }
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        let _ = self.commands.send(PlaybackCommand::Shutdown);
    }
}
