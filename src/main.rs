#[cfg(feature = "gui")]
use std::collections::HashMap;

#[cfg(feature = "gui")]
use eframe::egui;
#[cfg(feature = "gui")]
use rand::rngs::StdRng;
#[cfg(feature = "gui")]
use rand::SeedableRng;

#[cfg(feature = "gui")]
use tonnetz::{
    build_context, AudioOutput, CellColor, CellLayout, CellVisual, Coordinate, DragGesture,
    GridTopology, MidiOutputDevice, PlaybackEngine, PlaybackEvent, PlaybackSequencer,
    TonnetzConfig, ToneRouter,
};

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[cfg(feature = "gui")]
fn main() -> anyhow::Result<()> {
    init_logging();

    let config = TonnetzConfig::default();
    let app = TonnetzApp::new(&config)?;
    let (width, height) = app.layout.canvas_size(&app.topology);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width + 20.0, height + 120.0])
            .with_title("Tonnetz Pattern Generator"),
        ..Default::default()
    };

    eframe::run_native(
        "Tonnetz",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {e}"))
}

#[cfg(feature = "gui")]
struct TonnetzApp {
    topology: GridTopology,
    layout: CellLayout,
    engine: PlaybackEngine,
    drag: DragGesture,

    // UI state
    visuals: HashMap<Coordinate, CellVisual>,
    available_midi_ports: Vec<String>,
    selected_port: Option<usize>,
    status: String,
}

#[cfg(feature = "gui")]
impl TonnetzApp {
    fn new(config: &TonnetzConfig) -> anyhow::Result<Self> {
        let ctx = build_context(config, &mut rand::rng())?;
        let topology = ctx.topology().clone();
        let tone = config.playback.tone.clone();

        let engine = PlaybackEngine::spawn(
            ctx,
            PlaybackSequencer::from_config(&config.playback),
            move || ToneRouter::new(AudioOutput::open_or_silent(tone)),
            StdRng::from_os_rng(),
        );

        Ok(Self {
            topology,
            layout: CellLayout::new(&config.layout),
            engine,
            drag: DragGesture::new(),
            visuals: HashMap::new(),
            available_midi_ports: MidiOutputDevice::available_ports(),
            selected_port: None,
            status: String::from("Tap a cell or generate a pattern"),
        })
    }

    fn handle_playback_events(&mut self) {
        for event in self.engine.poll_events() {
            match event {
                PlaybackEvent::CellVisual(coord, visual) => {
                    self.visuals.insert(coord, visual);
                }
                PlaybackEvent::Started { pattern, steps } => {
                    self.status = format!("Playing {pattern} ({steps} steps)");
                }
                PlaybackEvent::Finished(report) => {
                    self.status = format!(
                        "Finished {}: {} played, {} skipped",
                        report.pattern, report.played, report.skipped
                    );
                }
                PlaybackEvent::MidiConnected(port) => {
                    self.selected_port = Some(port);
                }
                PlaybackEvent::MidiError(message) => {
                    log::warn!("{message}");
                    self.status = message;
                }
            }
        }
    }

    fn draw_grid(&mut self, ui: &mut egui::Ui) {
        let (width, height) = self.layout.canvas_size(&self.topology);
        let (response, painter) =
            ui.allocate_painter(egui::vec2(width, height), egui::Sense::click_and_drag());
        let rect = response.rect;
        let to_screen = |(x, y): (f32, f32)| egui::pos2(rect.min.x + x, rect.min.y + y);

        painter.rect_filled(rect, 0.0, color32(CellColor::NEUTRAL));

        let line = egui::Stroke::new(2.0, egui::Color32::BLACK);
        for cell in self.topology.cells() {
            let from = to_screen(self.layout.center(&self.topology, cell.coord));
            for neighbor in self.topology.neighbors(cell.coord) {
                let to = to_screen(self.layout.center(&self.topology, neighbor));
                painter.line_segment([from, to], line);
            }
        }

        for cell in self.topology.cells() {
            let center = to_screen(self.layout.center(&self.topology, cell.coord));
            let visual = self.visuals.get(&cell.coord).copied().unwrap_or_default();
            painter.circle(center, self.layout.radius(), color32(visual.color()), line);
            painter.text(
                center,
                egui::Align2::CENTER_CENTER,
                cell.note.name(),
                egui::FontId::proportional(14.0),
                egui::Color32::BLACK,
            );
        }

        let (pressed, released) =
            ui.input(|i| (i.pointer.primary_pressed(), i.pointer.primary_released()));
        if let Some(pos) = response.interact_pointer_pos() {
            let local = (pos.x - rect.min.x, pos.y - rect.min.y);
            let hit = if pressed || !self.drag.is_active() {
                self.drag.pointer_down(&self.layout, &self.topology, local)
            } else {
                self.drag.pointer_drag(&self.layout, &self.topology, local)
            };
            if let Some(coord) = hit {
                self.engine.tap(coord);
            }
        }
        if released {
            self.drag.pointer_up();
        }
    }
}

#[cfg(feature = "gui")]
fn color32(color: CellColor) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

#[cfg(feature = "gui")]
impl eframe::App for TonnetzApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint();

        self.handle_playback_events();

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(color32(CellColor::NEUTRAL)))
            .show(ctx, |ui| {
                self.draw_grid(ui);

                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    let button = egui::Button::new(egui::RichText::new("Generate Pattern").size(16.0));
                    if ui.add(button).clicked() {
                        self.engine.play_pattern();
                    }

                    ui.add_space(20.0);

                    // MIDI Port Selection
                    let mut selected_port_changed = None;
                    ui.label("MIDI Output:");
                    if self.available_midi_ports.is_empty() {
                        ui.label("No MIDI ports available");
                    } else {
                        egui::ComboBox::from_label("")
                            .selected_text(
                                self.selected_port
                                    .and_then(|i| self.available_midi_ports.get(i))
                                    .map(String::as_str)
                                    .unwrap_or("Select port..."),
                            )
                            .show_ui(ui, |ui| {
                                for (i, port_name) in self.available_midi_ports.iter().enumerate() {
                                    if ui
                                        .selectable_label(self.selected_port == Some(i), port_name)
                                        .clicked()
                                    {
                                        selected_port_changed = Some(i);
                                    }
                                }
                            });
                    }
                    if let Some(port_idx) = selected_port_changed {
                        self.engine.connect_midi(port_idx);
                    }
                });

                ui.separator();
                let running = if self.engine.is_running() { "● " } else { "" };
                ui.label(format!("{running}{}", self.status));
            });
    }
}

#[cfg(not(feature = "gui"))]
fn main() -> anyhow::Result<()> {
    use tonnetz::{build_context, AudioOutput, CellSurface, CellVisual, Coordinate, PlaybackSequencer, TonnetzConfig};

    /// Reports visual changes to the log instead of a window.
    struct LogSurface;

    impl CellSurface for LogSurface {
        fn set_cell_visual_state(&mut self, coord: Coordinate, visual: CellVisual) {
            log::info!("cell ({}, {}) -> {}", coord.row, coord.col, visual.color().hex());
        }
    }

    init_logging();

    let config = TonnetzConfig::default();
    let mut rng = rand::rng();
    let mut ctx = build_context(&config, &mut rng)?;
    let mut tone = AudioOutput::open_or_silent(config.playback.tone.clone());
    let mut sequencer = PlaybackSequencer::from_config(&config.playback);

    sequencer.trigger(&mut ctx, &mut LogSurface, &mut tone, &mut rng);
    Ok(())
}
