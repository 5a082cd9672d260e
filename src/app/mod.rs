use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::{Context as _, Result};
use eframe::egui::{self, Context};

use lexgraph::analytics::EntityInsight;
use lexgraph::interaction::HoverSummary;
use lexgraph::{Animator, EngineConfig, EntityType, GraphSnapshot, InteractionController};

mod frame_host;
mod graph;
mod render_utils;
mod ui;

use frame_host::EguiFrameHost;

const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Clone, Debug)]
pub struct LoadSource {
    pub snapshot_path: PathBuf,
    pub config_path: Option<PathBuf>,
}

struct Loaded {
    snapshot: GraphSnapshot,
    config: EngineConfig,
}

pub struct GraphViewerApp {
    source: LoadSource,
    state: AppState,
    reload_rx: Option<Receiver<Result<Loaded, String>>>,
}

enum AppState {
    Loading { rx: Receiver<Result<Loaded, String>> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    full: GraphSnapshot,
    animator: Animator<EguiFrameHost>,
    controller: InteractionController,
    insights: HashMap<String, EntityInsight>,
    ranking: Vec<(String, usize)>,
    visible_types: HashSet<EntityType>,
    search: String,
    focus: Option<String>,
    focus_depth: usize,
    filter_dirty: bool,
    selected: Option<String>,
    hovered: Option<HoverSummary>,
    pointer_inside: bool,
    path_from: String,
    path_to: String,
    path: Vec<String>,
    path_status: Option<String>,
    color_by_risk: bool,
    show_quadtree_overlay: bool,
}

fn load(source: &LoadSource) -> Result<Loaded> {
    let config = match &source.config_path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let file = File::open(&source.snapshot_path)
        .with_context(|| format!("failed to open {}", source.snapshot_path.display()))?;
    let snapshot = GraphSnapshot::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", source.snapshot_path.display()))?;

    tracing::info!(
        nodes = snapshot.nodes.len(),
        edges = snapshot.edges.len(),
        conflicts = snapshot.conflicts.len(),
        "loaded graph snapshot"
    );
    Ok(Loaded { snapshot, config })
}

impl GraphViewerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: LoadSource) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: LoadSource) -> Receiver<Result<Loaded, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load(&source).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: LoadSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready(ctx: &Context, loaded: Loaded) -> AppState {
        match ViewModel::new(ctx, loaded) {
            Ok(model) => AppState::Ready(Box::new(model)),
            Err(error) => AppState::Error(format!("{error:#}")),
        }
    }
}

impl eframe::App for GraphViewerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(loaded) => Self::ready(ctx, loaded),
                        Err(error) => AppState::Error(error),
                    });
                }
                ctx.request_repaint_after(LOAD_POLL_INTERVAL);

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading relationship graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load relationship graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.source.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(loaded)) => model.reload(loaded),
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint_after(LOAD_POLL_INTERVAL);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
