use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use memory_graph::config::EngineConfig;
use memory_graph::model::{Document, SpaceFilter, SpaceSummary, WorldBounds, load_documents};
use memory_graph::search::SearchHit;
use memory_graph::viewport::TouchPoint;
use memory_graph::MemoryGraph;

mod graph;
mod render_utils;
mod ui;

type LoadResult = Result<Vec<Document>, String>;

pub struct MemoryGraphApp {
    documents_path: PathBuf,
    space: SpaceFilter,
    config: EngineConfig,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    graph: MemoryGraph,
    spaces: Vec<SpaceSummary>,
    search: String,
    search_hits: Vec<SearchHit>,
    search_query: String,
    touches: BTreeMap<u64, TouchPoint>,
    pointer_inside: bool,
    visible_bounds: Rc<Cell<Option<WorldBounds>>>,
    pending_fit: bool,
}

impl ViewModel {
    const SEARCH_LIMIT: usize = 12;

    fn new(documents: Vec<Document>, space: SpaceFilter, config: EngineConfig) -> Self {
        let mut graph = MemoryGraph::new(config);
        graph.set_documents(documents);
        graph.set_space(space);

        let visible_bounds = Rc::new(Cell::new(None));
        let sink = Rc::clone(&visible_bounds);
        graph
            .viewport_mut()
            .on_viewport_change(move |bounds| sink.set(Some(bounds)));

        Self {
            spaces: graph.spaces(),
            graph,
            search: String::new(),
            search_hits: Vec::new(),
            search_query: String::new(),
            touches: BTreeMap::new(),
            pointer_inside: false,
            visible_bounds,
            pending_fit: true,
        }
    }

    /// Keeps the old camera and pins while swapping in a fresh document set.
    fn replace_documents(&mut self, documents: Vec<Document>) {
        self.graph.set_documents(documents);
        self.spaces = self.graph.spaces();
        self.search_query.clear();
        self.search_hits.clear();
    }
}

impl MemoryGraphApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        documents_path: PathBuf,
        space: SpaceFilter,
        config: EngineConfig,
    ) -> Self {
        let state = Self::start_load(documents_path.clone());
        Self {
            documents_path,
            space,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(documents_path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_documents(&documents_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(documents_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(documents_path),
        }
    }

    fn ready_state(documents: Vec<Document>, space: &SpaceFilter, config: &EngineConfig) -> AppState {
        tracing::info!(documents = documents.len(), "documents loaded");
        AppState::Ready(Box::new(ViewModel::new(
            documents,
            space.clone(),
            config.clone(),
        )))
    }
}

impl eframe::App for MemoryGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(documents)) => {
                        transition = Some(Self::ready_state(documents, &self.space, &self.config));
                    }
                    Ok(Err(error)) => {
                        tracing::warn!(%error, "load failed");
                        transition = Some(AppState::Error(error));
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading documents...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load documents");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.documents_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                let source = self.documents_path.display().to_string();
                model.show(ctx, &source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.documents_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(documents)) => {
                            tracing::info!(documents = documents.len(), "documents reloaded");
                            model.replace_documents(documents);
                        }
                        Ok(Err(error)) => {
                            tracing::warn!(%error, "reload failed");
                            transition = Some(AppState::Error(error));
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
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
