use std::collections::HashSet;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::interaction::{NodeInteractionController, node_at};
use crate::layout::{LayoutCache, LayoutEngine, LayoutInput, documents_key, version_chain};
use crate::model::{Document, GraphLayout, GraphNode, Point, SpaceFilter, SpaceSummary, collect_spaces};
use crate::popover::{PopoverPlacement, PopoverPresenter, Size};
use crate::search::{SearchHit, find_nodes};
use crate::viewport::{
    Clock, FitOptions, Propagation, SystemClock, TouchPoint, ViewportController, WheelInput,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum PointerMode {
    #[default]
    Idle,
    Panning,
    Dragging,
}

/// Everything a host render loop needs: documents in, layout and camera out,
/// input events routed to the right controller.
pub struct MemoryGraph<C: Clock = SystemClock> {
    documents: Vec<Arc<Document>>,
    documents_key: u64,
    space: SpaceFilter,
    engine: LayoutEngine,
    cache: LayoutCache,
    viewport: ViewportController<C>,
    interaction: NodeInteractionController,
    popover: PopoverPresenter,
    pointer: PointerMode,
}

impl MemoryGraph<SystemClock> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, SystemClock::default())
    }
}

impl<C: Clock> MemoryGraph<C> {
    pub fn with_clock(config: EngineConfig, clock: C) -> Self {
        let EngineConfig {
            variant,
            layout,
            viewport,
        } = config;
        Self {
            documents: Vec::new(),
            documents_key: documents_key(&[]),
            space: SpaceFilter::All,
            engine: LayoutEngine::new(layout),
            cache: LayoutCache::new(),
            viewport: ViewportController::with_clock(viewport, variant, clock),
            interaction: NodeInteractionController::new(),
            popover: PopoverPresenter,
            pointer: PointerMode::Idle,
        }
    }

    pub fn documents(&self) -> &[Arc<Document>] {
        &self.documents
    }

    pub fn set_documents(&mut self, documents: Vec<Document>) {
        self.documents = documents.into_iter().map(Arc::new).collect();
        self.documents_changed();
    }

    /// Appends a newly loaded page of documents. Pins and camera stay untouched.
    pub fn extend_documents(&mut self, documents: impl IntoIterator<Item = Document>) {
        self.documents.extend(documents.into_iter().map(Arc::new));
        self.documents_changed();
    }

    fn documents_changed(&mut self) {
        self.documents_key = documents_key(&self.documents);

        let known: HashSet<&str> = self
            .documents
            .iter()
            .flat_map(|document| {
                std::iter::once(document.id.as_str())
                    .chain(document.memory_entries.iter().map(|memory| memory.id.as_str()))
            })
            .collect();
        let pruned = self.interaction.overrides_mut().retain_known(&known);
        if pruned > 0 {
            tracing::debug!(pruned, "dropped pins for removed nodes");
        }
        tracing::debug!(documents = self.documents.len(), "document set changed");
    }

    pub fn space(&self) -> &SpaceFilter {
        &self.space
    }

    pub fn set_space(&mut self, space: SpaceFilter) {
        if self.space != space {
            tracing::debug!(%space, "switching space");
            self.space = space;
        }
    }

    pub fn spaces(&self) -> Vec<SpaceSummary> {
        collect_spaces(self.documents.iter().map(|document| document.as_ref()))
    }

    /// Current layout. Returns the same `Arc` until an input changes.
    pub fn layout(&mut self) -> Arc<GraphLayout> {
        let input = LayoutInput {
            documents: &self.documents,
            space: &self.space,
            overrides: self.interaction.overrides(),
            dragging_node_id: self.interaction.dragging_node_id(),
        };
        self.cache.get(&self.engine, &input, self.documents_key)
    }

    pub fn viewport(&self) -> &ViewportController<C> {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController<C> {
        &mut self.viewport
    }

    pub fn interaction(&self) -> &NodeInteractionController {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut NodeInteractionController {
        &mut self.interaction
    }

    fn hit(&mut self, screen: Point) -> Option<GraphNode> {
        let world = self.viewport.screen_to_world(screen);
        let layout = self.layout();
        node_at(&layout.nodes, world).cloned()
    }

    /// Starts a node drag when `screen` lands on a node, otherwise a pan. Returns
    /// whether a node was hit.
    pub fn pointer_down(&mut self, screen: Point) -> bool {
        match self.hit(screen) {
            Some(node) => {
                self.viewport.cancel_animation();
                self.interaction.drag_start(&node, screen);
                self.pointer = PointerMode::Dragging;
                true
            }
            None => {
                self.viewport.pan_start(screen);
                self.pointer = PointerMode::Panning;
                false
            }
        }
    }

    pub fn pointer_move(&mut self, screen: Point) {
        match self.pointer {
            PointerMode::Dragging => {
                let zoom = self.viewport.zoom();
                self.interaction.drag_move(screen, zoom);
            }
            PointerMode::Panning => self.viewport.pan_move(screen),
            PointerMode::Idle => {
                let hovered = self.hit(screen).map(|node| node.id);
                self.interaction.hover(hovered.as_deref());
            }
        }
    }

    pub fn pointer_up(&mut self) {
        match std::mem::take(&mut self.pointer) {
            PointerMode::Dragging => {
                self.interaction.drag_end();
            }
            PointerMode::Panning => self.viewport.pan_end(),
            PointerMode::Idle => {}
        }
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
        self.interaction.pointer_left();
    }

    /// Toggles selection of the node under `screen`. Returns the selection afterwards.
    pub fn click(&mut self, screen: Point) -> Option<&str> {
        if let Some(node) = self.hit(screen) {
            self.interaction.click(&node.id);
        }
        self.interaction.selected()
    }

    pub fn double_click(&mut self, screen: Point) {
        self.viewport.double_click(screen);
    }

    pub fn wheel(&mut self, input: WheelInput) -> Propagation {
        self.viewport.wheel(input)
    }

    pub fn touch_start(&mut self, touches: &[TouchPoint]) -> Propagation {
        self.viewport.touch_start(touches)
    }

    pub fn touch_move(&mut self, touches: &[TouchPoint]) -> Propagation {
        self.viewport.touch_move(touches)
    }

    pub fn touch_end(&mut self, touches: &[TouchPoint]) -> Propagation {
        self.viewport.touch_end(touches)
    }

    /// Back to the variant's starting camera with every pin removed.
    pub fn reset(&mut self, animate: bool) {
        self.interaction.clear_overrides();
        self.viewport.reset_view(animate);
    }

    pub fn fit_to_view(&mut self, width: f64, height: f64, options: FitOptions) {
        let layout = self.layout();
        self.viewport
            .auto_fit_to_viewport(&layout.nodes, width, height, options);
    }

    /// Centers on and selects `node_id`. Returns false when the node is not in the layout.
    pub fn focus_node(&mut self, node_id: &str, width: f64, height: f64, animate: bool) -> bool {
        let layout = self.layout();
        let Some(node) = layout.node(node_id) else {
            tracing::debug!(node_id, "focus requested for unknown node");
            return false;
        };
        self.viewport
            .center_viewport_on(node.position(), width, height, animate);
        self.interaction.set_selected(Some(node.id.clone()));
        true
    }

    /// Node whose details should show: the selection, else the hovered node.
    pub fn active_node(&mut self) -> Option<GraphNode> {
        let id = self
            .interaction
            .selected()
            .or(self.interaction.hovered())?
            .to_owned();
        self.layout().node(&id).cloned()
    }

    pub fn popover(&mut self, container: Size, popover: Size) -> Option<(GraphNode, PopoverPlacement)> {
        let node = self.active_node()?;
        let anchor = self.viewport.world_to_screen(node.position());
        let radius = node.size * self.viewport.zoom();
        let placement = self.popover.place(anchor, radius, container, popover);
        Some((node, placement))
    }

    pub fn version_chain(&mut self, memory_id: &str) -> Vec<String> {
        version_chain(&self.layout().edges, memory_id)
    }

    pub fn search(&mut self, query: &str, limit: usize) -> Vec<SearchHit> {
        find_nodes(&self.layout().nodes, query, limit)
    }

    /// Drives animations and deferred notifications. Returns whether another frame is needed.
    pub fn tick(&mut self) -> bool {
        self.viewport.tick()
    }
}
