use std::sync::Arc;

use memory_graph::config::EngineConfig;
use memory_graph::layout::{LayoutEngine, LayoutInput};
use memory_graph::model::{Document, MemoryEntry, Point, SpaceFilter};
use memory_graph::viewport::ManualClock;
use memory_graph::MemoryGraph;

fn graph_with(documents: Vec<Document>) -> MemoryGraph<ManualClock> {
    let mut graph = MemoryGraph::with_clock(EngineConfig::default(), ManualClock::new());
    graph.set_documents(documents);
    graph
}

fn document(id: &str, memory: &str) -> Document {
    Document::new(id)
        .with_title(id.to_uppercase())
        .with_memory(MemoryEntry::new(memory).with_content(format!("memory for {id}")))
}

fn world_of(graph: &mut MemoryGraph<ManualClock>, id: &str) -> Point {
    graph.layout().node(id).map(|node| node.position()).unwrap()
}

fn screen_of(graph: &mut MemoryGraph<ManualClock>, id: &str) -> Point {
    let world = world_of(graph, id);
    graph.viewport().world_to_screen(world)
}

#[test]
fn pinned_node_survives_relayout() {
    let mut graph = graph_with(vec![document("doc-a", "m-a")]);
    let start = screen_of(&mut graph, "doc-a");

    assert!(graph.pointer_down(start));
    graph.pointer_move(Point::new(start.x + 160.0, start.y - 40.0));
    graph.pointer_up();
    let pinned = world_of(&mut graph, "doc-a");

    graph.extend_documents([document("doc-b", "m-b")]);

    assert_eq!(world_of(&mut graph, "doc-a"), pinned);
    assert_eq!(graph.interaction().overrides().len(), 1);
    assert!(!graph.interaction().overrides().contains("doc-b"));

    let documents: Vec<Arc<Document>> = graph.documents().to_vec();
    let overrides = graph.interaction().overrides().clone();
    let expected = LayoutEngine::default().compute(&LayoutInput {
        documents: &documents,
        space: &SpaceFilter::All,
        overrides: &overrides,
        dragging_node_id: None,
    });
    let fresh = expected.node("doc-b").unwrap().position();
    assert_eq!(world_of(&mut graph, "doc-b"), fresh);
    assert_eq!(
        world_of(&mut graph, "m-b"),
        expected.node("m-b").unwrap().position()
    );
}

#[test]
fn dragged_memory_keeps_its_document_in_place() {
    let mut graph = graph_with(vec![document("doc-a", "m-a")]);
    let document_before = world_of(&mut graph, "doc-a");
    let start = screen_of(&mut graph, "m-a");

    assert!(graph.pointer_down(start));
    assert_eq!(graph.interaction().dragging_node_id(), Some("m-a"));
    assert!(graph.layout().node("m-a").unwrap().is_dragging);

    graph.pointer_move(Point::new(start.x, start.y + 100.0));
    graph.pointer_up();

    assert!(!graph.layout().node("m-a").unwrap().is_dragging);
    assert_eq!(world_of(&mut graph, "doc-a"), document_before);
    assert!(graph.interaction().overrides().contains("m-a"));
}

#[test]
fn hover_never_moves_the_camera_or_nodes() {
    let mut graph = graph_with(vec![document("doc-a", "m-a")]);
    let pose = graph.viewport().state().pose();
    let over_node = screen_of(&mut graph, "doc-a");

    graph.pointer_move(over_node);
    assert_eq!(graph.interaction().hovered(), Some("doc-a"));
    graph.pointer_move(Point::new(-4000.0, -4000.0));
    assert_eq!(graph.interaction().hovered(), None);

    assert_eq!(graph.viewport().state().pose(), pose);
    assert!(graph.interaction().overrides().is_empty());
}

#[test]
fn panning_does_not_change_hover_or_drag() {
    let mut graph = graph_with(vec![document("doc-a", "m-a")]);
    let over_node = screen_of(&mut graph, "doc-a");
    graph.pointer_move(over_node);

    assert!(!graph.pointer_down(Point::new(-4000.0, -4000.0)));
    graph.pointer_move(Point::new(-3900.0, -3950.0));
    assert_eq!(graph.interaction().hovered(), Some("doc-a"));
    assert!(!graph.interaction().is_dragging());
    graph.pointer_up();

    let state = graph.viewport().state();
    assert!(!state.is_panning);
    assert_eq!((state.pan_x, state.pan_y), (100.0, 50.0));
}

#[test]
fn hover_is_frozen_while_dragging() {
    let mut graph = graph_with(vec![document("doc-a", "m-a"), document("doc-b", "m-b")]);
    let doc_a = screen_of(&mut graph, "doc-a");
    let doc_b = screen_of(&mut graph, "doc-b");

    graph.pointer_move(doc_a);
    graph.pointer_down(doc_a);
    graph.pointer_move(doc_b);
    assert_eq!(graph.interaction().hovered(), Some("doc-a"));

    graph.pointer_leave();
    assert!(!graph.interaction().is_dragging());
    assert_eq!(graph.interaction().hovered(), None);
    assert!(graph.interaction().overrides().contains("doc-a"));
}

#[test]
fn background_click_keeps_selection() {
    let mut graph = graph_with(vec![document("doc-a", "m-a")]);
    let at = screen_of(&mut graph, "doc-a");

    assert_eq!(graph.click(at), Some("doc-a"));
    assert_eq!(graph.click(Point::new(-4000.0, -4000.0)), Some("doc-a"));
    assert_eq!(graph.active_node().map(|node| node.id), Some("doc-a".to_owned()));
}

#[test]
fn search_deep_links_to_node() {
    let mut graph = graph_with(vec![document("doc-a", "m-a"), document("doc-b", "m-b")]);
    let hits = graph.search("memory for doc-b", 5);
    assert_eq!(hits.first().map(|hit| hit.node_id.as_str()), Some("m-b"));

    assert!(graph.focus_node("m-b", 1000.0, 800.0, false));
    let screen = screen_of(&mut graph, "m-b");
    assert!((screen.x - 500.0).abs() < 1e-6 && (screen.y - 400.0).abs() < 1e-6);
    assert_eq!(graph.interaction().selected(), Some("m-b"));
}
