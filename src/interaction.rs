use crate::model::{GraphNode, Point};
use crate::overrides::PositionOverrides;

#[derive(Clone, Debug, PartialEq)]
struct DragState {
    node_id: String,
    pointer_start: Point,
    node_start: Point,
}

/// Hover, selection and drag state. Drags only ever write into the override map.
#[derive(Clone, Debug, Default)]
pub struct NodeInteractionController {
    hovered: Option<String>,
    selected: Option<String>,
    drag: Option<DragState>,
    overrides: PositionOverrides,
}

impl NodeInteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn dragging_node_id(&self) -> Option<&str> {
        self.drag.as_ref().map(|drag| drag.node_id.as_str())
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn overrides(&self) -> &PositionOverrides {
        &self.overrides
    }

    pub fn overrides_mut(&mut self) -> &mut PositionOverrides {
        &mut self.overrides
    }

    /// Returns whether the hovered node changed. Ignored while a drag is active.
    pub fn hover(&mut self, node_id: Option<&str>) -> bool {
        if self.is_dragging() || self.hovered.as_deref() == node_id {
            return false;
        }
        self.hovered = node_id.map(str::to_owned);
        true
    }

    /// Selects `node_id`, or deselects it if it already was the selection.
    pub fn click(&mut self, node_id: &str) {
        if self.selected.as_deref() == Some(node_id) {
            self.selected = None;
        } else {
            self.selected = Some(node_id.to_owned());
        }
    }

    pub fn set_selected(&mut self, node_id: Option<String>) {
        self.selected = node_id;
    }

    pub fn drag_start(&mut self, node: &GraphNode, pointer: Point) {
        tracing::trace!(node = %node.id, "drag started");
        self.drag = Some(DragState {
            node_id: node.id.clone(),
            pointer_start: pointer,
            node_start: node.position(),
        });
    }

    /// Pins the dragged node under the pointer. `pointer` is in screen space.
    pub fn drag_move(&mut self, pointer: Point, zoom: f64) -> Option<Point> {
        let drag = self.drag.as_ref()?;
        if zoom.is_nan() || zoom <= 0.0 {
            return None;
        }

        let position = Point::new(
            drag.node_start.x + (pointer.x - drag.pointer_start.x) / zoom,
            drag.node_start.y + (pointer.y - drag.pointer_start.y) / zoom,
        );
        self.overrides.set(drag.node_id.clone(), position);
        Some(position)
    }

    /// Ends the drag and returns the node that was being dragged. The pin stays.
    pub fn drag_end(&mut self) -> Option<String> {
        self.drag.take().map(|drag| drag.node_id)
    }

    /// Forgets hover and ends any drag, as when the pointer leaves the surface.
    pub fn pointer_left(&mut self) {
        self.drag = None;
        self.hovered = None;
    }

    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
    }
}

/// Topmost node whose disc contains `world`. Later nodes draw over earlier ones.
pub fn node_at(nodes: &[GraphNode], world: Point) -> Option<&GraphNode> {
    nodes
        .iter()
        .rev()
        .find(|node| node.position().distance(world) <= node.size)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{Document, NodeKind, NodePayload, palette};

    fn node(id: &str, x: f64, y: f64, size: f64) -> GraphNode {
        GraphNode {
            id: id.into(),
            kind: NodeKind::Document,
            x,
            y,
            size,
            color: palette::DOCUMENT_FILL,
            is_hovered: false,
            is_dragging: false,
            data: NodePayload::Document(Arc::new(Document::new(id))),
        }
    }

    #[test]
    fn click_toggles_selection() {
        let mut controller = NodeInteractionController::new();
        controller.click("a");
        assert_eq!(controller.selected(), Some("a"));
        controller.click("b");
        assert_eq!(controller.selected(), Some("b"));
        controller.click("b");
        assert_eq!(controller.selected(), None);
    }

    #[test]
    fn drag_writes_world_delta() {
        let mut controller = NodeInteractionController::new();
        controller.drag_start(&node("a", 10.0, 20.0, 30.0), Point::new(100.0, 100.0));
        let moved = controller.drag_move(Point::new(150.0, 80.0), 0.5).unwrap();
        assert_eq!(moved, Point::new(110.0, -20.0));
        assert_eq!(controller.overrides().get("a"), Some(moved));

        assert_eq!(controller.drag_end().as_deref(), Some("a"));
        assert!(controller.drag_move(Point::new(0.0, 0.0), 1.0).is_none());
        assert_eq!(controller.overrides().get("a"), Some(moved));
    }

    #[test]
    fn hover_is_frozen_during_drag() {
        let mut controller = NodeInteractionController::new();
        assert!(controller.hover(Some("a")));
        assert!(!controller.hover(Some("a")));
        controller.drag_start(&node("b", 0.0, 0.0, 10.0), Point::ORIGIN);
        assert!(!controller.hover(Some("c")));
        assert_eq!(controller.hovered(), Some("a"));
        controller.pointer_left();
        assert_eq!(controller.hovered(), None);
        assert!(!controller.is_dragging());
    }

    #[test]
    fn hit_test_prefers_topmost() {
        let nodes = [node("under", 0.0, 0.0, 50.0), node("over", 10.0, 0.0, 20.0)];
        assert_eq!(node_at(&nodes, Point::new(12.0, 0.0)).map(|n| n.id.as_str()), Some("over"));
        assert_eq!(node_at(&nodes, Point::new(-40.0, 0.0)).map(|n| n.id.as_str()), Some("under"));
        assert!(node_at(&nodes, Point::new(100.0, 0.0)).is_none());
    }
}
