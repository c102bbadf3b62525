use std::collections::HashMap;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};
use memory_graph::model::{EdgeType, GraphNode, NodeKind, palette};
use memory_graph::util::truncate_label;
use memory_graph::viewport::FitOptions;

use super::super::ViewModel;
use super::super::render_utils::{blend_color, color32, draw_background, to_screen, with_opacity};

const LABEL_CHARS: usize = 28;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.graph
            .viewport_mut()
            .set_container_size(rect.width() as f64, rect.height() as f64);

        if self.pending_fit {
            self.pending_fit = false;
            self.graph.fit_to_view(
                rect.width() as f64,
                rect.height() as f64,
                FitOptions::default(),
            );
        }

        self.handle_graph_input(ui, rect, &response);
        if self.graph.tick() || self.graph.viewport().state().is_animating {
            ui.ctx().request_repaint();
        }

        let layout = self.graph.layout();
        let state = *self.graph.viewport().state();
        let zoom = state.zoom as f32;
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, vec2(state.pan_x as f32, state.pan_y as f32), zoom);

        if layout.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No memories in this space.",
                FontId::proportional(15.0),
                Color32::from_gray(180),
            );
            return;
        }

        // two screen pixels of slack
        let visible = self.graph.viewport().world_bounds().expanded(2.0 / state.zoom);
        let selected = self.graph.interaction().selected().map(str::to_owned);
        let hovered = self.graph.interaction().hovered().map(str::to_owned);

        let by_id: HashMap<&str, &GraphNode> = layout
            .nodes
            .iter()
            .map(|node| (node.id.as_str(), node))
            .collect();

        for edge in &layout.edges {
            let (Some(source), Some(target)) = (
                by_id.get(edge.source.as_str()),
                by_id.get(edge.target.as_str()),
            ) else {
                continue;
            };
            if !visible.intersects_segment(source.position(), target.position()) {
                continue;
            }
            let start = to_screen(rect, state.world_to_screen(source.position()));
            let end = to_screen(rect, state.world_to_screen(target.position()));

            let touches_active = [selected.as_deref(), hovered.as_deref()]
                .into_iter()
                .flatten()
                .any(|id| id == edge.source || id == edge.target);
            let opacity = if touches_active {
                1.0
            } else {
                edge.visual_props.opacity as f32
            };
            let width = (edge.visual_props.thickness as f32 * zoom).max(0.6);
            let color = with_opacity(color32(edge.color), opacity);

            if edge.edge_type == EdgeType::DocDoc && edge.visual_props.glow > 0.0 {
                let glow = with_opacity(color, edge.visual_props.glow as f32 * 0.35);
                painter.line_segment([start, end], Stroke::new(width * 3.0, glow));
            }
            painter.line_segment([start, end], Stroke::new(width, color));
        }

        let glow = color32(palette::HIGHLIGHT_GLOW);
        let mut hovered_on_screen = false;
        for node in &layout.nodes {
            let radius = (node.size as f32 * zoom).max(2.0);
            if !visible.intersects_circle(node.position(), radius as f64 / state.zoom) {
                continue;
            }
            let position = to_screen(rect, state.world_to_screen(node.position()));

            let is_selected = selected.as_deref() == Some(node.id.as_str());
            let is_hovered = hovered.as_deref() == Some(node.id.as_str());
            hovered_on_screen |= is_hovered;

            let fill = color32(node.color);
            let border = match node.kind {
                NodeKind::Document => color32(palette::DOCUMENT_BORDER),
                NodeKind::Memory => color32(palette::MEMORY_BORDER),
            };

            if is_selected || is_hovered || node.is_dragging {
                painter.circle_stroke(position, radius + 4.0, Stroke::new(3.0, glow));
            }
            painter.circle_filled(position, radius, fill);
            let border = if is_selected {
                blend_color(border, Color32::WHITE, 0.6)
            } else {
                border
            };
            painter.circle_stroke(position, radius, Stroke::new(1.2, border));

            let should_draw_label = is_selected
                || is_hovered
                || (node.kind == NodeKind::Document && radius > 18.0)
                || zoom > 1.4;
            if should_draw_label {
                painter.text(
                    position + vec2(radius + 6.0, 0.0),
                    Align2::LEFT_CENTER,
                    truncate_label(node.label(), LABEL_CHARS),
                    FontId::proportional(12.0),
                    Color32::from_gray(232),
                );
            }
        }

        if self.graph.interaction().is_dragging() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grabbing);
        } else if hovered_on_screen {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        self.draw_popover(ui.ctx(), rect);
    }
}
