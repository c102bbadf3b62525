use eframe::egui::{self, Context, Rect, RichText, Ui, vec2};
use memory_graph::model::{GraphNode, NodePayload};
use memory_graph::popover::Size;
use memory_graph::util::truncate_label;

use super::super::ViewModel;

const POPOVER_WIDTH: f32 = 300.0;
const POPOVER_HEIGHT: f32 = 220.0;

impl ViewModel {
    pub(in crate::app) fn draw_popover(&mut self, ctx: &Context, rect: Rect) {
        let container = Size::new(rect.width() as f64, rect.height() as f64);
        let popover = Size::new(POPOVER_WIDTH as f64, POPOVER_HEIGHT as f64);
        let Some((node, placement)) = self.graph.popover(container, popover) else {
            return;
        };
        let chain = match node.memory() {
            Some(_) => self.graph.version_chain(&node.id),
            None => Vec::new(),
        };

        egui::Area::new(egui::Id::new("node_popover"))
            .order(egui::Order::Foreground)
            .fixed_pos(rect.min + vec2(placement.x as f32, placement.y as f32))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_width(POPOVER_WIDTH - 16.0);
                    ui.set_max_height(POPOVER_HEIGHT - 16.0);
                    Self::draw_node_details(ui, &node, &chain);
                });
            });
    }

    fn draw_node_details(ui: &mut Ui, node: &GraphNode, chain: &[String]) {
        match &node.data {
            NodePayload::Document(document) => {
                ui.label(RichText::new(document.display_title()).strong());
                ui.small(document.id.as_str());
                if let Some(summary) = &document.summary {
                    ui.add_space(4.0);
                    ui.label(truncate_label(summary, 220));
                }
                ui.add_space(4.0);
                ui.label(format!("memories: {}", document.memory_entries.len()));
                if let Some(url) = &document.url {
                    ui.small(url.as_str());
                }
                if let Some(created_at) = &document.created_at {
                    ui.small(format!("created {created_at}"));
                }
            }
            NodePayload::Memory { entry, document_id } => {
                let heading = if entry.is_forgotten {
                    "Forgotten memory"
                } else {
                    "Memory"
                };
                ui.label(RichText::new(heading).strong());
                ui.small(format!("{}  |  v{}  |  {}", entry.id, entry.version, entry.space()));
                ui.add_space(4.0);
                ui.label(truncate_label(entry.memory.as_deref().unwrap_or(""), 220));
                ui.add_space(4.0);
                ui.small(format!("document: {document_id}"));
                for (parent, relation) in entry.parent_relations() {
                    ui.small(format!("{} {parent}", relation.label()));
                }
                if chain.len() > 1 {
                    let position = chain.iter().position(|id| id == &entry.id).unwrap_or(0);
                    ui.small(format!("version {} of {}", position + 1, chain.len()));
                }
            }
        }
    }
}
