use eframe::egui::{self, Align, Layout, Ui};
use memory_graph::model::{EdgeType, SpaceFilter};
use memory_graph::util::truncate_label;
use memory_graph::viewport::FitOptions;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        self.draw_space_picker(ui);
        ui.separator();
        self.draw_camera_buttons(ui);
        ui.separator();
        self.draw_search(ui);
        ui.separator();
        self.draw_layout_stats(ui);
    }

    fn draw_space_picker(&mut self, ui: &mut Ui) {
        let mut space = self.graph.space().clone();
        egui::ComboBox::from_label("Space")
            .selected_text(space.to_string())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut space, SpaceFilter::All, "all");
                for summary in &self.spaces {
                    ui.selectable_value(
                        &mut space,
                        SpaceFilter::Space(summary.name.clone()),
                        format!("{} ({})", summary.name, summary.memory_count),
                    );
                }
            });

        if &space != self.graph.space() {
            self.graph.set_space(space);
            self.search_query.clear();
            self.search_hits.clear();
            self.pending_fit = true;
        }
    }

    fn draw_camera_buttons(&mut self, ui: &mut Ui) {
        let (width, height) = self.graph.viewport().container_size();

        ui.horizontal_wrapped(|ui| {
            if ui.button("Zoom in").clicked() {
                self.graph.viewport_mut().zoom_in(None, true);
            }
            if ui.button("Zoom out").clicked() {
                self.graph.viewport_mut().zoom_out(None, true);
            }
            if ui
                .button("Fit")
                .on_hover_text("Frame every node in the current space.")
                .clicked()
            {
                self.graph.fit_to_view(
                    width,
                    height,
                    FitOptions {
                        occluded_right: 0.0,
                        animate: true,
                    },
                );
            }
            if ui
                .button("Reset")
                .on_hover_text("Return to the starting camera and release every pinned node.")
                .clicked()
            {
                self.graph.reset(true);
            }
        });

        let pins = self.graph.interaction().overrides().len();
        ui.label(format!(
            "zoom {:.0}%  |  pinned {pins}",
            self.graph.viewport().zoom() * 100.0
        ));
    }

    fn draw_search(&mut self, ui: &mut Ui) {
        ui.label("Search")
            .on_hover_text("Fuzzy match on document titles, summaries, memory text and ids.");
        ui.text_edit_singleline(&mut self.search);

        if self.search != self.search_query {
            self.search_query = self.search.clone();
            self.search_hits = self.graph.search(&self.search_query, Self::SEARCH_LIMIT);
        }

        if self.search_query.trim().is_empty() {
            return;
        }
        if self.search_hits.is_empty() {
            ui.small("No matches in this space.");
            return;
        }

        let selected = self.graph.interaction().selected().map(str::to_owned);
        let mut focus = None;
        egui::ScrollArea::vertical()
            .id_salt("search_hits_scroll")
            .max_height(260.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for hit in &self.search_hits {
                    let is_selected = selected.as_deref() == Some(hit.node_id.as_str());
                    let clicked = ui
                        .horizontal(|ui| {
                            let clicked = ui
                                .selectable_label(is_selected, truncate_label(&hit.label, 40))
                                .on_hover_text(hit.node_id.as_str())
                                .clicked();
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.small(hit.score.to_string());
                            });
                            clicked
                        })
                        .inner;
                    if clicked {
                        focus = Some(hit.node_id.clone());
                    }
                }
            });

        if let Some(node_id) = focus {
            let (width, height) = self.graph.viewport().container_size();
            self.graph.focus_node(&node_id, width, height, true);
        }
    }

    fn draw_layout_stats(&mut self, ui: &mut Ui) {
        let layout = self.graph.layout();
        ui.label(format!("nodes: {}", layout.nodes.len()));
        ui.label(format!(
            "document links: {}",
            layout.edges_of_type(EdgeType::DocDoc).count()
        ));
        ui.label(format!(
            "memory versions: {}",
            layout.edges_of_type(EdgeType::Version).count()
        ));

        if let Some(bounds) = self.visible_bounds.get() {
            ui.small(format!(
                "visible world: ({:.0}, {:.0}) to ({:.0}, {:.0})",
                bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y
            ));
        }
    }
}
