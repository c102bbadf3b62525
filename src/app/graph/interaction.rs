use eframe::egui::{self, PointerButton, Rect, TouchPhase, Ui, Vec2};
use memory_graph::viewport::{TouchPoint, WheelInput};

use super::super::ViewModel;
use super::super::render_utils::to_local;

impl ViewModel {
    pub(in crate::app) fn handle_graph_input(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let touch_active = self.handle_graph_touch(ui, rect);
        self.handle_graph_wheel(ui, rect, response);

        // egui mirrors touches as pointer events; the gesture tracker already has them.
        if !touch_active {
            self.handle_graph_pointer(ui, rect, response);
        }
    }

    fn handle_graph_wheel(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let (scroll, pointer) = ui.input(|input| (input.raw_scroll_delta, input.pointer.hover_pos()));
        if scroll == Vec2::ZERO {
            return;
        }

        let anchor = to_local(rect, pointer.unwrap_or_else(|| rect.center()));
        self.graph.wheel(WheelInput {
            delta_x: -scroll.x as f64,
            delta_y: -scroll.y as f64,
            x: anchor.x,
            y: anchor.y,
        });
    }

    fn handle_graph_touch(&mut self, ui: &Ui, rect: Rect) -> bool {
        let touches: Vec<_> = ui.input(|input| {
            input
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Touch { id, phase, pos, .. } => Some((id.0, *phase, *pos)),
                    _ => None,
                })
                .collect()
        });

        for (id, phase, pos) in touches {
            let local = to_local(rect, pos);
            let point = TouchPoint::new(id, local.x, local.y);
            match phase {
                TouchPhase::Start => {
                    if !rect.contains(pos) {
                        continue;
                    }
                    self.touches.insert(id, point);
                    let active = self.active_touches();
                    self.graph.touch_start(&active);
                }
                TouchPhase::Move => {
                    let Some(slot) = self.touches.get_mut(&id) else {
                        continue;
                    };
                    *slot = point;
                    let active = self.active_touches();
                    self.graph.touch_move(&active);
                }
                TouchPhase::End | TouchPhase::Cancel => {
                    if self.touches.remove(&id).is_some() {
                        let active = self.active_touches();
                        self.graph.touch_end(&active);
                    }
                }
            }
        }

        !self.touches.is_empty()
    }

    fn active_touches(&self) -> Vec<TouchPoint> {
        self.touches.values().copied().collect()
    }

    fn handle_graph_pointer(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if response.drag_started_by(PointerButton::Primary)
            && let Some(origin) = ui.input(|input| input.pointer.press_origin())
        {
            self.graph.pointer_down(to_local(rect, origin));
        }

        if response.dragged_by(PointerButton::Primary)
            && let Some(position) = response.interact_pointer_pos()
        {
            self.graph.pointer_move(to_local(rect, position));
        }

        if response.drag_stopped() {
            self.graph.pointer_up();
        }

        if !response.dragged() {
            match response.hover_pos() {
                Some(position) => {
                    self.pointer_inside = true;
                    self.graph.pointer_move(to_local(rect, position));
                }
                None if self.pointer_inside => {
                    self.pointer_inside = false;
                    self.graph.pointer_leave();
                }
                None => {}
            }
        }

        if let Some(position) = response.interact_pointer_pos() {
            let local = to_local(rect, position);
            if response.double_clicked() {
                self.graph.double_click(local);
            } else if response.clicked() {
                self.graph.click(local);
            }
        }
    }
}
