use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, Vec2, vec2};

use lexgraph::RiskLevel;
use lexgraph::analytics::path_edges;

use super::super::ViewModel;
use super::super::render_utils::{
    blend_color, canvas_origin, circle_visible, dim_color, draw_background, entity_color,
    node_radius, risk_color, segment_maybe_visible,
};

const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const PATH_COLOR: Color32 = Color32::from_rgb(246, 180, 104);
const HOVER_COLOR: Color32 = Color32::from_rgb(255, 164, 101);

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, _response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        let origin = canvas_origin(rect, self.animator.engine().view().canvas_size());
        let events = self.collect_pointer_events(ui, rect, origin);
        self.dispatch_pointer_events(events);

        let engine = self.animator.engine();
        let view = *engine.view();
        let simulation = engine.simulation();
        let to_screen = |world: Vec2| -> Pos2 { origin + view.world_to_screen(world).to_vec2() };

        draw_background(&painter, rect, to_screen(Vec2::ZERO), view.zoom);

        if simulation.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No entities match the current filters.",
                FontId::proportional(15.0),
                Color32::from_gray(200),
            );
            return;
        }

        if self.show_quadtree_overlay {
            for cell in simulation.quadtree_cells() {
                let half = vec2(cell.half_extent, cell.half_extent);
                let cell_rect = egui::Rect::from_two_pos(
                    to_screen(cell.center - half),
                    to_screen(cell.center + half),
                );
                let alpha = if cell.is_leaf { 110 } else { 55 };
                let width = (1.4 - cell.depth as f32 * 0.09).clamp(0.45, 1.4);
                painter.rect_stroke(
                    cell_rect,
                    0.0,
                    Stroke::new(width, Color32::from_rgba_unmultiplied(106, 198, 255, alpha)),
                    egui::StrokeKind::Middle,
                );
            }
        }

        let snapshot = engine.snapshot();
        let selected = self.selected.as_deref();
        let hovered = self.controller.hovered();
        let path_nodes = self.path.iter().map(String::as_str).collect::<HashSet<_>>();
        let path_links = path_edges(&self.full.edges, &self.path)
            .into_iter()
            .map(|edge| (edge.from.as_str(), edge.to.as_str(), edge.kind.as_str()))
            .collect::<HashSet<_>>();
        let neighbors = selected
            .map(|id| {
                snapshot
                    .edges
                    .iter()
                    .filter_map(|edge| edge.other(id))
                    .collect::<HashSet<_>>()
            })
            .unwrap_or_default();
        let emphasis_active = selected.is_some() || !path_nodes.is_empty();
        let zoom_sqrt = view.zoom.sqrt();

        for edge in &snapshot.edges {
            let (Some(from), Some(to)) =
                (simulation.position(&edge.from), simulation.position(&edge.to))
            else {
                continue;
            };
            let (start, end) = (to_screen(from), to_screen(to));
            if !segment_maybe_visible(rect, start, end) {
                continue;
            }

            let on_path =
                path_links.contains(&(edge.from.as_str(), edge.to.as_str(), edge.kind.as_str()));
            let touches_selection = selected.is_some_and(|id| edge.touches(id));
            let stroke = if on_path {
                Stroke::new((3.2 * zoom_sqrt).clamp(1.6, 5.6), PATH_COLOR)
            } else if touches_selection {
                Stroke::new((2.2 * zoom_sqrt).clamp(1.2, 4.0), SELECTED_COLOR)
            } else if emphasis_active {
                Stroke::new(
                    (0.8 * zoom_sqrt).clamp(0.4, 2.0),
                    Color32::from_rgba_unmultiplied(80, 90, 104, 110),
                )
            } else {
                Stroke::new(
                    (1.2 * zoom_sqrt).clamp(0.6, 3.2),
                    Color32::from_rgba_unmultiplied(110, 116, 128, 190),
                )
            };
            painter.line_segment([start, end], stroke);

            if (on_path || touches_selection) && view.zoom > 0.8 {
                painter.text(
                    start + (end - start) * 0.5,
                    Align2::CENTER_CENTER,
                    edge.kind.as_str(),
                    FontId::proportional(10.0),
                    Color32::from_gray(210),
                );
            }
        }

        for node in &snapshot.nodes {
            let Some(world) = simulation.position(&node.id) else {
                continue;
            };
            let insight = self.insights.get(&node.id);
            let radius = node_radius(insight.map_or(0, |i| i.centrality), view.zoom);
            let position = to_screen(world);
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let is_selected = selected == Some(node.id.as_str());
            let is_hovered = hovered == Some(node.id.as_str());
            let is_on_path = path_nodes.contains(node.id.as_str());
            let is_neighbor = neighbors.contains(node.id.as_str());

            let base = if self.color_by_risk {
                risk_color(insight.map_or(RiskLevel::Low, |i| i.risk_level))
            } else {
                entity_color(node.label)
            };
            let color = if is_selected {
                SELECTED_COLOR
            } else if is_hovered {
                HOVER_COLOR
            } else if is_on_path {
                blend_color(base, PATH_COLOR, 0.7)
            } else if is_neighbor {
                blend_color(base, SELECTED_COLOR, 0.35)
            } else if emphasis_active {
                dim_color(base, 0.5)
            } else {
                base
            };

            painter.circle_filled(position, radius, color);
            let outline = if simulation.is_pinned(&node.id) {
                Stroke::new(2.0, Color32::WHITE)
            } else {
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
            };
            painter.circle_stroke(position, radius, outline);

            if insight.is_some_and(|i| i.conflict_count > 0) && !self.color_by_risk {
                painter.circle_stroke(
                    position,
                    radius + 3.0,
                    Stroke::new(1.5, risk_color(insight.map_or(RiskLevel::Low, |i| i.risk_level))),
                );
            }

            let draw_label = is_selected
                || is_hovered
                || is_on_path
                || is_neighbor
                || radius > 16.0
                || view.zoom > 1.3;
            if draw_label {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    node.name.as_str(),
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }

        if hovered.is_some() || self.controller.dragging().is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = if self.controller.dragging().is_some() {
                    egui::CursorIcon::Grabbing
                } else {
                    egui::CursorIcon::PointingHand
                };
            });
        } else if self.controller.is_panning() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Move);
        }

        if let Some(summary) = &self.hovered {
            let risk = self
                .insights
                .get(&summary.id)
                .map_or(RiskLevel::Low, |insight| insight.risk_level);
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {}  |  risk {}",
                    summary.name,
                    summary.label.label(),
                    risk.label()
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}
