use eframe::egui::{self, RichText, Ui};
use serde_json::Value;

use lexgraph::RiskLevel;
use lexgraph::analytics::{conflicts_by_entity, risk_level, risk_score};

use super::super::ViewModel;
use super::super::render_utils::{entity_color, risk_color};

fn property_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Select an entity from the graph or rankings.");
            return;
        };

        let Some(node) = self.full.node(&selected_id) else {
            ui.label("Selected entity no longer exists in the snapshot.");
            return;
        };

        let index = conflicts_by_entity(&self.full.conflicts);
        let conflicts = index.get(selected_id.as_str()).cloned().unwrap_or_default();
        let score = risk_score(conflicts.iter().copied());
        let level = risk_level(conflicts.iter().copied());
        let insight = self.insights.get(&selected_id);
        let in_view = self.animator.engine().simulation().contains(&selected_id);

        ui.label(RichText::new(node.name.as_str()).strong());
        ui.small(node.id.as_str());
        ui.colored_label(entity_color(node.label), node.label.label());
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.label("Conflict risk:");
            ui.colored_label(risk_color(level), format!("{} ({score}/100)", level.label()));
        });
        ui.label(format!(
            "Connections: {}",
            insight.map_or(0, |insight| insight.centrality)
        ));
        if !in_view {
            ui.small("Hidden by the current filters.");
        }

        if !node.properties.is_empty() {
            ui.separator();
            ui.label(RichText::new("Properties").strong());
            egui::Grid::new("entity_properties")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for (key, value) in &node.properties {
                        ui.label(key.as_str());
                        ui.label(property_text(value));
                        ui.end_row();
                    }
                });
        }

        ui.separator();
        ui.label(RichText::new("Conflicts").strong());
        if conflicts.is_empty() {
            ui.label("No conflicts recorded for this entity.");
        }
        for conflict in &conflicts {
            ui.horizontal(|ui| {
                let severity = RiskLevel::from_weight(conflict.severity.weight());
                ui.colored_label(risk_color(severity), conflict.severity.label());
                ui.label(conflict.conflict_type.as_str());
            });
            if !conflict.description.is_empty() {
                ui.small(conflict.description.as_str());
            }
        }

        let mut clicked = None;
        let related = insight.map(|insight| insight.related_entities.as_slice()).unwrap_or(&[]);
        if !related.is_empty() {
            ui.separator();
            ui.label(RichText::new("Related entities").strong());
            for id in related {
                let name = self.full.node(id).map_or(id.as_str(), |node| node.name.as_str());
                if ui.link(name).on_hover_text(id.as_str()).clicked() {
                    clicked = Some(id.clone());
                }
            }
        }

        ui.separator();
        ui.label(RichText::new("Relationships").strong());
        egui::ScrollArea::vertical()
            .id_salt("relationships_scroll")
            .max_height(280.0)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for edge in self.full.edges.iter().filter(|edge| edge.touches(&selected_id)) {
                    let Some(other) = edge.other(&selected_id) else {
                        continue;
                    };
                    let name = self.full.node(other).map_or(other, |node| node.name.as_str());
                    let arrow = if edge.from == selected_id { "->" } else { "<-" };
                    let label = format!("{arrow} {}  {name}", edge.kind);
                    if ui.link(label).on_hover_text(other).clicked() {
                        clicked = Some(other.to_owned());
                    }
                }
            });

        if let Some(id) = clicked {
            self.set_selected(Some(id));
        }
    }
}
