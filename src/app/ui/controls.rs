use std::ops::RangeInclusive;

use eframe::egui::{self, Ui};

use lexgraph::analytics::shortest_path;
use lexgraph::config::BARNES_HUT_THETA;
use lexgraph::{EntityType, RepulsionMode};

use super::super::ViewModel;
use super::super::render_utils::entity_color;

fn slider(
    ui: &mut Ui,
    value: &mut f32,
    range: RangeInclusive<f32>,
    text: &str,
    hint: &str,
) -> bool {
    ui.add(
        egui::Slider::new(value, range)
            .text(text)
            .clamping(egui::SliderClamping::Always),
    )
    .on_hover_text(hint)
    .changed()
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search (entity name or id)")
            .on_hover_text("Fuzzy match; only matching entities stay in the graph.");
        if ui.text_edit_singleline(&mut self.search).changed() {
            self.filter_dirty = true;
        }

        ui.separator();
        ui.label("Entity types");
        ui.horizontal_wrapped(|ui| {
            for kind in EntityType::ALL {
                let mut shown = self.visible_types.contains(&kind);
                let text = egui::RichText::new(kind.label()).color(entity_color(kind));
                if ui.checkbox(&mut shown, text).changed() {
                    if shown {
                        self.visible_types.insert(kind);
                    } else {
                        self.visible_types.remove(&kind);
                    }
                    self.filter_dirty = true;
                }
            }
        });

        ui.separator();
        self.draw_focus_controls(ui);

        ui.separator();
        ui.checkbox(&mut self.color_by_risk, "Color by conflict risk")
            .on_hover_text("Otherwise nodes are colored by entity type.");
        ui.checkbox(&mut self.show_quadtree_overlay, "Show quadtree overlay")
            .on_hover_text("Draw the repulsion quadtree partitions over the canvas.");
        if ui.button("Reset view").clicked() {
            self.animator.engine_mut().view_mut().reset();
        }

        ui.collapsing("Physics tuning", |ui| self.draw_physics_controls(ui));

        ui.separator();
        self.draw_path_finder(ui);

        ui.separator();
        self.draw_centrality_ranking(ui);
    }

    fn draw_focus_controls(&mut self, ui: &mut Ui) {
        ui.label("Neighborhood focus");
        match self.focus.clone() {
            Some(focus) => {
                let name = self.full.node(&focus).map_or(focus.as_str(), |node| node.name.as_str());
                ui.label(format!("Centered on {name}"));
            }
            None => {
                ui.small("Showing every entity that passes the filters.");
            }
        }

        if ui
            .add(egui::Slider::new(&mut self.focus_depth, 1..=6).text("Hops"))
            .changed()
            && self.focus.is_some()
        {
            self.filter_dirty = true;
        }

        ui.horizontal(|ui| {
            let can_focus = self.selected.is_some();
            if ui
                .add_enabled(can_focus, egui::Button::new("Focus selected"))
                .clicked()
            {
                self.set_focus(self.selected.clone());
            }
            if ui
                .add_enabled(self.focus.is_some(), egui::Button::new("Clear focus"))
                .clicked()
            {
                self.set_focus(None);
            }
        });
    }

    fn draw_physics_controls(&mut self, ui: &mut Ui) {
        let mut engine_config = *self.animator.engine().config();
        let config = &mut engine_config.simulation;
        let mut changed = false;

        changed |= slider(
            ui,
            &mut config.repulsion,
            -1500.0..=-10.0,
            "Repulsion",
            "Negative values push entities apart.",
        );
        changed |= slider(
            ui,
            &mut config.spring_length,
            20.0..=400.0,
            "Link length",
            "Rest length of each relationship link.",
        );
        changed |= slider(
            ui,
            &mut config.spring_strength,
            0.001..=0.5,
            "Link strength",
            "How firmly links pull toward their rest length.",
        );
        changed |= slider(
            ui,
            &mut config.gravity,
            0.0..=0.2,
            "Gravity",
            "Pull toward the canvas center.",
        );
        changed |= slider(
            ui,
            &mut config.velocity_damping,
            0.05..=1.0,
            "Velocity retention",
            "Fraction of velocity kept each tick.",
        );
        changed |= slider(
            ui,
            &mut config.alpha_decay,
            0.001..=0.2,
            "Cooling rate",
            "How quickly the layout settles.",
        );

        let mut barnes_hut = matches!(config.repulsion_mode, RepulsionMode::BarnesHut { .. });
        if ui
            .checkbox(&mut barnes_hut, "Barnes-Hut repulsion")
            .on_hover_text("Approximate distant groups; faster on large graphs.")
            .changed()
        {
            config.repulsion_mode = if barnes_hut {
                RepulsionMode::BarnesHut {
                    theta: BARNES_HUT_THETA,
                }
            } else {
                RepulsionMode::Exact
            };
            changed = true;
        }
        if let RepulsionMode::BarnesHut { theta } = &mut config.repulsion_mode {
            changed |= slider(ui, theta, 0.1..=1.5, "Theta", "Larger is coarser and faster.");
        }

        if changed {
            match self.animator.engine_mut().set_config(engine_config) {
                Ok(()) => self.animator.schedule(),
                Err(error) => tracing::warn!(%error, "rejected physics tunables"),
            }
        }
    }

    fn draw_path_finder(&mut self, ui: &mut Ui) {
        ui.label("Shortest relationship path");
        egui::Grid::new("path_finder").num_columns(2).show(ui, |ui| {
            ui.label("From");
            ui.text_edit_singleline(&mut self.path_from);
            ui.end_row();
            ui.label("To");
            ui.text_edit_singleline(&mut self.path_to);
            ui.end_row();
        });

        ui.horizontal(|ui| {
            if let Some(selected) = self.selected.clone() {
                if ui.small_button("From selected").clicked() {
                    self.path_from = selected.clone();
                }
                if ui.small_button("To selected").clicked() {
                    self.path_to = selected;
                }
            }
            if ui.button("Find").clicked() {
                self.find_path();
            }
            if ui
                .add_enabled(!self.path.is_empty(), egui::Button::new("Clear"))
                .clicked()
            {
                self.path.clear();
                self.path_status = None;
            }
        });

        if let Some(status) = &self.path_status {
            ui.small(status.as_str());
        }
    }

    fn find_path(&mut self) {
        let (from, to) = (self.path_from.trim(), self.path_to.trim());
        self.path = shortest_path(&self.full.nodes, &self.full.edges, from, to);
        self.path_status = Some(if self.path.is_empty() {
            format!("No path between {from} and {to}.")
        } else {
            format!("{} hops", self.path.len() - 1)
        });
    }

    fn draw_centrality_ranking(&mut self, ui: &mut Ui) {
        ui.label("Most connected entities");
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("centrality_ranking")
            .max_height(260.0)
            .show(ui, |ui| {
                for (rank, (id, degree)) in self.ranking.iter().enumerate() {
                    let name = self.full.node(id).map_or(id.as_str(), |node| node.name.as_str());
                    let label = format!("{}. {name}  ({degree})", rank + 1);
                    if ui.link(label).on_hover_text(id.as_str()).clicked() {
                        clicked = Some(id.clone());
                    }
                }
            });

        if let Some(id) = clicked {
            self.set_selected(Some(id));
        }
    }
}
