use std::collections::HashSet;

use anyhow::Result;
use eframe::egui::{self, Align, Context, Layout};

use lexgraph::analytics::{enrich, filter_by_type, neighborhood, search, top_by_centrality};
use lexgraph::{Animator, EntityType, GraphSnapshot, InteractionController, LayoutEngine};

use super::super::frame_host::EguiFrameHost;
use super::super::{Loaded, LoadSource, ViewModel};

impl ViewModel {
    pub(in crate::app) const RANKING_ROWS: usize = 15;

    pub(in crate::app) fn new(ctx: &Context, loaded: Loaded) -> Result<Self> {
        let engine = LayoutEngine::new(loaded.config)?;
        let controller = InteractionController::new(&loaded.config.view);
        let animator = Animator::new(engine, EguiFrameHost::new(ctx.clone()));

        let mut model = Self {
            full: GraphSnapshot::default(),
            animator,
            controller,
            insights: Default::default(),
            ranking: Vec::new(),
            visible_types: EntityType::ALL.into_iter().collect(),
            search: String::new(),
            focus: None,
            focus_depth: 2,
            filter_dirty: true,
            selected: None,
            hovered: None,
            pointer_inside: false,
            path_from: String::new(),
            path_to: String::new(),
            path: Vec::new(),
            path_status: None,
            color_by_risk: true,
            show_quadtree_overlay: false,
        };
        model.replace_snapshot(loaded.snapshot);
        Ok(model)
    }

    /// Swaps in a freshly loaded snapshot. The reloaded config replaces the
    /// current one when it validates.
    pub(in crate::app) fn reload(&mut self, loaded: Loaded) {
        match self.animator.engine_mut().set_config(loaded.config) {
            Ok(()) => {
                self.controller = InteractionController::new(&loaded.config.view);
                self.hovered = None;
            }
            Err(error) => tracing::warn!(%error, "keeping previous engine config"),
        }
        self.replace_snapshot(loaded.snapshot);
    }

    fn replace_snapshot(&mut self, snapshot: GraphSnapshot) {
        self.insights = enrich(&snapshot)
            .into_iter()
            .map(|insight| (insight.id.clone(), insight))
            .collect();
        self.ranking = top_by_centrality(&snapshot.nodes, &snapshot.edges, Self::RANKING_ROWS);
        self.full = snapshot;

        if self
            .selected
            .as_deref()
            .is_some_and(|id| self.full.node(id).is_none())
        {
            self.selected = None;
        }
        if self
            .focus
            .as_deref()
            .is_some_and(|id| self.full.node(id).is_none())
        {
            self.focus = None;
        }
        self.path.clear();
        self.path_status = None;
        self.filter_dirty = true;
    }

    /// Recomputes the visible subgraph (type filter, then search, then focus
    /// neighborhood) and hands it to the layout engine.
    pub(in crate::app) fn apply_filters(&mut self) {
        self.filter_dirty = false;

        let types = EntityType::ALL
            .into_iter()
            .filter(|kind| self.visible_types.contains(kind))
            .collect::<Vec<_>>();
        let mut visible = filter_by_type(&self.full.nodes, &self.full.edges, &types);
        if !self.search.trim().is_empty() {
            visible = search(&visible.nodes, &visible.edges, &self.search);
        }
        if let Some(focus) = &self.focus {
            visible = neighborhood(&visible.nodes, &visible.edges, focus, self.focus_depth);
        }

        let ids = visible
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<HashSet<_>>();
        let conflicts = self
            .full
            .conflicts
            .iter()
            .filter(|conflict| ids.contains(conflict.entity_id.as_str()))
            .cloned()
            .collect();

        tracing::debug!(
            nodes = visible.nodes.len(),
            edges = visible.edges.len(),
            "visible subgraph rebuilt"
        );
        self.animator
            .load(GraphSnapshot::new(visible.nodes, visible.edges).with_conflicts(conflicts));
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &LoadSource,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if self.filter_dirty {
            self.apply_filters();
        }

        if let Some(handle) = self.animator.pending() {
            self.animator.on_frame(handle);
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("lexgraph");
                    ui.separator();
                    ui.label(format!("snapshot: {}", source.snapshot_path.display()));
                    ui.label(format!("entities: {}", self.full.nodes.len()));
                    ui.label(format!("relationships: {}", self.full.edges.len()));
                    ui.label(format!("conflicts: {}", self.full.conflicts.len()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload snapshot"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Reheat layout").clicked() {
                        self.animator.engine_mut().simulation_mut().reheat();
                        self.animator.schedule();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.visible_graph_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }

    fn visible_graph_text(&self) -> String {
        let simulation = self.animator.engine().simulation();
        let state = if simulation.is_running() {
            format!("alpha {:.3}", simulation.alpha())
        } else {
            "settled".to_owned()
        };
        format!(
            "visible: {} nodes / {} links  |  {state}",
            simulation.node_count(),
            simulation.link_count()
        )
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected != selected {
            self.selected = selected;
        }
    }

    pub(in crate::app) fn set_focus(&mut self, focus: Option<String>) {
        if self.focus != focus {
            self.focus = focus;
            self.filter_dirty = true;
        }
    }
}
