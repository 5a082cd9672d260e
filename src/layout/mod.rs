//! Alpha-decaying force simulation.
//!
//! Kinetic state lives in a per-node arena keyed by node id, separate from the
//! logical [`Node`] records. Every tick applies gravity toward the canvas center,
//! inverse-square repulsion between all pairs and Hookean springs along edges,
//! each scaled by `alpha`, then damps velocities and integrates positions.
//! Repulsion is O(n²) in [`RepulsionMode::Exact`]; [`RepulsionMode::BarnesHut`]
//! swaps in a quadtree approximation for larger graphs without changing the force
//! model.

mod forces;
mod quadtree;

use std::collections::HashMap;
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use serde::Serialize;

use crate::config::{RepulsionMode, SimulationConfig};
use crate::error::Result;
use crate::model::{Edge, Node};
use forces::{
    accumulate_gravity, accumulate_repulsion_exact, accumulate_repulsion_for_node,
    accumulate_springs,
};
pub use quadtree::QuadtreeCell;
use quadtree::Quadtree;

/// One entry of the per-tick position stream.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodePosition {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

struct Body {
    id: String,
    position: Vec2,
    velocity: Vec2,
    pin: Option<Vec2>,
    degree: usize,
}

#[derive(Default)]
struct Scratch {
    positions: Vec<Vec2>,
    pinned: Vec<bool>,
    forces: Vec<Vec2>,
}

pub struct Simulation {
    config: SimulationConfig,
    bodies: Vec<Body>,
    index_by_id: HashMap<String, usize>,
    links: Vec<(usize, usize)>,
    alpha: f32,
    ticks: u64,
    scratch: Scratch,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            bodies: Vec::new(),
            index_by_id: HashMap::new(),
            links: Vec::new(),
            alpha: 1.0,
            ticks: 0,
            scratch: Scratch::default(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Swaps tunables without touching kinetic state, then reheats.
    pub fn set_config(&mut self, config: SimulationConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.reheat();
        Ok(())
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.config.width * 0.5, self.config.height * 0.5)
    }

    /// Replaces the node and edge set. Nodes seen before (by id) keep their
    /// position, velocity and pin; new nodes are seeded on the initial circle at
    /// their index in `nodes`. Edges with an unknown endpoint and self-loops are
    /// left out of the layout.
    pub fn set_snapshot(&mut self, nodes: &[Node], edges: &[Edge]) {
        let mut prior = std::mem::take(&mut self.bodies)
            .into_iter()
            .map(|body| (body.id.clone(), body))
            .collect::<HashMap<_, _>>();

        let center = self.center();
        let count = nodes.len();
        let mut survivors = 0usize;
        let mut bodies = Vec::with_capacity(count);
        let mut index_by_id = HashMap::with_capacity(count);

        for (index, node) in nodes.iter().enumerate() {
            if index_by_id.contains_key(&node.id) {
                continue;
            }
            index_by_id.insert(node.id.clone(), bodies.len());

            if let Some(mut body) = prior.remove(&node.id) {
                body.degree = 0;
                bodies.push(body);
                survivors += 1;
                continue;
            }

            let angle = TAU * index as f32 / count as f32;
            bodies.push(Body {
                id: node.id.clone(),
                position: center + vec2(angle.cos(), angle.sin()) * self.config.initial_radius,
                velocity: Vec2::ZERO,
                pin: None,
                degree: 0,
            });
        }

        let mut links = Vec::with_capacity(edges.len());
        let mut dropped = 0usize;
        for edge in edges {
            let (Some(&from), Some(&to)) = (index_by_id.get(&edge.from), index_by_id.get(&edge.to))
            else {
                dropped += 1;
                continue;
            };
            if from == to {
                continue;
            }
            bodies[from].degree += 1;
            bodies[to].degree += 1;
            links.push((from, to));
        }

        tracing::debug!(
            nodes = bodies.len(),
            links = links.len(),
            survivors,
            dropped_edges = dropped,
            "applied layout snapshot"
        );

        self.bodies = bodies;
        self.index_by_id = index_by_id;
        self.links = links;
        self.reheat();
    }

    pub fn reheat(&mut self) {
        self.alpha = 1.0;
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn node_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Whether another tick would do work. An empty simulation never runs.
    pub fn is_running(&self) -> bool {
        !self.bodies.is_empty() && self.alpha > self.config.alpha_min
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn position(&self, id: &str) -> Option<Vec2> {
        self.body(id).map(|body| body.position)
    }

    pub fn velocity(&self, id: &str) -> Option<Vec2> {
        self.body(id).map(|body| body.velocity)
    }

    /// Number of layout links touching `id`. Self-loops produce no link and so
    /// add nothing here, unlike `analytics::degree_centrality` which counts a
    /// self-loop twice.
    pub fn degree(&self, id: &str) -> Option<usize> {
        self.body(id).map(|body| body.degree)
    }

    pub fn pin_of(&self, id: &str) -> Option<Vec2> {
        self.body(id).and_then(|body| body.pin)
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.pin_of(id).is_some()
    }

    /// Fixes `id` at `(x, y)` from the next tick on and reheats. Unknown ids and
    /// non-finite coordinates are ignored.
    pub fn pin(&mut self, id: &str, x: f32, y: f32) -> bool {
        if !(x.is_finite() && y.is_finite()) {
            tracing::debug!(%id, x, y, "rejected non-finite pin");
            return false;
        }
        let Some(&index) = self.index_by_id.get(id) else {
            return false;
        };
        self.bodies[index].pin = Some(vec2(x, y));
        self.reheat();
        true
    }

    pub fn unpin(&mut self, id: &str) -> bool {
        let Some(&index) = self.index_by_id.get(id) else {
            return false;
        };
        self.bodies[index].pin.take().is_some()
    }

    pub fn positions(&self) -> Vec<NodePosition> {
        self.bodies
            .iter()
            .map(|body| NodePosition {
                id: body.id.clone(),
                x: body.position.x,
                y: body.position.y,
            })
            .collect()
    }

    /// Iterates `(id, position)` in snapshot order without allocating.
    pub fn iter_positions(&self) -> impl Iterator<Item = (&str, Vec2)> + '_ {
        self.bodies
            .iter()
            .map(|body| (body.id.as_str(), body.position))
    }

    /// Endpoint positions of every layout link.
    pub fn quadtree_cells(&self) -> Vec<QuadtreeCell> {
        let positions = self
            .bodies
            .iter()
            .map(|body| body.position)
            .collect::<Vec<_>>();
        Quadtree::build(&positions)
            .map(|tree| tree.overlay())
            .unwrap_or_default()
    }

    /// Advances one step. Returns whether the simulation is still running
    /// afterwards; a paused or empty simulation does nothing and returns false.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        let alpha = self.alpha;
        let node_count = self.bodies.len();
        let center = self.center();
        let config = self.config;

        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.pinned.clear();
        scratch.forces.clear();
        scratch.forces.resize(node_count, Vec2::ZERO);
        for body in &self.bodies {
            scratch.positions.push(body.position);
            scratch.pinned.push(body.pin.is_some());
        }

        let positions = &scratch.positions;
        let forces = &mut scratch.forces;

        accumulate_gravity(
            positions,
            &scratch.pinned,
            center,
            config.gravity * alpha,
            forces,
        );

        let repulsion_strength = -config.repulsion * alpha;
        match config.repulsion_mode {
            RepulsionMode::Exact => {
                accumulate_repulsion_exact(positions, repulsion_strength, forces);
            }
            RepulsionMode::BarnesHut { theta } => {
                if let Some(tree) = Quadtree::build(positions) {
                    for (index, force) in forces.iter_mut().enumerate() {
                        accumulate_repulsion_for_node(
                            &tree,
                            index,
                            positions,
                            repulsion_strength,
                            theta,
                            force,
                        );
                    }
                }
            }
        }

        accumulate_springs(
            positions,
            &self.links,
            config.spring_length,
            config.spring_strength * alpha,
            forces,
        );

        for (body, force) in self.bodies.iter_mut().zip(forces.iter()) {
            if let Some(pin) = body.pin {
                body.position = pin;
                body.velocity = Vec2::ZERO;
                continue;
            }

            body.velocity = (body.velocity + *force) * config.velocity_damping;
            body.position += body.velocity;
        }

        self.ticks += 1;
        self.alpha *= 1.0 - config.alpha_decay;
        tracing::trace!(tick = self.ticks, alpha = self.alpha, "layout tick");

        let running = self.is_running();
        if !running {
            tracing::debug!(ticks = self.ticks, "layout settled");
        }
        running
    }

    /// Ticks synchronously until settled or `max_ticks` is reached; returns the
    /// number of ticks taken.
    pub fn run_until_settled(&mut self, max_ticks: usize) -> usize {
        let mut taken = 0;
        while taken < max_ticks && self.is_running() {
            self.tick();
            taken += 1;
        }
        taken
    }

    fn body(&self, id: &str) -> Option<&Body> {
        self.index_by_id.get(id).map(|&index| &self.bodies[index])
    }
}
