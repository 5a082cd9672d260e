//! Frame-driven owner of the simulation and view transform.
//!
//! [`LayoutEngine`] queues [`Command`]s and applies them at the start of the next
//! tick, so a gesture that arrives mid-frame never changes the tick in flight.
//! [`Animator`] binds the engine to a host's animation-frame scheduler through
//! [`FrameHost`], keeping at most one frame request outstanding.

use std::collections::VecDeque;

use eframe::egui::Pos2;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::interaction::{Command, Scene, ViewTransform};
use crate::layout::{NodePosition, Simulation};
use crate::model::{GraphSnapshot, Node};

pub struct LayoutEngine {
    config: EngineConfig,
    simulation: Simulation,
    view: ViewTransform,
    snapshot: GraphSnapshot,
    queue: VecDeque<Command>,
}

impl LayoutEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let simulation = Simulation::new(config.simulation)?;
        let view = ViewTransform::new(
            config.simulation.width,
            config.simulation.height,
            &config.view,
        );

        Ok(Self {
            config,
            simulation,
            view,
            snapshot: GraphSnapshot::default(),
            queue: VecDeque::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validates and applies new tunables to the simulation and the view in one
    /// step, so the view canvas always matches the simulation canvas. Kinetic
    /// state is kept and the layout reheats.
    pub fn set_config(&mut self, config: EngineConfig) -> Result<()> {
        config.validate()?;
        self.simulation.set_config(config.simulation)?;
        self.view
            .set_canvas_size(config.simulation.width, config.simulation.height);
        self.view.set_zoom_range(&config.view);
        self.config = config;
        Ok(())
    }

    /// Replaces the working snapshot. Queued pins for nodes that vanished are
    /// ignored when drained.
    pub fn load(&mut self, snapshot: GraphSnapshot) {
        self.simulation.set_snapshot(&snapshot.nodes, &snapshot.edges);
        self.snapshot = snapshot;
    }

    pub fn snapshot(&self) -> &GraphSnapshot {
        &self.snapshot
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Kinetic state should be driven through [`LayoutEngine::submit`] and
    /// tunables through [`LayoutEngine::set_config`].
    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewTransform {
        &mut self.view
    }

    pub fn submit(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    pub fn submit_all(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.queue.extend(commands);
    }

    pub fn has_pending_commands(&self) -> bool {
        !self.queue.is_empty()
    }

    /// True while a frame would do work: queued commands or a hot simulation.
    pub fn wants_frame(&self) -> bool {
        self.has_pending_commands() || self.simulation.is_running()
    }

    pub fn is_running(&self) -> bool {
        self.simulation.is_running()
    }

    /// Drains queued commands, then advances the simulation one step. Returns
    /// whether the simulation is still running.
    pub fn tick(&mut self) -> bool {
        while let Some(command) = self.queue.pop_front() {
            match &command {
                Command::Pin { id, x, y } => {
                    if !self.simulation.pin(id, *x, *y) {
                        tracing::debug!(%id, "pin for unknown node ignored");
                    }
                }
                Command::Unpin { id } => {
                    self.simulation.unpin(id);
                }
                Command::Pan { .. } | Command::Zoom { .. } => self.view.apply(&command),
            }
        }

        self.simulation.tick()
    }

    pub fn positions(&self) -> Vec<NodePosition> {
        self.simulation.positions()
    }

    /// Closest node whose screen position lies within the hover radius.
    pub fn node_at(&self, screen: Pos2) -> Option<&Node> {
        let radius = self.config.view.hover_radius;
        self.simulation
            .iter_positions()
            .map(|(id, world)| (id, self.view.world_to_screen(world).distance(screen)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .and_then(|(id, _)| self.snapshot.node(id))
    }
}

impl Scene for LayoutEngine {
    fn node_at(&self, screen: Pos2) -> Option<&Node> {
        LayoutEngine::node_at(self, screen)
    }

    fn view(&self) -> &ViewTransform {
        &self.view
    }
}

/// Opaque id of one outstanding animation-frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// The host's display-refresh scheduler.
pub trait FrameHost {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Runs one engine tick per host frame while there is work, and stops requesting
/// frames once the layout settles. Dropping the animator cancels any outstanding
/// request.
pub struct Animator<H: FrameHost> {
    engine: LayoutEngine,
    host: H,
    pending: Option<FrameHandle>,
}

impl<H: FrameHost> Animator<H> {
    pub fn new(engine: LayoutEngine, host: H) -> Self {
        let mut animator = Self {
            engine,
            host,
            pending: None,
        };
        animator.schedule();
        animator
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    /// Mutations made here are picked up by the next [`Animator::schedule`].
    pub fn engine_mut(&mut self) -> &mut LayoutEngine {
        &mut self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn load(&mut self, snapshot: GraphSnapshot) {
        self.engine.load(snapshot);
        self.schedule();
    }

    pub fn submit(&mut self, command: Command) {
        self.engine.submit(command);
        self.schedule();
    }

    pub fn submit_all(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.engine.submit_all(commands);
        self.schedule();
    }

    /// Requests a frame if the engine has work and none is outstanding.
    pub fn schedule(&mut self) {
        if self.pending.is_none() && self.engine.wants_frame() {
            self.pending = Some(self.host.request_frame());
        }
    }

    /// Frame callback. Stale or unknown handles are ignored so a frame that
    /// fires after [`Animator::cancel`] cannot tick. Returns whether a tick ran.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if self.pending != Some(handle) {
            return false;
        }

        self.pending = None;
        self.engine.tick();
        self.schedule();
        true
    }

    /// Cancels the outstanding request, if any. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            tracing::debug!(frame = handle.id(), "cancelling animation frame");
            self.host.cancel_frame(handle);
        }
    }
}

impl<H: FrameHost> Drop for Animator<H> {
    fn drop(&mut self) {
        self.cancel();
    }
}
