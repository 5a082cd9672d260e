//! Relationship-graph engine for legal entity graphs.
//!
//! The crate has two halves that share one node/edge model:
//!
//! - [`analytics`]: stateless queries (risk scoring, shortest relationship path,
//!   degree centrality, induced-subgraph filters) used by conflict-of-interest checks.
//! - [`layout`] and [`engine`]: an alpha-decaying force simulation that places
//!   entities on a 2-D canvas, driven one tick per animation frame and perturbed by
//!   the [`interaction`] controller.

pub mod analytics;
pub mod config;
pub mod engine;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod model;

pub use config::{EngineConfig, RepulsionMode, SimulationConfig, ViewConfig};
pub use engine::{Animator, FrameHandle, FrameHost, LayoutEngine};
pub use error::{Error, Result};
pub use interaction::{
    Command, InteractionController, InteractionEvent, PointerButton, PointerEvent, ViewTransform,
};
pub use layout::{NodePosition, Simulation};
pub use model::{Conflict, Edge, EntityType, GraphSnapshot, Node, RiskLevel, Severity};
