//! Pointer input to simulation commands.
//!
//! The controller owns only gesture state. It reads the scene (hit testing and the
//! current view transform) and answers each [`PointerEvent`] with [`Command`]s for
//! the engine to apply at its next tick boundary plus [`InteractionEvent`]s for
//! the host page.

use eframe::egui::{Pos2, Vec2, pos2, vec2};
use serde::Serialize;

use crate::config::ViewConfig;
use crate::model::{EntityType, Node};

/// Pointer travel (screen px) under which a press-release on a node counts as a click.
const CLICK_SLOP: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32, button: PointerButton },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    /// Positive `delta` zooms in.
    Wheel { delta: f32, x: f32, y: f32 },
    Leave,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Pin { id: String, x: f32, y: f32 },
    Unpin { id: String },
    Pan { dx: f32, dy: f32 },
    /// Multiplies the scale, keeping the screen point `(x, y)` fixed.
    Zoom { factor: f32, x: f32, y: f32 },
}

/// Tooltip payload for a hovered node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HoverSummary {
    pub id: String,
    pub name: String,
    pub label: EntityType,
}

impl From<&Node> for HoverSummary {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            label: node.label,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum InteractionEvent {
    /// Emitted when the hovered node changes; `None` when the pointer leaves it.
    Hover(Option<HoverSummary>),
    Click(Node),
}

/// Pan and zoom applied to simulation space. Zoom scales about the canvas center,
/// pan is a screen-space offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub pan: Vec2,
    pub zoom: f32,
    canvas: Vec2,
    zoom_min: f32,
    zoom_max: f32,
}

impl ViewTransform {
    pub fn new(width: f32, height: f32, config: &ViewConfig) -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0_f32.clamp(config.zoom_min, config.zoom_max),
            canvas: vec2(width, height),
            zoom_min: config.zoom_min,
            zoom_max: config.zoom_max,
        }
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas
    }

    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            self.canvas = vec2(width, height);
        }
    }

    /// Adopts new zoom bounds, pulling the current zoom inside them.
    pub fn set_zoom_range(&mut self, config: &ViewConfig) {
        self.zoom_min = config.zoom_min;
        self.zoom_max = config.zoom_max;
        self.zoom = self.zoom.clamp(self.zoom_min, self.zoom_max);
    }

    fn canvas_center(&self) -> Vec2 {
        self.canvas * 0.5
    }

    pub fn world_to_screen(&self, world: Vec2) -> Pos2 {
        let center = self.canvas_center();
        (center + self.pan + (world - center) * self.zoom).to_pos2()
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Vec2 {
        let center = self.canvas_center();
        (screen.to_vec2() - center - self.pan) / self.zoom + center
    }

    /// Pulls a pointer position back inside the canvas. Non-finite coordinates
    /// land on the canvas origin edge.
    pub fn clamp_to_canvas(&self, x: f32, y: f32) -> Pos2 {
        let sanitize = |value: f32, max: f32| {
            if value.is_nan() {
                0.0
            } else {
                value.clamp(0.0, max)
            }
        };
        pos2(sanitize(x, self.canvas.x), sanitize(y, self.canvas.y))
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        if delta.x.is_finite() && delta.y.is_finite() {
            self.pan += delta;
        }
    }

    pub fn zoom_by(&mut self, factor: f32, anchor: Pos2) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }

        let world_before = self.screen_to_world(anchor);
        self.zoom = (self.zoom * factor).clamp(self.zoom_min, self.zoom_max);
        let center = self.canvas_center();
        self.pan = anchor.to_vec2() - center - (world_before - center) * self.zoom;
    }

    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0_f32.clamp(self.zoom_min, self.zoom_max);
    }

    /// Applies view commands; simulation commands are ignored.
    pub fn apply(&mut self, command: &Command) {
        match *command {
            Command::Pan { dx, dy } => self.pan_by(vec2(dx, dy)),
            Command::Zoom { factor, x, y } => self.zoom_by(factor, pos2(x, y)),
            Command::Pin { .. } | Command::Unpin { .. } => {}
        }
    }
}

/// Read-only view of the live graph that the controller hit-tests against.
pub trait Scene {
    fn node_at(&self, screen: Pos2) -> Option<&Node>;
    fn view(&self) -> &ViewTransform;
}

#[derive(Clone, Debug, PartialEq)]
enum Gesture {
    Idle,
    Panning { last: Pos2 },
    Dragging { id: String, origin: Pos2, travelled: f32 },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outcome {
    pub commands: Vec<Command>,
    pub events: Vec<InteractionEvent>,
}

#[derive(Clone, Debug)]
pub struct InteractionController {
    gesture: Gesture,
    hovered: Option<String>,
    zoom_step: f32,
}

impl InteractionController {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            gesture: Gesture::Idle,
            hovered: None,
            zoom_step: config.zoom_step,
        }
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn dragging(&self) -> Option<&str> {
        match &self.gesture {
            Gesture::Dragging { id, .. } => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    pub fn handle(&mut self, scene: &impl Scene, event: PointerEvent) -> Outcome {
        let mut outcome = Outcome::default();
        match event {
            PointerEvent::Down { x, y, button } => {
                let point = scene.view().clamp_to_canvas(x, y);
                self.release(&mut outcome);
                self.press(scene, point, button, &mut outcome);
            }
            PointerEvent::Move { x, y } => {
                let point = scene.view().clamp_to_canvas(x, y);
                self.drag_or_pan(scene, point, &mut outcome);
                if !matches!(self.gesture, Gesture::Panning { .. }) {
                    self.update_hover(scene.node_at(point), &mut outcome);
                }
            }
            PointerEvent::Up { x, y } => {
                let point = scene.view().clamp_to_canvas(x, y);
                self.drag_or_pan(scene, point, &mut outcome);
                if let Gesture::Dragging { id, travelled, .. } = &self.gesture
                    && *travelled <= CLICK_SLOP
                    && let Some(node) = scene.node_at(point).filter(|node| node.id == *id)
                {
                    outcome.events.push(InteractionEvent::Click(node.clone()));
                }
                self.release(&mut outcome);
            }
            PointerEvent::Wheel { delta, x, y } => {
                if delta.is_finite() && delta != 0.0 {
                    let point = scene.view().clamp_to_canvas(x, y);
                    let factor = if delta > 0.0 {
                        self.zoom_step
                    } else {
                        1.0 / self.zoom_step
                    };
                    outcome.commands.push(Command::Zoom {
                        factor,
                        x: point.x,
                        y: point.y,
                    });
                }
            }
            PointerEvent::Leave => {
                self.release(&mut outcome);
                self.update_hover(None, &mut outcome);
            }
        }
        outcome
    }

    fn press(
        &mut self,
        scene: &impl Scene,
        point: Pos2,
        button: PointerButton,
        outcome: &mut Outcome,
    ) {
        let hit = match button {
            PointerButton::Primary => scene.node_at(point),
            PointerButton::Secondary | PointerButton::Middle => None,
        };

        if let Some(node) = hit {
            let world = scene.view().screen_to_world(point);
            outcome.commands.push(Command::Pin {
                id: node.id.clone(),
                x: world.x,
                y: world.y,
            });
            self.gesture = Gesture::Dragging {
                id: node.id.clone(),
                origin: point,
                travelled: 0.0,
            };
        } else {
            self.gesture = Gesture::Panning { last: point };
        }
    }

    fn drag_or_pan(&mut self, scene: &impl Scene, point: Pos2, outcome: &mut Outcome) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { last } => {
                let delta = point - *last;
                *last = point;
                if delta != Vec2::ZERO {
                    outcome.commands.push(Command::Pan {
                        dx: delta.x,
                        dy: delta.y,
                    });
                }
            }
            Gesture::Dragging {
                id,
                origin,
                travelled,
            } => {
                *travelled = travelled.max(origin.distance(point));
                let world = scene.view().screen_to_world(point);
                outcome.commands.push(Command::Pin {
                    id: id.clone(),
                    x: world.x,
                    y: world.y,
                });
            }
        }
    }

    fn release(&mut self, outcome: &mut Outcome) {
        if let Gesture::Dragging { id, .. } = std::mem::replace(&mut self.gesture, Gesture::Idle) {
            outcome.commands.push(Command::Unpin { id });
        }
    }

    fn update_hover(&mut self, node: Option<&Node>, outcome: &mut Outcome) {
        let next = node.map(|node| node.id.as_str());
        if self.hovered.as_deref() == next {
            return;
        }

        self.hovered = next.map(str::to_owned);
        outcome
            .events
            .push(InteractionEvent::Hover(node.map(HoverSummary::from)));
    }
}
