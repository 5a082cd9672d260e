use eframe::egui::{self, Pos2, Rect, Ui};

use lexgraph::{InteractionEvent, PointerButton, PointerEvent};

use super::super::ViewModel;

const BUTTONS: [(egui::PointerButton, PointerButton); 3] = [
    (egui::PointerButton::Primary, PointerButton::Primary),
    (egui::PointerButton::Secondary, PointerButton::Secondary),
    (egui::PointerButton::Middle, PointerButton::Middle),
];

impl ViewModel {
    /// Converts this frame's egui pointer input into canvas-space
    /// [`PointerEvent`]s. `origin` is where the canvas top-left sits on screen.
    pub(in crate::app) fn collect_pointer_events(
        &self,
        ui: &Ui,
        rect: Rect,
        origin: Pos2,
    ) -> Vec<PointerEvent> {
        let gesture_active = self.controller.dragging().is_some() || self.controller.is_panning();
        let mut events = Vec::new();

        ui.input(|input| {
            let Some(pointer) = input.pointer.latest_pos() else {
                if self.pointer_inside {
                    events.push(PointerEvent::Leave);
                }
                return;
            };
            let inside = rect.contains(pointer);
            let local = pointer - origin.to_vec2();

            if !inside && !gesture_active {
                if self.pointer_inside {
                    events.push(PointerEvent::Leave);
                }
                return;
            }

            if input.pointer.delta() != egui::Vec2::ZERO || (inside && !self.pointer_inside) {
                events.push(PointerEvent::Move {
                    x: local.x,
                    y: local.y,
                });
            }

            if inside {
                for (egui_button, button) in BUTTONS {
                    if input.pointer.button_pressed(egui_button) {
                        events.push(PointerEvent::Down {
                            x: local.x,
                            y: local.y,
                            button,
                        });
                    }
                }

                let scroll = input.raw_scroll_delta.y;
                if scroll.abs() > f32::EPSILON {
                    events.push(PointerEvent::Wheel {
                        delta: scroll,
                        x: local.x,
                        y: local.y,
                    });
                }
            }

            if input.pointer.any_released() {
                events.push(PointerEvent::Up {
                    x: local.x,
                    y: local.y,
                });
            }
        });

        events
    }

    pub(in crate::app) fn dispatch_pointer_events(&mut self, events: Vec<PointerEvent>) {
        for event in events {
            let outcome = self.controller.handle(self.animator.engine(), event);
            self.animator.submit_all(outcome.commands);

            for emitted in outcome.events {
                match emitted {
                    InteractionEvent::Hover(summary) => self.hovered = summary,
                    InteractionEvent::Click(node) => {
                        tracing::debug!(id = %node.id, "entity clicked");
                        self.set_selected(Some(node.id));
                    }
                }
            }

            self.pointer_inside = !matches!(event, PointerEvent::Leave);
        }
    }
}
