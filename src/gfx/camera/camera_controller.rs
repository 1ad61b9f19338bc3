//! Translates raw pointer input into viewer input events.
//!
//! Tracks which buttons are held so motion deltas can be tagged with
//! the drag they belong to, and applies the sensitivity scaling before
//! an event leaves this module.

use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, MouseScrollDelta},
};

use crate::input::{DragButton, InputEvent};

pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Tertiary-drag zoom rate, in zoom steps per pixel.
    pub drag_zoom_speed: f32,
    primary_pressed: bool,
    secondary_pressed: bool,
    tertiary_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.002,
            drag_zoom_speed: 0.02,
            primary_pressed: false,
            secondary_pressed: false,
            tertiary_pressed: false,
        }
    }

    /// Maps one device event onto a viewer input event, if any.
    ///
    /// Button presses only update drag state and produce no event
    /// themselves; motion while a button is held produces the matching
    /// drag with speed-scaled deltas.
    pub fn map_device_event(&mut self, event: &DeviceEvent) -> Option<InputEvent> {
        match event {
            DeviceEvent::Button { button, state } => {
                let pressed = *state == ElementState::Pressed;
                match button {
                    0 => self.primary_pressed = pressed,
                    1 => self.secondary_pressed = pressed,
                    2 => self.tertiary_pressed = pressed,
                    _ => {}
                }
                None
            }
            DeviceEvent::MouseWheel { delta } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32 / 20.0
                    }
                };
                Some(InputEvent::Scroll {
                    delta: scroll * self.zoom_speed,
                })
            }
            DeviceEvent::MouseMotion { delta } => {
                let (dx, dy) = (delta.0 as f32, delta.1 as f32);
                if self.primary_pressed {
                    Some(InputEvent::Drag {
                        button: DragButton::Primary,
                        dx: dx * self.rotate_speed,
                        dy: dy * self.rotate_speed,
                    })
                } else if self.secondary_pressed {
                    Some(InputEvent::Drag {
                        button: DragButton::Secondary,
                        dx: dx * self.pan_speed,
                        dy: dy * self.pan_speed,
                    })
                } else if self.tertiary_pressed {
                    Some(InputEvent::Drag {
                        button: DragButton::Tertiary,
                        dx: dx * self.drag_zoom_speed,
                        dy: dy * self.drag_zoom_speed,
                    })
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.primary_pressed || self.secondary_pressed || self.tertiary_pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: u32) -> DeviceEvent {
        DeviceEvent::Button {
            button,
            state: ElementState::Pressed,
        }
    }

    fn motion(dx: f64, dy: f64) -> DeviceEvent {
        DeviceEvent::MouseMotion { delta: (dx, dy) }
    }

    #[test]
    fn motion_without_button_is_ignored() {
        let mut controller = CameraController::new(0.005, 1.0);
        assert_eq!(controller.map_device_event(&motion(10.0, 0.0)), None);
    }

    #[test]
    fn motion_is_tagged_by_held_button_and_scaled() {
        let mut controller = CameraController::new(0.25, 1.0);
        controller.map_device_event(&press(0));
        assert_eq!(
            controller.map_device_event(&motion(8.0, 4.0)),
            Some(InputEvent::Drag {
                button: DragButton::Primary,
                dx: 2.0,
                dy: 1.0,
            })
        );

        controller.map_device_event(&DeviceEvent::Button {
            button: 0,
            state: ElementState::Released,
        });
        controller.map_device_event(&press(1));
        let event = controller.map_device_event(&motion(10.0, 0.0));
        assert!(matches!(
            event,
            Some(InputEvent::Drag {
                button: DragButton::Secondary,
                ..
            })
        ));
    }

    #[test]
    fn scroll_scales_by_zoom_speed() {
        let mut controller = CameraController::new(0.005, 2.0);
        let event = controller.map_device_event(&DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, 1.5),
        });
        assert_eq!(event, Some(InputEvent::Scroll { delta: 3.0 }));
    }
}
