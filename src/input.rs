//! Viewer input events and the state transition they drive.
//!
//! The frame loop never mutates camera or render state directly from
//! windowing callbacks. Callbacks are first translated into an
//! [`InputEvent`], then [`apply_input`] performs the mutation. That
//! keeps the whole control scheme a plain function over plain data,
//! testable without an event loop or a window.

use log::info;

use crate::gfx::{camera::orbit_camera::OrbitCamera, geometry::Aabb, render_state::RenderState};

/// Which pointer button a drag is tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragButton {
    Primary,
    Secondary,
    Tertiary,
}

/// A discrete input event, already scaled by the controller's
/// sensitivity settings where applicable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer drag, deltas in radians (primary), pan units (secondary),
    /// or zoom steps (tertiary).
    Drag {
        button: DragButton,
        dx: f32,
        dy: f32,
    },
    /// Scroll wheel, in zoom steps.
    Scroll { delta: f32 },
    CycleDrawMode,
    ToggleGrid,
    ToggleAxes,
    ToggleLighting,
    /// Frame the camera on the scene bounds.
    FrameScene,
    ResetCamera,
}

/// Applies one event to the viewer state.
///
/// Fixed mapping: primary drag orbits, secondary drag pans, tertiary
/// drag and scroll zoom; the discrete events drive the render state
/// machine and camera framing. `scene_bounds` backs `FrameScene`; an
/// empty scene resets the camera instead.
pub fn apply_input(
    camera: &mut OrbitCamera,
    render_state: &mut RenderState,
    scene_bounds: Option<Aabb>,
    event: InputEvent,
) {
    match event {
        InputEvent::Drag {
            button: DragButton::Primary,
            dx,
            dy,
        } => camera.orbit(-dx, dy),
        InputEvent::Drag {
            button: DragButton::Secondary,
            dx,
            dy,
        } => camera.pan(dx, dy),
        InputEvent::Drag {
            button: DragButton::Tertiary,
            dy,
            ..
        } => camera.zoom(dy),
        InputEvent::Scroll { delta } => camera.zoom(delta),
        InputEvent::CycleDrawMode => {
            render_state.cycle_draw_mode();
            info!("draw mode: {}", render_state.draw_mode.label());
        }
        InputEvent::ToggleGrid => {
            render_state.toggle_grid();
            info!("grid: {}", on_off(render_state.show_grid));
        }
        InputEvent::ToggleAxes => {
            render_state.toggle_axes();
            info!("axes: {}", on_off(render_state.show_axes));
        }
        InputEvent::ToggleLighting => {
            render_state.toggle_lighting();
            info!("lighting: {}", on_off(render_state.lighting));
        }
        InputEvent::FrameScene => match scene_bounds {
            Some(bounds) => camera.frame(bounds.min, bounds.max),
            None => camera.reset(),
        },
        InputEvent::ResetCamera => camera.reset(),
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::render_state::DrawMode;
    use cgmath::{InnerSpace, Vector3, Zero};

    fn state() -> (OrbitCamera, RenderState) {
        (
            OrbitCamera::new(5.0, 0.4, 0.2, Vector3::zero(), 1.0),
            RenderState::new(),
        )
    }

    #[test]
    fn primary_drag_orbits() {
        let (mut camera, mut render_state) = state();
        let yaw_before = camera.yaw;
        apply_input(
            &mut camera,
            &mut render_state,
            None,
            InputEvent::Drag {
                button: DragButton::Primary,
                dx: 0.1,
                dy: 0.05,
            },
        );
        assert!(camera.yaw != yaw_before);
        assert!((camera.pitch - 0.45).abs() < 1e-6);
    }

    #[test]
    fn secondary_drag_pans_target() {
        let (mut camera, mut render_state) = state();
        apply_input(
            &mut camera,
            &mut render_state,
            None,
            InputEvent::Drag {
                button: DragButton::Secondary,
                dx: 0.1,
                dy: 0.0,
            },
        );
        assert!(camera.target.magnitude() > 0.0);
    }

    #[test]
    fn scroll_and_tertiary_drag_both_zoom() {
        let (mut camera, mut render_state) = state();
        let before = camera.distance;
        apply_input(
            &mut camera,
            &mut render_state,
            None,
            InputEvent::Scroll { delta: 1.0 },
        );
        let after_scroll = camera.distance;
        assert!(after_scroll < before);

        apply_input(
            &mut camera,
            &mut render_state,
            None,
            InputEvent::Drag {
                button: DragButton::Tertiary,
                dx: 0.0,
                dy: -1.0,
            },
        );
        assert!(camera.distance > after_scroll);
    }

    #[test]
    fn discrete_events_drive_render_state() {
        let (mut camera, mut render_state) = state();
        apply_input(
            &mut camera,
            &mut render_state,
            None,
            InputEvent::CycleDrawMode,
        );
        assert_eq!(render_state.draw_mode, DrawMode::Wireframe);

        apply_input(&mut camera, &mut render_state, None, InputEvent::ToggleGrid);
        assert!(!render_state.show_grid);
        apply_input(
            &mut camera,
            &mut render_state,
            None,
            InputEvent::ToggleLighting,
        );
        assert!(!render_state.lighting);
        // Draw mode is untouched by the toggles.
        assert_eq!(render_state.draw_mode, DrawMode::Wireframe);
    }

    #[test]
    fn frame_scene_uses_bounds_or_resets() {
        let (mut camera, mut render_state) = state();
        let bounds = Aabb {
            min: Vector3::new(-1.0, -1.0, -1.0),
            max: Vector3::new(1.0, 1.0, 1.0),
        };
        apply_input(
            &mut camera,
            &mut render_state,
            Some(bounds),
            InputEvent::FrameScene,
        );
        assert_eq!(camera.target, Vector3::zero());
        let framed = camera.distance;

        camera.zoom(4.0);
        apply_input(&mut camera, &mut render_state, None, InputEvent::FrameScene);
        assert_eq!(
            camera.distance,
            crate::gfx::camera::orbit_camera::DEFAULT_DISTANCE
        );
        assert!(framed.is_finite());
    }
}
