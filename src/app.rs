//! The viewer application: window, frame loop, and input routing.
//!
//! This is deliberately a thin layer. Every winit callback is mapped
//! onto an [`InputEvent`] and handed to [`apply_input`]; the actual
//! camera math, render state transitions, and draw submission live in
//! their own modules.

use std::sync::Arc;

use anyhow::Context;
use log::error;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::KeyCode,
    window::{Window, WindowAttributes},
};

use cgmath::Vector3;

use crate::gfx::{
    camera::{
        camera_controller::CameraController,
        camera_utils::CameraManager,
        orbit_camera::{OrbitCamera, DEFAULT_DISTANCE, DEFAULT_PITCH, DEFAULT_YAW},
    },
    render_state::RenderState,
    rendering::RenderEngine,
    scene::{Scene, SceneNode},
};
use crate::input::{apply_input, InputEvent};

pub struct ViewerApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    render_state: RenderState,
}

impl ViewerApp {
    pub fn new() -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;

        let camera = OrbitCamera::new(
            DEFAULT_DISTANCE,
            DEFAULT_PITCH,
            DEFAULT_YAW,
            Vector3::new(0.0, 0.0, 0.0),
            1.0,
        );
        let controller = CameraController::new(0.005, 1.0);
        let scene = Scene::new(CameraManager::new(camera, controller));

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                scene,
                render_state: RenderState::new(),
            },
        })
    }

    /// Installs a loaded scene graph and frames the camera on it.
    pub fn set_scene(&mut self, root: SceneNode) {
        self.app_state.scene.set_root(root);
        self.app_state.scene.frame_camera();
    }

    /// Runs the event loop until the user quits.
    pub fn run(mut self) -> anyhow::Result<()> {
        print_help();

        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated abnormally")?;
        Ok(())
    }
}

impl AppState {
    fn dispatch(&mut self, event: InputEvent) {
        let bounds = self.scene.bounds();
        apply_input(
            &mut self.scene.camera_manager.camera,
            &mut self.render_state,
            bounds,
            event,
        );
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            WindowAttributes::default()
                .with_title("stageview")
                .with_inner_size(winit::dpi::LogicalSize::new(1280, 720)),
        ) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        let engine = {
            let window = window.clone();
            pollster::block_on(async move { RenderEngine::new(window, width, height).await })
        };

        match engine {
            Ok(mut engine) => {
                engine.upload_scene(self.scene.entries());
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                self.render_engine = Some(engine);
            }
            Err(err) => {
                // Startup is the only place a graphics failure is fatal.
                error!("failed to initialize renderer: {err:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        state: winit::event::ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if matches!(key_code, KeyCode::Escape | KeyCode::KeyQ) {
                    event_loop.exit();
                    return;
                }
                if let Some(input) = map_key(key_code) {
                    self.dispatch(input);
                    window.request_redraw();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(engine) = self.render_engine.as_mut() {
                    engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let Some(engine) = self.render_engine.as_mut() else {
                    return;
                };
                self.scene.update();
                engine.update(self.scene.camera_manager.camera.uniform, &self.render_state);
                engine.render_frame(&self.render_state);
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        if let Some(input) = self.scene.camera_manager.map_device_event(&event) {
            self.dispatch(input);
            window.request_redraw();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

/// Fixed key bindings for the discrete viewer actions. Quit is handled
/// directly by the frame loop.
fn map_key(key: KeyCode) -> Option<InputEvent> {
    match key {
        KeyCode::Tab => Some(InputEvent::CycleDrawMode),
        KeyCode::KeyG => Some(InputEvent::ToggleGrid),
        KeyCode::KeyA => Some(InputEvent::ToggleAxes),
        KeyCode::KeyL => Some(InputEvent::ToggleLighting),
        KeyCode::KeyF => Some(InputEvent::FrameScene),
        KeyCode::KeyR => Some(InputEvent::ResetCamera),
        _ => None,
    }
}

fn print_help() {
    println!(
        "\n=== stageview controls ===\n\
         mouse:\n\
         \x20 left drag    orbit\n\
         \x20 right drag   pan\n\
         \x20 middle drag  zoom\n\
         \x20 scroll       zoom\n\
         keys:\n\
         \x20 Tab          cycle draw mode (shaded / wireframe / points)\n\
         \x20 G            toggle grid\n\
         \x20 A            toggle axes\n\
         \x20 L            toggle lighting\n\
         \x20 F            frame scene\n\
         \x20 R            reset camera\n\
         \x20 Q / Escape   quit\n"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::render_state::DrawMode;

    #[test]
    fn key_bindings_cover_the_contract() {
        assert_eq!(map_key(KeyCode::Tab), Some(InputEvent::CycleDrawMode));
        assert_eq!(map_key(KeyCode::KeyG), Some(InputEvent::ToggleGrid));
        assert_eq!(map_key(KeyCode::KeyA), Some(InputEvent::ToggleAxes));
        assert_eq!(map_key(KeyCode::KeyL), Some(InputEvent::ToggleLighting));
        assert_eq!(map_key(KeyCode::KeyF), Some(InputEvent::FrameScene));
        assert_eq!(map_key(KeyCode::KeyR), Some(InputEvent::ResetCamera));
        assert_eq!(map_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn key_sequence_drives_state_machine() {
        let mut camera = OrbitCamera::new(5.0, 0.4, 0.2, Vector3::new(0.0, 0.0, 0.0), 1.0);
        let mut render_state = RenderState::new();

        for key in [KeyCode::Tab, KeyCode::Tab, KeyCode::KeyG, KeyCode::KeyR] {
            if let Some(event) = map_key(key) {
                apply_input(&mut camera, &mut render_state, None, event);
            }
        }

        assert_eq!(render_state.draw_mode, DrawMode::Points);
        assert!(!render_state.show_grid);
        assert_eq!(camera.distance, DEFAULT_DISTANCE);
    }
}
