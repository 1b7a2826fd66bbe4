//! Window, GL context and the per-frame sequence

use std::{num::NonZeroU32, rc::Rc, sync::Arc};

use blender_camera::{Camera, CameraController, CameraInput, Gesture};
use dear_imgui_mesh::{GlTexture, GlowDevice, MeshRenderer};
use dear_imgui_poll::{HostMouseButton, InputSource, PollPlatform, WinitInput};
use dear_imgui_rs::Context;
use glam::Vec2;
use glutin::{
    config::{Config, ConfigTemplateBuilder, GlConfig},
    context::{ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext},
    display::{GetGlDisplay, GlDisplay},
    surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface},
};
use raw_window_handle::HasWindowHandle;
use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::{
    clipboard::ArboardClipboard,
    config::ViewerConfig,
    error::{ViewerError, ViewerResult},
    panel::{Panel, PanelStats},
    scene::{Scene, SceneSettings},
};

struct ImguiState {
    context: Context,
    platform: PollPlatform,
    renderer: MeshRenderer<GlTexture>,
    panel: Panel,
}

struct AppWindow {
    window: Arc<Window>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    device: GlowDevice,
    input: WinitInput,
    scene: Scene,
    imgui: ImguiState,
    camera: Camera,
    controller: CameraController,
    settings: SceneSettings,
    last_gesture: Option<Gesture>,
}

/// Pick the config with the most samples, as glutin-winit's examples do
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, config| {
            if config.num_samples() > best.num_samples() {
                config
            } else {
                best
            }
        })
        .expect("no OpenGL config matches the template")
}

/// Edges and the wheel belong to one frame, failed or not
fn end_input_frame<T>(input: &mut WinitInput, result: ViewerResult<T>) -> ViewerResult<T> {
    input.end_frame();
    result
}

fn non_zero(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap_or(NonZeroU32::MIN)
}

impl AppWindow {
    fn new(event_loop: &ActiveEventLoop, config: &ViewerConfig) -> ViewerResult<Self> {
        let (width, height) = config.window_size;
        let window_attributes = Window::default_attributes()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(width, height))
            .with_resizable(true);

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (window, gl_config) = glutin_winit::DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes))
            .build(event_loop, template, pick_config)
            .map_err(|e| ViewerError::WindowCreation(e.to_string()))?;
        let window = Arc::new(
            window.ok_or_else(|| ViewerError::WindowCreation("no window was created".into()))?,
        );

        let context_attribs =
            ContextAttributesBuilder::new().build(Some(window.window_handle()?.as_raw()));
        let context = unsafe {
            gl_config
                .display()
                .create_context(&gl_config, &context_attribs)?
        };

        let size = window.inner_size();
        let surface_attribs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            window.window_handle()?.as_raw(),
            non_zero(size.width),
            non_zero(size.height),
        );
        let surface = unsafe {
            gl_config
                .display()
                .create_window_surface(&gl_config, &surface_attribs)?
        };
        let context = context.make_current(&surface)?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(err) = surface.set_swap_interval(&context, interval) {
            warn!("Failed to set swap interval: {err}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|s| {
                context.display().get_proc_address(s).cast()
            })
        };
        let mut device = GlowDevice::new(Rc::new(gl))?;
        info!("OpenGL device ready: {:?}", device.gl_version());

        // Setup Dear ImGui
        let mut imgui_context = Context::create();
        let platform = PollPlatform::new(&mut imgui_context);
        if let Some(clipboard) = ArboardClipboard::open() {
            platform.attach_clipboard(&mut imgui_context, clipboard);
        }
        let mut renderer = MeshRenderer::new();
        renderer.configure_context(&mut imgui_context);

        let scene = Scene::new(
            &mut device,
            config.grid_slices,
            config.grid_spacing,
            config.cube_color,
        )?;
        let panel = match Panel::new(&mut device, &mut renderer) {
            Ok(panel) => panel,
            Err(err) => {
                scene.release(&mut device);
                return Err(err.into());
            }
        };

        Ok(Self {
            input: WinitInput::new(&window),
            window,
            surface,
            context,
            device,
            scene,
            imgui: ImguiState {
                context: imgui_context,
                platform,
                renderer,
                panel,
            },
            camera: Camera::default(),
            controller: CameraController::new(config.sensitivity),
            settings: SceneSettings {
                cube_size: config.cube_size,
                cube_color: config.cube_color,
                wireframe: false,
            },
            last_gesture: None,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.surface.resize(
                &self.context,
                non_zero(new_size.width),
                non_zero(new_size.height),
            );
        }
    }

    /// Feed the camera this frame's mouse, unless the UI owns it
    fn update_camera(&mut self) {
        if PollPlatform::wants_mouse(&self.imgui.context) {
            // Start from a fresh sample once the UI lets go
            self.controller.reset_tracking();
            self.last_gesture = None;
            return;
        }

        let [x, y] = self.input.mouse_position();
        let input = CameraInput {
            mouse_position: Vec2::new(x, y),
            wheel: self.input.mouse_wheel(),
            right_down: self.input.is_mouse_button_down(HostMouseButton::Right),
            middle_down: self.input.is_mouse_button_down(HostMouseButton::Middle),
            shift_down: self.input.is_shift_down(),
        };
        self.last_gesture = self.controller.update(&mut self.camera, &input);
    }

    fn render(&mut self, config: &ViewerConfig) -> ViewerResult<()> {
        self.input.begin_frame();
        let result = self.draw_frame(config);
        end_input_frame(&mut self.input, result)
    }

    fn draw_frame(&mut self, config: &ViewerConfig) -> ViewerResult<()> {
        self.imgui
            .platform
            .prepare_frame(&mut self.input, self.imgui.context.io_mut());

        self.update_camera();

        let size = self.window.inner_size();
        self.device.clear(config.clear_color);
        if size.width > 0 && size.height > 0 {
            self.scene.draw(
                &mut self.device,
                &self.camera,
                &self.settings,
                [size.width, size.height],
            )?;
        }

        let ui_stats = self.imgui.renderer.last_frame_stats();
        let stats = PanelStats {
            framerate: self.imgui.context.io().framerate(),
            ui_draw_calls: ui_stats.draw_calls,
            ui_culled: ui_stats.culled,
            last_gesture: self.last_gesture,
        };
        let ui = self.imgui.context.frame();
        let actions = self
            .imgui
            .panel
            .build(ui, &stats, &mut self.settings, &self.camera);
        if actions.reset_camera {
            info!("Camera reset");
            self.camera = Camera::default();
            self.controller.reset_tracking();
        }

        let draw_data = self.imgui.context.render();
        self.imgui.renderer.render(&mut self.device, draw_data)?;

        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }

    /// Release every GL resource while the context is still current
    fn shutdown(self) {
        let AppWindow {
            mut device,
            scene,
            imgui,
            ..
        } = self;
        let ImguiState {
            panel,
            mut renderer,
            ..
        } = imgui;

        panel.destroy(&mut device, &mut renderer);
        renderer.destroy_textures(&mut device);
        scene.release(&mut device);
        device.destroy();
        info!("GPU resources released");
    }
}

struct App {
    config: ViewerConfig,
    window: Option<AppWindow>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            window: None,
        }
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.take() {
            window.shutdown();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            match AppWindow::new(event_loop, &self.config) {
                Ok(window) => {
                    self.window = Some(window);
                    info!("Window created successfully");
                }
                Err(e) => {
                    error!("Failed to create window: {e}");
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let window = match self.window.as_mut() {
            Some(window) => window,
            None => return,
        };

        window.input.handle_window_event(&event);

        match event {
            WindowEvent::Resized(physical_size) => {
                window.resize(physical_size);
                window.window.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = window.window.inner_size();
                window.resize(new_size);
                window.window.request_redraw();
            }
            WindowEvent::CloseRequested => {
                info!("Close requested");
                self.exit(event_loop);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let wants_keyboard = window.imgui.context.io().want_capture_keyboard();
                if event.logical_key == Key::Named(NamedKey::Escape) && !wants_keyboard {
                    self.exit(event_loop);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = window.render(&self.config) {
                    error!("Render error: {e}");
                }
                window.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.window.request_redraw();
        }
    }
}

/// Open the window and run until it is closed
pub fn run(config: ViewerConfig) -> ViewerResult<()> {
    let event_loop = EventLoop::new()?;
    // Redraw continuously; vsync paces the loop
    event_loop.set_control_flow(ControlFlow::Poll);

    info!("Starting orbit viewer event loop");
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use winit::event::{DeviceId, MouseScrollDelta, TouchPhase};

    #[test]
    fn failed_frame_does_not_replay_the_wheel() {
        let mut input = WinitInput::with_size(PhysicalSize::new(800, 600), 1.0);
        input.handle_window_event(&WindowEvent::MouseWheel {
            device_id: unsafe { DeviceId::dummy() },
            delta: MouseScrollDelta::LineDelta(0.0, 1.0),
            phase: TouchPhase::Moved,
        });
        assert_eq!(input.mouse_wheel(), 1.0);

        let failed: ViewerResult<()> = Err(ViewerError::WindowCreation("surface lost".into()));
        assert!(end_input_frame(&mut input, failed).is_err());
        assert_eq!(input.mouse_wheel(), 0.0);

        // The next frame sees no wheel, so the camera stays put
        let mut camera = Camera::default();
        let mut controller = CameraController::default();
        let next = CameraInput {
            mouse_position: Vec2::ZERO,
            wheel: input.mouse_wheel(),
            right_down: false,
            middle_down: false,
            shift_down: false,
        };
        assert_eq!(controller.update(&mut camera, &next), None);
        assert_eq!(camera.position, Camera::default().position);
    }
}
