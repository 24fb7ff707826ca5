use cgmath::Vector2;
use log::{error, info};
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::gfx::{
    camera::StageCamera,
    rendering::RenderEngine,
    ui::{panel, UiManager},
};
use crate::interaction::{InteractionController, PointerEvent, PointerTracker};
use crate::view::{dispatch, loader::ImageFileSource, ControlLabels, StageScene, ViewAssembler};

pub struct MeshViewApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

/// Stage content plus the controller driving it.
struct Viewer {
    scene: StageScene,
    controller: InteractionController,
    camera: StageCamera,
}

impl Viewer {
    fn touch(&mut self, (phase, position): PointerEvent) {
        let tag = self.scene.classify(position);
        self.controller
            .on_touch(tag, phase, position, &mut self.scene);
    }

    fn resize(&mut self, extent: Vector2<f32>) {
        self.camera.resize(extent);
        self.scene.resize(extent);
        self.controller.resize(extent, &mut self.scene);
    }
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    viewer: Option<Viewer>,
    pointer: PointerTracker,
    last_frame: Instant,
    error: Option<ViewerError>,
}

impl MeshViewApp {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                viewer: None,
                pointer: PointerTracker::new(),
                last_frame: Instant::now(),
                error: None,
            },
        })
    }

    /// Runs until the window closes. Start-up failures inside the loop are
    /// returned once it exits.
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.config.window_size;
        let window = Arc::new(
            event_loop.create_window(
                WindowAttributes::default()
                    .with_title(self.config.title.clone())
                    .with_inner_size(LogicalSize::new(width, height)),
            )?,
        );

        let (width, height): (u32, u32) = window.inner_size().into();
        let render_engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.config.vsync,
            self.config.background_color,
        ))?;

        let mut ui_manager = UiManager::new(
            render_engine.device(),
            render_engine.queue(),
            render_engine.surface_format(),
            &window,
        );
        ui_manager.update_display_size(width, height);

        let extent = Vector2::new(width as f32, height as f32);
        let assembler = ViewAssembler::new(
            render_engine.device_handle(),
            render_engine.queue_handle(),
            render_engine.layouts().clone(),
        );
        let mut scene = StageScene::new(&self.config, assembler, Box::new(ImageFileSource), extent);
        let mut controller = InteractionController::new(&self.config, extent, scene.animations());
        controller.initialize(&mut scene);
        info!("Viewer ready at {}x{}", width, height);

        self.viewer = Some(Viewer {
            scene,
            controller,
            camera: StageCamera::new(extent),
        });
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(render_engine);
        self.window = Some(window);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: ViewerError) {
        error!("{}", e);
        self.error = Some(e);
        event_loop.exit();
    }

    fn forward_pointer(&mut self, event: Option<PointerEvent>) {
        if let (Some(viewer), Some(event)) = (self.viewer.as_mut(), event) {
            viewer.touch(event);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(render_engine), Some(viewer)) = (
            self.window.as_ref(),
            self.render_engine.as_mut(),
            self.viewer.as_mut(),
        ) else {
            return;
        };

        let now = Instant::now();
        let delta_time = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let mut action = None;
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let labels = ControlLabels::from_controller(&viewer.controller);
            ui_manager.update_logic(window, |ui| action = panel::controls(ui, labels));
        }
        if let Some(action) = action {
            dispatch(action, &mut viewer.controller, &mut viewer.scene);
        }

        viewer.scene.update(delta_time);
        render_engine.update(
            viewer.camera.build_view_projection_matrix(),
            viewer.scene.light_position(),
        );

        let batches = viewer.scene.batches();
        let result = match self.ui_manager.as_mut() {
            Some(ui_manager) => render_engine.render_frame(
                &batches,
                Some(
                    |device: &wgpu::Device,
                     queue: &wgpu::Queue,
                     encoder: &mut wgpu::CommandEncoder,
                     color_attachment: &wgpu::TextureView| {
                        ui_manager.render_display_only(device, queue, encoder, color_attachment);
                    },
                ),
            ),
            None => render_engine.render_frame(
                &batches,
                None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
            ),
        };

        if let Err(e) = result {
            self.fail(event_loop, e);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // UI first; a press that started on the stage keeps the pointer.
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) && !self.pointer.is_pressed() {
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if width == 0 || height == 0 {
                    return;
                }
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
                if let Some(viewer) = self.viewer.as_mut() {
                    viewer.resize(Vector2::new(width as f32, height as f32));
                }
            }
            WindowEvent::CursorMoved {
                position: PhysicalPosition { x, y },
                ..
            } => {
                let event = self.pointer.cursor_moved(Vector2::new(x as f32, y as f32));
                self.forward_pointer(event);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.pointer.mouse_input(state, button);
                self.forward_pointer(event);
            }
            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                let event = self.pointer.interrupt();
                self.forward_pointer(event);
            }
            WindowEvent::Touch(touch) => {
                let position = Vector2::new(touch.location.x as f32, touch.location.y as f32);
                let event = self.pointer.touch(touch.id, touch.phase, position);
                self.forward_pointer(event);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
