// ============================================
// App - Оконная оболочка
// ============================================
// Создаёт окно, инициализирует рендерер, гоняет цикл
// update -> render и пробрасывает ввод в камеру.

use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::camera::Rig;
use crate::core::config::RenderOptions;
use crate::demo;
use crate::render::Renderer;

pub struct App {
    options: RenderOptions,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    rig: Rig,
    last_frame: Instant,
}

impl App {
    pub fn new(options: RenderOptions) -> Self {
        let rig = Rig::from_options(&options);
        Self {
            options,
            window: None,
            renderer: None,
            rig,
            last_frame: Instant::now(),
        }
    }

    fn grab_cursor(window: &Window) {
        let grabbed = window
            .set_cursor_grab(winit::window::CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(winit::window::CursorGrabMode::Confined));
        if grabbed.is_ok() {
            window.set_cursor_visible(false);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title(self.options.window_title.as_str())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.options.window_width,
                    self.options.window_height,
                ));

            let window = Arc::new(event_loop.create_window(window_attrs).unwrap());

            match pollster::block_on(Renderer::new(Arc::clone(&window), &self.options)) {
                Ok(renderer) => self.renderer = Some(renderer),
                Err(e) => {
                    log::error!("Renderer init failed: {}", e);
                    event_loop.exit();
                    return;
                }
            }

            if let Some(renderer) = &mut self.renderer {
                if let Err(e) = demo::populate(renderer) {
                    log::error!("Demo scene setup failed: {}", e);
                }
                if !renderer.atlas_ready() {
                    log::warn!("No atlas installed, rendering with the placeholder");
                }
            }

            Self::grab_cursor(&window);
            self.window = Some(window);
            self.last_frame = Instant::now();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(keycode),
                        state,
                        ..
                    },
                ..
            } => {
                let pressed = state == ElementState::Pressed;
                if keycode == KeyCode::Escape && pressed {
                    event_loop.exit();
                    return;
                }
                self.rig.process_keyboard(keycode, pressed);
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.last_frame).as_secs_f32();
                self.last_frame = now;

                self.rig.update(dt);

                if let Some(renderer) = &mut self.renderer {
                    renderer.update(self.rig.as_camera());

                    match renderer.render() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            let size = renderer.size();
                            renderer.resize(size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory, exiting");
                            event_loop.exit();
                        }
                        Err(e) => eprintln!("Render error: {:?}", e),
                    }
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        match event {
            DeviceEvent::MouseMotion { delta } => {
                self.rig.process_mouse(delta.0, delta.1);
            }

            DeviceEvent::MouseWheel { delta } => {
                let amount = match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => y,
                    winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.rig.process_scroll(amount);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Запуск приложения
pub fn run(options: RenderOptions) {
    env_logger::init();
    log::info!(
        "Starting with {:?} camera, fov {:.2} rad",
        options.camera,
        options.fovy
    );

    println!("=== Controls ===");
    println!("WASD - Move (fly camera)");
    println!("Mouse - Look around / orbit");
    println!("Space/Shift - Fly up/down");
    println!("Mouse wheel - Zoom (orbit camera)");
    println!("Escape - Quit");
    println!("================");

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(options);
    event_loop.run_app(&mut app).unwrap();
}
