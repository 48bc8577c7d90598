use std::sync::Arc;
use std::time::Instant;

use glam::{Mat4, Vec2};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::camera::OrbitCamera;
use crate::config::{GRID_SCALE, PARTICLE_COUNT, SPIN_RATE};
use crate::gpu::{GpuContext, PointBuffers, PointPipeline};
use crate::picking::{intersect_height_surface, ray_from_screen};
use crate::simulation::{HeightField, HeightFunction};

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    buffers: Option<PointBuffers>,
    pipeline: Option<PointPipeline>,
    field: HeightField,
    camera: OrbitCamera,
    /// Last pointer position in physical pixels; None until the pointer
    /// enters the window and after it leaves
    cursor: Option<Vec2>,
    /// Cloud rotation about +Y, advanced once per frame
    spin: f32,
    fps_counter: FpsCounter,
}

impl App {
    pub fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            buffers: None,
            pipeline: None,
            field: HeightField::new(PARTICLE_COUNT, GRID_SCALE, HeightFunction::Interference),
            camera: OrbitCamera::new(),
            cursor: None,
            spin: 0.0,
            fps_counter: FpsCounter::new(),
        }
    }

    /// One frame: sample the cursor, update the field, upload, render.
    /// The field update completes for every particle before the upload, and
    /// the vertex buffer is written exactly once.
    fn render(&mut self) {
        let gpu = self.gpu.as_ref().unwrap();
        let buffers = self.buffers.as_ref().unwrap();
        let pipeline = self.pipeline.as_ref().unwrap();

        let aspect = gpu.aspect();
        let view = self.camera.view();
        let proj = self.camera.proj(aspect);

        // Cursor ray against the animated surface, in lattice space (the
        // spin is undone on the ray rather than applied to the particles).
        // No intersection is a normal outcome; the field then animates
        // undisturbed.
        let cursor_hit = self.cursor.and_then(|px| {
            let ray = ray_from_screen(
                px,
                gpu.config.width as f32,
                gpu.config.height as f32,
                view,
                proj,
            );
            let ray = ray.transformed(Mat4::from_rotation_y(-self.spin));
            intersect_height_surface(&ray, &self.field)
        });

        self.field.step(cursor_hit);
        self.spin += SPIN_RATE;

        // Single upload per frame, after all particles are updated
        buffers.upload_vertices(&gpu.queue, self.field.vertices());
        buffers.update_camera(&gpu.queue, proj * view, Mat4::from_rotation_y(self.spin));

        // Get surface texture
        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure surface
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        let bind_group = pipeline.create_bind_group(&gpu.device, &buffers.camera_buffer);
        pipeline.draw(
            &mut encoder,
            &target,
            gpu.depth_view(),
            &bind_group,
            &buffers.vertex_buffer,
            buffers.vertex_count(),
        );

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        // Update and display FPS
        if let Some(fps) = self.fps_counter.tick() {
            if let Some(window) = &self.window {
                window.set_title(&format!(
                    "Wave Grid - {:.0} FPS - {}",
                    fps,
                    self.field.active().label()
                ));
            }
        }
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        match key_code {
            // Select the active height function; the field resets onto the
            // new function's rest state so the switch lands without a jump
            KeyCode::Digit1 => self.switch_function(HeightFunction::DoubleSine),
            KeyCode::Digit2 => self.switch_function(HeightFunction::Interference),
            KeyCode::Digit3 => self.switch_function(HeightFunction::Radial),
            KeyCode::Digit4 => self.switch_function(HeightFunction::SaddleTwist),

            // Reset the current function to its rest state
            KeyCode::KeyR => {
                self.field.reset();
                log::info!("Field reset");
            }

            _ => {}
        }
    }

    fn switch_function(&mut self, f: HeightFunction) {
        if self.field.active() != f {
            self.field.set_active(f);
            log::info!("Switched to {}", f.label());
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing Wave Grid...");
        log::info!(
            "Lattice: {}x{} particles over {}x{} world units",
            self.field.grid_size(),
            self.field.grid_size(),
            GRID_SCALE,
            GRID_SCALE
        );

        // Create window
        let window_attrs = Window::default_attributes()
            .with_title("Wave Grid - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        // Initialize GPU
        log::info!("Creating GPU context...");
        let gpu = pollster::block_on(GpuContext::new(window.clone()));

        log::info!("Creating point buffers...");
        let buffers = PointBuffers::new(&gpu.device, &gpu.queue, self.field.vertices());

        log::info!("Creating point pipeline...");
        let pipeline = PointPipeline::new(&gpu.device, gpu.format());

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  1-4: Height function (double sine / interference / radial / saddle twist)");
        log::info!("  R: Reset the field");
        log::info!("  Mouse: Press the surface down around the cursor");
        log::info!("  Escape: Quit");

        window.request_redraw();

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.buffers = Some(buffers);
        self.pipeline = Some(pipeline);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    gpu.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                if self.gpu.is_some() {
                    self.render();
                }
                // Request another frame immediately
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}
