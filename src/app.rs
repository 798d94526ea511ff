use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::{MAX_TRACE_POINTS, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};
use crate::gpu::{FrameBuffers, GpuContext, RenderPipeline};
use crate::input::{command_for_key, CONTROLS};
use crate::simulation::{Command, DriveMode, Simulator};

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    frame_buffers: Option<FrameBuffers>,
    render_pipeline: Option<RenderPipeline>,
    bind_group: Option<wgpu::BindGroup>,
    simulator: Simulator,
    /// Commands collected since the last frame
    pending: Vec<Command>,
    last_frame: Option<Instant>,
    title: TitleStatus,
}

impl App {
    pub fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            frame_buffers: None,
            render_pipeline: None,
            bind_group: None,
            simulator: Simulator::new(),
            pending: Vec::new(),
            last_frame: None,
            title: TitleStatus::starting_at(Instant::now()),
        }
    }

    fn render(&mut self) {
        let (Some(gpu), Some(buffers), Some(pipeline), Some(bind_group)) = (
            self.gpu.as_ref(),
            self.frame_buffers.as_mut(),
            self.render_pipeline.as_ref(),
            self.bind_group.as_ref(),
        ) else {
            return;
        };

        let now = Instant::now();
        let dt = self
            .last_frame
            .replace(now)
            .map_or(0.0, |prev| now.duration_since(prev).as_secs_f64());

        // Advance the tube, then hand the frame to the GPU
        let mode_before = self.simulator.frame().mode;
        let had_commands = !self.pending.is_empty();
        let frame = self.simulator.tick(dt, self.pending.drain(..));

        if frame.mode != mode_before {
            log::info!("Switched to {} mode", frame.mode.name());
        }
        if had_commands {
            log::info!("{}", frame.status_line());
        }

        buffers.upload(&gpu.queue, &frame);
        let status = frame.status_line();
        let beam = frame.beam;

        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        pipeline.draw(&mut encoder, &view, bind_group, buffers);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some((fps, title)) = self.title.frame_presented(Instant::now(), &status) {
            log::debug!(
                "{:.0} FPS, {}/{} trace points stored, {} drawn, beam at ({:.3}, {:.3})",
                fps,
                self.simulator.trace().len(),
                MAX_TRACE_POINTS,
                buffers.trace_count(),
                beam.x,
                beam.y
            );
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
        }
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        if key_code == KeyCode::Backspace {
            let dropped = self.simulator.clear_trace();
            log::info!("Cleared {} trace points", dropped);
        } else if let Some(command) = command_for_key(key_code) {
            log::debug!("Queued {:?}", command);
            self.pending.push(command);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing {}...", WINDOW_TITLE);

        let window_attrs = Window::default_attributes()
            .with_title(format!("{} - Initializing...", WINDOW_TITLE))
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        log::info!("Creating GPU context...");
        let gpu = pollster::block_on(GpuContext::new(window.clone()));

        log::info!("Creating buffers and pipelines...");
        let frame_buffers = FrameBuffers::new(&gpu.device, &gpu.queue);
        let render_pipeline = RenderPipeline::new(&gpu.device, gpu.format());
        let bind_group =
            render_pipeline.create_bind_group(&gpu.device, &frame_buffers.screen_params_buffer);

        log::info!("Initialization complete!");
        log::info!("Controls:");
        for line in CONTROLS {
            log::info!("{}", line);
        }
        log::info!("{}", self.simulator.frame().status_line());
        if self.simulator.frame().mode == DriveMode::Manual {
            log::info!("Starting in manual drive; press Space for the sine generator");
        }

        window.request_redraw();

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.frame_buffers = Some(frame_buffers);
        self.render_pipeline = Some(render_pipeline);
        self.bind_group = Some(bind_group);
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
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    gpu.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
                // Vsync in present() paces the loop
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Refreshes the window title with the frame rate and the control readout
struct TitleStatus {
    window_start: Instant,
    frames: u32,
}

impl TitleStatus {
    fn starting_at(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
        }
    }

    /// Count a frame presented at `now`.
    ///
    /// Once at least a second has passed since the last refresh, returns the
    /// measured rate and the title to show, and starts a new window.
    fn frame_presented(&mut self, now: Instant, status: &str) -> Option<(f64, String)> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start).as_secs_f64();
        if elapsed < 1.0 {
            return None;
        }

        let fps = self.frames as f64 / elapsed;
        self.frames = 0;
        self.window_start = now;
        Some((fps, format!("{} - {:.0} FPS - {}", WINDOW_TITLE, fps, status)))
    }
}
