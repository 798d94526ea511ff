mod app;
mod config;
mod gpu;
mod input;
mod schematic;
mod simulation;

use winit::event_loop::{ControlFlow, EventLoop};

use app::App;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop terminated with error: {}", e);
    }
}
