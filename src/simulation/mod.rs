mod deflection;
mod drive;
mod engine;
mod trace;

pub use drive::{Command, DriveMode};
pub use engine::{Frame, Simulator};
