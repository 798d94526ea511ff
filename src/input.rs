use winit::keyboard::KeyCode;

use crate::simulation::Command;

/// Key bindings, printed at startup
pub const CONTROLS: &[&str] = &[
    "  Q/A: Accelerating voltage +100 V / -1000 V",
    "  W/S or Up/Down: Vertical plates +/-5 V",
    "  E/D or Right/Left: Horizontal plates +/-5 V",
    "  R/F: Persistence +/-0.5 s",
    "  T/G: Vertical sine frequency +/-0.1 Hz",
    "  Y/H: Horizontal sine frequency +/-0.1 Hz",
    "  U/J: Vertical sine phase +/-0.1 rad",
    "  I/K: Horizontal sine phase +/-0.1 rad",
    "  Space/M: Toggle manual/sinusoidal drive",
    "  Backspace: Clear the phosphor trace",
    "  Escape: Quit",
];

/// Map a pressed key to the control command it triggers
pub fn command_for_key(key_code: KeyCode) -> Option<Command> {
    let command = match key_code {
        KeyCode::KeyQ => Command::IncrementAccel,
        KeyCode::KeyA => Command::DecrementAccel,

        KeyCode::KeyW | KeyCode::ArrowUp => Command::IncrementVertical,
        KeyCode::KeyS | KeyCode::ArrowDown => Command::DecrementVertical,
        KeyCode::KeyE | KeyCode::ArrowRight => Command::IncrementHorizontal,
        KeyCode::KeyD | KeyCode::ArrowLeft => Command::DecrementHorizontal,

        KeyCode::KeyR => Command::IncrementPersistence,
        KeyCode::KeyF => Command::DecrementPersistence,

        KeyCode::KeyT => Command::IncrementVFreq,
        KeyCode::KeyG => Command::DecrementVFreq,
        KeyCode::KeyY => Command::IncrementHFreq,
        KeyCode::KeyH => Command::DecrementHFreq,

        KeyCode::KeyU => Command::IncrementVPhase,
        KeyCode::KeyJ => Command::DecrementVPhase,
        KeyCode::KeyI => Command::IncrementHPhase,
        KeyCode::KeyK => Command::DecrementHPhase,

        KeyCode::Space | KeyCode::KeyM => Command::ToggleMode,

        _ => return None,
    };
    Some(command)
}
