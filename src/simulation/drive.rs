use std::f64::consts::TAU;

use crate::config::{
    ACCEL_VOLTAGE_INITIAL, ACCEL_VOLTAGE_MAX, ACCEL_VOLTAGE_MIN, ACCEL_VOLTAGE_STEP_DOWN,
    ACCEL_VOLTAGE_STEP_UP, PERSISTENCE_INITIAL, PERSISTENCE_MAX, PERSISTENCE_MIN,
    PERSISTENCE_STEP, PLATE_VOLTAGE_LIMIT, PLATE_VOLTAGE_STEP, SINE_AMPLITUDE,
    SINE_FREQUENCY_INITIAL, SINE_FREQUENCY_MAX, SINE_FREQUENCY_MIN, SINE_FREQUENCY_STEP,
    SINE_PHASE_MAX, SINE_PHASE_MIN, SINE_PHASE_STEP,
};

/// Where the plate voltages come from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriveMode {
    Manual,
    Sinusoidal,
}

impl DriveMode {
    pub fn name(&self) -> &'static str {
        match self {
            DriveMode::Manual => "Manual",
            DriveMode::Sinusoidal => "Sinusoidal",
        }
    }

    pub fn toggled(&self) -> DriveMode {
        match self {
            DriveMode::Manual => DriveMode::Sinusoidal,
            DriveMode::Sinusoidal => DriveMode::Manual,
        }
    }
}

/// Parameter adjustments issued by the control surface.
///
/// Every command is total: out-of-range requests saturate at the bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    IncrementAccel,
    DecrementAccel,
    IncrementVertical,
    DecrementVertical,
    IncrementHorizontal,
    DecrementHorizontal,
    IncrementPersistence,
    DecrementPersistence,
    IncrementVFreq,
    DecrementVFreq,
    IncrementHFreq,
    DecrementHFreq,
    IncrementVPhase,
    DecrementVPhase,
    IncrementHPhase,
    DecrementHPhase,
    ToggleMode,
}

#[cfg(test)]
impl Command {
    pub const ALL: [Command; 17] = [
        Command::IncrementAccel,
        Command::DecrementAccel,
        Command::IncrementVertical,
        Command::DecrementVertical,
        Command::IncrementHorizontal,
        Command::DecrementHorizontal,
        Command::IncrementPersistence,
        Command::DecrementPersistence,
        Command::IncrementVFreq,
        Command::DecrementVFreq,
        Command::IncrementHFreq,
        Command::DecrementHFreq,
        Command::IncrementVPhase,
        Command::DecrementVPhase,
        Command::IncrementHPhase,
        Command::DecrementHPhase,
        Command::ToggleMode,
    ];
}

/// Tube voltages in volts
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoltageState {
    pub accelerating: f64,
    pub vertical: f64,
    pub horizontal: f64,
}

impl Default for VoltageState {
    fn default() -> Self {
        Self {
            accelerating: ACCEL_VOLTAGE_INITIAL,
            vertical: 0.0,
            horizontal: 0.0,
        }
    }
}

/// Sine generator settings, used only in [`DriveMode::Sinusoidal`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SineParameters {
    /// Hz
    pub vertical_frequency: f64,
    pub horizontal_frequency: f64,
    /// Radians
    pub vertical_phase: f64,
    pub horizontal_phase: f64,
}

impl Default for SineParameters {
    fn default() -> Self {
        Self {
            vertical_frequency: SINE_FREQUENCY_INITIAL,
            horizontal_frequency: SINE_FREQUENCY_INITIAL,
            vertical_phase: 0.0,
            horizontal_phase: 0.0,
        }
    }
}

impl SineParameters {
    /// Plate voltages (vertical, horizontal) at simulation time `t`
    pub fn voltages_at(&self, t: f64) -> (f64, f64) {
        let vertical =
            SINE_AMPLITUDE * (TAU * self.vertical_frequency * t + self.vertical_phase).sin();
        let horizontal =
            SINE_AMPLITUDE * (TAU * self.horizontal_frequency * t + self.horizontal_phase).sin();
        (vertical, horizontal)
    }
}

/// Owns every user-tunable parameter of the tube
#[derive(Clone, Debug, PartialEq)]
pub struct DriveController {
    voltages: VoltageState,
    sine: SineParameters,
    persistence: f64,
    mode: DriveMode,
}

impl Default for DriveController {
    fn default() -> Self {
        Self::new()
    }
}

impl DriveController {
    pub fn new() -> Self {
        Self {
            voltages: VoltageState::default(),
            sine: SineParameters::default(),
            persistence: PERSISTENCE_INITIAL,
            mode: DriveMode::Manual,
        }
    }

    pub fn voltages(&self) -> VoltageState {
        self.voltages
    }

    pub fn sine(&self) -> SineParameters {
        self.sine
    }

    /// Trace persistence window (seconds)
    pub fn persistence(&self) -> f64 {
        self.persistence
    }

    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    /// Apply one control command, saturating at the parameter bounds
    pub fn apply(&mut self, command: Command) {
        let v = &mut self.voltages;
        let s = &mut self.sine;
        match command {
            Command::IncrementAccel => {
                v.accelerating = (v.accelerating + ACCEL_VOLTAGE_STEP_UP).min(ACCEL_VOLTAGE_MAX);
            }
            Command::DecrementAccel => {
                v.accelerating = (v.accelerating - ACCEL_VOLTAGE_STEP_DOWN).max(ACCEL_VOLTAGE_MIN);
            }
            Command::IncrementVertical => v.vertical = step_plate(v.vertical, PLATE_VOLTAGE_STEP),
            Command::DecrementVertical => v.vertical = step_plate(v.vertical, -PLATE_VOLTAGE_STEP),
            Command::IncrementHorizontal => {
                v.horizontal = step_plate(v.horizontal, PLATE_VOLTAGE_STEP)
            }
            Command::DecrementHorizontal => {
                v.horizontal = step_plate(v.horizontal, -PLATE_VOLTAGE_STEP)
            }
            Command::IncrementPersistence => {
                self.persistence = step_persistence(self.persistence, PERSISTENCE_STEP)
            }
            Command::DecrementPersistence => {
                self.persistence = step_persistence(self.persistence, -PERSISTENCE_STEP)
            }
            Command::IncrementVFreq => {
                s.vertical_frequency = step_frequency(s.vertical_frequency, SINE_FREQUENCY_STEP)
            }
            Command::DecrementVFreq => {
                s.vertical_frequency = step_frequency(s.vertical_frequency, -SINE_FREQUENCY_STEP)
            }
            Command::IncrementHFreq => {
                s.horizontal_frequency = step_frequency(s.horizontal_frequency, SINE_FREQUENCY_STEP)
            }
            Command::DecrementHFreq => {
                s.horizontal_frequency =
                    step_frequency(s.horizontal_frequency, -SINE_FREQUENCY_STEP)
            }
            Command::IncrementVPhase => {
                s.vertical_phase = step_phase(s.vertical_phase, SINE_PHASE_STEP)
            }
            Command::DecrementVPhase => {
                s.vertical_phase = step_phase(s.vertical_phase, -SINE_PHASE_STEP)
            }
            Command::IncrementHPhase => {
                s.horizontal_phase = step_phase(s.horizontal_phase, SINE_PHASE_STEP)
            }
            Command::DecrementHPhase => {
                s.horizontal_phase = step_phase(s.horizontal_phase, -SINE_PHASE_STEP)
            }
            Command::ToggleMode => self.mode = self.mode.toggled(),
        }
    }

    /// Refresh the plate voltages for simulation time `t`.
    ///
    /// In sinusoidal mode the generator output overwrites the plate voltages;
    /// when switched back to manual, stepping continues from the last driven
    /// value. Manual mode leaves everything untouched.
    pub fn update(&mut self, t: f64) {
        if self.mode == DriveMode::Sinusoidal {
            let (vertical, horizontal) = self.sine.voltages_at(t);
            self.voltages.vertical = vertical;
            self.voltages.horizontal = horizontal;
        }
    }
}

fn step_plate(value: f64, delta: f64) -> f64 {
    (value + delta).clamp(-PLATE_VOLTAGE_LIMIT, PLATE_VOLTAGE_LIMIT)
}

fn step_persistence(value: f64, delta: f64) -> f64 {
    (value + delta).clamp(PERSISTENCE_MIN, PERSISTENCE_MAX)
}

fn step_frequency(value: f64, delta: f64) -> f64 {
    (value + delta).clamp(SINE_FREQUENCY_MIN, SINE_FREQUENCY_MAX)
}

fn step_phase(value: f64, delta: f64) -> f64 {
    (value + delta).clamp(SINE_PHASE_MIN, SINE_PHASE_MAX)
}
