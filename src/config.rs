// ============================================
// Tube Geometry & Physical Constants
// ============================================

/// Distance between the plates of each deflection pair (m)
pub const PLATE_SEPARATION: f64 = 0.02;

/// Electron gun to vertical plates (m)
pub const DIST_GUN_TO_V_PLATES: f64 = 0.05;

/// Vertical plates to horizontal plates (m)
pub const DIST_V_TO_H_PLATES: f64 = 0.05;

/// Horizontal plates to the screen (m)
pub const DIST_H_PLATES_TO_SCREEN: f64 = 0.15;

/// Electron charge (C), negative
pub const ELECTRON_CHARGE: f64 = -1.6e-19;

/// Electron rest mass (kg)
pub const ELECTRON_MASS: f64 = 9.11e-31;

/// Physical width of the phosphor screen (m); half of it maps to 1.0 normalized
pub const SCREEN_SIZE: f64 = 0.3;

// ============================================
// Trace Persistence
// ============================================

/// Maximum number of impact points kept for the persistence view
pub const MAX_TRACE_POINTS: usize = 1000;

/// Faded points never drop below this opacity while still visible
pub const MIN_TRACE_OPACITY: u8 = 30;

/// Accelerating volts per unit of green brightness
pub const VOLTS_PER_BRIGHTNESS: f64 = 20.0;

// ============================================
// Drive Controls (bounds, steps, initial values)
// ============================================

pub const ACCEL_VOLTAGE_MIN: f64 = 1000.0;
pub const ACCEL_VOLTAGE_MAX: f64 = 5000.0;
pub const ACCEL_VOLTAGE_STEP_UP: f64 = 100.0;
/// Decrement is deliberately coarse: one press falls back by a full kilovolt
pub const ACCEL_VOLTAGE_STEP_DOWN: f64 = 1000.0;
pub const ACCEL_VOLTAGE_INITIAL: f64 = 1000.0;

pub const PLATE_VOLTAGE_LIMIT: f64 = 1000.0;
pub const PLATE_VOLTAGE_STEP: f64 = 5.0;

pub const PERSISTENCE_MIN: f64 = 0.5;
pub const PERSISTENCE_MAX: f64 = 10.0;
pub const PERSISTENCE_STEP: f64 = 0.5;
pub const PERSISTENCE_INITIAL: f64 = 2.0;

pub const SINE_FREQUENCY_MIN: f64 = 0.1;
pub const SINE_FREQUENCY_MAX: f64 = 10.0;
pub const SINE_FREQUENCY_STEP: f64 = 0.1;
pub const SINE_FREQUENCY_INITIAL: f64 = 1.0;

pub const SINE_PHASE_MIN: f64 = 0.0;
pub const SINE_PHASE_MAX: f64 = std::f64::consts::TAU;
pub const SINE_PHASE_STEP: f64 = 0.1;

/// Peak plate voltage in sinusoidal drive mode (V)
pub const SINE_AMPLITUDE: f64 = 50.0;

// ============================================
// Window & Layout
// ============================================

pub const WINDOW_TITLE: &str = "CRT Deflection Simulator";

/// Logical window size; every layout constant below is in these pixels
pub const WINDOW_WIDTH: f64 = 1150.0;
pub const WINDOW_HEIGHT: f64 = 700.0;

/// Front screen panel (x, y, width, height)
pub const SCREEN_PANEL: (f64, f64, f64, f64) = (420.0, 60.0, 400.0, 400.0);

/// Fraction of the panel half-extent that a normalized 1.0 reaches
pub const SCREEN_ZOOM: f64 = 0.95;

/// Radius of a trace spot (px)
pub const TRACE_SPOT_RADIUS: f64 = 3.0;

/// Side view beam: pixels of vertical travel per unit of y_norm
pub const SIDE_VIEW_GAIN: f64 = 90.0;

/// Top view beam: pixels of travel per unit of x_norm
pub const TOP_VIEW_GAIN: f64 = 50.0;

/// Upper bound on schematic line vertices uploaded per frame
pub const SCHEMATIC_MAX_VERTICES: usize = 512;
