use crate::simulation::deflection::{beam_color, compute_deflection, normalize, BeamSpot};
use crate::simulation::drive::{Command, DriveController, DriveMode, SineParameters, VoltageState};
use crate::simulation::trace::{TraceBuffer, TracePoint};

/// Tube state advanced once per rendered frame
#[derive(Debug, Default)]
pub struct Simulator {
    controller: DriveController,
    trace: TraceBuffer,
    /// Simulation clock (seconds), the sum of every `dt` ticked so far
    time: f64,
    beam: BeamSpot,
}

impl Simulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trace(&self) -> &TraceBuffer {
        &self.trace
    }

    /// Wipe the phosphor, returning how many stored points were dropped.
    ///
    /// Controls and the clock are untouched; the next tick starts a new trace.
    pub fn clear_trace(&mut self) -> usize {
        if self.trace.is_empty() {
            return 0;
        }
        let dropped = self.trace.len();
        self.trace.clear();
        dropped
    }

    /// Advance one frame.
    ///
    /// Commands are applied first, then the clock moves by `dt` so that sine
    /// drive is sampled at this frame's time. The new impact is appended
    /// before the returned frame can query the trace.
    pub fn tick<I>(&mut self, dt: f64, commands: I) -> Frame<'_>
    where
        I: IntoIterator<Item = Command>,
    {
        for command in commands {
            self.controller.apply(command);
        }

        self.time += dt.max(0.0);
        self.controller.update(self.time);

        let voltages = self.controller.voltages();
        let deflection =
            compute_deflection(voltages.accelerating, voltages.vertical, voltages.horizontal);
        self.beam = normalize(deflection);

        self.trace.append(TracePoint {
            x: self.beam.x,
            y: self.beam.y,
            color: beam_color(voltages.accelerating),
            timestamp: self.time,
        });

        self.frame()
    }

    /// View of the current state without advancing
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            beam: self.beam,
            voltages: self.controller.voltages(),
            sine: self.controller.sine(),
            mode: self.controller.mode(),
            persistence: self.controller.persistence(),
            time: self.time,
            trace: &self.trace,
        }
    }
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Latest impact, normalized
    pub beam: BeamSpot,
    pub voltages: VoltageState,
    pub sine: SineParameters,
    pub mode: DriveMode,
    pub persistence: f64,
    pub time: f64,
    trace: &'a TraceBuffer,
}

impl<'a> Frame<'a> {
    /// Trace points still glowing at this frame's time, with their opacity
    pub fn visible_points(&self) -> impl Iterator<Item = (&'a TracePoint, u8)> + 'a {
        let trace: &'a TraceBuffer = self.trace;
        trace.visible_points(self.time, self.persistence)
    }

    /// Most recent impact still stored, regardless of persistence
    pub fn latest_impact(&self) -> Option<&'a TracePoint> {
        let trace: &'a TraceBuffer = self.trace;
        trace.latest()
    }

    /// One-line readout of the control panel
    pub fn status_line(&self) -> String {
        let v = &self.voltages;
        let mut line = format!(
            "Accel: {:.0} V | Vert: {:.2} V | Hor: {:.2} V | Persist: {:.1} s | Mode: {}",
            v.accelerating,
            v.vertical,
            v.horizontal,
            self.persistence,
            self.mode.name()
        );
        if self.mode == DriveMode::Sinusoidal {
            let s = &self.sine;
            line.push_str(&format!(
                " | fV: {:.2} Hz fH: {:.2} Hz | phV: {:.2} rad phH: {:.2} rad",
                s.vertical_frequency, s.horizontal_frequency, s.vertical_phase, s.horizontal_phase
            ));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_TRACE_POINTS;

    const DT: f64 = 1.0 / 60.0;
    const NO_COMMANDS: [Command; 0] = [];

    #[test]
    fn test_first_tick_worked_example() {
        let mut sim = Simulator::new();
        let frame = sim.tick(DT, NO_COMMANDS);

        assert_eq!(frame.beam, BeamSpot { x: 0.0, y: 0.0 });
        assert_eq!(frame.mode, DriveMode::Manual);

        let points: Vec<_> = frame.visible_points().collect();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].0.color, [0, 50, 0]);
        assert_eq!(points[0].1, 255, "fresh impact is fully opaque");
    }

    #[test]
    fn test_commands_apply_before_deflection() {
        let mut sim = Simulator::new();
        let frame = sim.tick(DT, [Command::IncrementVertical, Command::IncrementVertical]);

        assert_eq!(frame.voltages.vertical, 10.0);
        let expected = normalize(compute_deflection(1000.0, 10.0, 0.0));
        assert_eq!(frame.beam, expected);
        assert!(frame.beam.y < 0.0);
    }

    #[test]
    fn test_sine_mode_samples_current_time() {
        let mut sim = Simulator::new();
        sim.tick(0.0, [Command::ToggleMode]);

        // 0.25 s at 1 Hz puts both plates at the +50 V crest
        let frame = sim.tick(0.25, NO_COMMANDS);
        assert!((frame.time - 0.25).abs() < 1e-12);
        assert!((frame.voltages.vertical - 50.0).abs() < 1e-9);
        assert!((frame.voltages.horizontal - 50.0).abs() < 1e-9);

        let expected = normalize(compute_deflection(1000.0, 50.0, 50.0));
        assert!((frame.beam.x - expected.x).abs() < 1e-12);
        assert!((frame.beam.y - expected.y).abs() < 1e-12);
    }

    #[test]
    fn test_trace_is_bounded_and_ordered() {
        let mut sim = Simulator::new();
        for _ in 0..(MAX_TRACE_POINTS + 250) {
            sim.tick(DT, NO_COMMANDS);
        }
        let trace = sim.trace();
        assert_eq!(trace.len(), MAX_TRACE_POINTS);
        assert!(trace
            .iter()
            .zip(trace.iter().skip(1))
            .all(|(a, b)| a.timestamp <= b.timestamp));
    }

    #[test]
    fn test_old_points_fade_out() {
        let mut sim = Simulator::new();
        // 3 s of frames with 2 s persistence: only the last 2 s stay visible
        for _ in 0..180 {
            sim.tick(DT, NO_COMMANDS);
        }
        let frame = sim.frame();
        let visible = frame.visible_points().count();
        assert!((119..=121).contains(&visible), "visible points: {}", visible);
        assert_eq!(sim.trace().len(), 180);
    }

    #[test]
    fn test_raising_persistence_reveals_hidden_points() {
        let mut sim = Simulator::new();
        for _ in 0..180 {
            sim.tick(DT, NO_COMMANDS);
        }
        let before = sim.frame().visible_points().count();
        let frame = sim.tick(DT, [Command::IncrementPersistence, Command::IncrementPersistence]);
        assert_eq!(frame.persistence, 3.0);
        assert!(frame.visible_points().count() > before + 50);
    }

    #[test]
    fn test_latest_impact_tracks_beam() {
        let mut sim = Simulator::new();
        assert!(sim.frame().latest_impact().is_none());

        let frame = sim.tick(DT, [Command::DecrementHorizontal]);
        let latest = frame.latest_impact().expect("tick records an impact");
        assert_eq!((latest.x, latest.y), (frame.beam.x, frame.beam.y));
        assert_eq!(latest.timestamp, frame.time);
    }

    #[test]
    fn test_clear_trace_keeps_controls_and_clock() {
        let mut sim = Simulator::new();
        for _ in 0..30 {
            sim.tick(DT, [Command::IncrementVertical]);
        }
        let before = sim.frame();
        let (voltages, time) = (before.voltages, before.time);

        assert_eq!(sim.clear_trace(), 30);
        assert_eq!(sim.clear_trace(), 0, "second clear finds nothing");
        let frame = sim.frame();
        assert!(frame.latest_impact().is_none());
        assert_eq!(frame.visible_points().count(), 0);
        assert_eq!(frame.voltages, voltages);
        assert_eq!(frame.time, time);

        let frame = sim.tick(DT, NO_COMMANDS);
        assert_eq!(frame.visible_points().count(), 1);
        assert_eq!(sim.trace().len(), 1);
    }

    #[test]
    fn test_negative_dt_does_not_rewind() {
        let mut sim = Simulator::new();
        sim.tick(0.5, NO_COMMANDS);
        let frame = sim.tick(-1.0, NO_COMMANDS);
        assert_eq!(frame.time, 0.5);
    }

    #[test]
    fn test_status_line() {
        let mut sim = Simulator::new();
        let line = sim.tick(DT, NO_COMMANDS).status_line();
        assert!(line.contains("Accel: 1000 V"), "{}", line);
        assert!(line.contains("Mode: Manual"), "{}", line);
        assert!(!line.contains("fV"), "sine readout only in sinusoidal mode");

        let line = sim.tick(DT, [Command::ToggleMode]).status_line();
        assert!(line.contains("Mode: Sinusoidal"), "{}", line);
        assert!(line.contains("fV: 1.00 Hz"), "{}", line);
    }
}
