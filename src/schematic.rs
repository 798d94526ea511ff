//! Line geometry for the side and top cross-sections of the tube.
//!
//! Everything is laid out in logical window pixels (origin top-left, see
//! `config::WINDOW_WIDTH`/`WINDOW_HEIGHT`) and converted to clip space when
//! emitted, so the drawing stretches with the window.

use crate::config::{
    SCHEMATIC_MAX_VERTICES, SCREEN_PANEL, SIDE_VIEW_GAIN, TOP_VIEW_GAIN, WINDOW_HEIGHT,
    WINDOW_WIDTH,
};
use crate::gpu::LineVertex;
use crate::simulation::Frame;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const GRAY: [f32; 4] = [150.0 / 255.0, 150.0 / 255.0, 150.0 / 255.0, 1.0];
const BLUE: [f32; 4] = [0.0, 100.0 / 255.0, 1.0, 1.0];
const RED: [f32; 4] = [1.0, 50.0 / 255.0, 50.0 / 255.0, 1.0];
const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

const ELLIPSE_SEGMENTS: usize = 24;
const SPOT_SEGMENTS: usize = 12;
const SPOT_RADIUS: f64 = 4.0;

/// Electron gun exit and screen plane, shared by both cross-sections
const GUN_X: f64 = 70.0;
const SCREEN_X: f64 = 280.0;

const SIDE_CENTER_Y: f64 = 150.0;
const TOP_CENTER_Y: f64 = 375.0;

/// Convert logical window pixels to clip space
pub fn pixel_to_clip(x: f64, y: f64) -> [f32; 2] {
    [
        (x / WINDOW_WIDTH * 2.0 - 1.0) as f32,
        (1.0 - y / WINDOW_HEIGHT * 2.0) as f32,
    ]
}

/// Line-list vertices accumulated in pixel space
#[derive(Default)]
struct LineBatch {
    vertices: Vec<LineVertex>,
}

impl LineBatch {
    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: [f32; 4]) {
        self.vertices.push(LineVertex {
            position: pixel_to_clip(from.0, from.1),
            color,
        });
        self.vertices.push(LineVertex {
            position: pixel_to_clip(to.0, to.1),
            color,
        });
    }

    fn polyline(&mut self, points: &[(f64, f64)], color: [f32; 4]) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], color);
        }
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: [f32; 4]) {
        self.polyline(
            &[(x, y), (x + w, y), (x + w, y + h), (x, y + h), (x, y)],
            color,
        );
    }

    /// Ellipse inscribed in the given bounding box
    fn ellipse(&mut self, x: f64, y: f64, w: f64, h: f64, segments: usize, color: [f32; 4]) {
        let (cx, cy) = (x + w / 2.0, y + h / 2.0);
        let points: Vec<(f64, f64)> = (0..=segments)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / segments as f64;
                (cx + w / 2.0 * angle.cos(), cy + h / 2.0 * angle.sin())
            })
            .collect();
        self.polyline(&points, color);
    }

    fn spot(&mut self, center: (f64, f64), color: [f32; 4]) {
        let d = SPOT_RADIUS * 2.0;
        self.ellipse(center.0 - SPOT_RADIUS, center.1 - SPOT_RADIUS, d, d, SPOT_SEGMENTS, color);
    }
}

/// Beam end point in the side view (vertical deflection, screen y grows down).
///
/// `None` while the phosphor holds no impact, in which case no beam is drawn.
pub fn side_view_impact(frame: &Frame) -> Option<(f64, f64)> {
    let impact = frame.latest_impact()?;
    Some((SCREEN_X, SIDE_CENTER_Y - impact.y * SIDE_VIEW_GAIN))
}

/// Beam end point in the top view (horizontal deflection)
pub fn top_view_impact(frame: &Frame) -> Option<(f64, f64)> {
    let impact = frame.latest_impact()?;
    Some((SCREEN_X, TOP_CENTER_Y + impact.x * TOP_VIEW_GAIN))
}

/// Build the schematic line list for one frame
pub fn build(frame: &Frame) -> Vec<LineVertex> {
    let mut batch = LineBatch::default();

    // Side view: tube, gun, plates, beam
    batch.ellipse(40.0, 120.0, 40.0, 60.0, ELLIPSE_SEGMENTS, WHITE);
    batch.polyline(&[(80.0, 130.0), (270.0, 80.0), (270.0, 220.0), (80.0, 170.0)], WHITE);
    batch.rect(270.0, 80.0, 80.0, 140.0, WHITE);
    batch.rect(50.0, 140.0, 20.0, 20.0, GRAY);
    batch.rect(100.0, 100.0, 10.0, 100.0, BLUE);
    batch.rect(180.0, 130.0, 10.0, 40.0, RED);
    batch.rect(200.0, 130.0, 10.0, 40.0, RED);

    if let Some(side_end) = side_view_impact(frame) {
        batch.line((GUN_X, SIDE_CENTER_Y), side_end, GREEN);
        batch.spot(side_end, GREEN);
    }

    // Top view
    batch.ellipse(40.0, 355.0, 40.0, 40.0, ELLIPSE_SEGMENTS, WHITE);
    batch.polyline(&[(80.0, 340.0), (270.0, 320.0), (270.0, 430.0), (80.0, 410.0)], WHITE);
    batch.rect(270.0, 320.0, 80.0, 110.0, WHITE);
    batch.rect(50.0, 365.0, 20.0, 20.0, GRAY);
    batch.rect(100.0, 350.0, 10.0, 50.0, BLUE);
    batch.rect(180.0, 340.0, 10.0, 70.0, RED);
    batch.rect(200.0, 340.0, 10.0, 70.0, RED);

    if let Some(top_end) = top_view_impact(frame) {
        batch.line((GUN_X, TOP_CENTER_Y), top_end, GREEN);
        batch.spot(top_end, GREEN);
    }

    // Front screen border; the trace itself is drawn by the trace pipeline
    let (px, py, pw, ph) = SCREEN_PANEL;
    batch.rect(px, py, pw, ph, GRAY);

    if batch.vertices.len() > SCHEMATIC_MAX_VERTICES {
        log::warn!(
            "Schematic has {} vertices, truncating to {}",
            batch.vertices.len(),
            SCHEMATIC_MAX_VERTICES
        );
        batch.vertices.truncate(SCHEMATIC_MAX_VERTICES);
    }

    batch.vertices
}
