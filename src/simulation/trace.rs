use std::collections::VecDeque;

use crate::config::{MAX_TRACE_POINTS, MIN_TRACE_OPACITY};

/// A single beam impact recorded on the phosphor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TracePoint {
    /// Normalized screen position, [-1, 1]
    pub x: f64,
    pub y: f64,
    pub color: [u8; 3],
    /// Simulation time of the impact (seconds)
    pub timestamp: f64,
}

/// Bounded, chronologically ordered store of recent impacts.
///
/// Points leave the buffer only through capacity eviction, oldest first.
/// Fading by age is applied at query time by [`TraceBuffer::visible_points`],
/// so a point hidden under a short persistence shows up again if persistence
/// is raised while it is still stored.
#[derive(Debug, Clone)]
pub struct TraceBuffer {
    points: VecDeque<TracePoint>,
    capacity: usize,
}

impl TraceBuffer {
    /// Create an empty buffer holding at most [`MAX_TRACE_POINTS`]
    pub fn new() -> Self {
        Self::with_capacity(MAX_TRACE_POINTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record an impact, evicting the oldest points beyond capacity.
    ///
    /// Timestamps must be non-decreasing.
    pub fn append(&mut self, point: TracePoint) {
        debug_assert!(
            self.points.back().map_or(true, |last| last.timestamp <= point.timestamp),
            "trace points must be appended in chronological order"
        );

        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Points still glowing at `now`, oldest first, paired with their opacity.
    ///
    /// A point is visible while `now - timestamp < persistence`; its opacity
    /// falls linearly from 255 and is floored at [`MIN_TRACE_OPACITY`].
    pub fn visible_points(
        &self,
        now: f64,
        persistence: f64,
    ) -> impl Iterator<Item = (&TracePoint, u8)> + '_ {
        self.points.iter().filter_map(move |point| {
            let age = now - point.timestamp;
            if age < persistence {
                Some((point, fade_opacity(age, persistence)))
            } else {
                None
            }
        })
    }

    /// Most recent impact, if any
    pub fn latest(&self) -> Option<&TracePoint> {
        self.points.back()
    }

    /// All stored points, oldest first, regardless of age
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &TracePoint> + '_ {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drop every stored point; capacity is unchanged
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn fade_opacity(age: f64, persistence: f64) -> u8 {
    let alpha = (255.0 * (1.0 - age / persistence)).round();
    alpha.clamp(MIN_TRACE_OPACITY as f64, 255.0) as u8
}
