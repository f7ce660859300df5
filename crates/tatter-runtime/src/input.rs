//! Pointer input shaping
//!
//! Touch events arrive as start/move/end triples. The engines never see the
//! raw stream: tear only cares about a stroke's chord, crush only about the
//! release velocity, so those reductions live here.

use tatter_core::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Start,
    Move,
    End,
}

/// One touch sample in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Vec2,
    /// Host timestamp in milliseconds
    pub timestamp_ms: f64,
}

impl PointerEvent {
    pub fn start(position: Vec2, timestamp_ms: f64) -> Self {
        Self {
            phase: PointerPhase::Start,
            position,
            timestamp_ms,
        }
    }

    pub fn moved(position: Vec2, timestamp_ms: f64) -> Self {
        Self {
            phase: PointerPhase::Move,
            position,
            timestamp_ms,
        }
    }

    pub fn end(position: Vec2, timestamp_ms: f64) -> Self {
        Self {
            phase: PointerPhase::End,
            position,
            timestamp_ms,
        }
    }
}

/// Accumulates the points of one stroke
#[derive(Debug, Default, Clone)]
pub struct StrokeTracker {
    points: Vec<Vec2>,
}

impl StrokeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a pointer event. Returns the stroke's `(first, last)` chord when it ends.
    pub fn feed(&mut self, event: &PointerEvent) -> Option<(Vec2, Vec2)> {
        match event.phase {
            PointerPhase::Start => {
                self.points.clear();
                self.points.push(event.position);
                None
            }
            PointerPhase::Move => {
                // A move without a start (finger entered mid-gesture) opens the stroke
                self.points.push(event.position);
                None
            }
            PointerPhase::End => {
                self.points.push(event.position);
                let chord = match (self.points.first(), self.points.last()) {
                    (Some(&first), Some(&last)) if self.points.len() >= 2 => Some((first, last)),
                    _ => None,
                };
                self.points.clear();
                chord
            }
        }
    }

    /// Points of the stroke in progress (for on-screen feedback)
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn is_active(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    position: Vec2,
    timestamp_ms: f64,
}

/// Tracks a drag gesture for offset following and release velocity
#[derive(Debug, Default, Clone)]
pub struct DragTracker {
    origin: Option<Sample>,
    previous: Option<Sample>,
    latest: Option<Sample>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, position: Vec2, timestamp_ms: f64) {
        let sample = Sample {
            position,
            timestamp_ms,
        };
        self.origin = Some(sample);
        self.previous = None;
        self.latest = Some(sample);
    }

    /// Record a sample. Returns the displacement from the drag origin.
    pub fn update(&mut self, position: Vec2, timestamp_ms: f64) -> Option<Vec2> {
        let origin = self.origin?;
        self.previous = self.latest;
        self.latest = Some(Sample {
            position,
            timestamp_ms,
        });
        Some(position - origin.position)
    }

    /// Finish the drag with the release sample.
    ///
    /// Returns `(direction, speed)` where speed is in px/ms, computed from the
    /// last two samples. A non-positive time step is treated as 1 ms so an
    /// instant release cannot divide by zero.
    pub fn release(&mut self, position: Vec2, timestamp_ms: f64) -> Option<(Vec2, f32)> {
        self.update(position, timestamp_ms)?;
        let (prev, last) = (self.previous?, self.latest?);
        self.origin = None;

        let delta = last.position - prev.position;
        let mut dt = (last.timestamp_ms - prev.timestamp_ms) as f32;
        if !(dt.is_finite() && dt > 0.0) {
            dt = 1.0;
        }
        let distance = delta.length();
        if !distance.is_finite() {
            return None;
        }
        let speed = distance / dt;
        let direction = if distance > f32::EPSILON {
            delta / distance
        } else {
            Vec2::ZERO
        };
        Some((direction, speed))
    }
}
