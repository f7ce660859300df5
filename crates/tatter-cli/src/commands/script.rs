//! Scripted pointer input for headless sessions

use glam::Vec2;
use tatter_core::{DestroyMode, Rect};
use tatter_particles::ParticleRng;
use tatter_runtime::PointerEvent;

/// Frame gap between scripted tear strokes
const CUT_INTERVAL: u64 = 20;
const MAX_CUTS: u64 = 12;

/// Pointer events keyed by the frame they are delivered on
pub struct Script {
    events: Vec<(u64, PointerEvent)>,
    cursor: usize,
}

impl Script {
    pub fn for_mode(mode: DestroyMode, rect: Rect, seed: u64, frame_ms: f64) -> Self {
        let at = |frame: u64| frame as f64 * frame_ms;
        let mut events = Vec::new();
        match mode {
            DestroyMode::Burn => {
                // One extra ignition point a second in
                let spot = rect.origin() + rect.size() * Vec2::new(0.3, 0.7);
                events.push((60, PointerEvent::start(spot, at(60))));
                events.push((61, PointerEvent::end(spot, at(61))));
            }
            DestroyMode::Tear => {
                let mut rng = ParticleRng::from_seed_u64(seed);
                for i in 0..MAX_CUTS {
                    let frame = 10 + i * CUT_INTERVAL;
                    let (a, b) = chord(&mut rng, &rect);
                    events.push((frame, PointerEvent::start(a, at(frame))));
                    events.push((frame + 1, PointerEvent::moved(a.lerp(b, 0.5), at(frame + 1))));
                    events.push((frame + 2, PointerEvent::end(b, at(frame + 2))));
                }
            }
            DestroyMode::Crush => {
                let center = rect.center();
                for i in 0..4 {
                    let frame = 10 + i * 15;
                    events.push((frame, PointerEvent::start(center, at(frame))));
                    events.push((frame + 1, PointerEvent::end(center, at(frame + 1))));
                }
                // Flick upward, 40 px in one frame
                events.push((90, PointerEvent::start(center, at(90))));
                let up = center - Vec2::new(0.0, 40.0);
                events.push((91, PointerEvent::moved(up, at(91))));
                events.push((92, PointerEvent::end(up - Vec2::new(0.0, 40.0), at(92))));
            }
        }
        Self { events, cursor: 0 }
    }

    /// Events due on `frame`, in order
    pub fn due(&mut self, frame: u64) -> &[(u64, PointerEvent)] {
        let start = self.cursor;
        while self.cursor < self.events.len() && self.events[self.cursor].0 <= frame {
            self.cursor += 1;
        }
        &self.events[start..self.cursor]
    }
}

/// A chord entering one side of the card and leaving the opposite side
fn chord(rng: &mut ParticleRng, rect: &Rect) -> (Vec2, Vec2) {
    let margin = 30.0;
    if rng.chance(0.5) {
        let y0 = rng.range(rect.top(), rect.bottom());
        let y1 = rng.range(rect.top(), rect.bottom());
        (
            Vec2::new(rect.left() - margin, y0),
            Vec2::new(rect.right() + margin, y1),
        )
    } else {
        let x0 = rng.range(rect.left(), rect.right());
        let x1 = rng.range(rect.left(), rect.right());
        (
            Vec2::new(x0, rect.top() - margin),
            Vec2::new(x1, rect.bottom() + margin),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_released_once_in_frame_order() {
        let rect = Rect::new(0.0, 0.0, 300.0, 400.0);
        let mut script = Script::for_mode(DestroyMode::Crush, rect, 1, 16.0);
        let total = script.events.len();
        let mut seen = 0;
        let mut last_frame = 0;
        for frame in 0..200 {
            for (due, _) in script.due(frame) {
                assert!(*due <= frame && *due >= last_frame);
                last_frame = *due;
                seen += 1;
            }
        }
        assert_eq!(seen, total);
        assert!(script.due(500).is_empty());
    }

    #[test]
    fn tear_chords_cross_the_card() {
        let rect = Rect::new(10.0, 10.0, 300.0, 400.0);
        let mut rng = ParticleRng::new(8);
        for _ in 0..50 {
            let (a, b) = chord(&mut rng, &rect);
            assert!(!rect.contains(a) && !rect.contains(b));
            assert!((b - a).length_squared() > 100.0);
        }
    }
}
