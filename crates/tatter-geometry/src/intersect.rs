//! Segment intersection

use glam::Vec2;

/// Where a cut crossed a polygon edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Index of the edge's first vertex; the edge runs to `edge + 1` (wrapping)
    pub edge: usize,
    pub point: Vec2,
}

/// Intersection of segments `a1-a2` and `b1-b2`, endpoints included.
///
/// Parallel or collinear segments (zero denominator) and degenerate input
/// yield `None`.
pub fn segment_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    let denom = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }

    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denom;
    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denom;

    if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
        Some(a1 + (a2 - a1) * ua)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments() {
        let p = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        )
        .unwrap();
        assert!((p - Vec2::new(5.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn parallel_segments_never_cross() {
        assert!(segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(10.0, 1.0),
        )
        .is_none());
    }

    #[test]
    fn short_segment_stops_before_edge() {
        assert!(segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(1.0, 5.0),
        )
        .is_none());
    }

    #[test]
    fn endpoint_touch_counts() {
        let p = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, -5.0),
            Vec2::new(10.0, 5.0),
        );
        assert_eq!(p, Some(Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn zero_length_segment_is_rejected() {
        assert!(segment_intersection(
            Vec2::new(3.0, 3.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
        )
        .is_none());
    }
}
