//! Validated polygon rings and convex splitting

use glam::Vec2;
use tatter_core::{Rect, Result, TatterError};

use crate::intersect::{segment_intersection, Crossing};

/// Pieces smaller than this (px^2) are treated as a failed split
pub const MIN_PIECE_AREA: f32 = 0.5;

/// An ordered vertex ring, implicitly closed. Always at least 3 finite points.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Vec2>,
}

impl Polygon {
    pub fn new(points: Vec<Vec2>) -> Result<Self> {
        if points.len() < 3 {
            return Err(TatterError::DegeneratePolygon {
                vertices: points.len(),
            });
        }
        if let Some(p) = points.iter().find(|p| !p.is_finite()) {
            return Err(TatterError::NonFinite(format!("polygon vertex {p}")));
        }
        Ok(Self { points })
    }

    /// The four corners of `rect`, clockwise from the top-left
    pub fn from_rect(rect: &Rect) -> Self {
        Self {
            points: rect.corners().to_vec(),
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Unsigned shoelace area
    pub fn area(&self) -> f32 {
        let n = self.points.len();
        let mut twice = 0.0f64;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            twice += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
        }
        (twice.abs() / 2.0) as f32
    }

    /// Vertex average. Used as the texture origin of a detached shard.
    pub fn centroid(&self) -> Vec2 {
        let sum: Vec2 = self.points.iter().copied().sum();
        sum / self.points.len() as f32
    }

    /// Vertices expressed relative to `origin`
    pub fn relative_to(&self, origin: Vec2) -> Vec<Vec2> {
        self.points.iter().map(|p| *p - origin).collect()
    }

    /// Every edge the segment `a-b` crosses, in ring order
    pub fn crossings(&self, a: Vec2, b: Vec2) -> Vec<Crossing> {
        let n = self.points.len();
        (0..n)
            .filter_map(|i| {
                segment_intersection(self.points[i], self.points[(i + 1) % n], a, b)
                    .map(|point| Crossing { edge: i, point })
            })
            .collect()
    }

    /// Split along the chord `a-b`.
    ///
    /// Only a chord crossing exactly two edges splits, otherwise the result is
    /// `DegenerateSplit`. A split that would leave a piece below
    /// `MIN_PIECE_AREA` is `SliverPiece`. Either way the polygon is unchanged.
    pub fn split(&self, a: Vec2, b: Vec2) -> Result<(Polygon, Polygon)> {
        let crossings = self.crossings(a, b);
        let [first, second] = crossings.as_slice() else {
            return Err(TatterError::DegenerateSplit {
                crossings: crossings.len(),
            });
        };

        let one = self.splice(first, second);
        let two = self.splice(second, first);
        if one.len() < 3 || two.len() < 3 {
            return Err(TatterError::SliverPiece { area: 0.0 });
        }

        let one = Polygon { points: one };
        let two = Polygon { points: two };
        let smaller = one.area().min(two.area());
        if smaller < MIN_PIECE_AREA {
            log::trace!("Split rejected, sliver piece of {smaller} px^2");
            return Err(TatterError::SliverPiece { area: smaller });
        }
        Ok((one, two))
    }

    /// Ring from `from.point` through the vertices after `from.edge` up to
    /// and including `to.edge`'s start vertex, closed by `to.point`
    fn splice(&self, from: &Crossing, to: &Crossing) -> Vec<Vec2> {
        let n = self.points.len();
        let stop = (to.edge + 1) % n;
        let mut ring = vec![from.point];
        let mut idx = (from.edge + 1) % n;
        while idx != stop {
            ring.push(self.points[idx]);
            idx = (idx + 1) % n;
        }
        ring.push(to.point);
        ring
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Polygon {
        Polygon::from_rect(&Rect::new(0.0, 0.0, 300.0, 400.0))
    }

    fn regular(n: usize, radius: f32, center: Vec2) -> Polygon {
        let points = (0..n)
            .map(|i| {
                let a = std::f32::consts::TAU * i as f32 / n as f32;
                center + Vec2::new(a.cos(), a.sin()) * radius
            })
            .collect();
        Polygon::new(points).unwrap()
    }

    #[test]
    fn rect_area_and_centroid() {
        let poly = card();
        assert!((poly.area() - 120_000.0).abs() < 1e-3);
        assert_eq!(poly.centroid(), Vec2::new(150.0, 200.0));
    }

    #[test]
    fn horizontal_cut_halves_the_card() {
        let poly = card();
        let (a, b) = poly
            .split(Vec2::new(-10.0, 200.0), Vec2::new(310.0, 200.0))
            .unwrap();
        for piece in [&a, &b] {
            assert!((piece.area() - 60_000.0).abs() < 600.0);
            assert!(piece.len() >= 3);
        }
        assert!((a.area() + b.area() - poly.area()).abs() < 1e-2);
    }

    #[test]
    fn split_conserves_area() {
        let poly = regular(12, 100.0, Vec2::new(200.0, 200.0));
        let chords = [
            (Vec2::new(0.0, 150.0), Vec2::new(400.0, 260.0)),
            (Vec2::new(120.0, 0.0), Vec2::new(260.0, 400.0)),
            (Vec2::new(50.0, 390.0), Vec2::new(390.0, 60.0)),
            (Vec2::new(90.0, 100.0), Vec2::new(400.0, 200.0)),
        ];
        for (a, b) in chords {
            let (one, two) = poly.split(a, b).unwrap();
            let total = one.area() + two.area();
            assert!((total - poly.area()).abs() / poly.area() < 1e-4);
        }
    }

    #[test]
    fn chord_inside_polygon_is_degenerate() {
        let err = card()
            .split(Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0))
            .unwrap_err();
        assert!(matches!(err, TatterError::DegenerateSplit { crossings: 0 }));
    }

    #[test]
    fn chord_crossing_one_edge_is_degenerate() {
        let err = card()
            .split(Vec2::new(-50.0, 100.0), Vec2::new(150.0, 100.0))
            .unwrap_err();
        assert!(matches!(err, TatterError::DegenerateSplit { crossings: 1 }));
    }

    #[test]
    fn chord_through_a_corner_is_rejected() {
        // Touches two edges at the same corner plus the opposite side
        let result = card().split(Vec2::new(-10.0, -10.0), Vec2::new(310.0, 310.0));
        assert!(result.is_err());
    }

    #[test]
    fn corner_grazing_chord_leaves_polygon_whole() {
        // Clips a 0.125 px^2 triangle off the top-left corner
        let poly = card();
        assert_eq!(poly.crossings(Vec2::new(-1.0, 1.5), Vec2::new(1.5, -1.0)).len(), 2);
        let err = poly
            .split(Vec2::new(-1.0, 1.5), Vec2::new(1.5, -1.0))
            .unwrap_err();
        match err {
            TatterError::SliverPiece { area } => assert!((area - 0.125).abs() < 1e-3),
            other => panic!("expected sliver, got {other}"),
        }
    }

    #[test]
    fn small_but_real_corner_piece_splits() {
        let (one, two) = card()
            .split(Vec2::new(-1.0, 11.0), Vec2::new(11.0, -1.0))
            .unwrap();
        assert!((one.area().min(two.area()) - 50.0).abs() < 1e-2);
    }

    #[test]
    fn too_few_vertices() {
        let err = Polygon::new(vec![Vec2::ZERO, Vec2::X]).unwrap_err();
        assert!(matches!(err, TatterError::DegeneratePolygon { vertices: 2 }));
        let err = Polygon::new(vec![Vec2::ZERO, Vec2::X, Vec2::NAN]).unwrap_err();
        assert!(matches!(err, TatterError::NonFinite(_)));
    }

    #[test]
    fn relative_vertices_sum_to_zero() {
        let poly = regular(7, 50.0, Vec2::new(10.0, 20.0));
        let rel = poly.relative_to(poly.centroid());
        let sum: Vec2 = rel.iter().copied().sum();
        assert!(sum.length() < 1e-3);
    }
}
