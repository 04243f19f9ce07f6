//! Parcel geometry: areas and setback insets on geographic polygons.
//!
//! Rings are projected onto a local equirectangular plane (meters) around
//! their vertex centroid, which is accurate enough for parcel-sized shapes.

use kurbo::{BezPath, Line, Point, Shape, Vec2};
use shared::{Coordinate, Polygon, Ring};

/// Meters per degree of latitude
const METERS_PER_DEG_LAT: f64 = 110_540.0;
/// Meters per degree of longitude at the equator
const METERS_PER_DEG_LNG: f64 = 111_320.0;
/// Side of the square substituted for a collapsed inset
pub const FALLBACK_SIDE_M: f64 = 0.5;

/// Area and offset operations consumed by the map adapter
pub trait GeometryService {
    /// Area in m² (outer ring minus holes)
    fn area_m2(&self, polygon: &Polygon) -> f64;

    /// Inward offset of the outer ring by `meters`.
    ///
    /// `None` only when the polygon has no usable outer ring. An inset larger
    /// than the shape supports yields a tiny fallback square instead.
    fn inset(&self, polygon: &Polygon, meters: f64) -> Option<Polygon>;
}

/// Planar approximation backed by kurbo
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarGeometry;

/// Local tangent plane around an origin coordinate
struct LocalFrame {
    origin: Coordinate,
    meters_per_lng: f64,
}

impl LocalFrame {
    fn around(ring: &[Coordinate]) -> Self {
        let n = ring.len().max(1) as f64;
        let lng = ring.iter().map(|c| c[0]).sum::<f64>() / n;
        let lat = ring.iter().map(|c| c[1]).sum::<f64>() / n;
        Self {
            origin: [lng, lat],
            meters_per_lng: METERS_PER_DEG_LNG * lat.to_radians().cos(),
        }
    }

    fn to_local(&self, c: Coordinate) -> Point {
        Point::new(
            (c[0] - self.origin[0]) * self.meters_per_lng,
            (c[1] - self.origin[1]) * METERS_PER_DEG_LAT,
        )
    }

    fn to_geo(&self, p: Point) -> Coordinate {
        let lng = if self.meters_per_lng.abs() > f64::EPSILON {
            self.origin[0] + p.x / self.meters_per_lng
        } else {
            self.origin[0]
        };
        [lng, self.origin[1] + p.y / METERS_PER_DEG_LAT]
    }
}

/// Ring without the closing duplicate vertex
fn open_ring(ring: &[Coordinate]) -> &[Coordinate] {
    match ring {
        [first, .., last] if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

fn close_ring(mut ring: Ring) -> Ring {
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    ring
}

/// Signed area, positive for counter-clockwise rings
fn signed_area(points: &[Point]) -> f64 {
    let Some((first, rest)) = points.split_first() else {
        return 0.0;
    };
    let mut path = BezPath::new();
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    path.close_path();
    path.area()
}

/// Line-line intersection point, `None` for (near) parallel lines
fn line_intersection(l1: Line, l2: Line) -> Option<Point> {
    let d1 = l1.p1 - l1.p0;
    let d2 = l2.p1 - l2.p0;
    let cross = d1.cross(d2);
    if cross.abs() < 1e-10 {
        return None;
    }
    let t = (l2.p0 - l1.p0).cross(d2) / cross;
    Some(l1.p0 + d1 * t)
}

/// Edges of `points` shifted by `distance` along `side * left normal`
fn offset_edges(points: &[Point], distance: f64, side: f64) -> Vec<Line> {
    let n = points.len();
    (0..n)
        .filter_map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            let dir = b - a;
            let len = dir.hypot();
            if len < 1e-9 {
                return None;
            }
            let normal = Vec2::new(-dir.y / len, dir.x / len) * side * distance;
            Some(Line::new(a + normal, b + normal))
        })
        .collect()
}

/// Mitred offset of a closed ring; positive `distance` moves inward
fn offset_ring(points: &[Point], distance: f64) -> Option<Vec<Point>> {
    let area = signed_area(points);
    if area.abs() < 1e-9 {
        return None;
    }
    let edges = offset_edges(points, distance, area.signum());
    if edges.len() < 3 {
        return None;
    }

    let m = edges.len();
    let vertices: Vec<Point> = (0..m)
        .map(|i| {
            let prev = edges[(i + m - 1) % m];
            let next = edges[i];
            line_intersection(prev, next).unwrap_or(next.p0)
        })
        .collect();

    let new_area = signed_area(&vertices);
    let flipped = new_area.signum() != area.signum() || new_area.abs() < 1e-9;
    let grew = distance > 0.0 && new_area.abs() > area.abs();
    if flipped || grew {
        None
    } else {
        Some(vertices)
    }
}

fn fallback_square(center: Point) -> Vec<Point> {
    let h = FALLBACK_SIDE_M / 2.0;
    vec![
        Point::new(center.x - h, center.y - h),
        Point::new(center.x + h, center.y - h),
        Point::new(center.x + h, center.y + h),
        Point::new(center.x - h, center.y + h),
    ]
}

fn centroid(points: &[Point]) -> Point {
    let n = points.len().max(1) as f64;
    let sum = points.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    (sum / n).to_point()
}

impl GeometryService for PlanarGeometry {
    fn area_m2(&self, polygon: &Polygon) -> f64 {
        let Some(outer) = polygon.outer() else {
            return 0.0;
        };
        let frame = LocalFrame::around(open_ring(outer));
        let ring_area = |ring: &Ring| {
            let points: Vec<Point> = open_ring(ring).iter().map(|c| frame.to_local(*c)).collect();
            signed_area(&points).abs()
        };

        let holes: f64 = polygon.rings.iter().skip(1).map(|r| ring_area(r)).sum();
        let area = ring_area(outer) - holes;
        if area.is_finite() {
            area.max(0.0)
        } else {
            0.0
        }
    }

    fn inset(&self, polygon: &Polygon, meters: f64) -> Option<Polygon> {
        let outer = open_ring(polygon.outer()?);
        if outer.len() < 3 || !meters.is_finite() {
            return None;
        }
        if meters == 0.0 {
            return Some(Polygon::new(close_ring(outer.to_vec())));
        }

        let frame = LocalFrame::around(outer);
        let points: Vec<Point> = outer.iter().map(|c| frame.to_local(*c)).collect();
        let local = offset_ring(&points, meters).unwrap_or_else(|| {
            tracing::warn!(meters, "setback collapses polygon, using fallback footprint");
            fallback_square(centroid(&points))
        });

        let ring = local.into_iter().map(|p| frame.to_geo(p)).collect();
        Some(Polygon::new(close_ring(ring)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Axis-aligned rectangle of `w` x `h` meters at the given origin
    fn rect(origin: Coordinate, w: f64, h: f64) -> Polygon {
        let frame = LocalFrame {
            origin,
            meters_per_lng: METERS_PER_DEG_LNG * origin[1].to_radians().cos(),
        };
        let corners = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];
        let ring = corners
            .iter()
            .map(|&(x, y)| frame.to_geo(Point::new(x, y)))
            .collect();
        Polygon::new(close_ring(ring))
    }

    fn close_to(a: f64, b: f64, rel: f64) -> bool {
        (a - b).abs() <= rel * b.abs().max(1.0)
    }

    #[test]
    fn test_rectangle_area() {
        let poly = rect([-46.63, -23.55], 40.0, 25.0);
        let area = PlanarGeometry.area_m2(&poly);
        assert!(close_to(area, 1000.0, 1e-3), "area = {area}");
    }

    #[test]
    fn test_area_ignores_winding() {
        let poly = rect([2.35, 48.85], 20.0, 10.0);
        let mut reversed = poly.clone();
        reversed.rings[0].reverse();
        let a = PlanarGeometry.area_m2(&poly);
        let b = PlanarGeometry.area_m2(&reversed);
        assert!(close_to(a, b, 1e-9));
    }

    #[test]
    fn test_area_subtracts_holes() {
        let outer = rect([0.0, 0.0], 20.0, 20.0);
        let hole = rect([0.0, 0.0], 10.0, 10.0);
        let poly = Polygon {
            rings: vec![outer.rings[0].clone(), hole.rings[0].clone()],
        };
        let area = PlanarGeometry.area_m2(&poly);
        assert!(close_to(area, 300.0, 1e-2), "area = {area}");
    }

    #[test]
    fn test_area_of_degenerate_polygons_is_zero() {
        assert_eq!(PlanarGeometry.area_m2(&Polygon::default()), 0.0);
        let line = Polygon::new(vec![[0.0, 0.0], [0.001, 0.0]]);
        assert_eq!(PlanarGeometry.area_m2(&line), 0.0);
    }

    #[test]
    fn test_default_parcel_is_about_1000_m2() {
        let area = PlanarGeometry.area_m2(&shared::default_parcel());
        assert!(close_to(area, 1000.0, 0.01), "area = {area}");
    }

    #[test]
    fn test_inset_rectangle_shrinks_each_side() {
        let poly = rect([-3.7, 40.4], 40.0, 30.0);
        let inset = PlanarGeometry.inset(&poly, 5.0).unwrap();
        let area = PlanarGeometry.area_m2(&inset);
        assert!(close_to(area, 30.0 * 20.0, 1e-2), "area = {area}");
        let ring = inset.outer().unwrap();
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_inset_works_for_clockwise_rings() {
        let mut poly = rect([-3.7, 40.4], 40.0, 30.0);
        poly.rings[0].reverse();
        let inset = PlanarGeometry.inset(&poly, 5.0).unwrap();
        let area = PlanarGeometry.area_m2(&inset);
        assert!(close_to(area, 600.0, 1e-2), "area = {area}");
    }

    #[test]
    fn test_negative_setback_grows_polygon() {
        let poly = rect([10.0, 50.0], 10.0, 10.0);
        let outset = PlanarGeometry.inset(&poly, -1.0).unwrap();
        let area = PlanarGeometry.area_m2(&outset);
        assert!(close_to(area, 144.0, 1e-2), "area = {area}");
    }

    #[test]
    fn test_oversized_setback_returns_tiny_fallback() {
        let poly = rect([-3.7, 40.4], 10.0, 10.0);
        let inset = PlanarGeometry.inset(&poly, 50.0).unwrap();
        let area = PlanarGeometry.area_m2(&inset);
        assert!(area > 0.0);
        assert!(close_to(area, FALLBACK_SIDE_M * FALLBACK_SIDE_M, 1e-2), "area = {area}");
    }

    #[test]
    fn test_zero_setback_is_identity() {
        let poly = rect([0.0, 0.0], 10.0, 10.0);
        assert_eq!(PlanarGeometry.inset(&poly, 0.0), Some(poly));
    }

    #[test]
    fn test_inset_needs_three_points() {
        let line = Polygon::new(vec![[0.0, 0.0], [0.001, 0.0], [0.0, 0.0]]);
        assert!(PlanarGeometry.inset(&line, 1.0).is_none());
        assert!(PlanarGeometry.inset(&Polygon::default(), 1.0).is_none());
    }
}
