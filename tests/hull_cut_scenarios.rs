#![allow(clippy::unwrap_used)]

use approx::assert_abs_diff_eq;
use hullcut::geometry::{
    Aabb, ArcSegment, CurvePart, LinearSegment, Polycurve, Segment, SegmentProxy,
};
use hullcut::hull::{SegmentCap, SegmentHull};
use hullcut::math::{Point2, Point3, Vector2};
use hullcut::operations::buffer::{BufferOptions, GeometryKernel, TessellatingKernel};
use hullcut::operations::cut::{NearSegment, SegmentPair};
use hullcut::operations::index::{IndexedCurve, SegmentKey};
use hullcut::{HullcutError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn segment(p0: (f64, f64), p1: (f64, f64)) -> LinearSegment {
    LinearSegment::new(0, 0, Point3::new(p0.0, p0.1, 0.0), Point3::new(p1.0, p1.1, 0.0))
}

fn round(p0: (f64, f64), p1: (f64, f64), offset: f64) -> SegmentHull {
    SegmentHull::round(segment(p0, p1), offset).unwrap()
}

#[test]
fn neighbor_crossing_the_hull() {
    init_tracing();
    let hull = round((0.0, 0.0), (10.0, 0.0), 2.0);
    let neighbor = round((5.0, 5.0), (5.0, 1.0), 0.0);
    let cut = SegmentPair::create(&hull, &neighbor, false).cut_curve_hull(0.01).unwrap();
    assert!(cut.intersects);
    assert!(!cut.coincident);
    let [lo, hi] = cut.intervals[0];
    assert_abs_diff_eq!((lo + hi) / 2.0, 0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(hi - lo, 0.346, epsilon = 1e-3);
}

#[test]
fn distant_neighbor_does_not_intersect() {
    init_tracing();
    let hull = round((0.0, 0.0), (10.0, 0.0), 2.0);
    let neighbor = round((100.0, 100.0), (110.0, 100.0), 0.0);
    let cut = SegmentPair::create(&hull, &neighbor, false).cut_curve_hull(0.01).unwrap();
    assert!(!cut.intersects);
    assert!(cut.intervals.is_empty());
}

#[test]
fn identical_segment_is_coincident() {
    init_tracing();
    let hull = round((0.0, 0.0), (10.0, 0.0), 1.0);
    let neighbor = round((0.0, 0.0), (10.0, 0.0), 1.0);
    let cut = SegmentPair::create(&hull, &neighbor, false).cut_curve_hull(0.01).unwrap();
    assert!(cut.coincident);
    assert_eq!(cut.hull_start_near, NearSegment::NearStart);
    assert_eq!(cut.hull_end_near, NearSegment::NearEnd);
    let [lo, hi] = cut.intervals[0];
    assert_abs_diff_eq!(lo, -0.2, epsilon = 1e-9);
    assert_abs_diff_eq!(hi, 1.2, epsilon = 1e-9);
}

#[test]
fn range_query_matches_brute_force() {
    init_tracing();
    let points: Vec<Point2> = (0..=1000)
        .map(|i| {
            let i = f64::from(i);
            let (r, a) = (1.0 + i * 0.01, i * 0.05);
            Point2::new(r * a.cos(), r * a.sin())
        })
        .collect();
    let index = IndexedCurve::new(Polycurve::line_string(&points), 0.1).unwrap();
    assert_eq!(index.len(), 1000);

    let queries = [
        Aabb::new(Point2::new(0.0, 0.0), Point2::new(0.5, 0.5)),
        Aabb::new(Point2::new(-3.0, 2.0), Point2::new(-2.5, 2.2)),
        Aabb::new(Point2::new(5.0, -1.0), Point2::new(5.3, 1.0)),
        Aabb::new(Point2::new(-11.0, -11.0), Point2::new(11.0, 11.0)),
        Aabb::new(Point2::new(20.0, 20.0), Point2::new(21.0, 21.0)),
    ];
    for query in queries {
        let found: Vec<SegmentKey> = index.segments_in(&query).into_iter().map(SegmentKey::of).collect();
        let expected: Vec<SegmentKey> = index
            .curve()
            .segments()
            .filter(|s| s.extent().intersects(&query))
            .map(|s| SegmentKey::of(&s))
            .collect();
        assert_eq!(found, expected, "query {query:?}");
    }
}

/// The closed form result, clamped to the hull segment, against the
/// tessellated buffer of the neighbor.
#[test]
fn closed_form_agrees_with_buffer() {
    init_tracing();
    let kernel = TessellatingKernel::new(BufferOptions::new(1e-6).unwrap());
    let pairs = [
        (((0.0, 0.0), (10.0, 0.0), 1.0), ((5.0, 5.0), (5.0, 1.0), 1.0)),
        (((0.0, 0.0), (10.0, 10.0), 0.5), ((0.0, 10.0), (10.0, 0.0), 0.5)),
        (((0.0, 0.0), (10.0, 0.0), 0.75), ((3.0, 1.0), (20.0, 1.0), 0.75)),
        (((0.0, 0.0), (10.0, 0.0), 0.5), ((12.0, 0.0), (20.0, 3.0), 0.5)),
        (((0.0, 0.0), (10.0, 0.0), 1.0), ((-4.0, -3.0), (14.0, 3.0), 0.25)),
    ];
    for ((a0, a1, ra), (b0, b1, rb)) in pairs {
        let hull = round(a0, a1, ra);
        let neighbor = round(b0, b1, rb);
        let fast = SegmentPair::create(&hull, &neighbor, false)
            .cut_curve_hull(0.0)
            .unwrap()
            .clamped();

        let polygon = kernel
            .create_buffer(&neighbor.segment().polyline(false), ra + rb)
            .unwrap();
        let exact = kernel.intersect(&hull.segment().polyline(false), &polygon).unwrap();

        assert_eq!(fast.len(), exact.len(), "{a0:?}-{a1:?} vs {b0:?}-{b1:?}: {fast:?} {exact:?}");
        for (f, e) in fast.iter().zip(&exact) {
            assert_abs_diff_eq!(f[0], e[0], epsilon = 1e-3);
            assert_abs_diff_eq!(f[1], e[1], epsilon = 1e-3);
        }
    }
}

#[test]
fn swapping_roles_keeps_coincidence_and_overlap() {
    init_tracing();
    let cases = [
        ((0.0, 0.0), (10.0, 0.0), (10.0, 0.0), (0.0, 0.0)),
        ((0.0, 0.0), (10.0, 0.0), (2.0, 0.5), (8.0, 0.5)),
        ((0.0, 0.0), (10.0, 0.0), (0.0, 3.0), (10.0, 3.0)),
    ];
    for (a0, a1, b0, b1) in cases {
        let a = round(a0, a1, 1.0);
        let b = round(b0, b1, 1.0);
        let ab = SegmentPair::create(&a, &b, false).cut_curve_hull(1e-6).unwrap();
        let ba = SegmentPair::create(&b, &a, false).cut_curve_hull(1e-6).unwrap();
        assert_eq!(ab.coincident, ba.coincident);
        assert_eq!(ab.intersects, ba.intersects);
    }
}

fn hull(p0: (f64, f64), p1: (f64, f64), left: f64, right: f64, start: SegmentCap, end: SegmentCap) -> SegmentHull {
    SegmentHull::new(segment(p0, p1), left, right, start, end).unwrap()
}

#[test]
fn swapping_roles_with_rect_caps_and_unequal_offsets() {
    init_tracing();
    let rect = SegmentCap::rect(0.5).unwrap();
    let a = hull((0.0, 0.0), (10.0, 0.0), 1.0, 0.3, rect, rect);
    let cases = [
        (hull((10.0, 0.0), (0.0, 0.0), 0.2, 0.8, SegmentCap::Round, rect), true, true),
        (hull((2.0, 0.5), (8.0, 0.5), 0.6, 0.1, rect, SegmentCap::Round), false, true),
        (hull((0.0, 5.0), (10.0, 5.0), 0.4, 0.8, rect, rect), false, false),
    ];
    for (b, coincident, intersects) in cases {
        let ab = SegmentPair::create(&a, &b, false).cut_curve_hull(1e-6).unwrap();
        let ba = SegmentPair::create(&b, &a, false).cut_curve_hull(1e-6).unwrap();
        assert!(ab.t_min_part.is_some() == intersects && ba.t_min_part.is_some() == intersects);
        assert_eq!((ab.coincident, ba.coincident), (coincident, coincident));
        assert_eq!((ab.intersects, ba.intersects), (intersects, intersects));
        assert_eq!(ab.clamped().is_empty(), !intersects);
        assert_eq!(ba.clamped().is_empty(), !intersects);
    }
}

/// Points of a cap shape at `at`: the half towards `out` of a hull with
/// lateral extents `left` and `right` along `normal`. Round caps are
/// polygonized inside or around the true half circle.
fn cap_points(
    at: Point2,
    out: Vector2,
    normal: Vector2,
    (left, right): (f64, f64),
    cap: SegmentCap,
    outer: bool,
    points: &mut Vec<Point2>,
) {
    const STEPS: u32 = 64;
    match cap {
        SegmentCap::Round => {
            let center = at + normal * ((left - right) / 2.0);
            let step = std::f64::consts::PI / f64::from(STEPS);
            let radius = (left + right) / 2.0 / if outer { (step / 2.0).cos() } else { 1.0 };
            for k in 0..=STEPS {
                let phi = -std::f64::consts::FRAC_PI_2 + step * f64::from(k);
                points.push(center + (out * phi.cos() + normal * phi.sin()) * radius);
            }
        }
        SegmentCap::Rect { length } => {
            for tip in [0.0, length] {
                points.push(at + out * tip + normal * left);
                points.push(at + out * tip - normal * right);
            }
        }
    }
}

/// Cap shapes of a hull around its end points, relative to `origin`.
fn hull_points(hull: &SegmentHull, collapse: bool, outer: bool) -> Vec<Point2> {
    let (p0, p1) = hull.segment().endpoints_2d();
    let dir = (p1 - p0).normalize();
    let normal = Vector2::new(-dir.y, dir.x);
    let widths = (hull.left_offset(), hull.right_offset());
    let (at0, at1) = if collapse { (Point2::origin(), Point2::origin()) } else { (p0, p1) };
    let mut points = Vec::new();
    cap_points(at0, -dir, normal, widths, hull.start_cap(), outer, &mut points);
    cap_points(at1, dir, normal, widths, hull.end_cap(), outer, &mut points);
    points
}

fn convex_hull(mut points: Vec<Point2>) -> Vec<Point2> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    let cross = |o: &Point2, a: &Point2, b: &Point2| (a - o).perp(&(b - o));
    let mut lower: Vec<Point2> = Vec::new();
    for p in &points {
        while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Point2> = Vec::new();
    for p in points.iter().rev() {
        while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Range of `t` with `p0 + t (p1 - p0)` inside the convex CCW `polygon`.
fn clip_line(polygon: &[Point2], p0: Point2, p1: Point2) -> Option<[f64; 2]> {
    let d = p1 - p0;
    let (mut lo, mut hi) = (f64::NEG_INFINITY, f64::INFINITY);
    for (i, e0) in polygon.iter().enumerate() {
        let edge = polygon[(i + 1) % polygon.len()] - e0;
        let f0 = edge.perp(&(p0 - e0));
        let f1 = edge.perp(&d);
        if f1.abs() < 1e-15 {
            if f0 < 0.0 {
                return None;
            }
        } else if f1 > 0.0 {
            lo = lo.max(-f0 / f1);
        } else {
            hi = hi.min(-f0 / f1);
        }
    }
    (lo <= hi).then_some([lo, hi])
}

/// Positions of the hull's carrier line where the hull touches the
/// neighbor: the carrier line clipped with the neighbor minus the hull's
/// own shape.
fn sampled_cut(hull: &SegmentHull, neighbor: &SegmentHull, outer: bool) -> Option<[f64; 2]> {
    let shape = hull_points(hull, true, outer);
    let mut sums = Vec::new();
    for a in hull_points(neighbor, false, outer) {
        sums.extend(shape.iter().map(|k| a - k.coords));
    }
    let (p0, p1) = hull.segment().endpoints_2d();
    clip_line(&convex_hull(sums), p0, p1)
}

fn random_hull(rng: &mut StdRng) -> SegmentHull {
    let p0 = (rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0));
    let angle: f64 = rng.random_range(0.0..std::f64::consts::TAU);
    let length: f64 = rng.random_range(1.0..10.0);
    let p1 = (p0.0 + length * angle.cos(), p0.1 + length * angle.sin());
    let mut cap = || {
        if rng.random_bool(0.5) {
            SegmentCap::Round
        } else {
            SegmentCap::rect(rng.random_range(0.0..1.0)).unwrap()
        }
    };
    let (start, end) = (cap(), cap());
    let left = rng.random_range(0.1..1.5);
    let right = rng.random_range(0.1..1.5);
    hull(p0, p1, left, right, start, end)
}

#[test]
fn detailed_cut_agrees_with_sampled_hulls() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut touching = 0;
    for case in 0..300 {
        let a = random_hull(&mut rng);
        let b = random_hull(&mut rng);
        if a.is_full_deflatable() && b.is_full_deflatable() && a.is_symmetric() && b.is_symmetric() {
            continue;
        }
        let cut = SegmentPair::create(&a, &b, false).cut_curve_hull(0.0).unwrap();
        let inner = sampled_cut(&a, &b, false);
        let outer = sampled_cut(&a, &b, true);
        match (cut.range(), inner, outer) {
            (None, None, _) => {}
            (Some([lo, hi]), inner, Some([olo, ohi])) => {
                assert!(lo >= olo - 1e-7 && hi <= ohi + 1e-7, "case {case}: {lo}..{hi} outside {olo}..{ohi}");
                if let Some([ilo, ihi]) = inner {
                    assert!(lo <= ilo + 1e-7 && hi >= ihi - 1e-7, "case {case}: {lo}..{hi} inside {ilo}..{ihi}");
                    touching += 1;
                }
            }
            (range, inner, outer) => panic!("case {case}: {range:?} vs {inner:?}/{outer:?}"),
        }
    }
    assert!(touching > 50, "only {touching} touching cases");
}

#[test]
fn tangential_touch_has_zero_width() {
    init_tracing();
    let hull = round((0.0, 0.0), (10.0, 0.0), 1.0);
    let neighbor = round((5.0, 1.0), (5.0, 3.0), 0.0);
    let cut = SegmentPair::create(&hull, &neighbor, false).cut_curve_hull(0.0).unwrap();
    assert!(cut.intersects);
    let [lo, hi] = cut.intervals[0];
    assert!(lo <= hi);
    assert_abs_diff_eq!(lo, 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(hi, 0.5, epsilon = 1e-6);
}

#[test]
fn height_matters_only_in_3d() {
    init_tracing();
    let hull = SegmentHull::round(
        LinearSegment::new(0, 0, Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)),
        0.5,
    )
    .unwrap();
    let bridge = SegmentHull::round(
        LinearSegment::new(1, 0, Point3::new(5.0, -5.0, 4.0), Point3::new(5.0, 5.0, 4.0)),
        0.5,
    )
    .unwrap();
    let flat = SegmentPair::create(&hull, &bridge, false).cut_curve_hull(0.0).unwrap();
    let raised = SegmentPair::create(&hull, &bridge, true).cut_curve_hull(0.0).unwrap();
    assert!(flat.intersects);
    assert!(!raised.intersects);
}

#[test]
fn curved_segments_need_round_symmetric_hulls() {
    init_tracing();
    let arc: Segment = ArcSegment::new(0, 3, Point3::origin(), Point3::new(10.0, 0.0, 0.0), 0.4)
        .unwrap()
        .into();
    let neighbor = round((5.0, -5.0), (5.0, 5.0), 0.5);

    let rect = SegmentHull::new(arc.clone(), 1.0, 1.0, SegmentCap::Round, SegmentCap::rect(1.0).unwrap()).unwrap();
    let result: Result<_> = SegmentPair::create(&rect, &neighbor, false).cut_curve_hull(0.0);
    assert!(matches!(result, Err(HullcutError::Hull(_))));

    let symmetric = SegmentHull::round(arc, 0.5).unwrap();
    let cut = SegmentPair::create(&symmetric, &neighbor, false).cut_curve_hull(0.0).unwrap();
    assert!(cut.intersects);
    assert!(cut.t_min_part.is_none());
}

#[test]
fn closed_curve_neighborhoods_and_subparts() {
    init_tracing();
    let ring = [
        Point2::new(0.0, 0.0),
        Point2::new(10.0, 0.0),
        Point2::new(10.0, 10.0),
        Point2::new(0.0, 10.0),
    ];
    let index = IndexedCurve::new(Polycurve::new(vec![CurvePart::from_xy(&ring, true)]), 0.5).unwrap();
    let other = IndexedCurve::new(
        Polycurve::line_string(&[Point2::new(5.0, -1.0), Point2::new(5.0, 1.0)]),
        0.5,
    )
    .unwrap();
    let common = index.envelope().expanded(0.5);
    let hoods = index.try_segment_neighborhoods(&other, &common, 0.5).unwrap();
    assert_eq!(hoods.len(), 1);
    assert_eq!(SegmentKey::of(hoods[0].segment), SegmentKey::new(0, 0));

    let sub = index.subpart(0, 2, 0.0, 1, 0.5).unwrap();
    assert_abs_diff_eq!(sub.length(), 35.0, epsilon = 1e-9);
}

#[test]
fn index_and_hull_types_are_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Segment>();
    assert_send_sync::<SegmentHull>();
    assert_send_sync::<IndexedCurve>();
    assert_send_sync::<hullcut::operations::index::BoxTree<SegmentKey>>();
}
