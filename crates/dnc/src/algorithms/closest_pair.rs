use std::fmt;

use log::trace;

use crate::TUNED_PARAMS;
use crate::metrics::{DepthTracker, Instrumented, Metrics};
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Two points and their distance, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointPair {
    p1: Point,
    p2: Point,
    distance: f64,
}

impl PointPair {
    pub fn new(p1: Point, p2: Point) -> Self {
        Self {
            p1,
            p2,
            distance: p1.distance_to(&p2),
        }
    }

    pub fn p1(&self) -> Point {
        self.p1
    }

    pub fn p2(&self) -> Point {
        self.p2
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl fmt::Display for PointPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Points: {} - {}, Distance: {:.4}", self.p1, self.p2, self.distance)
    }
}

/// A point tagged with its position in the x-sorted order.
///
/// The rank orders points with equal x, so the y-sorted list can be split
/// into exactly the same two sets as the x-sorted list.
#[derive(Clone, Copy, Debug)]
struct Ranked {
    point: Point,
    rank: usize,
}

/// Planar closest pair by divide and conquer, with a brute-force oracle.
#[derive(Debug)]
pub struct ClosestPair {
    metrics: Metrics,
    depth: DepthTracker,
}

impl Default for ClosestPair {
    fn default() -> Self {
        Self::new()
    }
}

impl ClosestPair {
    pub const NAME: &'static str = "ClosestPair";

    pub fn new() -> Self {
        Self {
            metrics: Metrics::new(Self::NAME),
            depth: DepthTracker::new(),
        }
    }

    pub fn find_closest_pair(&mut self, points: &[Point]) -> Result<PointPair> {
        check_points(points)?;

        let n = points.len();
        self.metrics.begin_run(n, &self.depth);

        let mut by_x = points.to_vec();
        by_x.sort_by(|a, b| a.x.total_cmp(&b.x));
        let mut by_y = by_x
            .iter()
            .enumerate()
            .map(|(rank, &point)| Ranked { point, rank })
            .collect::<Vec<_>>();
        by_y.sort_by(|a, b| a.point.y.total_cmp(&b.point.y));
        self.metrics.add_allocations(2 * n);

        let best = closest_recursive(&by_x, 0, &by_y, &mut self.metrics, &self.depth);
        self.metrics.end_run(&self.depth);
        Ok(best)
    }

    pub fn find_closest_pair_brute_force(&mut self, points: &[Point]) -> Result<PointPair> {
        check_points(points)?;

        self.metrics.begin_run(points.len(), &self.depth);
        let best = brute_force(points, &mut self.metrics);
        self.metrics.end_run(&self.depth);
        Ok(best)
    }
}

impl Instrumented for ClosestPair {
    fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn depth(&self) -> &DepthTracker {
        &self.depth
    }
}

fn check_points(points: &[Point]) -> Result<()> {
    if points.len() < 2 {
        return Err(Error::InsufficientPoints {
            found: points.len(),
        });
    }
    Ok(())
}

/// `px` is a window of the x-sorted points starting at rank `offset`; `py`
/// holds the same points in y order.
fn closest_recursive(
    px: &[Point],
    offset: usize,
    py: &[Ranked],
    metrics: &mut Metrics,
    depth: &DepthTracker,
) -> PointPair {
    let _frame = depth.enter();
    debug_assert_eq!(px.len(), py.len());

    let n = px.len();
    if n <= TUNED_PARAMS.brute_force_cutoff {
        return brute_force(px, metrics);
    }

    let mid = n / 2;
    let split_x = px[mid].x;
    let split_rank = offset + mid;

    // A point goes left when it is left of the split point in x order; among
    // points sharing `split_x` the rank decides, so the left bucket is filled
    // to exactly `mid`.
    let mut left_y = Vec::with_capacity(mid);
    let mut right_y = Vec::with_capacity(n - mid);
    for &p in py {
        metrics.inc_comparisons();
        if p.point.x <= split_x && p.rank < split_rank {
            left_y.push(p);
        } else {
            right_y.push(p);
        }
    }
    metrics.add_allocations(n);
    debug_assert_eq!(left_y.len(), mid);

    let (left_x, right_x) = px.split_at(mid);
    let left = closest_recursive(left_x, offset, &left_y, metrics, depth);
    let right = closest_recursive(right_x, split_rank, &right_y, metrics, depth);

    metrics.inc_comparisons();
    let best = if left.distance() < right.distance() {
        left
    } else {
        right
    };

    check_strip(py, split_x, best, metrics)
}

/// Looks for a pair closer than `best` across the split line.
fn check_strip(py: &[Ranked], split_x: f64, best: PointPair, metrics: &mut Metrics) -> PointPair {
    let mut delta = best.distance();

    let mut strip = Vec::with_capacity(py.len());
    for p in py {
        metrics.inc_comparisons();
        if (p.point.x - split_x).abs() < delta {
            strip.push(p.point);
        }
    }
    trace!("strip: {} of {} points, delta={delta}", strip.len(), py.len());

    let mut best = best;
    for i in 0..strip.len() {
        let window_end = strip.len().min(i + 1 + TUNED_PARAMS.strip_window);
        for j in (i + 1)..window_end {
            metrics.inc_comparisons();
            if strip[j].y - strip[i].y >= delta {
                break;
            }

            let dist = strip[i].distance_to(&strip[j]);
            metrics.inc_comparisons();
            if dist < best.distance() {
                best = PointPair::new(strip[i], strip[j]);
                delta = dist;
            }
        }
    }

    best
}

fn brute_force(points: &[Point], metrics: &mut Metrics) -> PointPair {
    debug_assert!(points.len() >= 2);

    let mut best = PointPair::new(points[0], points[1]);
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            metrics.inc_comparisons();
            if a.distance_to(b) < best.distance() {
                best = PointPair::new(*a, *b);
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::algorithms::common::ceil_log2;

    const EPS: f64 = 1e-4;

    fn random_points(rng: &mut StdRng, n: usize, max: f64) -> Vec<Point> {
        (0..n)
            .map(|_| Point::new(rng.random::<f64>() * max, rng.random::<f64>() * max))
            .collect()
    }

    fn assert_matches_brute_force(solver: &mut ClosestPair, points: &[Point]) {
        let dc = solver.find_closest_pair(points).unwrap();
        let bf = solver.find_closest_pair_brute_force(points).unwrap();
        assert!(
            (dc.distance() - bf.distance()).abs() < EPS,
            "n={} dc={} bf={}",
            points.len(),
            dc.distance(),
            bf.distance(),
        );
        assert!((dc.p1().distance_to(&dc.p2()) - dc.distance()).abs() < EPS);
    }

    #[test]
    fn scenarios() {
        let mut solver = ClosestPair::new();

        let diagonal = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(0.5, 0.5),
        ];
        let pair = solver.find_closest_pair(&diagonal).unwrap();
        assert!((pair.distance() - 0.5_f64.sqrt()).abs() < EPS);

        let collinear = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
        ];
        let pair = solver.find_closest_pair(&collinear).unwrap();
        assert!((pair.distance() - 1.0).abs() < EPS);

        let two = [Point::new(1.0, 2.0), Point::new(4.0, 6.0)];
        assert_eq!(solver.find_closest_pair(&two).unwrap().distance(), 5.0);
    }

    #[test]
    fn rejects_fewer_than_two_points() {
        let mut solver = ClosestPair::new();
        assert!(matches!(
            solver.find_closest_pair(&[]),
            Err(Error::InsufficientPoints { found: 0 })
        ));
        assert!(matches!(
            solver.find_closest_pair_brute_force(&[Point::new(0.0, 0.0)]),
            Err(Error::InsufficientPoints { found: 1 })
        ));
    }

    #[test]
    fn random_sets_match_brute_force() {
        let mut solver = ClosestPair::new();
        let mut rng = StdRng::seed_from_u64(0xC105_E570);
        for &n in &[2_usize, 3, 4, 5, 10, 20, 50, 100, 200, 1000] {
            for _ in 0..5 {
                let points = random_points(&mut rng, n, 100.0);
                assert_matches_brute_force(&mut solver, &points);
            }
        }
    }

    #[test]
    fn shared_x_coordinates_and_duplicates() {
        let mut solver = ClosestPair::new();

        // Whole columns on the split line.
        let grid = (0..12)
            .flat_map(|i| (0..12).map(move |j| Point::new(i as f64, j as f64 * 1.5)))
            .collect::<Vec<_>>();
        assert_matches_brute_force(&mut solver, &grid);

        let vertical = (0..64).map(|j| Point::new(3.0, (j * j) as f64)).collect::<Vec<_>>();
        assert_matches_brute_force(&mut solver, &vertical);

        let mut rng = StdRng::seed_from_u64(0xD0B1_E000);
        let mut clustered = (0..300)
            .map(|_| Point::new(rng.random_range(0..4) as f64, rng.random::<f64>() * 1000.0))
            .collect::<Vec<_>>();
        assert_matches_brute_force(&mut solver, &clustered);

        clustered.push(clustered[17]);
        let pair = solver.find_closest_pair(&clustered).unwrap();
        assert_eq!(pair.distance(), 0.0);
    }

    #[test]
    fn depth_is_logarithmic() {
        let mut solver = ClosestPair::new();
        let mut rng = StdRng::seed_from_u64(0xDE97_0004);
        for &n in &[16_usize, 100, 1024, 10_000] {
            let points = random_points(&mut rng, n, 1000.0);
            solver.find_closest_pair(&points).unwrap();
            let depth = solver.metrics().max_depth();
            assert!(depth <= ceil_log2(n) + 1, "n={n} depth={depth}");
            // Two pre-sorted copies, then one y-split per level at most.
            let allocations = solver.metrics().allocations();
            assert!(allocations > 2 * n as u64);
            assert!(allocations <= (2 * n + n * depth) as u64);
        }
    }

    #[test]
    fn brute_force_has_no_recursion() {
        let mut solver = ClosestPair::new();
        let points = [Point::new(0.0, 0.0), Point::new(3.0, 4.0), Point::new(1.0, 1.0)];
        let pair = solver.find_closest_pair_brute_force(&points).unwrap();
        assert!((pair.distance() - 2.0_f64.sqrt()).abs() < EPS);
        assert_eq!(solver.metrics().max_depth(), 0);
        assert_eq!(solver.metrics().comparisons(), 3);
    }

    #[test]
    fn display_formats() {
        let pair = PointPair::new(Point::new(2.0, 3.0), Point::new(3.0, 4.0));
        assert_eq!(pair.to_string(), "Points: (2.00, 3.00) - (3.00, 4.00), Distance: 1.4142");
    }
}
