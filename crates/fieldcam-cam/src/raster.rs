//! Raster surfacing.
//!
//! Parallel scan lines cross the stock at the configured angle. Each line is
//! sampled with the drop-cutter oracle, lines are linked back and forth, and
//! any height jump larger than the wall threshold is crossed by retracting to
//! the safe height instead of cutting through it.

use rayon::prelude::*;

use fieldcam_math::{BoundingBox2, Point2, Point3, Vec2};
use fieldcam_sdf::SdfNode;

use crate::error::{CamError, Result};
use crate::params::{Setup, ToolpathParams};
use crate::tool::ToolDefinition;
use crate::toolpath::{ToolpathPoint, ToolpathResult};

/// A raster line clipped to the stock rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RasterLine {
    start: Point2,
    dir: Vec2,
    length: f64,
}

/// Halvings allowed when refining one steep sample interval.
const MAX_REFINE_DEPTH: u32 = 6;

impl RasterLine {
    fn end(&self) -> Point2 {
        self.start + self.dir * self.length
    }

    /// Tool-tip positions along the line, both ends included.
    fn sample(&self, root: &SdfNode, setup: &Setup) -> Vec<Point3> {
        trace(root, setup, self.start, self.end())
    }
}

/// Tool-tip positions from `from` to `to`, spaced by the resolution or closer.
///
/// An interval that climbs more than one resolution step is halved until it
/// does not, so chords across steep flanks stay on the surface.
fn trace(root: &SdfNode, setup: &Setup, from: Point2, to: Point2) -> Vec<Point3> {
    let tip = |p: Point2| Point3::new(p.x, p.y, setup.tip_height(root, p.x, p.y));
    let span = to - from;
    let steps = ((span.norm() / setup.resolution).ceil() as usize).max(1);

    let mut out = Vec::with_capacity(steps + 1);
    let mut prev = tip(from);
    out.push(prev);
    for i in 1..=steps {
        let xy = if i == steps {
            to
        } else {
            from + span * (i as f64 / steps as f64)
        };
        let next = tip(xy);
        refine(&tip, setup.resolution, prev, next, MAX_REFINE_DEPTH, &mut out);
        out.push(next);
        prev = next;
    }
    out
}

/// Push the midpoints between `a` and `b` (exclusive) needed to keep every
/// height step within `step`.
fn refine(
    tip: &impl Fn(Point2) -> Point3,
    step: f64,
    a: Point3,
    b: Point3,
    depth: u32,
    out: &mut Vec<Point3>,
) {
    if depth == 0 || (b.z - a.z).abs() <= step {
        return;
    }
    let mid = tip(Point2::from((a.xy().coords + b.xy().coords) * 0.5));
    refine(tip, step, a, mid, depth - 1, out);
    out.push(mid);
    refine(tip, step, mid, b, depth - 1, out);
}

/// Generate a raster surfacing toolpath over `root`.
///
/// Heights come from the same distance field the mesher samples, offset by
/// the tool radius, so the path agrees with the extracted mesh. A part with
/// no material above the stock floor yields an empty toolpath.
pub fn generate_raster_surfacing(
    root: &SdfNode,
    tool: &ToolDefinition,
    params: &ToolpathParams,
) -> Result<ToolpathResult> {
    let Some(setup) = Setup::resolve(root, tool, params)? else {
        tracing::info!("part has no material, skipping surfacing");
        return Ok(ToolpathResult::empty());
    };
    let lines = raster_lines(&setup)?;
    tracing::debug!(
        lines = lines.len(),
        stepover = setup.stepover,
        resolution = setup.resolution,
        "planned raster lines"
    );

    let passes: Vec<Vec<Point3>> = lines
        .par_iter()
        .map(|line| line.sample(root, &setup))
        .collect();

    let floor = setup.stock.min.z;
    let touches = passes
        .iter()
        .flatten()
        .any(|p| p.z > floor + setup.tolerance);
    if !touches {
        tracing::info!("no material above the stock floor, skipping surfacing");
        return Ok(ToolpathResult::empty());
    }

    let result = ToolpathResult::new(link_passes(root, passes, &setup));
    tracing::info!(
        points = result.stats.point_count,
        length = result.stats.path_length,
        retracts = result.stats.retract_count,
        minutes = result.stats.estimated_time,
        "generated raster surfacing"
    );
    Ok(result)
}

/// Raster lines covering the stock, in order across the raster direction.
fn raster_lines(setup: &Setup) -> Result<Vec<RasterLine>> {
    let (sin, cos) = setup.raster_angle.sin_cos();
    let along = Vec2::new(cos, sin);
    let across = Vec2::new(-sin, cos);
    let stock = setup.stock.xy();

    let corners = [
        stock.min,
        Point2::new(stock.max.x, stock.min.y),
        stock.max,
        Point2::new(stock.min.x, stock.max.y),
    ];
    let (lo, hi) = corners
        .iter()
        .map(|c| c.coords.dot(&across))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let extent = hi - lo;
    if setup.stepover > extent {
        return Err(CamError::NoRasterLines {
            stepover: setup.stepover,
            extent,
        });
    }

    let count = (extent / setup.stepover + 1e-9).floor() as usize + 1;
    let mut offsets: Vec<f64> = (0..count)
        .map(|i| lo + i as f64 * setup.stepover)
        .collect();
    if offsets.last().is_some_and(|&last| hi - last > 1e-9 * extent.max(1.0)) {
        offsets.push(hi);
    }

    let lines: Vec<RasterLine> = offsets
        .into_iter()
        .filter_map(|offset| clip_line(&stock, &along, &(across * offset)))
        .collect();
    if lines.is_empty() {
        return Err(CamError::NoRasterLines {
            stepover: setup.stepover,
            extent,
        });
    }
    Ok(lines)
}

/// Clip the line through `base` along `dir` to the rectangle.
fn clip_line(rect: &BoundingBox2, dir: &Vec2, base: &Vec2) -> Option<RasterLine> {
    let (mut t0, mut t1) = (f64::NEG_INFINITY, f64::INFINITY);
    for axis in 0..2 {
        let (min, max) = (rect.min[axis], rect.max[axis]);
        if dir[axis].abs() < 1e-12 {
            if base[axis] < min - 1e-9 || base[axis] > max + 1e-9 {
                return None;
            }
        } else {
            let a = (min - base[axis]) / dir[axis];
            let b = (max - base[axis]) / dir[axis];
            t0 = t0.max(a.min(b));
            t1 = t1.min(a.max(b));
        }
    }
    (t1 - t0 > 1e-9).then(|| RasterLine {
        start: Point2::from(base + dir * t0),
        dir: *dir,
        length: t1 - t0,
    })
}

/// Split a pass wherever consecutive heights jump by more than `threshold`.
fn split_at_walls(samples: &[Point3], threshold: f64) -> Vec<&[Point3]> {
    let mut segments = Vec::new();
    let mut start = 0;
    for i in 1..samples.len() {
        if (samples[i].z - samples[i - 1].z).abs() > threshold {
            segments.push(&samples[start..i]);
            start = i;
        }
    }
    if start < samples.len() {
        segments.push(&samples[start..]);
    }
    segments
}

/// Drop samples a straight cut can skip without leaving the surface by more
/// than `tolerance`.
///
/// Douglas-Peucker on the sampled path: a run of samples is replaced by its
/// chord only when every sample in the run lies within `tolerance` of it.
pub fn simplify_pass(points: &[Point3], tolerance: f64) -> Vec<Point3> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;
    let mut runs = vec![(0, n - 1)];
    while let Some((first, last)) = runs.pop() {
        if last <= first + 1 {
            continue;
        }
        let (worst, deviation) = (first + 1..last)
            .map(|i| (i, chord_deviation(&points[first], &points[last], &points[i])))
            .fold((first, 0.0), |best, cand| if cand.1 > best.1 { cand } else { best });
        if deviation > tolerance {
            keep[worst] = true;
            runs.push((first, worst));
            runs.push((worst, last));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, kept)| kept.then_some(*p))
        .collect()
}

/// Distance from `p` to the chord `a`-`b`, measured vertically above the
/// chord's XY footprint and sideways off it.
fn chord_deviation(a: &Point3, b: &Point3, p: &Point3) -> f64 {
    let (a, b, p) = (*a, *b, *p);
    let span = b.xy() - a.xy();
    let len_sq = span.norm_squared();
    if len_sq < 1e-20 {
        let ab = b - a;
        let t = if ab.norm_squared() > 0.0 {
            ((p - a).dot(&ab) / ab.norm_squared()).clamp(0.0, 1.0)
        } else {
            0.0
        };
        return (p - (a + ab * t)).norm();
    }
    let offset = p.xy() - a.xy();
    let t = offset.dot(&span) / len_sq;
    let vertical = p.z - (a.z + t * (b.z - a.z));
    let sideways = (offset.x * span.y - offset.y * span.x) / len_sq.sqrt();
    vertical.hypot(sideways)
}

/// Cutting link from the end of one pass to the start of the next, following
/// the surface, or `None` when the way crosses a wall.
fn link_path(root: &SdfNode, setup: &Setup, from: &Point3, to: &Point3) -> Option<Vec<Point3>> {
    let mut path = trace(root, setup, from.xy(), to.xy());
    let crosses_wall = path
        .windows(2)
        .any(|w| (w[1].z - w[0].z).abs() > setup.wall_threshold);
    if crosses_wall {
        return None;
    }
    let last = path.len() - 1;
    path[0] = *from;
    path[last] = *to;
    Some(simplify_pass(&path, setup.tolerance))
}

/// Order passes back and forth and connect them with cutting links or retracts.
///
/// A link is cut only between neighbouring lines and only when the surface
/// between them has no wall; it then follows the surface like a pass.
fn link_passes(root: &SdfNode, passes: Vec<Vec<Point3>>, setup: &Setup) -> Vec<ToolpathPoint> {
    let safe = |p: &Point3| Point3::new(p.x, p.y, setup.safe_height);
    let mut out: Vec<ToolpathPoint> = Vec::new();
    let mut last: Option<Point3> = None;

    for (index, mut samples) in passes.into_iter().enumerate() {
        if index % 2 == 1 {
            samples.reverse();
        }
        for (k, segment) in split_at_walls(&samples, setup.wall_threshold)
            .into_iter()
            .enumerate()
        {
            let pass = simplify_pass(segment, setup.tolerance);
            let Some(&start) = pass.first() else { continue };

            match last {
                None => {
                    out.push(ToolpathPoint::rapid(safe(&start), setup.rapid_rate));
                    out.push(ToolpathPoint::feed(start, setup.plunge_rate));
                }
                Some(prev) => {
                    let step = (start.xy() - prev.xy()).norm();
                    let link = (k == 0 && step <= setup.stepover * 1.5)
                        .then(|| link_path(root, setup, &prev, &start))
                        .flatten();
                    if let Some(link) = link {
                        out.extend(
                            link[1..]
                                .iter()
                                .map(|p| ToolpathPoint::feed(*p, setup.feed_rate)),
                        );
                    } else {
                        out.push(ToolpathPoint::rapid(safe(&prev), setup.rapid_rate));
                        out.push(ToolpathPoint::rapid(safe(&start), setup.rapid_rate));
                        out.push(ToolpathPoint::feed(start, setup.plunge_rate));
                    }
                }
            }
            out.extend(
                pass[1..]
                    .iter()
                    .map(|p| ToolpathPoint::feed(*p, setup.feed_rate)),
            );
            last = pass.last().copied();
        }
    }

    if let Some(prev) = last {
        out.push(ToolpathPoint::rapid(safe(&prev), setup.rapid_rate));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolpath::Motion;
    use fieldcam_math::{BoundingBox3, Vec3};

    fn plane_params() -> ToolpathParams {
        ToolpathParams {
            stock: Some(BoundingBox3::new(
                Point3::new(-10.0, -10.0, -5.0),
                Point3::new(10.0, 10.0, 2.0),
            )),
            ..Default::default()
        }
    }

    #[test]
    fn test_flat_plane_stays_at_zero() {
        let plane = SdfNode::plane(Vec3::z(), 0.0).unwrap();
        let tool = ToolDefinition::flat(6.0);
        let result = generate_raster_surfacing(&plane, &tool, &plane_params()).unwrap();

        assert!(!result.is_empty());
        for p in result.points.iter().filter(|p| p.is_cutting()) {
            assert!(p.position.z.abs() < 1e-3, "cut at z = {}", p.position.z);
        }
        // Only the final retract leaves the stock
        assert_eq!(result.stats.retract_count, 1);
        let rapids = result
            .points
            .iter()
            .filter(|p| p.motion == Motion::Rapid)
            .count();
        assert_eq!(rapids, 2);
        assert_eq!(result.points.first().map(|p| p.position.z), Some(7.0));
        assert_eq!(result.points.last().map(|p| p.position.z), Some(7.0));
    }

    #[test]
    fn test_lines_alternate_direction() {
        let plane = SdfNode::plane(Vec3::z(), 0.0).unwrap();
        let tool = ToolDefinition::flat(6.0);
        let result = generate_raster_surfacing(&plane, &tool, &plane_params()).unwrap();
        // Flat lines collapse to their end points: approach, plunge, then
        // pairs of (line start, line end)
        let cuts: Vec<Point3> = result.points[2..result.len() - 1]
            .iter()
            .map(|p| p.position)
            .collect();
        assert_eq!(cuts.len() % 2, 1);
        assert_eq!(cuts[0].x, 10.0);
        assert_eq!(cuts[1].x, 10.0);
        assert_eq!(cuts[2].x, -10.0);
        assert!(cuts[1].y > cuts[0].y);
    }

    #[test]
    fn test_stepover_larger_than_stock_is_rejected() {
        let plane = SdfNode::plane(Vec3::z(), 0.0).unwrap();
        let params = ToolpathParams {
            stepover: Some(25.0),
            ..plane_params()
        };
        let err = generate_raster_surfacing(&plane, &ToolDefinition::flat(6.0), &params).unwrap_err();
        assert_eq!(
            err,
            CamError::NoRasterLines {
                stepover: 25.0,
                extent: 20.0
            }
        );
    }

    #[test]
    fn test_ball_does_not_gouge_sphere() {
        let sphere = SdfNode::sphere(10.0).unwrap();
        let tool = ToolDefinition::ball(4.0);
        let result = generate_raster_surfacing(&sphere, &tool, &ToolpathParams::default()).unwrap();
        assert!(!result.is_empty());

        let r = tool.radius();
        for p in result.points.iter().filter(|p| p.is_cutting()) {
            let centre = p.position + Vec3::new(0.0, 0.0, r);
            assert!(
                sphere.eval(&centre) >= r - 1e-2,
                "gouge at {:?}",
                p.position
            );
        }
        let top = result
            .points
            .iter()
            .filter(|p| p.is_cutting())
            .map(|p| p.position.z)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!((top - 10.0).abs() < 0.05, "top = {top}");
        // The edge of the sphere drops to the floor and forces retracts
        assert!(result.stats.retract_count > 1);
    }

    /// Deepest the tool sinks into `part` anywhere along a cutting move.
    fn max_penetration(part: &SdfNode, tool: &ToolDefinition, result: &ToolpathResult) -> f64 {
        let r = tool.radius();
        let mut deepest = f64::NEG_INFINITY;
        for pair in result.points.windows(2).filter(|w| w[1].is_cutting()) {
            let (a, b) = (pair[0].position, pair[1].position);
            for i in 0..=20 {
                let tip = a + (b - a) * (i as f64 / 20.0);
                let centre = tip + Vec3::new(0.0, 0.0, r);
                deepest = deepest.max(r - part.eval(&centre));
            }
        }
        deepest
    }

    #[test]
    fn test_simplified_cuts_stay_within_tolerance() {
        let sphere = SdfNode::sphere(10.0).unwrap();
        let tool = ToolDefinition::ball(4.0);
        let params = ToolpathParams {
            resolution: Some(0.05),
            tolerance: Some(0.01),
            ..Default::default()
        };
        let result = generate_raster_surfacing(&sphere, &tool, &params).unwrap();
        assert!(!result.is_empty());

        let depth = max_penetration(&sphere, &tool, &result);
        assert!(depth <= 0.01 + 2e-3, "gouged {depth} mm between samples");
    }

    #[test]
    fn test_link_does_not_cut_through_rib() {
        let plate = SdfNode::cuboid(Vec3::new(20.0, 15.0, 2.0))
            .unwrap()
            .translate(Vec3::new(0.0, 0.0, -1.0))
            .unwrap();
        let rib = SdfNode::cuboid(Vec3::new(20.0, 1.0, 5.0))
            .unwrap()
            .translate(Vec3::new(0.0, 0.0, 2.5))
            .unwrap();
        let part = plate.union(rib);
        let tool = ToolDefinition::flat(0.5);
        let params = ToolpathParams {
            stock: Some(BoundingBox3::new(
                Point3::new(-10.0, -7.5, -2.0),
                Point3::new(10.0, 7.5, 5.0),
            )),
            stepover: Some(3.0),
            resolution: Some(0.1),
            ..Default::default()
        };
        let result = generate_raster_surfacing(&part, &tool, &params).unwrap();

        let depth = max_penetration(&part, &tool, &result);
        assert!(depth <= 1e-3 + 2e-3, "gouged {depth} mm");
        // Crossing the rib between the lines either side of it needs a retract
        assert!(result.stats.retract_count >= 2);
    }

    #[test]
    fn test_wall_forces_retract() {
        let slab = SdfNode::cuboid(Vec3::new(20.0, 20.0, 2.0)).unwrap();
        let block = SdfNode::cuboid(Vec3::new(6.0, 20.0, 6.0))
            .unwrap()
            .translate(Vec3::new(0.0, 0.0, 3.0))
            .unwrap();
        let part = slab.union(block);
        let tool = ToolDefinition::ball(2.0);
        let result = generate_raster_surfacing(&part, &tool, &ToolpathParams::default()).unwrap();

        assert!(result.stats.retract_count > 1);
        // The 1 mm to 5 mm climb onto the block is never cut directly
        for pair in result.points.windows(2) {
            if pair[1].is_cutting() && pair[0].is_cutting() {
                let dz = (pair[1].position.z - pair[0].position.z).abs();
                assert!(dz < 2.0, "cut through wall: {pair:?}");
            }
        }
    }

    #[test]
    fn test_no_material_gives_empty_path() {
        let below = SdfNode::sphere(1.0)
            .unwrap()
            .translate(Vec3::new(0.0, 0.0, -20.0))
            .unwrap();
        let result =
            generate_raster_surfacing(&below, &ToolDefinition::flat(2.0), &plane_params()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.stats.point_count, 0);

        let nothing = SdfNode::sphere(1.0).unwrap().intersect(
            SdfNode::sphere(1.0)
                .unwrap()
                .translate(Vec3::new(5.0, 0.0, 0.0))
                .unwrap(),
        );
        let result = generate_raster_surfacing(
            &nothing,
            &ToolDefinition::flat(2.0),
            &ToolpathParams::default(),
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_rotated_raster_covers_stock() {
        let plane = SdfNode::plane(Vec3::z(), 0.0).unwrap();
        let params = ToolpathParams {
            raster_angle: 45.0,
            ..plane_params()
        };
        let result = generate_raster_surfacing(&plane, &ToolDefinition::flat(6.0), &params).unwrap();
        assert!(!result.is_empty());
        for p in &result.points {
            assert!(p.position.x.abs() <= 10.0 + 1e-9);
            assert!(p.position.y.abs() <= 10.0 + 1e-9);
        }
    }

    #[test]
    fn test_simplify_pass() {
        let line: Vec<Point3> = (0..5)
            .map(|i| Point3::new(i as f64, 0.0, 0.5 * i as f64))
            .collect();
        let simplified = simplify_pass(&line, 1e-6);
        assert_eq!(simplified, vec![line[0], line[4]]);

        let mut bump = line.clone();
        bump[2].z += 1.0;
        assert_eq!(simplify_pass(&bump, 1e-3).len(), 5);
        assert!(simplify_pass(&[], 1e-3).is_empty());
    }

    #[test]
    fn test_split_at_walls() {
        let samples = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.1),
            Point3::new(2.0, 0.0, 5.0),
            Point3::new(3.0, 0.0, 5.0),
        ];
        let segments = split_at_walls(&samples, 1.0);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[1].len(), 2);
    }
}
