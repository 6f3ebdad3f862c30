//! Toolpath representation and statistics.

use serde::{Deserialize, Serialize};

use fieldcam_math::Point3;

/// Motion mode of a toolpath point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    /// Non-cutting positioning move (retract, reposition).
    Rapid,
    /// Controlled cutting move, including plunges.
    Feed,
}

/// A tool-tip position reached by a move of the given mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolpathPoint {
    /// Tool tip position (mm).
    pub position: Point3,
    /// Mode of the move ending at this point.
    pub motion: Motion,
    /// Feed rate of the move ending at this point (mm/min).
    pub feed_rate: f64,
}

impl ToolpathPoint {
    /// Rapid move to `position` at the machine's `rate`.
    pub fn rapid(position: Point3, rate: f64) -> Self {
        Self {
            position,
            motion: Motion::Rapid,
            feed_rate: rate,
        }
    }

    /// Cutting move to `position` at `feed_rate`.
    pub fn feed(position: Point3, feed_rate: f64) -> Self {
        Self {
            position,
            motion: Motion::Feed,
            feed_rate,
        }
    }

    /// True for cutting moves.
    pub fn is_cutting(&self) -> bool {
        self.motion == Motion::Feed
    }
}

/// Summary of a toolpath.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolpathStats {
    /// Total travelled distance (mm).
    pub path_length: f64,
    /// Distance travelled by feed moves (mm).
    pub cutting_length: f64,
    /// Estimated machining time (minutes).
    pub estimated_time: f64,
    /// Number of points.
    pub point_count: usize,
    /// Number of transitions from cutting to a rapid move.
    pub retract_count: usize,
}

impl ToolpathStats {
    /// Accumulate stats over consecutive points.
    ///
    /// Each segment is timed at the feed rate of its destination point.
    pub fn from_points(points: &[ToolpathPoint]) -> Self {
        let mut stats = Self {
            point_count: points.len(),
            ..Self::default()
        };
        for pair in points.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let length = (to.position - from.position).norm();
            stats.path_length += length;
            if to.is_cutting() {
                stats.cutting_length += length;
            }
            if to.feed_rate > 0.0 {
                stats.estimated_time += length / to.feed_rate;
            }
            if from.is_cutting() && !to.is_cutting() {
                stats.retract_count += 1;
            }
        }
        stats
    }
}

/// Time-ordered machine motion with its statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolpathResult {
    /// Ordered points.
    pub points: Vec<ToolpathPoint>,
    /// Statistics over `points`.
    pub stats: ToolpathStats,
}

impl ToolpathResult {
    /// Wrap points and compute their stats.
    pub fn new(points: Vec<ToolpathPoint>) -> Self {
        let stats = ToolpathStats::from_points(&points);
        Self { points, stats }
    }

    /// An empty toolpath with zero stats.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True if there is no motion.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stats_three_point_path() {
        let points = vec![
            ToolpathPoint::feed(Point3::new(0.0, 0.0, 0.0), 100.0),
            ToolpathPoint::feed(Point3::new(10.0, 0.0, 0.0), 100.0),
            ToolpathPoint::feed(Point3::new(10.0, 0.0, 5.0), 50.0),
        ];
        let stats = ToolpathStats::from_points(&points);
        assert_relative_eq!(stats.path_length, 15.0);
        assert_relative_eq!(stats.cutting_length, 15.0);
        // 10 / 100 + 5 / 50
        assert_relative_eq!(stats.estimated_time, 0.2, epsilon = 1e-12);
        assert_eq!(stats.point_count, 3);
        assert_eq!(stats.retract_count, 0);
    }

    #[test]
    fn test_stats_count_retracts_and_rapid_length() {
        let points = vec![
            ToolpathPoint::rapid(Point3::new(0.0, 0.0, 10.0), 5000.0),
            ToolpathPoint::feed(Point3::new(0.0, 0.0, 0.0), 200.0),
            ToolpathPoint::feed(Point3::new(3.0, 4.0, 0.0), 1000.0),
            ToolpathPoint::rapid(Point3::new(3.0, 4.0, 10.0), 5000.0),
        ];
        let stats = ToolpathStats::from_points(&points);
        assert_relative_eq!(stats.path_length, 25.0);
        assert_relative_eq!(stats.cutting_length, 15.0);
        assert_relative_eq!(stats.estimated_time, 10.0 / 200.0 + 5.0 / 1000.0 + 10.0 / 5000.0);
        assert_eq!(stats.retract_count, 1);
    }

    #[test]
    fn test_empty_result() {
        let r = ToolpathResult::empty();
        assert!(r.is_empty());
        assert_eq!(r.stats, ToolpathStats::default());
        assert_eq!(ToolpathResult::new(Vec::new()), r);
    }
}
